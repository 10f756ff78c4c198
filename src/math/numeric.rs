//! Small numeric helpers shared by the network and its read-only views.

/// Moves `current` a fraction `rate` of the way toward `target`.
///
/// This is an exponential moving average; `rate` in (0, 1].
pub fn approach(current: f64, target: f64, rate: f64) -> f64 {
    current + (target - current) * rate
}

/// Rounds to the nearest integer, ties away from zero.
pub fn round_to_int(x: f64) -> i64 {
    x.round() as i64
}

/// Index of the maximum element in a slice. Ties resolve to the first index.
pub fn argmax(v: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &x) in v.iter().enumerate() {
        match best {
            Some((_, b)) if !(x > b) => {}
            _ => best = Some((i, x)),
        }
    }
    best.map(|(i, _)| i)
}
