/// Classic half-squared error, averaged over the output neurons.
pub struct HalfSquaredError;

impl HalfSquaredError {
    /// Scalar loss: mean(0.5 * (expected - predicted)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, e)| 0.5 * (e - p).powi(2))
            .sum::<f64>()
            / n
    }

    /// Error signal for a single output: expected - predicted.
    ///
    /// Note the sign: it points toward the target, so weight updates add it.
    pub fn signal(predicted: f64, expected: f64) -> f64 {
        expected - predicted
    }
}
