use std::f64::consts::E;

/// Logistic activation applied at every hidden and output neuron.
pub struct Sigmoid;

impl Sigmoid {
    /// σ(x) = 1 / (1 + e^-x)
    pub fn function(x: f64) -> f64 {
        1.0 / (1.0 + E.powf(-x))
    }

    /// σ'(x) written in terms of the already activated value y = σ(x).
    pub fn derivative_from_output(y: f64) -> f64 {
        y * (1.0 - y)
    }
}
