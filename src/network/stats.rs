use serde::{Deserialize, Serialize};

/// Point-in-time training state of a `Network`.
///
/// `alpha` and `eta` are derived from `error_approximation` at the moment
/// the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    /// Completed training steps.
    pub epoch: u64,
    /// Raw error of the most recent step.
    pub error: f64,
    /// Exponentially smoothed error.
    pub error_approximation: f64,
    /// Momentum coefficient, `1 - error_approximation`.
    pub alpha: f64,
    /// Learning rate, `error_approximation²`.
    pub eta: f64,
    pub error_percentage: f64,
    pub has_learned_enough: bool,
}
