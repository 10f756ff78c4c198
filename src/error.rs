use thiserror::Error;

use crate::layers::layer::LayerKind;

/// Everything that can go wrong while building, training or persisting a network.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// An input or target vector does not match the width of the layer it feeds.
    #[error("shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The network has no layers yet; call `initialize` first.
    #[error("network is not initialized")]
    Uninitialized,

    /// Imported weights do not fit the topology built by `initialize`.
    /// `layer` is `None` when the layer count itself differs.
    #[error("topology mismatch at layer {layer:?}: expected {expected}, got {actual}")]
    TopologyMismatch {
        layer: Option<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("invalid weight '{token}' in layer {layer}")]
    InvalidWeight { layer: usize, token: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{operation} is not supported on a {kind:?} layer")]
    UnsupportedOperation {
        operation: &'static str,
        kind: LayerKind,
    },

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("network mutex was poisoned by a panicking thread")]
    Poisoned,

    #[error("background training thread panicked")]
    TrainingPanicked,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
