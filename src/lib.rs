pub mod activation;
pub mod error;
pub mod layers;
pub mod loss;
pub mod math;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::sigmoid::Sigmoid;
pub use error::{NetworkError, Result};
pub use layers::{Connection, Layer, LayerKind, Neuron};
pub use loss::half_squared::HalfSquaredError;
pub use network::{Network, NetworkConfig, NetworkStats};
pub use train::{
    train_full, DataSet, Sample, TrainConfig, TrainingHandle, TrainingOutcome, TrainingSet,
};
