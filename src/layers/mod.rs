pub mod connection;
pub mod layer;
pub mod neuron;

pub use connection::Connection;
pub use layer::{Layer, LayerKind};
pub use neuron::Neuron;
