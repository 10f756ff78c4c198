pub mod config;
pub mod network;
pub mod stats;

pub use config::NetworkConfig;
pub use network::Network;
pub use stats::NetworkStats;
