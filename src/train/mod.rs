pub mod background;
pub mod train_config;
pub mod training_set;

pub use background::{train_full, TrainingHandle, TrainingOutcome};
pub use train_config::TrainConfig;
pub use training_set::{DataSet, Sample, TrainingSet};
