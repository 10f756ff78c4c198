use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};
use std::time::Duration;

use crate::network::stats::NetworkStats;

/// Configuration for a background `train_full` run.
///
/// # Fields
/// - `sleep_per_epoch` optional pause after every training step; spaces
///                     steps out for observation, has no effect on results
/// - `log_every`       emit a progress log line (and a `progress_tx` message)
///                     every this many epochs; `0` disables both
/// - `progress_tx`     optional channel sender receiving a `NetworkStats`
///                     snapshot every `log_every` epochs. If the receiver is
///                     dropped the run stops (clean shutdown).
/// - `stop_flag`       optional shared flag; when set to `true` from another
///                     thread the run stops before its next step. A fresh
///                     flag is created when none is given.
pub struct TrainConfig {
    pub sleep_per_epoch: Option<Duration>,
    pub log_every: u64,
    pub progress_tx: Option<mpsc::Sender<NetworkStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// No pause, a progress line every 10 000 epochs, no channel, no external flag.
    pub fn new() -> Self {
        TrainConfig {
            sleep_per_epoch: None,
            log_every: 10_000,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn sleep_per_epoch(mut self, pause: Duration) -> Self {
        self.sleep_per_epoch = Some(pause);
        self
    }

    pub fn log_every(mut self, epochs: u64) -> Self {
        self.log_every = epochs;
        self
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new()
    }
}
