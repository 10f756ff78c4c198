use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, info};

use crate::error::{NetworkError, Result};
use crate::network::network::Network;
use crate::train::train_config::TrainConfig;
use crate::train::training_set::TrainingSet;

/// How a background run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingOutcome {
    /// The smoothed error dropped below the threshold. `epochs` is the
    /// network's total epoch count at that point.
    Converged { epochs: u64 },
    /// The stop flag was raised, or the progress receiver went away.
    Stopped { epochs: u64 },
}

/// Handle to a training run started by `train_full`.
#[derive(Debug)]
pub struct TrainingHandle {
    stop_flag: Arc<AtomicBool>,
    thread: JoinHandle<Result<TrainingOutcome>>,
}

impl TrainingHandle {
    /// Asks the run to stop before its next step.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Blocks until the run ends.
    pub fn join(self) -> Result<TrainingOutcome> {
        self.thread.join().map_err(|_| NetworkError::TrainingPanicked)?
    }
}

/// Trains `network` on a background thread until it has learned enough or
/// is told to stop, and returns immediately.
///
/// The network is locked for one step at a time, so other threads can read
/// it (`results`, `stats`, ...) between steps. The stop flag is checked once
/// per step.
pub fn train_full<T>(
    network: Arc<Mutex<Network>>,
    training_set: Arc<T>,
    config: TrainConfig,
) -> TrainingHandle
where
    T: TrainingSet + Send + Sync + 'static,
{
    let stop_flag = config
        .stop_flag
        .clone()
        .unwrap_or_else(|| Arc::new(AtomicBool::new(false)));
    let flag = stop_flag.clone();
    let thread = thread::spawn(move || run(&network, training_set.as_ref(), &config, &flag));
    TrainingHandle { stop_flag, thread }
}

fn run<T: TrainingSet>(
    network: &Mutex<Network>,
    training_set: &T,
    config: &TrainConfig,
    stop_flag: &AtomicBool,
) -> Result<TrainingOutcome> {
    let started = Instant::now();

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            let epochs = network.lock().map_err(|_| NetworkError::Poisoned)?.epoch();
            info!("training stopped after {} epochs ({:?})", epochs, started.elapsed());
            return Ok(TrainingOutcome::Stopped { epochs });
        }

        let progress = {
            let mut net = network.lock().map_err(|_| NetworkError::Poisoned)?;
            if net.has_learned_enough() {
                info!(
                    "training converged after {} epochs at {:.3}% error ({:?})",
                    net.epoch(),
                    net.error_percentage(),
                    started.elapsed()
                );
                return Ok(TrainingOutcome::Converged { epochs: net.epoch() });
            }
            net.train_once(training_set)?;
            if config.log_every > 0 && net.epoch() % config.log_every == 0 {
                Some(net.stats())
            } else {
                None
            }
        };

        if let Some(stats) = progress {
            debug!(
                "epoch {}: error {:.5}, smoothed {:.5}, alpha {:.5}, eta {:.5}",
                stats.epoch, stats.error, stats.error_approximation, stats.alpha, stats.eta
            );
            if let Some(ref tx) = config.progress_tx {
                // Receiver dropped: nobody is watching any more.
                if tx.send(stats).is_err() {
                    stop_flag.store(true, Ordering::Relaxed);
                }
            }
        }

        if let Some(pause) = config.sleep_per_epoch {
            thread::sleep(pause);
        }
    }
}
