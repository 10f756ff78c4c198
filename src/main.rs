use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use log::info;

use online_nn::{train_full, DataSet, Network, NetworkConfig, TrainConfig};

/// Trains a network online until its smoothed error drops below 1%.
#[derive(Debug, Parser)]
#[command(name = "online-nn", version, about)]
struct Args {
    /// JSON training set `{"samples":[{"input":[..],"target":[..]}]}`; XOR when omitted
    #[arg(long)]
    data: Option<PathBuf>,

    /// JSON network config; when given, layer sizes come from it instead of the data shape
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hidden layers when sizing the network from the data shape
    #[arg(long, default_value_t = 2)]
    hidden_layers: usize,

    /// Weights file, resumed from if present and written after training
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Fixed RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Pause after every training step, in milliseconds
    #[arg(long, default_value_t = 0)]
    sleep_ms: u64,

    /// Log progress every N epochs (0 disables)
    #[arg(long, default_value_t = 10_000)]
    log_every: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let data = match &args.data {
        Some(path) => DataSet::load_json(path)
            .with_context(|| format!("loading training set {}", path.display()))?,
        None => DataSet::xor(),
    };

    let mut config = match &args.config {
        Some(path) => NetworkConfig::load_json(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => NetworkConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let mut network = Network::new(config);
    if args.config.is_some() {
        network.initialize()?;
    } else {
        network.initialize_from_shape(&data, args.hidden_layers)?;
    }
    if let Some(path) = &args.weights {
        if network.import_from_file(path)? {
            info!("resumed weights from {}", path.display());
        }
    }

    let mut train_config = TrainConfig::new().log_every(args.log_every);
    if args.sleep_ms > 0 {
        train_config = train_config.sleep_per_epoch(Duration::from_millis(args.sleep_ms));
    }

    let network = Arc::new(Mutex::new(network));
    let data = Arc::new(data);
    let outcome = train_full(network.clone(), data.clone(), train_config).join()?;
    info!("{:?}", outcome);

    let mut network = network
        .lock()
        .map_err(|_| anyhow!("network mutex poisoned"))?;
    if let Some(path) = &args.weights {
        network.export_to_file(path)?;
        info!("wrote weights to {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(&network.stats())?);
    for sample in data.samples() {
        network.feed_forward(&sample.input)?;
        println!(
            "{:?} -> {:?} (expected {:?})",
            sample.input,
            network.results(),
            sample.target
        );
    }
    Ok(())
}
