use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// Dimensions and tuning knobs used by `Network::initialize`.
///
/// Fields:
/// - `input_layer_length`   number of input neurons
/// - `hidden_layer_length`  width of every hidden layer
/// - `hidden_layer_amount`  number of hidden layers (may be 0)
/// - `output_layer_length`  number of output neurons
/// - `initial_weight_range` weights start uniform in `[-range, +range]`
/// - `approach_rate`        smoothing factor of the running error average
/// - `seed`                 fixed RNG seed; `None` seeds from the OS
///
/// Missing fields fall back to `Default`, so partial JSON files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub input_layer_length: usize,
    pub hidden_layer_length: usize,
    pub hidden_layer_amount: usize,
    pub output_layer_length: usize,
    pub initial_weight_range: f64,
    pub approach_rate: f64,
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            input_layer_length: 1,
            hidden_layer_length: 0,
            hidden_layer_amount: 0,
            output_layer_length: 1,
            initial_weight_range: 0.5,
            approach_rate: 0.01,
            seed: None,
        }
    }
}

impl NetworkConfig {
    /// Config with explicit layer dimensions and defaults for everything else.
    pub fn with_layers(
        input: usize,
        hidden_length: usize,
        hidden_amount: usize,
        output: usize,
    ) -> Self {
        NetworkConfig {
            input_layer_length: input,
            hidden_layer_length: hidden_length,
            hidden_layer_amount: hidden_amount,
            output_layer_length: output,
            ..NetworkConfig::default()
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the knobs that do not depend on layer widths.
    pub fn validate_tuning(&self) -> Result<()> {
        if !self.initial_weight_range.is_finite() || self.initial_weight_range < 0.0 {
            return Err(NetworkError::InvalidConfig(format!(
                "initial_weight_range must be finite and >= 0, got {}",
                self.initial_weight_range
            )));
        }
        if !(self.approach_rate > 0.0 && self.approach_rate <= 1.0) {
            return Err(NetworkError::InvalidConfig(format!(
                "approach_rate must be in (0, 1], got {}",
                self.approach_rate
            )));
        }
        Ok(())
    }

    /// Full validation for building from the configured dimensions.
    pub fn validate(&self) -> Result<()> {
        self.validate_tuning()?;
        validate_widths(
            self.input_layer_length,
            self.hidden_layer_length,
            self.hidden_layer_amount,
            self.output_layer_length,
        )
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

pub(crate) fn validate_widths(
    input: usize,
    hidden: usize,
    hidden_amount: usize,
    output: usize,
) -> Result<()> {
    if input == 0 || output == 0 {
        return Err(NetworkError::InvalidConfig(
            "input and output layers need at least one neuron".into(),
        ));
    }
    if hidden_amount > 0 && hidden == 0 {
        return Err(NetworkError::InvalidConfig(format!(
            "{} hidden layers requested with zero width",
            hidden_amount
        )));
    }
    Ok(())
}
