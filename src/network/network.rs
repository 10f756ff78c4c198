use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};

use crate::error::{NetworkError, Result};
use crate::layers::layer::Layer;
use crate::math::numeric::{approach, argmax, round_to_int};
use crate::network::config::{validate_widths, NetworkConfig};
use crate::network::stats::NetworkStats;
use crate::train::training_set::TrainingSet;

/// Starting value of both the raw and the smoothed error.
const INITIAL_ERROR: f64 = 0.5;

/// Training stops once the smoothed error drops below this many percent.
const LEARNED_ENOUGH_PERCENT: f64 = 1.0;

/// A linear stack of fully connected sigmoid layers, trained one sample at a
/// time.
///
/// The learning rate (`eta`) and momentum (`alpha`) are not hyperparameters:
/// both are derived from the smoothed error on every update, so steps shrink
/// as the network converges.
///
/// Numerical blow-up (NaN, overflow) is not guarded against.
#[derive(Debug, Clone)]
pub struct Network {
    config: NetworkConfig,
    layers: Vec<Layer>,
    rng: StdRng,
    epoch: u64,
    error: f64,
    error_approximation: f64,
}

impl Network {
    /// Creates an empty network. The RNG is seeded from `config.seed`, or
    /// from the OS when no seed is set.
    pub fn new(config: NetworkConfig) -> Network {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Network::with_rng(config, rng)
    }

    /// Creates an empty network drawing weights and samples from `rng`.
    pub fn with_rng(config: NetworkConfig, rng: StdRng) -> Network {
        Network {
            config,
            layers: Vec::new(),
            rng,
            epoch: 0,
            error: INITIAL_ERROR,
            error_approximation: INITIAL_ERROR,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Changes made here take effect on the next `initialize`.
    pub fn config_mut(&mut self) -> &mut NetworkConfig {
        &mut self.config
    }

    /// Rebuilds the layer graph from the configured dimensions:
    /// input, `hidden_layer_amount` hidden layers, output.
    pub fn initialize(&mut self) -> Result<()> {
        self.config.validate()?;
        let input = self.config.input_layer_length;
        let hidden = self.config.hidden_layer_length;
        let amount = self.config.hidden_layer_amount;
        let output = self.config.output_layer_length;
        self.build(input, hidden, amount, output);
        Ok(())
    }

    /// Rebuilds the layer graph sized after a training set. Hidden layers are
    /// `input * 2 / 3 + output` neurons wide.
    pub fn initialize_from_shape<T: TrainingSet>(
        &mut self,
        training_set: &T,
        hidden_layers: usize,
    ) -> Result<()> {
        self.config.validate_tuning()?;
        let input = training_set.input_length();
        let output = training_set.output_length();
        let hidden = input * 2 / 3 + output;
        validate_widths(input, hidden, hidden_layers, output)?;
        self.build(input, hidden, hidden_layers, output);
        Ok(())
    }

    fn build(&mut self, input: usize, hidden: usize, hidden_amount: usize, output: usize) {
        self.layers.clear();
        self.layers.push(Layer::input(input));
        for _ in 0..hidden_amount {
            self.layers.push(Layer::hidden(hidden));
        }
        self.layers.push(Layer::output(output));
        self.connect();
        debug!(
            "built network {} -> {}x{} -> {} ({} layers)",
            input,
            hidden_amount,
            hidden,
            output,
            self.layers.len()
        );
    }

    fn connect(&mut self) {
        let range = self.config.initial_weight_range;
        for i in 1..self.layers.len() {
            let (before, after) = self.layers.split_at_mut(i);
            Layer::connect(&before[i - 1], &mut after[0], range, &mut self.rng);
        }
    }

    pub fn is_initialized(&self) -> bool {
        !self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Direct access for fixing weights by hand.
    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Width of the input layer, 0 before `initialize`.
    pub fn input_len(&self) -> usize {
        self.layers.first().map_or(0, Layer::len)
    }

    /// Width of the output layer, 0 before `initialize`.
    pub fn output_len(&self) -> usize {
        self.layers.last().map_or(0, Layer::len)
    }

    /// Seeds the input layer and propagates activations to the output layer.
    pub fn feed_forward(&mut self, input: &[f64]) -> Result<()> {
        let first = self.layers.first_mut().ok_or(NetworkError::Uninitialized)?;
        first.set_output_values(input)?;
        for i in 1..self.layers.len() {
            let (before, after) = self.layers.split_at_mut(i);
            after[0].calculate_values(&before[i - 1])?;
        }
        Ok(())
    }

    /// Error, gradients and weight update against `target`, then counts the epoch.
    /// Uses whatever activations the last `feed_forward` left behind.
    pub fn back_propagation(&mut self, target: &[f64]) -> Result<()> {
        self.calculate_error(target)?;
        self.calculate_gradients(target)?;
        self.update_weights()?;
        self.epoch += 1;
        Ok(())
    }

    fn calculate_error(&mut self, target: &[f64]) -> Result<()> {
        let output = self.layers.last().ok_or(NetworkError::Uninitialized)?;
        self.error = output.get_error(target)?;
        self.error_approximation =
            approach(self.error_approximation, self.error, self.config.approach_rate);
        Ok(())
    }

    fn calculate_gradients(&mut self, target: &[f64]) -> Result<()> {
        for i in (0..self.layers.len()).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);
            head[i].calculate_gradients(target, tail.first())?;
        }
        Ok(())
    }

    fn update_weights(&mut self) -> Result<()> {
        let (alpha, eta) = (self.alpha(), self.eta());
        for i in (1..self.layers.len()).rev() {
            let (before, after) = self.layers.split_at_mut(i);
            after[0].update_weights(&before[i - 1], alpha, eta)?;
        }
        Ok(())
    }

    /// One full training step on a given sample. Both vectors are checked
    /// before anything is mutated.
    pub fn train_sample(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        if !self.is_initialized() {
            return Err(NetworkError::Uninitialized);
        }
        let shapes = [(self.input_len(), input.len()), (self.output_len(), target.len())];
        for (expected, actual) in shapes {
            if expected != actual {
                return Err(NetworkError::ShapeMismatch { expected, actual });
            }
        }
        self.feed_forward(input)?;
        self.back_propagation(target)?;
        trace!(
            "epoch {}: error {:.6}, smoothed {:.6}",
            self.epoch,
            self.error,
            self.error_approximation
        );
        Ok(())
    }

    /// One training step on a sample drawn at random from `training_set`.
    pub fn train_once<T: TrainingSet>(&mut self, training_set: &T) -> Result<()> {
        if !self.is_initialized() {
            return Err(NetworkError::Uninitialized);
        }
        let (input, target) = training_set
            .random_sample(&mut self.rng)
            .ok_or(NetworkError::EmptyTrainingSet)?;
        self.train_sample(input, target)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Raw error of the most recent step.
    pub fn error(&self) -> f64 {
        self.error
    }

    pub fn error_approximation(&self) -> f64 {
        self.error_approximation
    }

    /// Momentum coefficient.
    pub fn alpha(&self) -> f64 {
        1.0 - self.error_approximation
    }

    /// Learning rate.
    pub fn eta(&self) -> f64 {
        self.error_approximation.powi(2)
    }

    pub fn error_percentage(&self) -> f64 {
        self.error_approximation * 100.0
    }

    pub fn has_learned_enough(&self) -> bool {
        self.error_percentage() < LEARNED_ENOUGH_PERCENT
    }

    /// Raw activations of the output layer. Empty before `initialize`.
    pub fn outputs(&self) -> Vec<f64> {
        self.layers.last().map(Layer::outputs).unwrap_or_default()
    }

    /// Output activations rounded to the nearest integer.
    pub fn results(&self) -> Vec<i64> {
        self.outputs().into_iter().map(round_to_int).collect()
    }

    /// Index of the strongest output; first one wins on ties.
    pub fn result_max_index(&self) -> Option<usize> {
        argmax(&self.outputs())
    }

    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            epoch: self.epoch,
            error: self.error,
            error_approximation: self.error_approximation,
            alpha: self.alpha(),
            eta: self.eta(),
            error_percentage: self.error_percentage(),
            has_learned_enough: self.has_learned_enough(),
        }
    }

    /// Weights as text: one line per layer, input first, each holding that
    /// layer's incoming weights separated by spaces. The input line is empty.
    ///
    /// Topology is not encoded; the importing network must be built with
    /// the same dimensions.
    pub fn export(&self) -> String {
        let mut text = String::new();
        for layer in &self.layers {
            text.push_str(&layer.export());
            text.push('\n');
        }
        text
    }

    /// Restores weights produced by `export`. Every line is validated before
    /// any weight is overwritten.
    pub fn import(&mut self, text: &str) -> Result<()> {
        if !self.is_initialized() {
            return Err(NetworkError::Uninitialized);
        }
        let lines: Vec<&str> = text.lines().collect();
        if lines.len() != self.layers.len() {
            return Err(NetworkError::TopologyMismatch {
                layer: None,
                expected: self.layers.len(),
                actual: lines.len(),
            });
        }
        let parsed = self
            .layers
            .iter()
            .zip(&lines)
            .enumerate()
            .map(|(i, (layer, line))| layer.parse_weights(line, i))
            .collect::<Result<Vec<_>>>()?;
        for (layer, weights) in self.layers.iter_mut().zip(parsed) {
            layer.set_weights(&weights)?;
        }
        debug!("imported weights for {} layers", self.layers.len());
        Ok(())
    }

    /// Writes `export()` to `path`, creating missing parent directories.
    pub fn export_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.export())?;
        debug!("exported weights to {}", path.display());
        Ok(())
    }

    /// Imports weights from `path`. A missing file is not an error: nothing
    /// happens and `Ok(false)` is returned, so optional checkpoints can be
    /// resumed unconditionally.
    pub fn import_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<bool> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no weights at {}, keeping current weights", path.display());
            return Ok(false);
        }
        let text = fs::read_to_string(path)?;
        self.import(&text)?;
        Ok(true)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for layer in &self.layers {
            write!(f, "{}\n\n", layer)?;
        }
        write!(
            f,
            "Epoch: {}\nAlpha: {:.5}\nEta: {:.5}\nError: {:.5}\nErrorApproximation: {:.5}",
            self.epoch,
            self.alpha(),
            self.eta(),
            self.error,
            self.error_approximation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::layer::LayerKind;
    use crate::train::training_set::DataSet;
    use approx::assert_abs_diff_eq;

    fn network(input: usize, hidden: usize, amount: usize, output: usize) -> Network {
        let config = NetworkConfig::with_layers(input, hidden, amount, output).seed(42);
        let mut network = Network::new(config);
        network.initialize().unwrap();
        network
    }

    #[test]
    fn topology_has_every_adjacent_pair_fully_connected() {
        for amount in 0..4 {
            let network = network(3, 4, amount, 2);
            let layers = network.layers();
            assert_eq!(layers.len(), amount + 2);
            assert_eq!(layers[0].kind(), LayerKind::Input);
            assert_eq!(layers[layers.len() - 1].kind(), LayerKind::Output);
            assert!(layers[0].connections().is_empty());
            for pair in layers.windows(2) {
                assert_eq!(pair[1].connections().len(), pair[0].len() * pair[1].len());
            }
            assert!(layers[1..layers.len() - 1].iter().all(|l| l.kind() == LayerKind::Hidden));
        }
    }

    #[test]
    fn initialize_replaces_previous_graph() {
        let mut network = network(2, 2, 1, 1);
        network.config_mut().hidden_layer_amount = 3;
        network.initialize().unwrap();
        assert_eq!(network.layers().len(), 5);
    }

    #[test]
    fn hidden_width_inferred_from_training_shape() {
        let data = DataSet::from_pairs(vec![(vec![0.0; 6], vec![0.0; 2])]).unwrap();
        let mut network = Network::new(NetworkConfig::default().seed(1));
        network.initialize_from_shape(&data, 2).unwrap();
        let widths: Vec<usize> = network.layers().iter().map(Layer::len).collect();
        assert_eq!(widths, vec![6, 6, 6, 2]);
    }

    #[test]
    fn same_seed_same_weights() {
        assert_eq!(network(2, 3, 1, 1).export(), network(2, 3, 1, 1).export());
    }

    #[test]
    fn single_weight_forward_pass_is_sigmoid() {
        let mut network = network(1, 0, 0, 1);
        network.import("\n1\n").unwrap();
        network.feed_forward(&[1.0]).unwrap();
        assert_abs_diff_eq!(network.outputs()[0], 0.7310585786300049, epsilon = 1e-9);
        assert_eq!(network.results(), vec![1]);
    }

    #[test]
    fn untrained_network_is_uninitialized() {
        let mut network = Network::new(NetworkConfig::default());
        assert!(matches!(network.feed_forward(&[1.0]), Err(NetworkError::Uninitialized)));
        assert!(matches!(network.back_propagation(&[1.0]), Err(NetworkError::Uninitialized)));
        assert!(matches!(network.train_sample(&[1.0], &[1.0]), Err(NetworkError::Uninitialized)));
        assert!(matches!(network.import("\n1\n"), Err(NetworkError::Uninitialized)));
        assert!(network.outputs().is_empty());
        assert_eq!(network.result_max_index(), None);
    }

    #[test]
    fn shape_mismatch_leaves_state_untouched() {
        let mut network = network(2, 2, 1, 1);
        let before = network.export();
        assert!(matches!(
            network.train_sample(&[1.0], &[1.0]),
            Err(NetworkError::ShapeMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            network.train_sample(&[1.0, 0.0], &[1.0, 0.0]),
            Err(NetworkError::ShapeMismatch { expected: 1, actual: 2 })
        ));
        assert_eq!(network.epoch(), 0);
        assert_eq!(network.export(), before);
    }

    #[test]
    fn reordered_layers_fail_instead_of_panicking() {
        let mut network = network(2, 3, 1, 1);
        // input(2), output(1) wired from 3, hidden(3) wired from 2
        network.layers_mut().swap(1, 2);
        assert!(matches!(
            network.feed_forward(&[1.0, 0.0]),
            Err(NetworkError::ShapeMismatch { expected: 3, actual: 2 })
        ));
        assert!(matches!(
            network.train_sample(&[1.0, 0.0], &[1.0, 0.0, 1.0]),
            Err(NetworkError::ShapeMismatch { .. })
        ));
        assert_eq!(network.epoch(), 0);
    }

    #[test]
    fn empty_training_set_is_an_error() {
        let mut network = network(1, 0, 0, 1);
        assert!(matches!(
            network.train_once(&DataSet::default()),
            Err(NetworkError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn step_updates_error_and_derived_coefficients() {
        let mut network = network(1, 0, 0, 1);
        network.import("\n0\n").unwrap();
        network.train_sample(&[1.0], &[1.0]).unwrap();

        // output was 0.5, so the raw error is 0.5 * 0.25
        assert_eq!(network.epoch(), 1);
        assert_abs_diff_eq!(network.error(), 0.125);
        let smoothed = 0.5 + (0.125 - 0.5) * 0.01;
        assert_abs_diff_eq!(network.error_approximation(), smoothed, epsilon = 1e-12);
        assert_abs_diff_eq!(network.alpha(), 1.0 - smoothed, epsilon = 1e-12);
        assert_abs_diff_eq!(network.eta(), smoothed * smoothed, epsilon = 1e-12);

        // delta = eta * gradient * input, no momentum on the first step
        let gradient = 0.5 * 0.25;
        let weight = network.layers()[1].connections()[0].weight();
        assert_abs_diff_eq!(weight, smoothed * smoothed * gradient, epsilon = 1e-12);
    }

    #[test]
    fn result_max_index_matches_largest_output() {
        let mut network = network(2, 0, 0, 3);
        network.import("\n0.5 -1 2 0.25 3 -2\n").unwrap();
        network.feed_forward(&[1.0, 1.0]).unwrap();
        let outputs = network.outputs();
        let expected = outputs
            .iter()
            .enumerate()
            .fold(0, |best, (i, &v)| if v > outputs[best] { i } else { best });
        assert_eq!(network.result_max_index(), Some(expected));
        assert_eq!(network.result_max_index(), Some(1));
    }

    #[test]
    fn has_learned_enough_below_one_percent() {
        let mut network = network(1, 0, 0, 1);
        assert!(!network.has_learned_enough());
        network.error_approximation = 0.0099;
        assert!(network.has_learned_enough());
        network.error_approximation = 0.01;
        assert!(!network.has_learned_enough());
    }

    #[test]
    fn export_has_one_line_per_layer() {
        let network = network(2, 3, 1, 1);
        let text = network.export();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "");
        assert_eq!(lines[1].split_whitespace().count(), 6);
        assert_eq!(lines[2].split_whitespace().count(), 3);
    }

    #[test]
    fn import_accepts_crlf_line_endings() {
        let mut network = network(1, 0, 0, 1);
        network.import("\r\n0.75\r\n").unwrap();
        assert_abs_diff_eq!(network.layers()[1].connections()[0].weight(), 0.75);
    }

    #[test]
    fn failed_import_keeps_existing_weights() {
        let mut network = network(2, 2, 1, 1);
        let before = network.export();
        // second layer is valid, third is short by one weight
        assert!(matches!(
            network.import("\n1 2 3 4\n5\n"),
            Err(NetworkError::TopologyMismatch { layer: Some(2), expected: 2, actual: 1 })
        ));
        assert!(matches!(
            network.import("\n1 2 3 4\n"),
            Err(NetworkError::TopologyMismatch { layer: None, expected: 3, actual: 2 })
        ));
        assert_eq!(network.export(), before);
    }

    #[test]
    fn display_lists_layers_and_counters() {
        let network = network(1, 0, 0, 1);
        let text = network.to_string();
        assert!(text.contains("Input layer"));
        assert!(text.contains("Output layer"));
        assert!(text.contains("Epoch: 0"));
        assert!(text.contains("ErrorApproximation: 0.50000"));
    }
}
