use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::sigmoid::Sigmoid;
use crate::error::{NetworkError, Result};
use crate::layers::connection::Connection;
use crate::layers::neuron::Neuron;
use crate::loss::half_squared::HalfSquaredError;

/// The role a layer plays in the stack. It decides which forward and
/// gradient formulas apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerKind {
    /// Outputs are seeded directly from the sample; no incoming connections.
    Input,
    /// Both incoming and outgoing connections; gradients are backpropagated.
    Hidden,
    /// The only layer compared against a target.
    Output,
}

#[derive(Debug, Clone)]
pub struct Layer {
    kind: LayerKind,
    neurons: Vec<Neuron>,
    // Width of the layer the incoming edges were drawn from.
    fan_in: usize,
    // Incoming edges, source-major: every edge leaving source 0 first, then source 1, ...
    connections: Vec<Connection>,
}

impl Layer {
    pub fn new(kind: LayerKind, size: usize) -> Layer {
        Layer {
            kind,
            neurons: vec![Neuron::new(); size],
            fan_in: 0,
            connections: Vec::new(),
        }
    }

    pub fn input(size: usize) -> Layer {
        Layer::new(LayerKind::Input, size)
    }

    pub fn hidden(size: usize) -> Layer {
        Layer::new(LayerKind::Hidden, size)
    }

    pub fn output(size: usize) -> Layer {
        Layer::new(LayerKind::Output, size)
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connections_mut(&mut self) -> &mut [Connection] {
        &mut self.connections
    }

    /// Current activation of every neuron, in order.
    pub fn outputs(&self) -> Vec<f64> {
        self.neurons.iter().map(Neuron::output).collect()
    }

    /// Fully connects `source` to `target`: one edge per (source neuron,
    /// target neuron) pair, each weight uniform in `[-weight_range, weight_range]`.
    /// The edges are stored as `target`'s incoming connections.
    /// Any edges `target` already had are replaced.
    pub fn connect<R: Rng + ?Sized>(
        source: &Layer,
        target: &mut Layer,
        weight_range: f64,
        rng: &mut R,
    ) {
        target.fan_in = source.len();
        target.connections.clear();
        target.connections.reserve(source.len() * target.len());
        for from in 0..source.len() {
            for to in 0..target.len() {
                let weight = rng.gen::<f64>() * 2.0 * weight_range - weight_range;
                target.connections.push(Connection::new(from, to, weight));
            }
        }
    }

    /// Seeds the outputs of an input layer, positionally.
    pub fn set_output_values(&mut self, values: &[f64]) -> Result<()> {
        self.require(LayerKind::Input, "set_output_values")?;
        check_shape(self.len(), values.len())?;
        for (neuron, &value) in self.neurons.iter_mut().zip(values) {
            neuron.set_output(value);
        }
        Ok(())
    }

    /// Forward step: output_j = σ(Σ previous.output_i * w_ij). No-op for input layers.
    ///
    /// `previous` must be as wide as the layer this one was connected from.
    pub fn calculate_values(&mut self, previous: &Layer) -> Result<()> {
        if self.kind == LayerKind::Input {
            return Ok(());
        }
        self.check_source(previous)?;
        let mut sums = vec![0.0; self.len()];
        for c in &self.connections {
            sums[c.target()] += previous.neurons[c.source()].output() * c.weight();
        }
        for (neuron, sum) in self.neurons.iter_mut().zip(sums) {
            neuron.set_output(Sigmoid::function(sum));
        }
        Ok(())
    }

    /// Mean half-squared error of this output layer against `targets`.
    pub fn get_error(&self, targets: &[f64]) -> Result<f64> {
        self.require(LayerKind::Output, "get_error")?;
        check_shape(self.len(), targets.len())?;
        Ok(HalfSquaredError::loss(&self.outputs(), targets))
    }

    /// Computes the local gradient of every neuron.
    ///
    /// `targets` is only read by the output layer and `next` only by hidden
    /// layers; input layers do nothing.
    pub fn calculate_gradients(&mut self, targets: &[f64], next: Option<&Layer>) -> Result<()> {
        match self.kind {
            LayerKind::Input => Ok(()),
            LayerKind::Hidden => self.hidden_gradients(next),
            LayerKind::Output => self.output_gradients(targets),
        }
    }

    fn output_gradients(&mut self, targets: &[f64]) -> Result<()> {
        check_shape(self.len(), targets.len())?;
        for (neuron, &target) in self.neurons.iter_mut().zip(targets) {
            let output = neuron.output();
            let gradient = HalfSquaredError::signal(output, target)
                * Sigmoid::derivative_from_output(output);
            neuron.set_gradient(gradient);
        }
        Ok(())
    }

    fn hidden_gradients(&mut self, next: Option<&Layer>) -> Result<()> {
        let mut sums = vec![0.0; self.len()];
        if let Some(next) = next {
            next.check_source(self)?;
            for c in &next.connections {
                sums[c.source()] += next.neurons[c.target()].gradient() * c.weight();
            }
        }
        for (neuron, sum) in self.neurons.iter_mut().zip(sums) {
            let gradient = Sigmoid::derivative_from_output(neuron.output()) * sum;
            neuron.set_gradient(gradient);
        }
        Ok(())
    }

    /// Momentum update of every incoming connection:
    /// `delta = eta * gradient_to * output_from + alpha * previous_delta`.
    pub fn update_weights(&mut self, previous: &Layer, alpha: f64, eta: f64) -> Result<()> {
        self.check_source(previous)?;
        let neurons = &self.neurons;
        for c in self.connections.iter_mut() {
            let gradient = neurons[c.target()].gradient();
            let delta = eta * gradient * previous.neurons[c.source()].output()
                + alpha * c.previous_delta();
            c.apply_delta(delta);
        }
        Ok(())
    }

    /// Incoming weights as one space-separated line.
    pub fn export(&self) -> String {
        self.connections
            .iter()
            .map(|c| c.weight().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parses one exported line without touching the layer.
    /// `layer_index` is only used to label errors.
    pub fn parse_weights(&self, line: &str, layer_index: usize) -> Result<Vec<f64>> {
        let weights = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| NetworkError::InvalidWeight {
                    layer: layer_index,
                    token: token.to_owned(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        if weights.len() != self.connections.len() {
            return Err(NetworkError::TopologyMismatch {
                layer: Some(layer_index),
                expected: self.connections.len(),
                actual: weights.len(),
            });
        }
        Ok(weights)
    }

    /// Overwrites incoming weights in connection order. Momentum is untouched.
    pub fn set_weights(&mut self, weights: &[f64]) -> Result<()> {
        check_shape(self.connections.len(), weights.len())?;
        for (c, &w) in self.connections.iter_mut().zip(weights) {
            c.set_weight(w);
        }
        Ok(())
    }

    /// Restores weights from a line produced by `export` on an identically
    /// shaped layer.
    pub fn import(&mut self, line: &str, layer_index: usize) -> Result<()> {
        let weights = self.parse_weights(line, layer_index)?;
        self.set_weights(&weights)
    }

    fn check_source(&self, source: &Layer) -> Result<()> {
        if self.connections.is_empty() {
            return Ok(());
        }
        check_shape(self.fan_in, source.len())
    }

    fn require(&self, kind: LayerKind, operation: &'static str) -> Result<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(NetworkError::UnsupportedOperation { operation, kind: self.kind })
        }
    }
}

fn check_shape(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(NetworkError::ShapeMismatch { expected, actual })
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} layer: {} neurons, {} incoming connections",
            self.kind,
            self.len(),
            self.connections.len()
        )?;
        for (i, n) in self.neurons.iter().enumerate() {
            write!(f, "\n  [{}] output={:.5} gradient={:.5}", i, n.output(), n.gradient())?;
        }
        Ok(())
    }
}
