/// A weighted edge from a neuron of the previous layer into a neuron of the
/// layer that owns it.
///
/// Endpoints are positional indices, not references: `source` indexes the
/// previous layer's neurons, `target` indexes the owning layer's neurons.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    source: usize,
    target: usize,
    weight: f64,
    previous_delta: f64,
}

impl Connection {
    pub fn new(source: usize, target: usize, weight: f64) -> Connection {
        Connection { source, target, weight, previous_delta: 0.0 }
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    /// Last applied weight change; carried into the next update as momentum.
    pub fn previous_delta(&self) -> f64 {
        self.previous_delta
    }

    /// Adds `delta` to the weight and remembers it for the next momentum term.
    pub fn apply_delta(&mut self, delta: f64) {
        self.weight += delta;
        self.previous_delta = delta;
    }
}
