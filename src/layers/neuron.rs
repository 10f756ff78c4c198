/// A single unit: its last activation and its last local gradient.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Neuron {
    output: f64,
    gradient: f64,
}

impl Neuron {
    pub fn new() -> Neuron {
        Neuron::default()
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn set_output(&mut self, output: f64) {
        self.output = output;
    }

    pub fn gradient(&self) -> f64 {
        self.gradient
    }

    pub fn set_gradient(&mut self, gradient: f64) {
        self.gradient = gradient;
    }
}
