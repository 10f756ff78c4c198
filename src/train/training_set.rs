use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// Source of labelled samples for online training.
pub trait TrainingSet {
    /// Width of every input vector.
    fn input_length(&self) -> usize;

    /// Width of every target vector.
    fn output_length(&self) -> usize;

    /// Draws one `(input, target)` pair, or `None` when there is nothing to draw.
    fn random_sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(&[f64], &[f64])>;
}

/// One labelled example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl Sample {
    pub fn new(input: Vec<f64>, target: Vec<f64>) -> Sample {
        Sample { input, target }
    }
}

/// An in-memory training set with uniform random sampling.
///
/// All samples share the same input and target widths; this is checked on
/// construction and on load.
///
/// JSON layout: `{ "samples": [ { "input": [..], "target": [..] }, .. ] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    samples: Vec<Sample>,
}

impl DataSet {
    pub fn new(samples: Vec<Sample>) -> Result<DataSet> {
        if let Some(first) = samples.first() {
            let (input, output) = (first.input.len(), first.target.len());
            for sample in &samples {
                check_width(input, sample.input.len())?;
                check_width(output, sample.target.len())?;
            }
        }
        Ok(DataSet { samples })
    }

    pub fn from_pairs(pairs: Vec<(Vec<f64>, Vec<f64>)>) -> Result<DataSet> {
        DataSet::new(
            pairs
                .into_iter()
                .map(|(input, target)| Sample::new(input, target))
                .collect(),
        )
    }

    /// The four rows of the XOR truth table.
    pub fn xor() -> DataSet {
        let rows = [
            ([0.0, 0.0], 0.0),
            ([0.0, 1.0], 1.0),
            ([1.0, 0.0], 1.0),
            ([1.0, 1.0], 0.0),
        ];
        DataSet {
            samples: rows
                .iter()
                .map(|(input, target)| Sample::new(input.to_vec(), vec![*target]))
                .collect(),
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Appends a sample; its widths must match the ones already present.
    pub fn push(&mut self, sample: Sample) -> Result<()> {
        if let Some(first) = self.samples.first() {
            check_width(first.input.len(), sample.input.len())?;
            check_width(first.target.len(), sample.target.len())?;
        }
        self.samples.push(sample);
        Ok(())
    }

    /// Serializes the data set to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Loads a data set written by `save_json` (or by hand) and validates it.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<DataSet> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let raw: DataSet = serde_json::from_reader(reader)?;
        DataSet::new(raw.samples)
    }
}

fn check_width(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(NetworkError::ShapeMismatch { expected, actual })
    }
}

impl TrainingSet for DataSet {
    fn input_length(&self) -> usize {
        self.samples.first().map_or(0, |s| s.input.len())
    }

    fn output_length(&self) -> usize {
        self.samples.first().map_or(0, |s| s.target.len())
    }

    fn random_sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(&[f64], &[f64])> {
        self.samples
            .choose(rng)
            .map(|s| (s.input.as_slice(), s.target.as_slice()))
    }
}
