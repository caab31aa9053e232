use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::artifact::write_len;
use crate::classifier::Classifier;
use crate::dataset::Dataset;
use crate::error::ModelError;

/// Online averaged perceptron trainer with hinge loss.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AveragedPerceptronBuilder {
	pub iterations: usize,
	pub learning_rate: f64,
	pub margin: f64,
	pub shuffle: bool,
	pub seed: u64,
}

impl Default for AveragedPerceptronBuilder {
	fn default() -> Self {
		Self {
			iterations: 10,
			learning_rate: 1.0,
			margin: 1.0,
			shuffle: true,
			seed: 0,
		}
	}
}

impl AveragedPerceptronBuilder {
	pub fn fit(&self, dataset: Dataset) -> LinearBinaryModel {
		let weights = vec![0.0; dataset.features_len()];
		self.train(dataset, weights, 0.0)
	}

	/// Continues training from the parameters of `initial`.
	pub fn fit_from(&self, dataset: Dataset, initial: &LinearBinaryModel) -> Result<LinearBinaryModel, ModelError> {
		if dataset.features_len() != initial.features_len() {
			return Err(ModelError::DimensionMismatch {
				expected: initial.features_len(),
				found: dataset.features_len(),
			});
		}

		Ok(self.train(dataset, initial.weights.clone(), initial.bias))
	}

	fn train(&self, mut dataset: Dataset, mut weights: Vec<f64>, mut bias: f64) -> LinearBinaryModel {
		let mut rng = StdRng::seed_from_u64(self.seed);

		let mut total_weights = vec![0.0; weights.len()];
		let mut total_bias = 0.0;
		let mut seen = 0usize;

		for _ in 0..self.iterations {
			if self.shuffle {
				dataset.shuffle(&mut rng);
			}

			for (x, target) in dataset.rows().zip(dataset.targets()) {
				let y = if target > 0.5 { 1.0 } else { -1.0 };

				if y * score(&weights, bias, &x) < self.margin {
					for (w, v) in weights.iter_mut().zip(&x) {
						*w += self.learning_rate * y * v;
					}
					bias += self.learning_rate * y;
				}

				for (total, w) in total_weights.iter_mut().zip(&weights) {
					*total += w;
				}
				total_bias += bias;
				seen += 1;
			}
		}

		if seen == 0 {
			return LinearBinaryModel::new(weights, bias);
		}

		let n = seen as f64;
		LinearBinaryModel::new(total_weights.into_iter().map(|w| w / n).collect(), total_bias / n)
	}
}

fn score(weights: &[f64], bias: f64, x: &[f64]) -> f64 {
	bias + weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>()
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearBinaryModel {
	weights: Vec<f64>,
	bias: f64,
}

impl LinearBinaryModel {
	pub fn new(weights: Vec<f64>, bias: f64) -> Self {
		Self { weights, bias }
	}

	pub fn weights(&self) -> &[f64] {
		&self.weights
	}

	pub fn bias(&self) -> f64 {
		self.bias
	}

	pub fn features_len(&self) -> usize {
		self.weights.len()
	}

	/// Raw margin; positive means the positive class.
	pub fn score(&self, x: &[f64]) -> f64 {
		score(&self.weights, self.bias, x)
	}
}

impl Classifier for LinearBinaryModel {
	fn predict(&self, x: &[f64]) -> f64 {
		if self.score(x) > 0.0 { 1.0 } else { 0.0 }
	}

	fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
		write_len(writer, self.weights.len())?;

		for weight in &self.weights {
			writer.write_f64::<BigEndian>(*weight)?;
		}

		writer.write_f64::<BigEndian>(self.bias)
	}

	fn deserialize<R: Read>(reader: &mut R) -> Result<Self, ModelError> {
		let len = reader.read_u16::<BigEndian>()?;

		let weights = (0..len)
			.map(|_| reader.read_f64::<BigEndian>())
			.collect::<std::io::Result<Vec<f64>>>()?;
		let bias = reader.read_f64::<BigEndian>()?;

		Ok(Self { weights, bias })
	}
}
