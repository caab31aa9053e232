use rand::seq::SliceRandom;
use rand::Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::classifier::Classifier;
use crate::preference::{self, PreferenceRecord};

#[derive(Clone, Debug)]
pub struct Dataset {
	columns: Vec<Vec<f64>>,
	targets: Vec<f64>,

	index: Vec<usize>,
}

impl Dataset {
	pub fn evaluate<C: Classifier + Sync>(&self, classifier: &C) -> f64 {
		if self.rows_len() == 0 {
			return 0.0;
		}

		self.rows()
			.zip(self.targets())
			.collect::<Vec<_>>()
			.into_par_iter()
			.filter(|(x, y)| classifier.predict(x) == *y)
			.count() as f64 / self.rows_len() as f64
	}

	pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
		self.index.shuffle(rng);
	}

	pub fn targets(&self) -> impl Iterator<Item = f64> + '_ {
		self.index.iter().map(move |&i| self.targets[i])
	}

	pub fn features_len(&self) -> usize {
		self.columns.len()
	}

	pub fn rows_len(&self) -> usize {
		self.index.len()
	}

	pub fn rows(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
		self.index.iter().map(move |&i| {
			self.columns
				.iter()
				.map(|column| column[i])
				.collect()
		})
	}
}

#[derive(Debug, Default)]
pub struct Builder {
	columns: Vec<Vec<f64>>,
	targets: Vec<f64>,
}

impl Builder {
	/// Builder with `features` empty columns, so an empty dataset still knows its width.
	pub fn with_features(features: usize) -> Self {
		Self {
			columns: vec![Vec::new(); features],
			targets: Vec::new(),
		}
	}

	pub fn build(self) -> Dataset {
		let index = (0..self.targets.len()).collect();

		Dataset {
			columns: self.columns,
			targets: self.targets,
			index,
		}
	}

	pub fn add(&mut self, x: &[f64], y: f64) {
		if self.columns.is_empty() {
			self.columns = vec![Vec::new(); x.len()];
		}

		for (column, value) in self.columns.iter_mut().zip(x) {
			column.push(*value);
		}

		self.targets.push(y);
	}
}

/// The fixed training set: the lover and the hater, interleaved, `copies` times each.
pub fn training_records(copies: usize) -> Vec<PreferenceRecord> {
	let lover = preference::die_hard_lover();
	let hater = preference::die_hard_hater();

	(0..copies)
		.flat_map(|_| [lover, hater])
		.collect()
}
