use crate::artifact::ModelChain;
use crate::classifier::Classifier;
use crate::error::ModelError;
use crate::perceptron::LinearBinaryModel;
use crate::pipeline::ConcatTransform;
use crate::preference::{PreferenceRecord, Prediction};

pub struct PredictionEngine<'a> {
	transform: &'a ConcatTransform,
	model: &'a LinearBinaryModel,
}

impl<'a> PredictionEngine<'a> {
	pub fn new(chain: &'a ModelChain) -> Result<Self, ModelError> {
		let transform = chain.transform()?;
		let model = chain.last_linear()?;

		if transform.features_len() != model.features_len() {
			return Err(ModelError::DimensionMismatch {
				expected: model.features_len(),
				found: transform.features_len(),
			});
		}

		Ok(Self { transform, model })
	}

	pub fn predict(&self, record: &PreferenceRecord) -> Result<Prediction, ModelError> {
		let x = self.transform.transform_record(record)?;

		Ok(Prediction {
			predicted_label: self.model.predict(&x) > 0.5,
			score: self.model.score(&x),
		})
	}
}
