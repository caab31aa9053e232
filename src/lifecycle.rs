use anyhow::{Context, Result};

use crate::artifact::{ArtifactPaths, ModelChain, Stage};
use crate::perceptron::AveragedPerceptronBuilder;
use crate::pipeline::{ConcatTransform, FEATURES};
use crate::preference::{PreferenceRecord, COLUMNS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
	Fresh,
	Retrain,
}

impl Bootstrap {
	/// Fresh training only when neither artifact exists; a lone artifact still means retraining.
	pub fn decide(paths: &ArtifactPaths) -> Self {
		if !paths.model.exists() && !paths.pipeline.exists() {
			Bootstrap::Fresh
		} else {
			Bootstrap::Retrain
		}
	}
}

pub fn run(records: &[PreferenceRecord], trainer: &AveragedPerceptronBuilder, paths: &ArtifactPaths) -> Result<ModelChain> {
	match Bootstrap::decide(paths) {
		Bootstrap::Fresh => {
			log::info!("No artifacts found, training a new model ...");
			train_new_model(records, trainer, paths)
		},
		Bootstrap::Retrain => {
			log::info!("Artifacts found, retraining the existing model ...");
			retrain_model(records, trainer, paths)
		},
	}
}

pub fn train_new_model(records: &[PreferenceRecord], trainer: &AveragedPerceptronBuilder, paths: &ArtifactPaths) -> Result<ModelChain> {
	let transform = ConcatTransform::fit(FEATURES, &COLUMNS)?;
	let pipeline = ModelChain::new().append(Stage::Concat(transform.clone()));

	log::info!("Saving pipeline to {} ...", paths.pipeline.display());
	pipeline.save(&paths.pipeline)
		.with_context(|| format!("saving pipeline artifact {}", paths.pipeline.display()))?;

	let dataset = transform.transform(records)?.build();
	log::info!(
		"Fitting averaged perceptron [iterations: {}] on {} rows -> {:?} ...",
		trainer.iterations, dataset.rows_len(), transform.output()
	);
	let model = trainer.fit(dataset.clone());
	log::info!("Classification rate train: {:.3?}%", dataset.evaluate(&model) * 100.0);

	let chain = pipeline.append(Stage::LinearBinary(model));

	log::info!("Saving model to {} ...", paths.model.display());
	chain.save(&paths.model)
		.with_context(|| format!("saving model artifact {}", paths.model.display()))?;

	Ok(chain)
}

pub fn retrain_model(records: &[PreferenceRecord], trainer: &AveragedPerceptronBuilder, paths: &ArtifactPaths) -> Result<ModelChain> {
	let trained = ModelChain::load(&paths.model)
		.with_context(|| format!("loading model artifact {}", paths.model.display()))?;
	let pipeline = ModelChain::load(&paths.pipeline)
		.with_context(|| format!("loading pipeline artifact {}", paths.pipeline.display()))?;

	let transform = pipeline.transform()?;
	transform.check_schema(&COLUMNS)?;
	let dataset = transform.transform(records)?.build();

	log::debug!("Loaded model chain with {} stages", trained.stages().len());
	let original = trained.last_linear()
		.with_context(|| format!("reading linear parameters from {}", paths.model.display()))?;
	log::debug!("Warm starting from weights {:?}, bias {}", original.weights(), original.bias());

	let model = trainer.fit_from(dataset.clone(), original)?;
	log::info!("Classification rate train: {:.3?}%", dataset.evaluate(&model) * 100.0);

	let chain = pipeline.append(Stage::LinearBinary(model));

	log::info!("Saving model to {} ...", paths.model.display());
	chain.save(&paths.model)
		.with_context(|| format!("saving model artifact {}", paths.model.display()))?;

	Ok(chain)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs::{self, File};
	use std::path::Path;
	use std::time::{Duration, SystemTime};

	use crate::dataset::training_records;
	use crate::error::ModelError;
	use crate::perceptron::LinearBinaryModel;

	fn paths(dir: &Path) -> ArtifactPaths {
		ArtifactPaths {
			model: dir.join("diehard-model.bin"),
			pipeline: dir.join("diehard-pipeline.bin"),
		}
	}

	fn backdate(path: &Path) -> SystemTime {
		let past = SystemTime::now() - Duration::from_secs(3600);
		File::options().write(true).open(path).unwrap().set_modified(past).unwrap();
		fs::metadata(path).unwrap().modified().unwrap()
	}

	#[test]
	fn bootstrap_decision_follows_files() {
		let dir = tempfile::tempdir().unwrap();
		let paths = paths(dir.path());
		assert_eq!(Bootstrap::decide(&paths), Bootstrap::Fresh);

		fs::write(&paths.pipeline, b"").unwrap();
		assert_eq!(Bootstrap::decide(&paths), Bootstrap::Retrain);

		fs::remove_file(&paths.pipeline).unwrap();
		fs::write(&paths.model, b"").unwrap();
		assert_eq!(Bootstrap::decide(&paths), Bootstrap::Retrain);
	}

	#[test]
	fn fresh_training_writes_both_artifacts() {
		let dir = tempfile::tempdir().unwrap();
		let paths = paths(dir.path());

		let chain = run(&training_records(100), &AveragedPerceptronBuilder::default(), &paths).unwrap();

		assert_eq!(ModelChain::load(&paths.model).unwrap(), chain);
		let pipeline = ModelChain::load(&paths.pipeline).unwrap();
		assert_eq!(pipeline.stages().len(), 1);
		assert_eq!(pipeline.transform().unwrap(), chain.transform().unwrap());
	}

	#[test]
	fn retrain_rewrites_only_the_model() {
		let dir = tempfile::tempdir().unwrap();
		let paths = paths(dir.path());
		let records = training_records(100);
		let trainer = AveragedPerceptronBuilder::default();

		run(&records, &trainer, &paths).unwrap();
		let pipeline_bytes = fs::read(&paths.pipeline).unwrap();
		let pipeline_time = backdate(&paths.pipeline);
		let model_time = backdate(&paths.model);

		assert_eq!(Bootstrap::decide(&paths), Bootstrap::Retrain);
		let chain = run(&records, &trainer, &paths).unwrap();

		assert!(fs::metadata(&paths.model).unwrap().modified().unwrap() > model_time);
		assert_eq!(fs::metadata(&paths.pipeline).unwrap().modified().unwrap(), pipeline_time);
		assert_eq!(fs::read(&paths.pipeline).unwrap(), pipeline_bytes);
		assert_eq!(ModelChain::load(&paths.model).unwrap(), chain);
		assert!(chain.last_linear().is_ok());
	}

	#[test]
	fn deleting_artifacts_bootstraps_again() {
		let dir = tempfile::tempdir().unwrap();
		let paths = paths(dir.path());
		let records = training_records(100);
		let trainer = AveragedPerceptronBuilder::default();

		let first = run(&records, &trainer, &paths).unwrap();
		fs::remove_file(&paths.model).unwrap();
		fs::remove_file(&paths.pipeline).unwrap();

		assert_eq!(Bootstrap::decide(&paths), Bootstrap::Fresh);
		assert_eq!(run(&records, &trainer, &paths).unwrap(), first);
	}

	#[test]
	fn empty_training_set_still_saves_usable_model() {
		let dir = tempfile::tempdir().unwrap();
		let paths = paths(dir.path());
		let trainer = AveragedPerceptronBuilder::default();

		let chain = run(&training_records(0), &trainer, &paths).unwrap();
		assert_eq!(chain.last_linear().unwrap().features_len(), 3);
		assert!(crate::predictor::PredictionEngine::new(&chain).is_ok());

		let retrained = run(&training_records(100), &trainer, &paths).unwrap();
		assert_eq!(retrained.last_linear().unwrap().features_len(), 3);
		assert!(crate::predictor::PredictionEngine::new(&retrained).is_ok());
	}

	#[test]
	fn retrain_with_missing_pipeline_fails() {
		let dir = tempfile::tempdir().unwrap();
		let paths = paths(dir.path());
		let records = training_records(100);
		let trainer = AveragedPerceptronBuilder::default();

		run(&records, &trainer, &paths).unwrap();
		fs::remove_file(&paths.pipeline).unwrap();

		assert!(run(&records, &trainer, &paths).is_err());
	}

	#[test]
	fn retrain_with_corrupted_model_fails() {
		let dir = tempfile::tempdir().unwrap();
		let paths = paths(dir.path());
		let records = training_records(100);
		let trainer = AveragedPerceptronBuilder::default();

		run(&records, &trainer, &paths).unwrap();
		fs::write(&paths.model, b"not a model").unwrap();

		let err = run(&records, &trainer, &paths).unwrap_err();
		assert!(matches!(err.downcast_ref::<ModelError>(), Some(ModelError::BadMagic { .. })));
	}

	#[test]
	fn retrain_requires_linear_tail() {
		let dir = tempfile::tempdir().unwrap();
		let paths = paths(dir.path());
		let records = training_records(100);
		let trainer = AveragedPerceptronBuilder::default();

		run(&records, &trainer, &paths).unwrap();
		fs::copy(&paths.pipeline, &paths.model).unwrap();

		let err = retrain_model(&records, &trainer, &paths).unwrap_err();
		assert!(matches!(err.downcast_ref::<ModelError>(), Some(ModelError::NotLinear)));
	}

	#[test]
	fn retrain_rejects_foreign_schema() {
		let dir = tempfile::tempdir().unwrap();
		let paths = paths(dir.path());
		let records = training_records(100);
		let trainer = AveragedPerceptronBuilder::default();

		run(&records, &trainer, &paths).unwrap();
		ModelChain::new()
			.append(Stage::Concat(ConcatTransform::fit(FEATURES, &COLUMNS[..2]).unwrap()))
			.save(&paths.pipeline)
			.unwrap();

		let err = retrain_model(&records, &trainer, &paths).unwrap_err();
		assert!(matches!(err.downcast_ref::<ModelError>(), Some(ModelError::SchemaMismatch { .. })));
	}

	#[test]
	fn retrain_continues_from_stored_parameters() {
		let dir = tempfile::tempdir().unwrap();
		let paths = paths(dir.path());
		let records = training_records(100);
		let trainer = AveragedPerceptronBuilder::default();
		let separating = LinearBinaryModel::new(vec![7.0, 9.0, -8.0], 0.0);

		let pipeline = ModelChain::new()
			.append(Stage::Concat(ConcatTransform::fit(FEATURES, &COLUMNS).unwrap()));
		pipeline.save(&paths.pipeline).unwrap();
		pipeline.clone().append(Stage::LinearBinary(separating.clone())).save(&paths.model).unwrap();

		let chain = retrain_model(&records, &trainer, &paths).unwrap();
		assert_eq!(chain.last_linear().unwrap(), &separating);
	}
}
