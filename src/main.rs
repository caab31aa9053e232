use std::path::Path;

use anyhow::Result;

use config::{Settings, CONFIG_FILE};
use predictor::PredictionEngine;
use preference::Prediction;

mod artifact;
mod classifier;
mod config;
mod dataset;
mod error;
mod lifecycle;
mod perceptron;
mod pipeline;
mod predictor;
mod preference;

fn predict_users(settings: &Settings) -> Result<(Prediction, Prediction)> {
	let records = dataset::training_records(settings.copies);
	log::info!("Built training set of {} records", records.len());

	let model = lifecycle::run(&records, &settings.trainer, &settings.paths())?;
	let engine = PredictionEngine::new(&model)?;

	let first = engine.predict(&preference::first_user())?;
	let second = engine.predict(&preference::second_user())?;
	log::debug!("Scores: first {:.3}, second {:.3}", first.score, second.score);

	Ok((first, second))
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let settings = Settings::load(Path::new(CONFIG_FILE))?;
	let (first, second) = predict_users(&settings)?;

	println!("First user loves Die Hard: {}", first.predicted_label);
	println!("Second user loves Die Hard: {}", second.predicted_label);

	Ok(())
}
