use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::artifact::ArtifactPaths;
use crate::perceptron::AveragedPerceptronBuilder;

pub const CONFIG_FILE: &str = "diehard.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Directory holding both artifact files.
	pub artifact_dir: PathBuf,
	pub model_file: String,
	pub pipeline_file: String,

	/// How many times each training example is repeated.
	pub copies: usize,
	pub trainer: AveragedPerceptronBuilder,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			artifact_dir: PathBuf::from("."),
			model_file: "diehard-model.bin".to_string(),
			pipeline_file: "diehard-pipeline.bin".to_string(),
			copies: 100,
			trainer: AveragedPerceptronBuilder::default(),
		}
	}
}

impl Settings {
	/// Reads settings from `path`, falling back to the defaults when the file does not exist.
	pub fn load(path: &Path) -> Result<Self> {
		match fs::read_to_string(path) {
			Ok(content) => toml::from_str(&content)
				.with_context(|| format!("parsing settings file {}", path.display())),
			Err(e) if e.kind() == io::ErrorKind::NotFound => {
				log::debug!("No settings file at {}, using defaults", path.display());
				Ok(Self::default())
			},
			Err(e) => Err(e).with_context(|| format!("reading settings file {}", path.display())),
		}
	}

	pub fn paths(&self) -> ArtifactPaths {
		ArtifactPaths {
			model: self.artifact_dir.join(&self.model_file),
			pipeline: self.artifact_dir.join(&self.pipeline_file),
		}
	}
}
