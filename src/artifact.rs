use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::classifier::Classifier;
use crate::error::ModelError;
use crate::perceptron::LinearBinaryModel;
use crate::pipeline::ConcatTransform;

const MAGIC: [u8; 4] = *b"DHRD";
const VERSION: u16 = 1;

/// Writes a length prefix, refusing lengths the `u16` prefix cannot hold.
pub fn write_len<W: Write>(writer: &mut W, len: usize) -> std::io::Result<()> {
	let len = u16::try_from(len).map_err(|_| std::io::Error::new(
		std::io::ErrorKind::InvalidData,
		format!("length {} does not fit in an artifact length prefix", len),
	))?;

	writer.write_u16::<BigEndian>(len)
}

#[derive(Debug, Clone, Copy, FromPrimitive)]
enum StageKind {
	Concat = 0,
	LinearBinary = 1,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
	Concat(ConcatTransform),
	LinearBinary(LinearBinaryModel),
}

impl Stage {
	pub fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
		match &self {
			Stage::Concat(transform) => {
				writer.write_u16::<BigEndian>(StageKind::Concat as u16)?;
				transform.serialize(writer)
			},
			Stage::LinearBinary(model) => {
				writer.write_u16::<BigEndian>(StageKind::LinearBinary as u16)?;
				model.serialize(writer)
			},
		}
	}

	pub fn deserialize<R: Read>(reader: &mut R) -> Result<Self, ModelError> {
		let tag = reader.read_u16::<BigEndian>()?;

		match StageKind::from_u16(tag) {
			Some(StageKind::Concat) => Ok(Stage::Concat(ConcatTransform::deserialize(reader)?)),
			Some(StageKind::LinearBinary) => Ok(Stage::LinearBinary(LinearBinaryModel::deserialize(reader)?)),
			None => Err(ModelError::UnknownStage(tag)),
		}
	}
}

/// Ordered stages applied to a record: transforms first, the predictor last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelChain {
	stages: Vec<Stage>,
}

impl ModelChain {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn append(mut self, stage: Stage) -> Self {
		self.stages.push(stage);
		self
	}

	pub fn stages(&self) -> &[Stage] {
		&self.stages
	}

	pub fn transform(&self) -> Result<&ConcatTransform, ModelError> {
		self.stages
			.iter()
			.find_map(|stage| match stage {
				Stage::Concat(transform) => Some(transform),
				_ => None,
			})
			.ok_or(ModelError::MissingTransform)
	}

	/// The linear model at the end of the chain, used to warm start retraining.
	pub fn last_linear(&self) -> Result<&LinearBinaryModel, ModelError> {
		match self.stages.last() {
			None => Err(ModelError::EmptyChain),
			Some(Stage::LinearBinary(model)) => Ok(model),
			Some(_) => Err(ModelError::NotLinear),
		}
	}

	pub fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
		writer.write_all(&MAGIC)?;
		writer.write_u16::<BigEndian>(VERSION)?;
		write_len(writer, self.stages.len())?;

		for stage in &self.stages {
			stage.serialize(writer)?;
		}

		Ok(())
	}

	pub fn deserialize<R: Read>(reader: &mut R) -> Result<Self, ModelError> {
		let mut magic = [0u8; 4];
		reader.read_exact(&mut magic)?;
		if magic != MAGIC {
			return Err(ModelError::BadMagic { found: magic });
		}

		let version = reader.read_u16::<BigEndian>()?;
		if version != VERSION {
			return Err(ModelError::UnsupportedVersion(version));
		}

		let len = reader.read_u16::<BigEndian>()?;
		let stages = (0..len)
			.map(|_| Stage::deserialize(reader))
			.collect::<Result<Vec<Stage>, ModelError>>()?;

		Ok(Self { stages })
	}

	pub fn save(&self, path: &Path) -> Result<(), ModelError> {
		let mut writer = BufWriter::new(File::create(path)?);
		self.serialize(&mut writer)?;
		writer.flush()?;

		Ok(())
	}

	pub fn load(path: &Path) -> Result<Self, ModelError> {
		let mut reader = BufReader::new(File::open(path)?);
		Self::deserialize(&mut reader)
	}
}

#[derive(Debug, Clone)]
pub struct ArtifactPaths {
	pub model: PathBuf,
	pub pipeline: PathBuf,
}
