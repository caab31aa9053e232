use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt};

use crate::artifact::write_len;
use crate::dataset::Builder;
use crate::error::ModelError;
use crate::preference::PreferenceRecord;

pub const FEATURES: &str = "Features";

/// Fitted transform that concatenates score columns into one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatTransform {
	output: String,
	inputs: Vec<String>,
}

impl ConcatTransform {
	pub fn fit(output: &str, inputs: &[&str]) -> Result<Self, ModelError> {
		let sample = PreferenceRecord::new(0.0, 0.0, 0.0);

		if let Some(unknown) = inputs.iter().find(|name| sample.column(name).is_none()) {
			return Err(ModelError::UnknownColumn(unknown.to_string()));
		}

		Ok(Self {
			output: output.to_string(),
			inputs: inputs.iter().map(|name| name.to_string()).collect(),
		})
	}

	pub fn output(&self) -> &str {
		&self.output
	}

	pub fn features_len(&self) -> usize {
		self.inputs.len()
	}

	pub fn check_schema(&self, expected: &[&str]) -> Result<(), ModelError> {
		if self.inputs.iter().map(String::as_str).eq(expected.iter().copied()) {
			Ok(())
		} else {
			Err(ModelError::SchemaMismatch {
				expected: expected.iter().map(|name| name.to_string()).collect(),
				found: self.inputs.clone(),
			})
		}
	}

	pub fn transform_record(&self, record: &PreferenceRecord) -> Result<Vec<f64>, ModelError> {
		self.inputs
			.iter()
			.map(|name| record.column(name).ok_or_else(|| ModelError::UnknownColumn(name.clone())))
			.collect()
	}

	/// Transforms labeled records into a dataset with `1.0`/`0.0` targets.
	pub fn transform(&self, records: &[PreferenceRecord]) -> Result<Builder, ModelError> {
		let mut builder = Builder::with_features(self.features_len());

		for record in records {
			let label = record.likes_die_hard.ok_or(ModelError::MissingLabel)?;
			let x = self.transform_record(record)?;
			builder.add(&x, if label { 1.0 } else { 0.0 });
		}

		Ok(builder)
	}

	pub fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
		write_str(writer, &self.output)?;
		write_len(writer, self.inputs.len())?;

		for input in &self.inputs {
			write_str(writer, input)?;
		}

		Ok(())
	}

	pub fn deserialize<R: Read>(reader: &mut R) -> Result<Self, ModelError> {
		let output = read_str(reader)?;
		let len = reader.read_u16::<BigEndian>()?;

		let inputs = (0..len)
			.map(|_| read_str(reader))
			.collect::<Result<Vec<String>, ModelError>>()?;

		Ok(Self { output, inputs })
	}
}

fn write_str<W: Write>(writer: &mut W, value: &str) -> std::io::Result<()> {
	write_len(writer, value.len())?;
	writer.write_all(value.as_bytes())
}

fn read_str<R: Read>(reader: &mut R) -> Result<String, ModelError> {
	let len = reader.read_u16::<BigEndian>()? as usize;
	let mut bytes = vec![0u8; len];
	reader.read_exact(&mut bytes)?;

	Ok(String::from_utf8(bytes)?)
}
