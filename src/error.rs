use std::io;
use std::string::FromUtf8Error;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	#[error("not a model artifact (magic {found:?})")]
	BadMagic { found: [u8; 4] },

	#[error("unsupported artifact version {0}")]
	UnsupportedVersion(u16),

	#[error("unknown stage tag {0}")]
	UnknownStage(u16),

	#[error("column name is not valid UTF-8: {0}")]
	InvalidString(#[from] FromUtf8Error),

	#[error("artifact chain is empty")]
	EmptyChain,

	#[error("artifact chain has no feature transform")]
	MissingTransform,

	#[error("last stage of the artifact chain is not a linear binary model")]
	NotLinear,

	#[error("unknown column {0:?}")]
	UnknownColumn(String),

	#[error("schema mismatch: expected columns {expected:?}, found {found:?}")]
	SchemaMismatch { expected: Vec<String>, found: Vec<String> },

	#[error("feature count mismatch: model has {expected}, data has {found}")]
	DimensionMismatch { expected: usize, found: usize },

	#[error("training record has no label")]
	MissingLabel,
}
