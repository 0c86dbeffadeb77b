use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PerCodecError {
	#[error("ValueOutOfRange: value {value} outside [{min}, {max}]")]
	ValueOutOfRange { value: i128, min: i128, max: i128 },

	#[error("LengthOutOfRange: length {len} outside [{min}, {max}]")]
	LengthOutOfRange { len: usize, min: usize, max: usize },

	#[error("UnsupportedLength: length {0} needs the fragmented determinant form")]
	UnsupportedLength(usize),

	#[error("BufferExhausted: needed {needed} bits, {available} available")]
	BufferExhausted { needed: usize, available: usize },

	#[error("InvalidChoiceIndex: index {index} of {count} alternatives")]
	InvalidChoiceIndex { index: usize, count: usize },

	#[error("ExtensionUnsupported: value lies outside the extension root")]
	ExtensionUnsupported,
}
