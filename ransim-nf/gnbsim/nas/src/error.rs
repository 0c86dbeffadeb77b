use thiserror::Error;

#[derive(Error, Debug)]
pub enum NasDecodeError {
	#[error("TruncatedPdu: needed {needed} more octets, {available} available")]
	TruncatedPdu { needed: usize, available: usize },

	#[error("UnexpectedProtocolDiscriminator: {0:#04x}")]
	UnexpectedProtocolDiscriminator(u8),

	#[error("UnknownMessageType: message type {0:#04x}")]
	UnknownMessageType(u8),

	#[error("UnknownSecurityHeader: security header type {0:#04x}")]
	UnknownSecurityHeader(u8),

	#[error("MalformedIe: IEI {iei:#04x}: {reason}")]
	MalformedIe { iei: u8, reason: &'static str },
}

#[derive(Error, Debug)]
pub enum NasEncodeError {
	#[error("InvalidDigits: {field} must be decimal digits, got {value:?}")]
	InvalidDigits { field: &'static str, value: String },

	#[error("InvalidDigitCount: {field} must carry {expected} digits, got {actual}")]
	InvalidDigitCount {
		field: &'static str,
		expected: usize,
		actual: usize,
	},

	#[error("OversizedIe: IEI {iei:#04x} value of {len} octets exceeds the IE length field")]
	OversizedIe { iei: u8, len: usize },
}
