//! gNB-side NGAP engine: drives NG Setup and the per-UE registration and
//! PDU session procedures over one N2 association.

pub mod core;
pub mod engine;

use asn1_per::PerCodecError;
use gnbsim_ngap::{NetworkError, NgapCodecError, TnlaError};
use thiserror::Error;

use crate::context::ue_context::Rcvd;
use crate::nas::NasEngineError;

pub use engine::{EstablishedSession, NgapEngine, UeSession};

#[derive(Error, Debug)]
pub enum EngineError {
	#[error("IoError: {0}")]
	Network(#[from] NetworkError),

	#[error("IoError: N2 transport: {0}")]
	Tnla(#[from] TnlaError),

	#[error("IoError: {procedure} deadline expired (last received {state:?})")]
	Timeout {
		procedure: &'static str,
		state: Rcvd,
	},

	#[error("DecodeError: {0}")]
	Codec(#[from] NgapCodecError),

	#[error("EncodeError: {0}")]
	Encode(#[from] PerCodecError),

	#[error("NasError: {0}")]
	Nas(#[from] NasEngineError),

	#[error("Protocol: {message} (last received {state:?})")]
	Protocol {
		message: &'static str,
		state: Rcvd,
	},

	#[error("AssociationClosed: N2 peer closed during {0}")]
	Closed(&'static str),
}
