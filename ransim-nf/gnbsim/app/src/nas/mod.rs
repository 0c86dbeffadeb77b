//! UE-side NAS engine: a 5GMM state machine that consumes downlink messages
//! and queues the uplinks answering them.

use std::future::Future;

use gnbsim_nas::error::{NasDecodeError, NasEncodeError};
use gnbsim_nas::security::IntegrityError;
use thiserror::Error;

use crate::context::UeContext;
use crate::context::ue_context::Rcvd;

pub mod builders;
pub mod gmm;
pub mod handlers;
pub mod nas_context;

pub use gmm::GmmEvent;
pub use nas_context::NasContext;

pub trait NasHandler {
	fn handle(
		&self,
		nas_context: &mut NasContext,
		ue_context: &mut UeContext,
	) -> impl Future<Output = Result<(), NasEngineError>> + Send;
}

pub trait NasBuilder: Sized {
	fn build(
		nas_context: &NasContext,
		ue_context: &UeContext,
	) -> Result<Self, NasEngineError>;
}

#[derive(Error, Debug)]
pub enum NasEngineError {
	#[error("DecodeError: {0}")]
	Decode(#[from] NasDecodeError),

	#[error("EncodeError: {0}")]
	Encode(#[from] NasEncodeError),

	#[error("IntegrityError: in state {state:?}: {source}")]
	Integrity {
		#[source]
		source: IntegrityError,
		state: Rcvd,
	},

	#[error("SyncFailure: Milenage MAC mismatch (received {received:02x?}, calculated {calculated:02x?})")]
	SyncFailure {
		received: [u8; 8],
		calculated: [u8; 8],
	},

	#[error("MissingIe: {0}")]
	MissingIe(&'static str),

	#[error("Protocol: {message} in state {state:?}")]
	Protocol {
		message: &'static str,
		state: Rcvd,
	},
}
