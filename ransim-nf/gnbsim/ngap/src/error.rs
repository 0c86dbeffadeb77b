use std::{io::Error as IoError, net::SocketAddr};

use asn1_per::PerCodecError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NgapCodecError {
	#[error("PerCodecError: {0}")]
	PerCodec(#[from] PerCodecError),

	#[error("MissingIe: {procedure} without mandatory IE {ie_id}")]
	MissingIe { procedure: &'static str, ie_id: u16 },

	#[error("UnexpectedChoice: {0}")]
	UnexpectedChoice(&'static str),
}

#[derive(Error, Debug)]
pub enum NetworkError {
	#[error("SocketCreationError: Failed to create SCTP socket")]
	SocketCreationError(#[source] IoError),
	#[error("SctpSocketConfigurationError: Failed to set SCTP socket parameters")]
	SctpSocketConfigurationError(#[source] IoError),
	#[error("LocalBindError: Failed to bind local SCTP endpoint {0}")]
	LocalBindError(SocketAddr, #[source] IoError),
	#[error("ConnectError: Failed to connect N2 association to {0}")]
	ConnectError(SocketAddr, #[source] IoError),
	#[error("NoPeerAddress: no N2 peer address configured")]
	NoPeerAddress,
	#[error("TnlaCreationError: Failed to create TNLA association")]
	TnlaCreationError(#[source] TnlaError),
	#[error("TnlaSendError: Failed to send data on the N2 association")]
	TnlaSendError(#[source] TnlaError),
	#[error("TnlaReadError: Failed to read from the N2 association")]
	TnlaReadError(#[source] TnlaError),
	#[error("AssociationClosed: peer closed the N2 association")]
	AssociationClosed,
}

#[derive(Error, Debug)]
pub enum TnlaError {
	#[error("ReadError: Failed to read from SCTP stream")]
	ReadError(#[source] IoError),
	#[error("WriteError: Failed to write to SCTP stream")]
	WriteError(#[source] IoError),
	#[error("LocalAddressError: Failed to get local address for SCTP association")]
	LocalAddressError(#[source] IoError),
	#[error("RemoteAddressError: Failed to get remote address for SCTP association")]
	RemoteAddressError(#[source] IoError),
}
