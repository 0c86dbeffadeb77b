//! NGAP (TS 38.413) for the gNB side of N2: the PDU model, an aligned-PER
//! codec built on `asn1-per`, and the SCTP client association the PDUs
//! travel on.

pub mod error;
pub mod ies;
pub mod messages;
pub mod network;
pub mod pdu;
pub mod transfer;

pub use error::{NetworkError, NgapCodecError, TnlaError};
pub use ies::*;
pub use messages::*;
pub use pdu::{Criticality, InitiatingMessage, NgapPdu, SuccessfulOutcome, ToNgapPdu, UnsuccessfulOutcome};

use asn1_per::PerCodecData;

/// Decodes one NGAP PDU from an SCTP message.
pub fn decode_ngap_pdu(bytes: &[u8]) -> Result<NgapPdu, NgapCodecError> {
	let mut data = PerCodecData::from_slice(bytes);
	NgapPdu::decode(&mut data)
}

/// Encodes an NGAP PDU into the octets put on the wire.
pub fn codec_to_bytes(pdu: &NgapPdu) -> Result<Vec<u8>, NgapCodecError> {
	let mut data = PerCodecData::new();
	pdu.encode(&mut data)?;
	Ok(data.into_bytes())
}
