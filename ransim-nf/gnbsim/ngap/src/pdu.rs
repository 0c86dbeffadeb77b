//! NGAP PDU framing: the initiating/successful/unsuccessful choice,
//! procedure codes, criticality and the ProtocolIE container grammar every
//! message body shares.

use asn1_per::{PerCodec, PerCodecData, PerCodecError, decode, encode};

use crate::error::NgapCodecError;
use crate::messages::*;

pub const PROC_DOWNLINK_NAS_TRANSPORT: u8 = 4;
pub const PROC_ERROR_INDICATION: u8 = 9;
pub const PROC_INITIAL_CONTEXT_SETUP: u8 = 14;
pub const PROC_INITIAL_UE_MESSAGE: u8 = 15;
pub const PROC_NG_SETUP: u8 = 21;
pub const PROC_PDU_SESSION_RESOURCE_SETUP: u8 = 29;
pub const PROC_UPLINK_NAS_TRANSPORT: u8 = 46;

pub const ID_AMF_NAME: u16 = 1;
pub const ID_AMF_UE_NGAP_ID: u16 = 10;
pub const ID_CAUSE: u16 = 15;
pub const ID_DEFAULT_PAGING_DRX: u16 = 21;
pub const ID_GLOBAL_RAN_NODE_ID: u16 = 27;
pub const ID_NAS_PDU: u16 = 38;
pub const ID_PDU_SESSION_RESOURCE_SETUP_LIST_CXT_RES: u16 = 72;
pub const ID_PDU_SESSION_RESOURCE_SETUP_LIST_SU_REQ: u16 = 74;
pub const ID_PDU_SESSION_RESOURCE_SETUP_LIST_SU_RES: u16 = 75;
pub const ID_RAN_UE_NGAP_ID: u16 = 85;
pub const ID_RELATIVE_AMF_CAPACITY: u16 = 87;
pub const ID_RRC_ESTABLISHMENT_CAUSE: u16 = 90;
pub const ID_SUPPORTED_TA_LIST: u16 = 102;
pub const ID_UE_CONTEXT_REQUEST: u16 = 112;
pub const ID_USER_LOCATION_INFORMATION: u16 = 121;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criticality {
	Reject,
	Ignore,
	Notify,
}

impl PerCodec for Criticality {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let index = match self {
			Self::Reject => 0,
			Self::Ignore => 1,
			Self::Notify => 2,
		};
		encode::encode_enumerated(data, index, 3, false)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		match decode::decode_enumerated(data, 3, false)? {
			0 => Ok(Self::Reject),
			1 => Ok(Self::Ignore),
			_ => Ok(Self::Notify),
		}
	}
}

/// One decoded ProtocolIE-Field: id, criticality and the raw open-type
/// value octets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolIe {
	pub id: u16,
	pub criticality: Criticality,
	pub value: Vec<u8>,
}

/// ProtocolIE-Container builder/parser shared by every message body and the
/// PER-encoded transfers. Unknown IEs survive as raw octets, which keeps
/// round-trips structural.
#[derive(Debug, Default)]
pub struct IeContainer {
	pub entries: Vec<ProtocolIe>,
}

impl IeContainer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add<F>(
		&mut self,
		id: u16,
		criticality: Criticality,
		encode_value: F,
	) -> Result<(), PerCodecError>
	where
		F: FnOnce(&mut PerCodecData) -> Result<(), PerCodecError>,
	{
		let mut value = PerCodecData::new();
		encode_value(&mut value)?;
		self.entries.push(ProtocolIe { id, criticality, value: value.into_bytes() });
		Ok(())
	}

	/// Encodes the surrounding message SEQUENCE (extension bit, no
	/// optionals) plus the container itself.
	pub fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[]);
		encode::encode_constrained_whole_number(data, self.entries.len() as i128, 0, 65535, false)?;
		for entry in &self.entries {
			encode::encode_constrained_whole_number(data, entry.id as i128, 0, 65535, false)?;
			entry.criticality.encode(data)?;
			encode::encode_open_type(data, &entry.value)?;
		}
		Ok(())
	}

	pub fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		decode::decode_sequence_preamble(data, true, 0)?;
		let count = decode::decode_constrained_whole_number(data, 0, 65535, false)? as usize;
		let mut entries = Vec::with_capacity(count);
		for _ in 0..count {
			let id = decode::decode_constrained_whole_number(data, 0, 65535, false)? as u16;
			let criticality = Criticality::decode(data)?;
			let value = decode::decode_open_type(data)?;
			entries.push(ProtocolIe { id, criticality, value });
		}
		Ok(Self { entries })
	}

	/// Takes the first IE with the given id, handing out its value octets.
	pub fn take(
		&mut self,
		id: u16,
	) -> Option<Vec<u8>> {
		let position = self.entries.iter().position(|entry| entry.id == id)?;
		Some(self.entries.remove(position).value)
	}

	pub fn take_decoded<T: PerCodec>(
		&mut self,
		id: u16,
	) -> Result<Option<T>, PerCodecError> {
		match self.take(id) {
			None => Ok(None),
			Some(bytes) => {
				let mut data = PerCodecData::from_slice(&bytes);
				Ok(Some(T::decode(&mut data)?))
			}
		}
	}
}

/// Convenience for mandatory IEs.
pub(crate) fn require<T>(
	value: Option<T>,
	procedure: &'static str,
	ie_id: u16,
) -> Result<T, NgapCodecError> {
	value.ok_or(NgapCodecError::MissingIe { procedure, ie_id })
}

/// A message this implementation does not model: kept as raw value octets so
/// the PDU still round-trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
	pub procedure_code: u8,
	pub criticality: Criticality,
	pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InitiatingMessage {
	NgSetupRequest(NgSetupRequest),
	InitialUeMessage(InitialUeMessage),
	DownlinkNasTransport(DownlinkNasTransport),
	UplinkNasTransport(UplinkNasTransport),
	InitialContextSetupRequest(InitialContextSetupRequest),
	PduSessionResourceSetupRequest(PduSessionResourceSetupRequest),
	ErrorIndication(ErrorIndication),
	Unknown(UnknownMessage),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SuccessfulOutcome {
	NgSetupResponse(NgSetupResponse),
	InitialContextSetupResponse(InitialContextSetupResponse),
	PduSessionResourceSetupResponse(PduSessionResourceSetupResponse),
	Unknown(UnknownMessage),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnsuccessfulOutcome {
	NgSetupFailure(NgSetupFailure),
	Unknown(UnknownMessage),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NgapPdu {
	InitiatingMessage(InitiatingMessage),
	SuccessfulOutcome(SuccessfulOutcome),
	UnsuccessfulOutcome(UnsuccessfulOutcome),
}

pub trait ToNgapPdu {
	fn to_pdu(self) -> NgapPdu;
}

fn encode_header(
	data: &mut PerCodecData,
	choice_index: usize,
	procedure_code: u8,
	criticality: Criticality,
) -> Result<(), PerCodecError> {
	encode::encode_choice_index(data, choice_index, 3, true)?;
	encode::encode_constrained_whole_number(data, procedure_code as i128, 0, 255, false)?;
	criticality.encode(data)
}

fn encode_value<F>(
	data: &mut PerCodecData,
	encode_ies: F,
) -> Result<(), PerCodecError>
where
	F: FnOnce(&mut PerCodecData) -> Result<(), PerCodecError>,
{
	let mut value = PerCodecData::new();
	encode_ies(&mut value)?;
	encode::encode_open_type(data, &value.into_bytes())
}

impl InitiatingMessage {
	fn procedure_code(&self) -> u8 {
		match self {
			Self::NgSetupRequest(_) => PROC_NG_SETUP,
			Self::InitialUeMessage(_) => PROC_INITIAL_UE_MESSAGE,
			Self::DownlinkNasTransport(_) => PROC_DOWNLINK_NAS_TRANSPORT,
			Self::UplinkNasTransport(_) => PROC_UPLINK_NAS_TRANSPORT,
			Self::InitialContextSetupRequest(_) => PROC_INITIAL_CONTEXT_SETUP,
			Self::PduSessionResourceSetupRequest(_) => PROC_PDU_SESSION_RESOURCE_SETUP,
			Self::ErrorIndication(_) => PROC_ERROR_INDICATION,
			Self::Unknown(inner) => inner.procedure_code,
		}
	}

	fn criticality(&self) -> Criticality {
		match self {
			Self::ErrorIndication(_) | Self::InitialUeMessage(_) | Self::DownlinkNasTransport(_)
			| Self::UplinkNasTransport(_) => Criticality::Ignore,
			Self::Unknown(inner) => inner.criticality,
			_ => Criticality::Reject,
		}
	}

	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode_header(data, 0, self.procedure_code(), self.criticality())?;
		match self {
			Self::NgSetupRequest(inner) => encode_value(data, |d| inner.encode_value(d)),
			Self::InitialUeMessage(inner) => encode_value(data, |d| inner.encode_value(d)),
			Self::DownlinkNasTransport(inner) => encode_value(data, |d| inner.encode_value(d)),
			Self::UplinkNasTransport(inner) => encode_value(data, |d| inner.encode_value(d)),
			Self::InitialContextSetupRequest(inner) => encode_value(data, |d| inner.encode_value(d)),
			Self::PduSessionResourceSetupRequest(inner) => {
				encode_value(data, |d| inner.encode_value(d))
			}
			Self::ErrorIndication(inner) => encode_value(data, |d| inner.encode_value(d)),
			Self::Unknown(inner) => encode::encode_open_type(data, &inner.value),
		}
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		let procedure_code = decode::decode_constrained_whole_number(data, 0, 255, false)? as u8;
		let criticality = Criticality::decode(data)?;
		let value = decode::decode_open_type(data)?;
		let mut body = PerCodecData::from_slice(&value);
		match procedure_code {
			PROC_NG_SETUP => Ok(Self::NgSetupRequest(NgSetupRequest::decode_value(&mut body)?)),
			PROC_INITIAL_UE_MESSAGE => {
				Ok(Self::InitialUeMessage(InitialUeMessage::decode_value(&mut body)?))
			}
			PROC_DOWNLINK_NAS_TRANSPORT => {
				Ok(Self::DownlinkNasTransport(DownlinkNasTransport::decode_value(&mut body)?))
			}
			PROC_UPLINK_NAS_TRANSPORT => {
				Ok(Self::UplinkNasTransport(UplinkNasTransport::decode_value(&mut body)?))
			}
			PROC_INITIAL_CONTEXT_SETUP => Ok(Self::InitialContextSetupRequest(
				InitialContextSetupRequest::decode_value(&mut body)?,
			)),
			PROC_PDU_SESSION_RESOURCE_SETUP => Ok(Self::PduSessionResourceSetupRequest(
				PduSessionResourceSetupRequest::decode_value(&mut body)?,
			)),
			PROC_ERROR_INDICATION => {
				Ok(Self::ErrorIndication(ErrorIndication::decode_value(&mut body)?))
			}
			_ => Ok(Self::Unknown(UnknownMessage { procedure_code, criticality, value })),
		}
	}
}

impl SuccessfulOutcome {
	fn procedure_code(&self) -> u8 {
		match self {
			Self::NgSetupResponse(_) => PROC_NG_SETUP,
			Self::InitialContextSetupResponse(_) => PROC_INITIAL_CONTEXT_SETUP,
			Self::PduSessionResourceSetupResponse(_) => PROC_PDU_SESSION_RESOURCE_SETUP,
			Self::Unknown(inner) => inner.procedure_code,
		}
	}

	fn criticality(&self) -> Criticality {
		match self {
			Self::Unknown(inner) => inner.criticality,
			_ => Criticality::Reject,
		}
	}

	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode_header(data, 1, self.procedure_code(), self.criticality())?;
		match self {
			Self::NgSetupResponse(inner) => encode_value(data, |d| inner.encode_value(d)),
			Self::InitialContextSetupResponse(inner) => {
				encode_value(data, |d| inner.encode_value(d))
			}
			Self::PduSessionResourceSetupResponse(inner) => {
				encode_value(data, |d| inner.encode_value(d))
			}
			Self::Unknown(inner) => encode::encode_open_type(data, &inner.value),
		}
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		let procedure_code = decode::decode_constrained_whole_number(data, 0, 255, false)? as u8;
		let criticality = Criticality::decode(data)?;
		let value = decode::decode_open_type(data)?;
		let mut body = PerCodecData::from_slice(&value);
		match procedure_code {
			PROC_NG_SETUP => Ok(Self::NgSetupResponse(NgSetupResponse::decode_value(&mut body)?)),
			PROC_INITIAL_CONTEXT_SETUP => Ok(Self::InitialContextSetupResponse(
				InitialContextSetupResponse::decode_value(&mut body)?,
			)),
			PROC_PDU_SESSION_RESOURCE_SETUP => Ok(Self::PduSessionResourceSetupResponse(
				PduSessionResourceSetupResponse::decode_value(&mut body)?,
			)),
			_ => Ok(Self::Unknown(UnknownMessage { procedure_code, criticality, value })),
		}
	}
}

impl UnsuccessfulOutcome {
	fn procedure_code(&self) -> u8 {
		match self {
			Self::NgSetupFailure(_) => PROC_NG_SETUP,
			Self::Unknown(inner) => inner.procedure_code,
		}
	}

	fn criticality(&self) -> Criticality {
		match self {
			Self::NgSetupFailure(_) => Criticality::Reject,
			Self::Unknown(inner) => inner.criticality,
		}
	}

	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode_header(data, 2, self.procedure_code(), self.criticality())?;
		match self {
			Self::NgSetupFailure(inner) => encode_value(data, |d| inner.encode_value(d)),
			Self::Unknown(inner) => encode::encode_open_type(data, &inner.value),
		}
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		let procedure_code = decode::decode_constrained_whole_number(data, 0, 255, false)? as u8;
		let criticality = Criticality::decode(data)?;
		let value = decode::decode_open_type(data)?;
		let mut body = PerCodecData::from_slice(&value);
		match procedure_code {
			PROC_NG_SETUP => Ok(Self::NgSetupFailure(NgSetupFailure::decode_value(&mut body)?)),
			_ => Ok(Self::Unknown(UnknownMessage { procedure_code, criticality, value })),
		}
	}
}

impl NgapPdu {
	pub fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		match self {
			Self::InitiatingMessage(inner) => inner.encode(data),
			Self::SuccessfulOutcome(inner) => inner.encode(data),
			Self::UnsuccessfulOutcome(inner) => inner.encode(data),
		}
	}

	pub fn decode(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		match decode::decode_choice_index(data, 3, true)? {
			0 => Ok(Self::InitiatingMessage(InitiatingMessage::decode(data)?)),
			1 => Ok(Self::SuccessfulOutcome(SuccessfulOutcome::decode(data)?)),
			_ => Ok(Self::UnsuccessfulOutcome(UnsuccessfulOutcome::decode(data)?)),
		}
	}
}
