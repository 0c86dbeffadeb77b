//! The NGAP procedures this gNB exercises on N2.

use asn1_per::{PerCodec, PerCodecData, PerCodecError, decode, encode};

use crate::error::NgapCodecError;
use crate::ies::*;
use crate::pdu::*;

#[derive(Debug, Clone, PartialEq)]
pub struct NgSetupRequest {
	pub global_ran_node_id: GlobalRanNodeId,
	pub ran_node_name: Option<String>,
	pub supported_ta_list: Vec<SupportedTaItem>,
	pub default_paging_drx: PagingDrx,
}

impl NgSetupRequest {
	pub(crate) fn encode_value(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let mut container = IeContainer::new();
		container.add(ID_GLOBAL_RAN_NODE_ID, Criticality::Reject, |d| {
			self.global_ran_node_id.encode(d)
		})?;
		if let Some(name) = &self.ran_node_name {
			container.add(82, Criticality::Ignore, |d| {
				encode::encode_printable_string(d, name, 1, 150, true)
			})?;
		}
		container.add(ID_SUPPORTED_TA_LIST, Criticality::Reject, |d| {
			encode_sequence_of(d, &self.supported_ta_list, 1, 256)
		})?;
		container.add(ID_DEFAULT_PAGING_DRX, Criticality::Ignore, |d| {
			self.default_paging_drx.encode(d)
		})?;
		container.encode(data)
	}

	pub(crate) fn decode_value(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		let mut container = IeContainer::decode(data)?;
		let global_ran_node_id = container.take_decoded(ID_GLOBAL_RAN_NODE_ID)?;
		let ran_node_name = match container.take(82) {
			None => None,
			Some(bytes) => {
				let mut value = PerCodecData::from_slice(&bytes);
				Some(decode::decode_printable_string(&mut value, 1, 150, true)?)
			}
		};
		let supported_ta_list = match container.take(ID_SUPPORTED_TA_LIST) {
			None => None,
			Some(bytes) => {
				let mut value = PerCodecData::from_slice(&bytes);
				Some(decode_sequence_of(&mut value, 1, 256)?)
			}
		};
		let default_paging_drx = container.take_decoded(ID_DEFAULT_PAGING_DRX)?;
		Ok(Self {
			global_ran_node_id: require(global_ran_node_id, "NGSetupRequest", ID_GLOBAL_RAN_NODE_ID)?,
			ran_node_name,
			supported_ta_list: require(supported_ta_list, "NGSetupRequest", ID_SUPPORTED_TA_LIST)?,
			default_paging_drx: require(
				default_paging_drx,
				"NGSetupRequest",
				ID_DEFAULT_PAGING_DRX,
			)?,
		})
	}
}

impl ToNgapPdu for NgSetupRequest {
	fn to_pdu(self) -> NgapPdu {
		NgapPdu::InitiatingMessage(InitiatingMessage::NgSetupRequest(self))
	}
}

/// Decoded for logging only; list IEs the simulator does not act on are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NgSetupResponse {
	pub amf_name: Option<String>,
	pub relative_amf_capacity: Option<u8>,
}

impl NgSetupResponse {
	pub(crate) fn encode_value(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let mut container = IeContainer::new();
		if let Some(name) = &self.amf_name {
			container.add(ID_AMF_NAME, Criticality::Reject, |d| {
				encode::encode_printable_string(d, name, 1, 150, true)
			})?;
		}
		if let Some(capacity) = self.relative_amf_capacity {
			container.add(ID_RELATIVE_AMF_CAPACITY, Criticality::Ignore, |d| {
				encode::encode_constrained_whole_number(d, capacity as i128, 0, 255, false)
			})?;
		}
		container.encode(data)
	}

	pub(crate) fn decode_value(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		let mut container = IeContainer::decode(data)?;
		let amf_name = match container.take(ID_AMF_NAME) {
			None => None,
			Some(bytes) => {
				let mut value = PerCodecData::from_slice(&bytes);
				Some(decode::decode_printable_string(&mut value, 1, 150, true)?)
			}
		};
		let relative_amf_capacity = match container.take(ID_RELATIVE_AMF_CAPACITY) {
			None => None,
			Some(bytes) => {
				let mut value = PerCodecData::from_slice(&bytes);
				Some(decode::decode_constrained_whole_number(&mut value, 0, 255, false)? as u8)
			}
		};
		Ok(Self { amf_name, relative_amf_capacity })
	}
}

impl ToNgapPdu for NgSetupResponse {
	fn to_pdu(self) -> NgapPdu {
		NgapPdu::SuccessfulOutcome(SuccessfulOutcome::NgSetupResponse(self))
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct NgSetupFailure {
	pub cause: Cause,
}

impl NgSetupFailure {
	pub(crate) fn encode_value(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let mut container = IeContainer::new();
		container.add(ID_CAUSE, Criticality::Ignore, |d| self.cause.encode(d))?;
		container.encode(data)
	}

	pub(crate) fn decode_value(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		let mut container = IeContainer::decode(data)?;
		let cause = container.take_decoded(ID_CAUSE)?;
		Ok(Self { cause: require(cause, "NGSetupFailure", ID_CAUSE)? })
	}
}

impl ToNgapPdu for NgSetupFailure {
	fn to_pdu(self) -> NgapPdu {
		NgapPdu::UnsuccessfulOutcome(UnsuccessfulOutcome::NgSetupFailure(self))
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitialUeMessage {
	pub ran_ue_ngap_id: RanUeNgapId,
	pub nas_pdu: NasPdu,
	pub user_location_information: UserLocationInformation,
	pub rrc_establishment_cause: RrcEstablishmentCause,
	pub ue_context_request: bool,
}

impl InitialUeMessage {
	pub(crate) fn encode_value(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let mut container = IeContainer::new();
		container.add(ID_RAN_UE_NGAP_ID, Criticality::Reject, |d| self.ran_ue_ngap_id.encode(d))?;
		container.add(ID_NAS_PDU, Criticality::Reject, |d| self.nas_pdu.encode(d))?;
		container.add(ID_USER_LOCATION_INFORMATION, Criticality::Reject, |d| {
			self.user_location_information.encode(d)
		})?;
		container.add(ID_RRC_ESTABLISHMENT_CAUSE, Criticality::Ignore, |d| {
			self.rrc_establishment_cause.encode(d)
		})?;
		if self.ue_context_request {
			container.add(ID_UE_CONTEXT_REQUEST, Criticality::Ignore, |d| {
				encode::encode_enumerated(d, 0, 1, true)
			})?;
		}
		container.encode(data)
	}

	pub(crate) fn decode_value(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		let mut container = IeContainer::decode(data)?;
		let ran_ue_ngap_id = container.take_decoded(ID_RAN_UE_NGAP_ID)?;
		let nas_pdu = container.take_decoded(ID_NAS_PDU)?;
		let user_location_information = container.take_decoded(ID_USER_LOCATION_INFORMATION)?;
		let rrc_establishment_cause = container.take_decoded(ID_RRC_ESTABLISHMENT_CAUSE)?;
		let ue_context_request = container.take(ID_UE_CONTEXT_REQUEST).is_some();
		Ok(Self {
			ran_ue_ngap_id: require(ran_ue_ngap_id, "InitialUEMessage", ID_RAN_UE_NGAP_ID)?,
			nas_pdu: require(nas_pdu, "InitialUEMessage", ID_NAS_PDU)?,
			user_location_information: require(
				user_location_information,
				"InitialUEMessage",
				ID_USER_LOCATION_INFORMATION,
			)?,
			rrc_establishment_cause: require(
				rrc_establishment_cause,
				"InitialUEMessage",
				ID_RRC_ESTABLISHMENT_CAUSE,
			)?,
			ue_context_request,
		})
	}
}

impl ToNgapPdu for InitialUeMessage {
	fn to_pdu(self) -> NgapPdu {
		NgapPdu::InitiatingMessage(InitiatingMessage::InitialUeMessage(self))
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownlinkNasTransport {
	pub amf_ue_ngap_id: AmfUeNgapId,
	pub ran_ue_ngap_id: RanUeNgapId,
	pub nas_pdu: NasPdu,
}

impl DownlinkNasTransport {
	pub(crate) fn encode_value(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let mut container = IeContainer::new();
		container.add(ID_AMF_UE_NGAP_ID, Criticality::Reject, |d| self.amf_ue_ngap_id.encode(d))?;
		container.add(ID_RAN_UE_NGAP_ID, Criticality::Reject, |d| self.ran_ue_ngap_id.encode(d))?;
		container.add(ID_NAS_PDU, Criticality::Reject, |d| self.nas_pdu.encode(d))?;
		container.encode(data)
	}

	pub(crate) fn decode_value(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		let mut container = IeContainer::decode(data)?;
		let amf_ue_ngap_id = container.take_decoded(ID_AMF_UE_NGAP_ID)?;
		let ran_ue_ngap_id = container.take_decoded(ID_RAN_UE_NGAP_ID)?;
		let nas_pdu = container.take_decoded(ID_NAS_PDU)?;
		Ok(Self {
			amf_ue_ngap_id: require(amf_ue_ngap_id, "DownlinkNASTransport", ID_AMF_UE_NGAP_ID)?,
			ran_ue_ngap_id: require(ran_ue_ngap_id, "DownlinkNASTransport", ID_RAN_UE_NGAP_ID)?,
			nas_pdu: require(nas_pdu, "DownlinkNASTransport", ID_NAS_PDU)?,
		})
	}
}

impl ToNgapPdu for DownlinkNasTransport {
	fn to_pdu(self) -> NgapPdu {
		NgapPdu::InitiatingMessage(InitiatingMessage::DownlinkNasTransport(self))
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct UplinkNasTransport {
	pub amf_ue_ngap_id: AmfUeNgapId,
	pub ran_ue_ngap_id: RanUeNgapId,
	pub nas_pdu: NasPdu,
	pub user_location_information: UserLocationInformation,
}

impl UplinkNasTransport {
	pub(crate) fn encode_value(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let mut container = IeContainer::new();
		container.add(ID_AMF_UE_NGAP_ID, Criticality::Reject, |d| self.amf_ue_ngap_id.encode(d))?;
		container.add(ID_RAN_UE_NGAP_ID, Criticality::Reject, |d| self.ran_ue_ngap_id.encode(d))?;
		container.add(ID_NAS_PDU, Criticality::Reject, |d| self.nas_pdu.encode(d))?;
		container.add(ID_USER_LOCATION_INFORMATION, Criticality::Ignore, |d| {
			self.user_location_information.encode(d)
		})?;
		container.encode(data)
	}

	pub(crate) fn decode_value(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		let mut container = IeContainer::decode(data)?;
		let amf_ue_ngap_id = container.take_decoded(ID_AMF_UE_NGAP_ID)?;
		let ran_ue_ngap_id = container.take_decoded(ID_RAN_UE_NGAP_ID)?;
		let nas_pdu = container.take_decoded(ID_NAS_PDU)?;
		let user_location_information = container.take_decoded(ID_USER_LOCATION_INFORMATION)?;
		Ok(Self {
			amf_ue_ngap_id: require(amf_ue_ngap_id, "UplinkNASTransport", ID_AMF_UE_NGAP_ID)?,
			ran_ue_ngap_id: require(ran_ue_ngap_id, "UplinkNASTransport", ID_RAN_UE_NGAP_ID)?,
			nas_pdu: require(nas_pdu, "UplinkNASTransport", ID_NAS_PDU)?,
			user_location_information: require(
				user_location_information,
				"UplinkNASTransport",
				ID_USER_LOCATION_INFORMATION,
			)?,
		})
	}
}

impl ToNgapPdu for UplinkNasTransport {
	fn to_pdu(self) -> NgapPdu {
		NgapPdu::InitiatingMessage(InitiatingMessage::UplinkNasTransport(self))
	}
}

/// Only the IEs the gNB acts on are modelled; the security key, allowed
/// NSSAI and capability IEs ride through undissected.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialContextSetupRequest {
	pub amf_ue_ngap_id: AmfUeNgapId,
	pub ran_ue_ngap_id: RanUeNgapId,
	pub nas_pdu: Option<NasPdu>,
}

impl InitialContextSetupRequest {
	pub(crate) fn encode_value(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let mut container = IeContainer::new();
		container.add(ID_AMF_UE_NGAP_ID, Criticality::Reject, |d| self.amf_ue_ngap_id.encode(d))?;
		container.add(ID_RAN_UE_NGAP_ID, Criticality::Reject, |d| self.ran_ue_ngap_id.encode(d))?;
		if let Some(nas_pdu) = &self.nas_pdu {
			container.add(ID_NAS_PDU, Criticality::Ignore, |d| nas_pdu.encode(d))?;
		}
		container.encode(data)
	}

	pub(crate) fn decode_value(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		let mut container = IeContainer::decode(data)?;
		let amf_ue_ngap_id = container.take_decoded(ID_AMF_UE_NGAP_ID)?;
		let ran_ue_ngap_id = container.take_decoded(ID_RAN_UE_NGAP_ID)?;
		let nas_pdu = container.take_decoded(ID_NAS_PDU)?;
		Ok(Self {
			amf_ue_ngap_id: require(amf_ue_ngap_id, "InitialContextSetupRequest", ID_AMF_UE_NGAP_ID)?,
			ran_ue_ngap_id: require(ran_ue_ngap_id, "InitialContextSetupRequest", ID_RAN_UE_NGAP_ID)?,
			nas_pdu,
		})
	}
}

impl ToNgapPdu for InitialContextSetupRequest {
	fn to_pdu(self) -> NgapPdu {
		NgapPdu::InitiatingMessage(InitiatingMessage::InitialContextSetupRequest(self))
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PduSessionResourceSetupItemRes {
	pub pdu_session_id: u8,
	pub transfer: Vec<u8>,
}

impl PerCodec for PduSessionResourceSetupItemRes {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false]);
		encode::encode_constrained_whole_number(data, self.pdu_session_id as i128, 0, 255, false)?;
		encode::encode_octet_string(data, &self.transfer, 0, asn1_per::UNBOUNDED, false)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 1)?;
		let pdu_session_id = decode::decode_constrained_whole_number(data, 0, 255, false)? as u8;
		let transfer = decode::decode_octet_string(data, 0, asn1_per::UNBOUNDED, false)?;
		if optionals[0] {
			skip_extension_container(data)?;
		}
		Ok(Self { pdu_session_id, transfer })
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitialContextSetupResponse {
	pub amf_ue_ngap_id: AmfUeNgapId,
	pub ran_ue_ngap_id: RanUeNgapId,
	pub pdu_session_setup_list: Option<Vec<PduSessionResourceSetupItemRes>>,
}

impl InitialContextSetupResponse {
	pub(crate) fn encode_value(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let mut container = IeContainer::new();
		container.add(ID_AMF_UE_NGAP_ID, Criticality::Ignore, |d| self.amf_ue_ngap_id.encode(d))?;
		container.add(ID_RAN_UE_NGAP_ID, Criticality::Ignore, |d| self.ran_ue_ngap_id.encode(d))?;
		if let Some(list) = &self.pdu_session_setup_list {
			container.add(ID_PDU_SESSION_RESOURCE_SETUP_LIST_CXT_RES, Criticality::Ignore, |d| {
				encode_sequence_of(d, list, 1, 256)
			})?;
		}
		container.encode(data)
	}

	pub(crate) fn decode_value(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		let mut container = IeContainer::decode(data)?;
		let amf_ue_ngap_id = container.take_decoded(ID_AMF_UE_NGAP_ID)?;
		let ran_ue_ngap_id = container.take_decoded(ID_RAN_UE_NGAP_ID)?;
		let pdu_session_setup_list = match container.take(ID_PDU_SESSION_RESOURCE_SETUP_LIST_CXT_RES)
		{
			None => None,
			Some(bytes) => {
				let mut value = PerCodecData::from_slice(&bytes);
				Some(decode_sequence_of(&mut value, 1, 256)?)
			}
		};
		Ok(Self {
			amf_ue_ngap_id: require(
				amf_ue_ngap_id,
				"InitialContextSetupResponse",
				ID_AMF_UE_NGAP_ID,
			)?,
			ran_ue_ngap_id: require(
				ran_ue_ngap_id,
				"InitialContextSetupResponse",
				ID_RAN_UE_NGAP_ID,
			)?,
			pdu_session_setup_list,
		})
	}
}

impl ToNgapPdu for InitialContextSetupResponse {
	fn to_pdu(self) -> NgapPdu {
		NgapPdu::SuccessfulOutcome(SuccessfulOutcome::InitialContextSetupResponse(self))
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PduSessionResourceSetupItemReq {
	pub pdu_session_id: u8,
	pub nas_pdu: Option<NasPdu>,
	pub snssai: SnssaiIe,
	pub transfer: Vec<u8>,
}

impl PerCodec for PduSessionResourceSetupItemReq {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[self.nas_pdu.is_some(), false]);
		encode::encode_constrained_whole_number(data, self.pdu_session_id as i128, 0, 255, false)?;
		if let Some(nas_pdu) = &self.nas_pdu {
			nas_pdu.encode(data)?;
		}
		self.snssai.encode(data)?;
		encode::encode_octet_string(data, &self.transfer, 0, asn1_per::UNBOUNDED, false)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 2)?;
		let pdu_session_id = decode::decode_constrained_whole_number(data, 0, 255, false)? as u8;
		let nas_pdu = if optionals[0] { Some(NasPdu::decode(data)?) } else { None };
		let snssai = SnssaiIe::decode(data)?;
		let transfer = decode::decode_octet_string(data, 0, asn1_per::UNBOUNDED, false)?;
		if optionals[1] {
			skip_extension_container(data)?;
		}
		Ok(Self { pdu_session_id, nas_pdu, snssai, transfer })
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PduSessionResourceSetupRequest {
	pub amf_ue_ngap_id: AmfUeNgapId,
	pub ran_ue_ngap_id: RanUeNgapId,
	pub nas_pdu: Option<NasPdu>,
	pub setup_list: Vec<PduSessionResourceSetupItemReq>,
}

impl PduSessionResourceSetupRequest {
	pub(crate) fn encode_value(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let mut container = IeContainer::new();
		container.add(ID_AMF_UE_NGAP_ID, Criticality::Reject, |d| self.amf_ue_ngap_id.encode(d))?;
		container.add(ID_RAN_UE_NGAP_ID, Criticality::Reject, |d| self.ran_ue_ngap_id.encode(d))?;
		if let Some(nas_pdu) = &self.nas_pdu {
			container.add(ID_NAS_PDU, Criticality::Reject, |d| nas_pdu.encode(d))?;
		}
		container.add(ID_PDU_SESSION_RESOURCE_SETUP_LIST_SU_REQ, Criticality::Reject, |d| {
			encode_sequence_of(d, &self.setup_list, 1, 256)
		})?;
		container.encode(data)
	}

	pub(crate) fn decode_value(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		let mut container = IeContainer::decode(data)?;
		let amf_ue_ngap_id = container.take_decoded(ID_AMF_UE_NGAP_ID)?;
		let ran_ue_ngap_id = container.take_decoded(ID_RAN_UE_NGAP_ID)?;
		let nas_pdu = container.take_decoded(ID_NAS_PDU)?;
		let setup_list = match container.take(ID_PDU_SESSION_RESOURCE_SETUP_LIST_SU_REQ) {
			None => None,
			Some(bytes) => {
				let mut value = PerCodecData::from_slice(&bytes);
				Some(decode_sequence_of(&mut value, 1, 256)?)
			}
		};
		Ok(Self {
			amf_ue_ngap_id: require(
				amf_ue_ngap_id,
				"PDUSessionResourceSetupRequest",
				ID_AMF_UE_NGAP_ID,
			)?,
			ran_ue_ngap_id: require(
				ran_ue_ngap_id,
				"PDUSessionResourceSetupRequest",
				ID_RAN_UE_NGAP_ID,
			)?,
			nas_pdu,
			setup_list: require(
				setup_list,
				"PDUSessionResourceSetupRequest",
				ID_PDU_SESSION_RESOURCE_SETUP_LIST_SU_REQ,
			)?,
		})
	}
}

impl ToNgapPdu for PduSessionResourceSetupRequest {
	fn to_pdu(self) -> NgapPdu {
		NgapPdu::InitiatingMessage(InitiatingMessage::PduSessionResourceSetupRequest(self))
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PduSessionResourceSetupResponse {
	pub amf_ue_ngap_id: AmfUeNgapId,
	pub ran_ue_ngap_id: RanUeNgapId,
	pub setup_list: Option<Vec<PduSessionResourceSetupItemRes>>,
}

impl PduSessionResourceSetupResponse {
	pub(crate) fn encode_value(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let mut container = IeContainer::new();
		container.add(ID_AMF_UE_NGAP_ID, Criticality::Ignore, |d| self.amf_ue_ngap_id.encode(d))?;
		container.add(ID_RAN_UE_NGAP_ID, Criticality::Ignore, |d| self.ran_ue_ngap_id.encode(d))?;
		if let Some(list) = &self.setup_list {
			container.add(ID_PDU_SESSION_RESOURCE_SETUP_LIST_SU_RES, Criticality::Ignore, |d| {
				encode_sequence_of(d, list, 1, 256)
			})?;
		}
		container.encode(data)
	}

	pub(crate) fn decode_value(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		let mut container = IeContainer::decode(data)?;
		let amf_ue_ngap_id = container.take_decoded(ID_AMF_UE_NGAP_ID)?;
		let ran_ue_ngap_id = container.take_decoded(ID_RAN_UE_NGAP_ID)?;
		let setup_list = match container.take(ID_PDU_SESSION_RESOURCE_SETUP_LIST_SU_RES) {
			None => None,
			Some(bytes) => {
				let mut value = PerCodecData::from_slice(&bytes);
				Some(decode_sequence_of(&mut value, 1, 256)?)
			}
		};
		Ok(Self {
			amf_ue_ngap_id: require(
				amf_ue_ngap_id,
				"PDUSessionResourceSetupResponse",
				ID_AMF_UE_NGAP_ID,
			)?,
			ran_ue_ngap_id: require(
				ran_ue_ngap_id,
				"PDUSessionResourceSetupResponse",
				ID_RAN_UE_NGAP_ID,
			)?,
			setup_list,
		})
	}
}

impl ToNgapPdu for PduSessionResourceSetupResponse {
	fn to_pdu(self) -> NgapPdu {
		NgapPdu::SuccessfulOutcome(SuccessfulOutcome::PduSessionResourceSetupResponse(self))
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorIndication {
	pub amf_ue_ngap_id: Option<AmfUeNgapId>,
	pub ran_ue_ngap_id: Option<RanUeNgapId>,
	pub cause: Option<Cause>,
}

impl ErrorIndication {
	pub(crate) fn encode_value(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let mut container = IeContainer::new();
		if let Some(id) = &self.amf_ue_ngap_id {
			container.add(ID_AMF_UE_NGAP_ID, Criticality::Ignore, |d| id.encode(d))?;
		}
		if let Some(id) = &self.ran_ue_ngap_id {
			container.add(ID_RAN_UE_NGAP_ID, Criticality::Ignore, |d| id.encode(d))?;
		}
		if let Some(cause) = &self.cause {
			container.add(ID_CAUSE, Criticality::Ignore, |d| cause.encode(d))?;
		}
		container.encode(data)
	}

	pub(crate) fn decode_value(data: &mut PerCodecData) -> Result<Self, NgapCodecError> {
		let mut container = IeContainer::decode(data)?;
		Ok(Self {
			amf_ue_ngap_id: container.take_decoded(ID_AMF_UE_NGAP_ID)?,
			ran_ue_ngap_id: container.take_decoded(ID_RAN_UE_NGAP_ID)?,
			cause: container.take_decoded(ID_CAUSE)?,
		})
	}
}

impl ToNgapPdu for ErrorIndication {
	fn to_pdu(self) -> NgapPdu {
		NgapPdu::InitiatingMessage(InitiatingMessage::ErrorIndication(self))
	}
}
