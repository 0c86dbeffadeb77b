//! PER-encoded transfer containers riding inside PDU Session Resource Setup
//! items (TS 38.413 §9.3.4).

use asn1_per::{PerCodec, PerCodecData, PerCodecError, decode, encode};

use crate::error::NgapCodecError;
use crate::ies::{
	PduSessionType,
	QosFlowIdentifier,
	UpTransportLayerInformation,
	decode_sequence_of,
	encode_sequence_of,
	skip_extension_container,
};
use crate::pdu::{Criticality, IeContainer, require};

pub const ID_PDU_SESSION_AGGREGATE_MAXIMUM_BIT_RATE: u16 = 130;
pub const ID_PDU_SESSION_TYPE: u16 = 134;
pub const ID_QOS_FLOW_SETUP_REQUEST_LIST: u16 = 136;
pub const ID_UL_NGU_UP_TNL_INFORMATION: u16 = 139;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationAndRetentionPriority {
	pub priority_level: u8,
	pub may_trigger_preemption: bool,
	pub preemption_vulnerable: bool,
}

impl PerCodec for AllocationAndRetentionPriority {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false]);
		encode::encode_constrained_whole_number(data, self.priority_level as i128, 1, 15, false)?;
		encode::encode_enumerated(data, self.may_trigger_preemption as usize, 2, false)?;
		encode::encode_enumerated(data, self.preemption_vulnerable as usize, 2, false)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 1)?;
		let priority_level = decode::decode_constrained_whole_number(data, 1, 15, false)? as u8;
		let may_trigger_preemption = decode::decode_enumerated(data, 2, false)? == 1;
		let preemption_vulnerable = decode::decode_enumerated(data, 2, false)? == 1;
		if optionals[0] {
			skip_extension_container(data)?;
		}
		Ok(Self { priority_level, may_trigger_preemption, preemption_vulnerable })
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonDynamic5Qi {
	pub five_qi: u8,
	pub priority_level: Option<u8>,
}

impl PerCodec for NonDynamic5Qi {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(
			data,
			true,
			&[self.priority_level.is_some(), false, false, false],
		);
		encode::encode_constrained_whole_number(data, self.five_qi as i128, 0, 255, true)?;
		if let Some(priority) = self.priority_level {
			encode::encode_constrained_whole_number(data, priority as i128, 1, 127, true)?;
		}
		Ok(())
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 4)?;
		let five_qi = decode::decode_constrained_whole_number(data, 0, 255, true)? as u8;
		let priority_level = if optionals[0] {
			Some(decode::decode_constrained_whole_number(data, 1, 127, true)? as u8)
		} else {
			None
		};
		if optionals[1] {
			// averagingWindow
			decode::decode_constrained_whole_number(data, 0, 4095, true)?;
		}
		if optionals[2] {
			// maximumDataBurstVolume
			decode::decode_constrained_whole_number(data, 0, 4095, true)?;
		}
		if optionals[3] {
			skip_extension_container(data)?;
		}
		Ok(Self { five_qi, priority_level })
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketErrorRate {
	pub scalar: u8,
	pub exponent: u8,
}

impl PerCodec for PacketErrorRate {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false]);
		encode::encode_constrained_whole_number(data, self.scalar as i128, 0, 9, true)?;
		encode::encode_constrained_whole_number(data, self.exponent as i128, 0, 9, true)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 1)?;
		let scalar = decode::decode_constrained_whole_number(data, 0, 9, true)? as u8;
		let exponent = decode::decode_constrained_whole_number(data, 0, 9, true)? as u8;
		if optionals[0] {
			skip_extension_container(data)?;
		}
		Ok(Self { scalar, exponent })
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dynamic5Qi {
	pub priority_level: u8,
	pub packet_delay_budget: u16,
	pub packet_error_rate: PacketErrorRate,
	pub five_qi: Option<u8>,
}

impl PerCodec for Dynamic5Qi {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(
			data,
			true,
			&[self.five_qi.is_some(), false, false, false, false],
		);
		encode::encode_constrained_whole_number(data, self.priority_level as i128, 1, 127, true)?;
		encode::encode_constrained_whole_number(
			data,
			self.packet_delay_budget as i128,
			0,
			1023,
			true,
		)?;
		self.packet_error_rate.encode(data)?;
		if let Some(five_qi) = self.five_qi {
			encode::encode_constrained_whole_number(data, five_qi as i128, 0, 255, true)?;
		}
		Ok(())
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 5)?;
		let priority_level = decode::decode_constrained_whole_number(data, 1, 127, true)? as u8;
		let packet_delay_budget =
			decode::decode_constrained_whole_number(data, 0, 1023, true)? as u16;
		let packet_error_rate = PacketErrorRate::decode(data)?;
		let five_qi = if optionals[0] {
			Some(decode::decode_constrained_whole_number(data, 0, 255, true)? as u8)
		} else {
			None
		};
		if optionals[1] {
			// delayCritical
			decode::decode_enumerated(data, 2, true)?;
		}
		if optionals[2] {
			// averagingWindow
			decode::decode_constrained_whole_number(data, 0, 4095, true)?;
		}
		if optionals[3] {
			// maximumDataBurstVolume
			decode::decode_constrained_whole_number(data, 0, 4095, true)?;
		}
		if optionals[4] {
			skip_extension_container(data)?;
		}
		Ok(Self { priority_level, packet_delay_budget, packet_error_rate, five_qi })
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QosCharacteristics {
	NonDynamic(NonDynamic5Qi),
	Dynamic(Dynamic5Qi),
}

impl PerCodec for QosCharacteristics {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		match self {
			Self::NonDynamic(inner) => {
				encode::encode_choice_index(data, 0, 3, false)?;
				inner.encode(data)
			}
			Self::Dynamic(inner) => {
				encode::encode_choice_index(data, 1, 3, false)?;
				inner.encode(data)
			}
		}
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		match decode::decode_choice_index(data, 3, false)? {
			0 => Ok(Self::NonDynamic(NonDynamic5Qi::decode(data)?)),
			1 => Ok(Self::Dynamic(Dynamic5Qi::decode(data)?)),
			index => Err(PerCodecError::InvalidChoiceIndex { index, count: 3 }),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GbrQosInformation {
	pub maximum_flow_bit_rate_dl: u64,
	pub maximum_flow_bit_rate_ul: u64,
	pub guaranteed_flow_bit_rate_dl: u64,
	pub guaranteed_flow_bit_rate_ul: u64,
}

const BIT_RATE_MAX: i128 = 4_000_000_000_000;

impl PerCodec for GbrQosInformation {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false, false, false, false]);
		for rate in [
			self.maximum_flow_bit_rate_dl,
			self.maximum_flow_bit_rate_ul,
			self.guaranteed_flow_bit_rate_dl,
			self.guaranteed_flow_bit_rate_ul,
		] {
			encode::encode_constrained_whole_number(data, rate as i128, 0, BIT_RATE_MAX, true)?;
		}
		Ok(())
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 4)?;
		let mut rates = [0u64; 4];
		for rate in rates.iter_mut() {
			*rate = decode::decode_constrained_whole_number(data, 0, BIT_RATE_MAX, true)? as u64;
		}
		if optionals[0] {
			// notificationControl, a single-rooted extensible enum.
			decode::decode_enumerated(data, 1, true)?;
		}
		if optionals[1] {
			decode::decode_constrained_whole_number(data, 0, 1000, true)?;
		}
		if optionals[2] {
			decode::decode_constrained_whole_number(data, 0, 1000, true)?;
		}
		if optionals[3] {
			skip_extension_container(data)?;
		}
		Ok(Self {
			maximum_flow_bit_rate_dl: rates[0],
			maximum_flow_bit_rate_ul: rates[1],
			guaranteed_flow_bit_rate_dl: rates[2],
			guaranteed_flow_bit_rate_ul: rates[3],
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QosFlowLevelQosParameters {
	pub characteristics: QosCharacteristics,
	pub arp: AllocationAndRetentionPriority,
	pub gbr: Option<GbrQosInformation>,
}

impl PerCodec for QosFlowLevelQosParameters {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[self.gbr.is_some(), false, false, false]);
		self.characteristics.encode(data)?;
		self.arp.encode(data)?;
		if let Some(gbr) = &self.gbr {
			gbr.encode(data)?;
		}
		Ok(())
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 4)?;
		let characteristics = QosCharacteristics::decode(data)?;
		let arp = AllocationAndRetentionPriority::decode(data)?;
		let gbr = if optionals[0] { Some(GbrQosInformation::decode(data)?) } else { None };
		if optionals[1] {
			// reflectiveQosAttribute, a single-rooted extensible enum.
			decode::decode_enumerated(data, 1, true)?;
		}
		if optionals[2] {
			// additionalQosFlowInformation
			decode::decode_enumerated(data, 1, true)?;
		}
		if optionals[3] {
			skip_extension_container(data)?;
		}
		Ok(Self { characteristics, arp, gbr })
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QosFlowSetupRequestItem {
	pub qos_flow_identifier: QosFlowIdentifier,
	pub parameters: QosFlowLevelQosParameters,
}

impl PerCodec for QosFlowSetupRequestItem {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false, false]);
		self.qos_flow_identifier.encode(data)?;
		self.parameters.encode(data)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 2)?;
		let qos_flow_identifier = QosFlowIdentifier::decode(data)?;
		let parameters = QosFlowLevelQosParameters::decode(data)?;
		if optionals[0] {
			// e-RAB-ID
			decode::decode_constrained_whole_number(data, 0, 15, true)?;
		}
		if optionals[1] {
			skip_extension_container(data)?;
		}
		Ok(Self { qos_flow_identifier, parameters })
	}
}

/// PDU Session Resource Setup Request Transfer: the UPF-side tunnel
/// endpoint, the session type and the QoS flows to install.
#[derive(Debug, Clone, PartialEq)]
pub struct PduSessionResourceSetupRequestTransfer {
	pub ul_ngu_up_tnl_information: UpTransportLayerInformation,
	pub pdu_session_type: PduSessionType,
	pub qos_flows: Vec<QosFlowSetupRequestItem>,
}

impl PduSessionResourceSetupRequestTransfer {
	pub fn encode_bytes(&self) -> Result<Vec<u8>, PerCodecError> {
		let mut data = PerCodecData::new();
		let mut container = IeContainer::new();
		container.add(ID_UL_NGU_UP_TNL_INFORMATION, Criticality::Reject, |d| {
			self.ul_ngu_up_tnl_information.encode(d)
		})?;
		container.add(ID_PDU_SESSION_TYPE, Criticality::Reject, |d| {
			self.pdu_session_type.encode(d)
		})?;
		container.add(ID_QOS_FLOW_SETUP_REQUEST_LIST, Criticality::Reject, |d| {
			encode_sequence_of(d, &self.qos_flows, 1, 64)
		})?;
		container.encode(&mut data)?;
		Ok(data.into_bytes())
	}

	pub fn decode_bytes(bytes: &[u8]) -> Result<Self, NgapCodecError> {
		let mut data = PerCodecData::from_slice(bytes);
		let mut container = IeContainer::decode(&mut data)?;
		let ul_ngu_up_tnl_information = container.take_decoded(ID_UL_NGU_UP_TNL_INFORMATION)?;
		let pdu_session_type = container.take_decoded(ID_PDU_SESSION_TYPE)?;
		let qos_flows = match container.take(ID_QOS_FLOW_SETUP_REQUEST_LIST) {
			None => None,
			Some(bytes) => {
				let mut value = PerCodecData::from_slice(&bytes);
				Some(decode_sequence_of(&mut value, 1, 64)?)
			}
		};
		Ok(Self {
			ul_ngu_up_tnl_information: require(
				ul_ngu_up_tnl_information,
				"PDUSessionResourceSetupRequestTransfer",
				ID_UL_NGU_UP_TNL_INFORMATION,
			)?,
			pdu_session_type: require(
				pdu_session_type,
				"PDUSessionResourceSetupRequestTransfer",
				ID_PDU_SESSION_TYPE,
			)?,
			qos_flows: require(
				qos_flows,
				"PDUSessionResourceSetupRequestTransfer",
				ID_QOS_FLOW_SETUP_REQUEST_LIST,
			)?,
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociatedQosFlowItem {
	pub qos_flow_identifier: QosFlowIdentifier,
}

impl PerCodec for AssociatedQosFlowItem {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false, false]);
		self.qos_flow_identifier.encode(data)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 2)?;
		let qos_flow_identifier = QosFlowIdentifier::decode(data)?;
		if optionals[0] {
			// qosFlowMappingIndication
			decode::decode_enumerated(data, 2, true)?;
		}
		if optionals[1] {
			skip_extension_container(data)?;
		}
		Ok(Self { qos_flow_identifier })
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct QosFlowPerTnlInformation {
	pub up_tnl_information: UpTransportLayerInformation,
	pub associated_qos_flows: Vec<AssociatedQosFlowItem>,
}

impl PerCodec for QosFlowPerTnlInformation {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false]);
		self.up_tnl_information.encode(data)?;
		encode_sequence_of(data, &self.associated_qos_flows, 1, 64)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 1)?;
		let up_tnl_information = UpTransportLayerInformation::decode(data)?;
		let associated_qos_flows = decode_sequence_of(data, 1, 64)?;
		if optionals[0] {
			skip_extension_container(data)?;
		}
		Ok(Self { up_tnl_information, associated_qos_flows })
	}
}

/// PDU Session Resource Setup Response Transfer: the gNB-side downlink
/// tunnel endpoint and the QoS flows it serves.
#[derive(Debug, Clone, PartialEq)]
pub struct PduSessionResourceSetupResponseTransfer {
	pub dl_qos_flow_per_tnl_information: QosFlowPerTnlInformation,
}

impl PduSessionResourceSetupResponseTransfer {
	pub fn encode_bytes(&self) -> Result<Vec<u8>, PerCodecError> {
		let mut data = PerCodecData::new();
		encode::encode_sequence_preamble(&mut data, true, &[false, false, false]);
		self.dl_qos_flow_per_tnl_information.encode(&mut data)?;
		Ok(data.into_bytes())
	}

	pub fn decode_bytes(bytes: &[u8]) -> Result<Self, PerCodecError> {
		let mut data = PerCodecData::from_slice(bytes);
		decode::decode_sequence_preamble(&mut data, true, 3)?;
		let dl_qos_flow_per_tnl_information = QosFlowPerTnlInformation::decode(&mut data)?;
		Ok(Self { dl_qos_flow_per_tnl_information })
	}
}
