//! NGAP information elements and their PER encodings.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use asn1_per::{PerCodec, PerCodecData, PerCodecError, decode, encode};

use crate::pdu::Criticality;

/// Skips a ProtocolExtensionContainer a peer attached to a sequence this
/// implementation does not extend.
pub(crate) fn skip_extension_container(data: &mut PerCodecData) -> Result<(), PerCodecError> {
	let count = decode::decode_length_determinant(data, 1, 65535)?;
	for _ in 0..count {
		decode::decode_constrained_whole_number(data, 0, 65535, false)?;
		Criticality::decode(data)?;
		decode::decode_open_type(data)?;
	}
	Ok(())
}

/// PLMN identity in the 3GPP nibble-swapped BCD wire form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PlmnIdentity(pub [u8; 3]);

impl PerCodec for PlmnIdentity {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_octet_string(data, &self.0, 3, 3, false)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let bytes = decode::decode_octet_string(data, 3, 3, false)?;
		Ok(Self(bytes.try_into().expect("3 octets")))
	}
}

/// 3-octet tracking area code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Tac(pub [u8; 3]);

impl Tac {
	pub fn from_u32(value: u32) -> Self {
		let bytes = value.to_be_bytes();
		Self([bytes[1], bytes[2], bytes[3]])
	}

	pub fn as_u32(&self) -> u32 {
		u32::from_be_bytes([0, self.0[0], self.0[1], self.0[2]])
	}
}

impl PerCodec for Tac {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_octet_string(data, &self.0, 3, 3, false)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let bytes = decode::decode_octet_string(data, 3, 3, false)?;
		Ok(Self(bytes.try_into().expect("3 octets")))
	}
}

/// gNB identifier, a BIT STRING of 22 to 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GnbId {
	pub value: u32,
	pub bit_len: usize,
}

impl GnbId {
	pub fn new_22_bit(value: u32) -> Self {
		Self { value, bit_len: 22 }
	}
}

impl PerCodec for GnbId {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let shifted = (self.value as u64) << (32 - self.bit_len);
		let bytes = (shifted as u32).to_be_bytes();
		encode::encode_bit_string(data, &bytes, self.bit_len, 22, 32, false)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (bytes, bit_len) = decode::decode_bit_string(data, 22, 32, false)?;
		let mut padded = [0u8; 4];
		padded[..bytes.len()].copy_from_slice(&bytes);
		let value = u32::from_be_bytes(padded) >> (32 - bit_len);
		Ok(Self { value, bit_len })
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalGnbId {
	pub plmn_identity: PlmnIdentity,
	pub gnb_id: GnbId,
}

impl PerCodec for GlobalGnbId {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false]);
		self.plmn_identity.encode(data)?;
		// gNB-ID is itself a single-rooted choice.
		encode::encode_choice_index(data, 0, 2, false)?;
		self.gnb_id.encode(data)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 1)?;
		let plmn_identity = PlmnIdentity::decode(data)?;
		decode::decode_choice_index(data, 2, false)?;
		let gnb_id = GnbId::decode(data)?;
		if optionals[0] {
			skip_extension_container(data)?;
		}
		Ok(Self { plmn_identity, gnb_id })
	}
}

/// Global RAN node identifier; only the gNB alternative is in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalRanNodeId {
	GlobalGnbId(GlobalGnbId),
}

impl PerCodec for GlobalRanNodeId {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let Self::GlobalGnbId(inner) = self;
		encode::encode_choice_index(data, 0, 4, false)?;
		inner.encode(data)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let index = decode::decode_choice_index(data, 4, false)?;
		if index != 0 {
			return Err(PerCodecError::InvalidChoiceIndex { index, count: 4 });
		}
		Ok(Self::GlobalGnbId(GlobalGnbId::decode(data)?))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnssaiIe {
	pub sst: u8,
	pub sd: Option<[u8; 3]>,
}

impl PerCodec for SnssaiIe {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[self.sd.is_some(), false]);
		encode::encode_octet_string(data, &[self.sst], 1, 1, false)?;
		if let Some(sd) = &self.sd {
			encode::encode_octet_string(data, sd, 3, 3, false)?;
		}
		Ok(())
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 2)?;
		let sst = decode::decode_octet_string(data, 1, 1, false)?[0];
		let sd = if optionals[0] {
			Some(decode::decode_octet_string(data, 3, 3, false)?.try_into().expect("3 octets"))
		} else {
			None
		};
		if optionals[1] {
			skip_extension_container(data)?;
		}
		Ok(Self { sst, sd })
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceSupportItem {
	pub snssai: SnssaiIe,
}

impl PerCodec for SliceSupportItem {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false]);
		self.snssai.encode(data)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 1)?;
		let snssai = SnssaiIe::decode(data)?;
		if optionals[0] {
			skip_extension_container(data)?;
		}
		Ok(Self { snssai })
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastPlmnItem {
	pub plmn_identity: PlmnIdentity,
	pub tai_slice_support_list: Vec<SliceSupportItem>,
}

impl PerCodec for BroadcastPlmnItem {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false]);
		self.plmn_identity.encode(data)?;
		encode_sequence_of(data, &self.tai_slice_support_list, 1, 1024)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 1)?;
		let plmn_identity = PlmnIdentity::decode(data)?;
		let tai_slice_support_list = decode_sequence_of(data, 1, 1024)?;
		if optionals[0] {
			skip_extension_container(data)?;
		}
		Ok(Self { plmn_identity, tai_slice_support_list })
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedTaItem {
	pub tac: Tac,
	pub broadcast_plmn_list: Vec<BroadcastPlmnItem>,
}

impl PerCodec for SupportedTaItem {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false]);
		self.tac.encode(data)?;
		encode_sequence_of(data, &self.broadcast_plmn_list, 1, 12)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 1)?;
		let tac = Tac::decode(data)?;
		let broadcast_plmn_list = decode_sequence_of(data, 1, 12)?;
		if optionals[0] {
			skip_extension_container(data)?;
		}
		Ok(Self { tac, broadcast_plmn_list })
	}
}

/// Helper for `SEQUENCE (SIZE(min..max)) OF` lists.
pub(crate) fn encode_sequence_of<T: PerCodec>(
	data: &mut PerCodecData,
	items: &[T],
	min: usize,
	max: usize,
) -> Result<(), PerCodecError> {
	encode::encode_length_determinant(data, items.len(), min, max)?;
	for item in items {
		item.encode(data)?;
	}
	Ok(())
}

pub(crate) fn decode_sequence_of<T: PerCodec>(
	data: &mut PerCodecData,
	min: usize,
	max: usize,
) -> Result<Vec<T>, PerCodecError> {
	let count = decode::decode_length_determinant(data, min, max)?;
	let mut items = Vec::with_capacity(count);
	for _ in 0..count {
		items.push(T::decode(data)?);
	}
	Ok(items)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PagingDrx {
	V32,
	V64,
	#[default]
	V128,
	V256,
}

impl PerCodec for PagingDrx {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let index = match self {
			Self::V32 => 0,
			Self::V64 => 1,
			Self::V128 => 2,
			Self::V256 => 3,
		};
		encode::encode_enumerated(data, index, 4, true)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		match decode::decode_enumerated(data, 4, true)? {
			0 => Ok(Self::V32),
			1 => Ok(Self::V64),
			2 => Ok(Self::V128),
			_ => Ok(Self::V256),
		}
	}
}

/// RAN-allocated UE identifier, 0..2^32-1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RanUeNgapId(pub u32);

impl PerCodec for RanUeNgapId {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_constrained_whole_number(data, self.0 as i128, 0, 4_294_967_295, false)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let value = decode::decode_constrained_whole_number(data, 0, 4_294_967_295, false)?;
		Ok(Self(value as u32))
	}
}

/// AMF-allocated UE identifier, 0..2^40-1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AmfUeNgapId(pub u64);

impl PerCodec for AmfUeNgapId {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_constrained_whole_number(data, self.0 as i128, 0, 1_099_511_627_775, false)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let value = decode::decode_constrained_whole_number(data, 0, 1_099_511_627_775, false)?;
		Ok(Self(value as u64))
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NasPdu(pub Vec<u8>);

impl PerCodec for NasPdu {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_octet_string(data, &self.0, 0, asn1_per::UNBOUNDED, false)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		Ok(Self(decode::decode_octet_string(data, 0, asn1_per::UNBOUNDED, false)?))
	}
}

/// NR cell identity: the gNB id in the leading bits of a 36-bit string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NrCellIdentity(pub u64);

impl PerCodec for NrCellIdentity {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let bytes = (self.0 << 28).to_be_bytes();
		encode::encode_bit_string(data, &bytes[..5], 36, 36, 36, false)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (bytes, _) = decode::decode_bit_string(data, 36, 36, false)?;
		let mut padded = [0u8; 8];
		padded[..bytes.len()].copy_from_slice(&bytes);
		Ok(Self(u64::from_be_bytes(padded) >> 28))
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NrCgi {
	pub plmn_identity: PlmnIdentity,
	pub nr_cell_identity: NrCellIdentity,
}

impl PerCodec for NrCgi {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false]);
		self.plmn_identity.encode(data)?;
		self.nr_cell_identity.encode(data)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 1)?;
		let plmn_identity = PlmnIdentity::decode(data)?;
		let nr_cell_identity = NrCellIdentity::decode(data)?;
		if optionals[0] {
			skip_extension_container(data)?;
		}
		Ok(Self { plmn_identity, nr_cell_identity })
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaiIe {
	pub plmn_identity: PlmnIdentity,
	pub tac: Tac,
}

impl PerCodec for TaiIe {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false]);
		self.plmn_identity.encode(data)?;
		self.tac.encode(data)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 1)?;
		let plmn_identity = PlmnIdentity::decode(data)?;
		let tac = Tac::decode(data)?;
		if optionals[0] {
			skip_extension_container(data)?;
		}
		Ok(Self { plmn_identity, tac })
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserLocationInformationNr {
	pub nr_cgi: NrCgi,
	pub tai: TaiIe,
}

impl PerCodec for UserLocationInformationNr {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false, false]);
		self.nr_cgi.encode(data)?;
		self.tai.encode(data)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 2)?;
		let nr_cgi = NrCgi::decode(data)?;
		let tai = TaiIe::decode(data)?;
		if optionals[0] {
			// Optional timestamp.
			decode::decode_octet_string(data, 4, 4, false)?;
		}
		if optionals[1] {
			skip_extension_container(data)?;
		}
		Ok(Self { nr_cgi, tai })
	}
}

/// Only the NR alternative (index 1) is in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserLocationInformation {
	Nr(UserLocationInformationNr),
}

impl PerCodec for UserLocationInformation {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let Self::Nr(inner) = self;
		encode::encode_choice_index(data, 1, 4, false)?;
		inner.encode(data)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let index = decode::decode_choice_index(data, 4, false)?;
		if index != 1 {
			return Err(PerCodecError::InvalidChoiceIndex { index, count: 4 });
		}
		Ok(Self::Nr(UserLocationInformationNr::decode(data)?))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RrcEstablishmentCause {
	Emergency,
	HighPriorityAccess,
	MtAccess,
	MoSignalling,
	MoData,
	MoVoiceCall,
	MoVideoCall,
	MoSms,
	MpsPriorityAccess,
	McsPriorityAccess,
}

impl RrcEstablishmentCause {
	fn index(self) -> usize {
		match self {
			Self::Emergency => 0,
			Self::HighPriorityAccess => 1,
			Self::MtAccess => 2,
			Self::MoSignalling => 3,
			Self::MoData => 4,
			Self::MoVoiceCall => 5,
			Self::MoVideoCall => 6,
			Self::MoSms => 7,
			Self::MpsPriorityAccess => 8,
			Self::McsPriorityAccess => 9,
		}
	}

	fn from_index(index: usize) -> Self {
		match index {
			0 => Self::Emergency,
			1 => Self::HighPriorityAccess,
			2 => Self::MtAccess,
			3 => Self::MoSignalling,
			4 => Self::MoData,
			5 => Self::MoVoiceCall,
			6 => Self::MoVideoCall,
			7 => Self::MoSms,
			8 => Self::MpsPriorityAccess,
			_ => Self::McsPriorityAccess,
		}
	}
}

impl PerCodec for RrcEstablishmentCause {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_enumerated(data, self.index(), 10, true)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		Ok(Self::from_index(decode::decode_enumerated(data, 10, true)?))
	}
}

/// Transport layer address, a BIT STRING of 1..160 bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportLayerAddress {
	pub bytes: Vec<u8>,
	pub bit_len: usize,
}

impl TransportLayerAddress {
	pub fn from_ip(addr: IpAddr) -> Self {
		match addr {
			IpAddr::V4(v4) => Self { bytes: v4.octets().to_vec(), bit_len: 32 },
			IpAddr::V6(v6) => Self { bytes: v6.octets().to_vec(), bit_len: 128 },
		}
	}

	pub fn to_ip(&self) -> Option<IpAddr> {
		match self.bit_len {
			32 => {
				let octets: [u8; 4] = self.bytes.get(..4)?.try_into().ok()?;
				Some(IpAddr::V4(Ipv4Addr::from(octets)))
			}
			128 => {
				let octets: [u8; 16] = self.bytes.get(..16)?.try_into().ok()?;
				Some(IpAddr::V6(Ipv6Addr::from(octets)))
			}
			_ => None,
		}
	}
}

impl PerCodec for TransportLayerAddress {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_bit_string(data, &self.bytes, self.bit_len, 1, 160, true)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (bytes, bit_len) = decode::decode_bit_string(data, 1, 160, true)?;
		Ok(Self { bytes, bit_len })
	}
}

/// GTP tunnel endpoint identifier as a 4-octet string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GtpTeid(pub u32);

impl PerCodec for GtpTeid {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_octet_string(data, &self.0.to_be_bytes(), 4, 4, false)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let bytes = decode::decode_octet_string(data, 4, 4, false)?;
		Ok(Self(u32::from_be_bytes(bytes.try_into().expect("4 octets"))))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtpTunnel {
	pub transport_layer_address: TransportLayerAddress,
	pub gtp_teid: GtpTeid,
}

impl PerCodec for GtpTunnel {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_sequence_preamble(data, true, &[false]);
		self.transport_layer_address.encode(data)?;
		self.gtp_teid.encode(data)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let (_, optionals) = decode::decode_sequence_preamble(data, true, 1)?;
		let transport_layer_address = TransportLayerAddress::decode(data)?;
		let gtp_teid = GtpTeid::decode(data)?;
		if optionals[0] {
			skip_extension_container(data)?;
		}
		Ok(Self { transport_layer_address, gtp_teid })
	}
}

/// UP transport layer information; only the GTP tunnel alternative exists in
/// the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpTransportLayerInformation {
	GtpTunnel(GtpTunnel),
}

impl PerCodec for UpTransportLayerInformation {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let Self::GtpTunnel(inner) = self;
		encode::encode_choice_index(data, 0, 2, false)?;
		inner.encode(data)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let index = decode::decode_choice_index(data, 2, false)?;
		if index != 0 {
			return Err(PerCodecError::InvalidChoiceIndex { index, count: 2 });
		}
		Ok(Self::GtpTunnel(GtpTunnel::decode(data)?))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QosFlowIdentifier(pub u8);

impl PerCodec for QosFlowIdentifier {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		encode::encode_constrained_whole_number(data, self.0 as i128, 0, 63, true)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		let value = decode::decode_constrained_whole_number(data, 0, 63, true)?;
		Ok(Self(value as u8))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PduSessionType {
	Ipv4,
	Ipv6,
	Ipv4v6,
	Ethernet,
	Unstructured,
}

impl PerCodec for PduSessionType {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		let index = match self {
			Self::Ipv4 => 0,
			Self::Ipv6 => 1,
			Self::Ipv4v6 => 2,
			Self::Ethernet => 3,
			Self::Unstructured => 4,
		};
		encode::encode_enumerated(data, index, 5, true)
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		match decode::decode_enumerated(data, 5, true)? {
			0 => Ok(Self::Ipv4),
			1 => Ok(Self::Ipv6),
			2 => Ok(Self::Ipv4v6),
			3 => Ok(Self::Ethernet),
			_ => Ok(Self::Unstructured),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CauseProtocol {
	TransferSyntaxError,
	AbstractSyntaxErrorReject,
	AbstractSyntaxErrorIgnoreAndNotify,
	MessageNotCompatibleWithReceiverState,
	SemanticError,
	AbstractSyntaxErrorFalselyConstructedMessage,
	Unspecified,
}

impl CauseProtocol {
	fn index(self) -> usize {
		match self {
			Self::TransferSyntaxError => 0,
			Self::AbstractSyntaxErrorReject => 1,
			Self::AbstractSyntaxErrorIgnoreAndNotify => 2,
			Self::MessageNotCompatibleWithReceiverState => 3,
			Self::SemanticError => 4,
			Self::AbstractSyntaxErrorFalselyConstructedMessage => 5,
			Self::Unspecified => 6,
		}
	}

	fn from_index(index: usize) -> Self {
		match index {
			0 => Self::TransferSyntaxError,
			1 => Self::AbstractSyntaxErrorReject,
			2 => Self::AbstractSyntaxErrorIgnoreAndNotify,
			3 => Self::MessageNotCompatibleWithReceiverState,
			4 => Self::SemanticError,
			5 => Self::AbstractSyntaxErrorFalselyConstructedMessage,
			_ => Self::Unspecified,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CauseMisc {
	ControlProcessingOverload,
	NotEnoughUserPlaneProcessingResources,
	HardwareFailure,
	OmIntervention,
	UnknownPlmnOrSnpn,
	Unspecified,
}

impl CauseMisc {
	fn index(self) -> usize {
		match self {
			Self::ControlProcessingOverload => 0,
			Self::NotEnoughUserPlaneProcessingResources => 1,
			Self::HardwareFailure => 2,
			Self::OmIntervention => 3,
			Self::UnknownPlmnOrSnpn => 4,
			Self::Unspecified => 5,
		}
	}

	fn from_index(index: usize) -> Self {
		match index {
			0 => Self::ControlProcessingOverload,
			1 => Self::NotEnoughUserPlaneProcessingResources,
			2 => Self::HardwareFailure,
			3 => Self::OmIntervention,
			4 => Self::UnknownPlmnOrSnpn,
			_ => Self::Unspecified,
		}
	}
}

/// NGAP cause; the radio-network, transport and NAS groups are carried as
/// raw enumeration indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
	RadioNetwork(u8),
	Transport(u8),
	Nas(u8),
	Protocol(CauseProtocol),
	Misc(CauseMisc),
}

const CAUSE_RADIO_NETWORK_ROOT: usize = 44;
const CAUSE_TRANSPORT_ROOT: usize = 2;
const CAUSE_NAS_ROOT: usize = 4;
const CAUSE_PROTOCOL_ROOT: usize = 7;
const CAUSE_MISC_ROOT: usize = 6;

impl PerCodec for Cause {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError> {
		match self {
			Self::RadioNetwork(value) => {
				encode::encode_choice_index(data, 0, 6, false)?;
				encode::encode_enumerated(data, *value as usize, CAUSE_RADIO_NETWORK_ROOT, true)
			}
			Self::Transport(value) => {
				encode::encode_choice_index(data, 1, 6, false)?;
				encode::encode_enumerated(data, *value as usize, CAUSE_TRANSPORT_ROOT, true)
			}
			Self::Nas(value) => {
				encode::encode_choice_index(data, 2, 6, false)?;
				encode::encode_enumerated(data, *value as usize, CAUSE_NAS_ROOT, true)
			}
			Self::Protocol(value) => {
				encode::encode_choice_index(data, 3, 6, false)?;
				encode::encode_enumerated(data, value.index(), CAUSE_PROTOCOL_ROOT, true)
			}
			Self::Misc(value) => {
				encode::encode_choice_index(data, 4, 6, false)?;
				encode::encode_enumerated(data, value.index(), CAUSE_MISC_ROOT, true)
			}
		}
	}

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError> {
		match decode::decode_choice_index(data, 6, false)? {
			0 => Ok(Self::RadioNetwork(
				decode::decode_enumerated(data, CAUSE_RADIO_NETWORK_ROOT, true)? as u8,
			)),
			1 => Ok(Self::Transport(
				decode::decode_enumerated(data, CAUSE_TRANSPORT_ROOT, true)? as u8,
			)),
			2 => Ok(Self::Nas(decode::decode_enumerated(data, CAUSE_NAS_ROOT, true)? as u8)),
			3 => Ok(Self::Protocol(CauseProtocol::from_index(
				decode::decode_enumerated(data, CAUSE_PROTOCOL_ROOT, true)?,
			))),
			4 => Ok(Self::Misc(CauseMisc::from_index(
				decode::decode_enumerated(data, CAUSE_MISC_ROOT, true)?,
			))),
			index => Err(PerCodecError::InvalidChoiceIndex { index, count: 6 }),
		}
	}
}
