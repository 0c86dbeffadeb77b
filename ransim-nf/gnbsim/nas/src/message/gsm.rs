//! 5GS session management messages (TS 24.501 §8.3) for the default
//! IPv4v6 session this simulator establishes.

use std::net::Ipv4Addr;

use bytes::BufMut;

use crate::EPD_5GSM;
use crate::error::NasDecodeError;
use crate::ie::{NasBuf, skip_unknown_ie};
use crate::types::Snssai;

pub const MT_PDU_SESSION_ESTABLISHMENT_REQUEST: u8 = 0xC1;
pub const MT_PDU_SESSION_ESTABLISHMENT_ACCEPT: u8 = 0xC2;
pub const MT_PDU_SESSION_ESTABLISHMENT_REJECT: u8 = 0xC3;

pub const PDU_SESSION_TYPE_IPV4: u8 = 0x01;
pub const PDU_SESSION_TYPE_IPV4V6: u8 = 0x03;

const IEI_PDU_ADDRESS: u8 = 0x29;
const IEI_GSM_CAUSE: u8 = 0x59;
const IEI_RQ_TIMER: u8 = 0x56;
const IEI_SNSSAI: u8 = 0x22;
const IEI_DNN: u8 = 0x25;
const IEI_QOS_FLOW_DESCRIPTIONS: u8 = 0x79;
const IEI_EXTENDED_PCO: u8 = 0x7B;
const IEI_EAP: u8 = 0x78;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GsmMessage {
	EstablishmentRequest(NasPduSessionEstablishmentRequest),
	EstablishmentAccept(NasPduSessionEstablishmentAccept),
}

impl GsmMessage {
	pub fn decode(buf: &[u8]) -> Result<Self, NasDecodeError> {
		let mut cursor = NasBuf::new(buf);
		let epd = cursor.take_u8()?;
		if epd != EPD_5GSM {
			return Err(NasDecodeError::UnexpectedProtocolDiscriminator(epd));
		}
		let pdu_session_id = cursor.take_u8()?;
		let pti = cursor.take_u8()?;
		let message_type = cursor.take_u8()?;
		let body = cursor.take(cursor.remaining())?;
		match message_type {
			MT_PDU_SESSION_ESTABLISHMENT_REQUEST => Ok(Self::EstablishmentRequest(
				NasPduSessionEstablishmentRequest::decode_body(pdu_session_id, pti, body)?,
			)),
			MT_PDU_SESSION_ESTABLISHMENT_ACCEPT => Ok(Self::EstablishmentAccept(
				NasPduSessionEstablishmentAccept::decode_body(pdu_session_id, pti, body)?,
			)),
			other => Err(NasDecodeError::UnknownMessageType(other)),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NasPduSessionEstablishmentRequest {
	pub pdu_session_id: u8,
	pub pti: u8,
	/// Integrity protection maximum data rate, uplink then downlink
	/// (0xFF = full rate).
	pub integrity_max_rate: [u8; 2],
	pub pdu_session_type: Option<u8>,
}

impl NasPduSessionEstablishmentRequest {
	pub fn encode(&self) -> Vec<u8> {
		let mut out = Vec::new();
		out.put_u8(EPD_5GSM);
		out.put_u8(self.pdu_session_id);
		out.put_u8(self.pti);
		out.put_u8(MT_PDU_SESSION_ESTABLISHMENT_REQUEST);
		out.extend_from_slice(&self.integrity_max_rate);
		if let Some(session_type) = self.pdu_session_type {
			out.put_u8(0x90 | session_type & 0x07);
		}
		out
	}

	pub fn decode_body(
		pdu_session_id: u8,
		pti: u8,
		body: &[u8],
	) -> Result<Self, NasDecodeError> {
		let mut buf = NasBuf::new(body);
		let rate = buf.take(2)?;
		let mut message = Self {
			pdu_session_id,
			pti,
			integrity_max_rate: rate.try_into().expect("2 octets"),
			pdu_session_type: None,
		};
		while !buf.is_empty() {
			let iei = buf.take_u8()?;
			match iei {
				_ if iei & 0xF0 == 0x90 => message.pdu_session_type = Some(iei & 0x07),
				_ => skip_unknown_ie(iei, &mut buf)?,
			}
		}
		Ok(message)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NasPduSessionEstablishmentAccept {
	pub pdu_session_id: u8,
	pub pti: u8,
	pub selected_pdu_session_type: u8,
	pub selected_ssc_mode: u8,
	pub qos_rules: Vec<u8>,
	pub session_ambr: Vec<u8>,
	pub pdu_address: Option<Ipv4Addr>,
	pub snssai: Option<Snssai>,
	pub dnn: Option<String>,
}

impl NasPduSessionEstablishmentAccept {
	pub fn encode(&self) -> Vec<u8> {
		let mut out = Vec::new();
		out.put_u8(EPD_5GSM);
		out.put_u8(self.pdu_session_id);
		out.put_u8(self.pti);
		out.put_u8(MT_PDU_SESSION_ESTABLISHMENT_ACCEPT);
		out.put_u8(self.selected_ssc_mode << 4 | self.selected_pdu_session_type & 0x07);
		out.put_u16(self.qos_rules.len() as u16);
		out.extend_from_slice(&self.qos_rules);
		out.put_u8(self.session_ambr.len() as u8);
		out.extend_from_slice(&self.session_ambr);
		if let Some(address) = self.pdu_address {
			out.put_u8(IEI_PDU_ADDRESS);
			out.put_u8(5);
			out.put_u8(PDU_SESSION_TYPE_IPV4);
			out.extend_from_slice(&address.octets());
		}
		if let Some(snssai) = &self.snssai {
			let value = snssai.encode_value();
			out.put_u8(IEI_SNSSAI);
			out.put_u8(value.len() as u8);
			out.extend_from_slice(&value);
		}
		if let Some(dnn) = &self.dnn {
			let mut value = Vec::new();
			for label in dnn.split('.') {
				value.put_u8(label.len() as u8);
				value.extend_from_slice(label.as_bytes());
			}
			out.put_u8(IEI_DNN);
			out.put_u8(value.len() as u8);
			out.extend_from_slice(&value);
		}
		out
	}

	pub fn decode_body(
		pdu_session_id: u8,
		pti: u8,
		body: &[u8],
	) -> Result<Self, NasDecodeError> {
		let mut buf = NasBuf::new(body);
		let selected = buf.take_u8()?;
		let qos_rules = buf.take_lv_e()?.to_vec();
		let session_ambr = buf.take_lv()?.to_vec();
		let mut message = Self {
			pdu_session_id,
			pti,
			selected_pdu_session_type: selected & 0x07,
			selected_ssc_mode: selected >> 4 & 0x07,
			qos_rules,
			session_ambr,
			pdu_address: None,
			snssai: None,
			dnn: None,
		};
		while !buf.is_empty() {
			let iei = buf.take_u8()?;
			match iei {
				IEI_PDU_ADDRESS => {
					let value = buf.take_lv()?;
					message.pdu_address = decode_pdu_address(value);
				}
				IEI_GSM_CAUSE => {
					buf.take(1)?;
				}
				IEI_RQ_TIMER => {
					buf.take(1)?;
				}
				IEI_SNSSAI => message.snssai = Some(Snssai::decode_value(buf.take_lv()?)?),
				IEI_DNN => {
					let mut labels = Vec::new();
					let mut items = NasBuf::new(buf.take_lv()?);
					while !items.is_empty() {
						labels.push(String::from_utf8_lossy(items.take_lv()?).into_owned());
					}
					message.dnn = Some(labels.join("."));
				}
				IEI_QOS_FLOW_DESCRIPTIONS | IEI_EXTENDED_PCO | IEI_EAP => {
					buf.take_lv_e()?;
				}
				_ => skip_unknown_ie(iei, &mut buf)?,
			}
		}
		Ok(message)
	}
}

/// IPv4 is read directly; for IPv4v6 the address follows the 8-octet
/// interface identifier.
fn decode_pdu_address(value: &[u8]) -> Option<Ipv4Addr> {
	let session_type = *value.first()? & 0x07;
	let addr = match session_type {
		PDU_SESSION_TYPE_IPV4 => value.get(1..5)?,
		PDU_SESSION_TYPE_IPV4V6 => value.get(9..13)?,
		_ => return None,
	};
	Some(Ipv4Addr::new(addr[0], addr[1], addr[2], addr[3]))
}
