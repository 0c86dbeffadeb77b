//! 5GS mobility management messages (TS 24.501 §8.2) and their IEs.

use bytes::BufMut;

use crate::EPD_5GMM;
use crate::error::{NasDecodeError, NasEncodeError};
use crate::ie::{NasBuf, skip_unknown_ie};
use crate::types::{
	FiveGGuti,
	GprsTimer2,
	GprsTimer3,
	MobileIdentity,
	Snssai,
	TaiList,
	UeSecurityCapability,
};

pub const MT_REGISTRATION_REQUEST: u8 = 0x41;
pub const MT_REGISTRATION_ACCEPT: u8 = 0x42;
pub const MT_REGISTRATION_COMPLETE: u8 = 0x43;
pub const MT_REGISTRATION_REJECT: u8 = 0x44;
pub const MT_AUTHENTICATION_REQUEST: u8 = 0x56;
pub const MT_AUTHENTICATION_RESPONSE: u8 = 0x57;
pub const MT_AUTHENTICATION_REJECT: u8 = 0x58;
pub const MT_SECURITY_MODE_COMMAND: u8 = 0x5D;
pub const MT_SECURITY_MODE_COMPLETE: u8 = 0x5E;
pub const MT_GMM_STATUS: u8 = 0x64;
pub const MT_CONFIGURATION_UPDATE_COMMAND: u8 = 0x54;
pub const MT_UL_NAS_TRANSPORT: u8 = 0x67;
pub const MT_DL_NAS_TRANSPORT: u8 = 0x68;

const IEI_5GMM_CAPABILITY: u8 = 0x10;
const IEI_UE_SECURITY_CAPABILITY: u8 = 0x2E;
const IEI_AUTH_PARAM_RAND: u8 = 0x21;
const IEI_AUTH_PARAM_AUTN: u8 = 0x20;
const IEI_AUTH_RESPONSE_PARAMETER: u8 = 0x2D;
const IEI_EAP: u8 = 0x78;
const IEI_SELECTED_EPS_ALGORITHMS: u8 = 0x57;
const IEI_ADDITIONAL_SECURITY_INFORMATION: u8 = 0x36;
const IEI_MOBILE_IDENTITY: u8 = 0x77;
const IEI_NAS_MESSAGE_CONTAINER: u8 = 0x71;
const IEI_TAI_LIST: u8 = 0x54;
const IEI_ALLOWED_NSSAI: u8 = 0x15;
const IEI_T3512: u8 = 0x5E;
const IEI_T3502: u8 = 0x16;
const IEI_PDU_SESSION_ID: u8 = 0x12;
const IEI_5GMM_CAUSE: u8 = 0x58;
const IEI_BACKOFF_TIMER: u8 = 0x37;
const IEI_SNSSAI: u8 = 0x22;
const IEI_DNN: u8 = 0x25;

/// Initial registration with the follow-on request bit set.
pub const REGISTRATION_TYPE_INITIAL_FOLLOW_ON: u8 = 0x09;
/// "No key available" ngKSI.
pub const NGKSI_NO_KEY: u8 = 0x07;
/// Payload container type for N1 SM information.
pub const PAYLOAD_CONTAINER_N1_SM: u8 = 0x01;
/// Request type "initial request" as carried in its half-octet IE.
pub const REQUEST_TYPE_INITIAL: u8 = 0x01;

fn plain_header(
	out: &mut Vec<u8>,
	message_type: u8,
) {
	out.put_u8(EPD_5GMM);
	out.put_u8(0x00);
	out.put_u8(message_type);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NasRegistrationRequest {
	pub registration_type: u8,
	pub ngksi: u8,
	pub mobile_identity: MobileIdentity,
	pub capability_5gmm: Option<u8>,
	pub security_capability: Option<UeSecurityCapability>,
}

impl NasRegistrationRequest {
	pub fn encode(&self) -> Result<Vec<u8>, NasEncodeError> {
		let mut out = Vec::new();
		plain_header(&mut out, MT_REGISTRATION_REQUEST);
		out.put_u8(self.ngksi << 4 | self.registration_type & 0x0F);
		let identity = self.mobile_identity.encode_value()?;
		out.put_u16(identity.len() as u16);
		out.extend_from_slice(&identity);
		if let Some(capability) = self.capability_5gmm {
			out.put_u8(IEI_5GMM_CAPABILITY);
			out.put_u8(1);
			out.put_u8(capability);
		}
		if let Some(capability) = &self.security_capability {
			let value = capability.encode_value();
			out.put_u8(IEI_UE_SECURITY_CAPABILITY);
			out.put_u8(value.len() as u8);
			out.extend_from_slice(&value);
		}
		Ok(out)
	}

	pub fn decode_body(body: &[u8]) -> Result<Self, NasDecodeError> {
		let mut buf = NasBuf::new(body);
		let head = buf.take_u8()?;
		let identity = MobileIdentity::decode_value(buf.take_lv_e()?)?;
		let mut message = Self {
			registration_type: head & 0x0F,
			ngksi: head >> 4,
			mobile_identity: identity,
			capability_5gmm: None,
			security_capability: None,
		};
		while !buf.is_empty() {
			let iei = buf.take_u8()?;
			match iei {
				IEI_5GMM_CAPABILITY => {
					let value = buf.take_lv()?;
					message.capability_5gmm = value.first().copied();
				}
				IEI_UE_SECURITY_CAPABILITY => {
					message.security_capability =
						Some(UeSecurityCapability::decode_value(buf.take_lv()?)?);
				}
				IEI_NAS_MESSAGE_CONTAINER => {
					buf.take_lv_e()?;
				}
				_ => skip_unknown_ie(iei, &mut buf)?,
			}
		}
		Ok(message)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NasRegistrationAccept {
	pub result: u8,
	pub guti: Option<FiveGGuti>,
	pub tai_list: Option<TaiList>,
	pub allowed_nssai: Option<Vec<Snssai>>,
	pub t3512: Option<GprsTimer3>,
	pub t3502: Option<GprsTimer2>,
}

impl NasRegistrationAccept {
	pub fn encode(&self) -> Result<Vec<u8>, NasEncodeError> {
		let mut out = Vec::new();
		plain_header(&mut out, MT_REGISTRATION_ACCEPT);
		out.put_u8(1);
		out.put_u8(self.result);
		if let Some(guti) = &self.guti {
			let value = MobileIdentity::Guti(guti.clone()).encode_value()?;
			out.put_u8(IEI_MOBILE_IDENTITY);
			out.put_u16(value.len() as u16);
			out.extend_from_slice(&value);
		}
		if let Some(tai_list) = &self.tai_list {
			let value = tai_list.encode_value()?;
			out.put_u8(IEI_TAI_LIST);
			out.put_u8(value.len() as u8);
			out.extend_from_slice(&value);
		}
		if let Some(nssais) = &self.allowed_nssai {
			let mut value = Vec::new();
			for snssai in nssais {
				let item = snssai.encode_value();
				value.put_u8(item.len() as u8);
				value.extend_from_slice(&item);
			}
			out.put_u8(IEI_ALLOWED_NSSAI);
			out.put_u8(value.len() as u8);
			out.extend_from_slice(&value);
		}
		if let Some(t3512) = self.t3512 {
			out.extend_from_slice(&[IEI_T3512, 1, t3512.0]);
		}
		if let Some(t3502) = self.t3502 {
			out.extend_from_slice(&[IEI_T3502, 1, t3502.0]);
		}
		Ok(out)
	}

	pub fn decode_body(body: &[u8]) -> Result<Self, NasDecodeError> {
		let mut buf = NasBuf::new(body);
		let result_value = buf.take_lv()?;
		let mut message = Self {
			result: result_value.first().copied().unwrap_or_default(),
			..Self::default()
		};
		while !buf.is_empty() {
			let iei = buf.take_u8()?;
			match iei {
				IEI_MOBILE_IDENTITY => {
					if let MobileIdentity::Guti(guti) =
						MobileIdentity::decode_value(buf.take_lv_e()?)?
					{
						message.guti = Some(guti);
					}
				}
				IEI_TAI_LIST => {
					message.tai_list = Some(TaiList::decode_value(buf.take_lv()?)?);
				}
				IEI_ALLOWED_NSSAI => {
					let mut nssais = Vec::new();
					let mut items = NasBuf::new(buf.take_lv()?);
					while !items.is_empty() {
						nssais.push(Snssai::decode_value(items.take_lv()?)?);
					}
					message.allowed_nssai = Some(nssais);
				}
				IEI_T3512 => {
					let value = buf.take_lv()?;
					message.t3512 = value.first().copied().map(GprsTimer3);
				}
				IEI_T3502 => {
					let value = buf.take_lv()?;
					message.t3502 = value.first().copied().map(GprsTimer2);
				}
				_ => skip_unknown_ie(iei, &mut buf)?,
			}
		}
		Ok(message)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NasRegistrationComplete {}

impl NasRegistrationComplete {
	pub fn encode(&self) -> Vec<u8> {
		let mut out = Vec::new();
		plain_header(&mut out, MT_REGISTRATION_COMPLETE);
		out
	}

	pub fn decode_body(_body: &[u8]) -> Result<Self, NasDecodeError> {
		Ok(Self {})
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NasRegistrationReject {
	pub cause: u8,
}

impl NasRegistrationReject {
	pub fn encode(&self) -> Vec<u8> {
		let mut out = Vec::new();
		plain_header(&mut out, MT_REGISTRATION_REJECT);
		out.put_u8(self.cause);
		out
	}

	pub fn decode_body(body: &[u8]) -> Result<Self, NasDecodeError> {
		let mut buf = NasBuf::new(body);
		Ok(Self { cause: buf.take_u8()? })
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NasAuthenticationRequest {
	pub ngksi: u8,
	pub abba: Vec<u8>,
	pub rand: Option<[u8; 16]>,
	pub autn: Option<Vec<u8>>,
}

impl NasAuthenticationRequest {
	pub fn encode(&self) -> Vec<u8> {
		let mut out = Vec::new();
		plain_header(&mut out, MT_AUTHENTICATION_REQUEST);
		out.put_u8(self.ngksi & 0x0F);
		out.put_u8(self.abba.len() as u8);
		out.extend_from_slice(&self.abba);
		if let Some(rand) = &self.rand {
			out.put_u8(IEI_AUTH_PARAM_RAND);
			out.extend_from_slice(rand);
		}
		if let Some(autn) = &self.autn {
			out.put_u8(IEI_AUTH_PARAM_AUTN);
			out.put_u8(autn.len() as u8);
			out.extend_from_slice(autn);
		}
		out
	}

	pub fn decode_body(body: &[u8]) -> Result<Self, NasDecodeError> {
		let mut buf = NasBuf::new(body);
		let ngksi = buf.take_u8()? & 0x0F;
		let abba = buf.take_lv()?.to_vec();
		let mut message = Self { ngksi, abba, rand: None, autn: None };
		while !buf.is_empty() {
			let iei = buf.take_u8()?;
			match iei {
				IEI_AUTH_PARAM_RAND => {
					message.rand = Some(buf.take(16)?.try_into().expect("16 octets"));
				}
				IEI_AUTH_PARAM_AUTN => message.autn = Some(buf.take_lv()?.to_vec()),
				IEI_EAP => {
					buf.take_lv_e()?;
				}
				_ => skip_unknown_ie(iei, &mut buf)?,
			}
		}
		Ok(message)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NasAuthenticationResponse {
	pub res_star: Option<[u8; 16]>,
}

impl NasAuthenticationResponse {
	pub fn encode(&self) -> Vec<u8> {
		let mut out = Vec::new();
		plain_header(&mut out, MT_AUTHENTICATION_RESPONSE);
		if let Some(res_star) = &self.res_star {
			out.put_u8(IEI_AUTH_RESPONSE_PARAMETER);
			out.put_u8(16);
			out.extend_from_slice(res_star);
		}
		out
	}

	pub fn decode_body(body: &[u8]) -> Result<Self, NasDecodeError> {
		let mut buf = NasBuf::new(body);
		let mut message = Self { res_star: None };
		while !buf.is_empty() {
			let iei = buf.take_u8()?;
			match iei {
				IEI_AUTH_RESPONSE_PARAMETER => {
					let value = buf.take_lv()?;
					if value.len() != 16 {
						return Err(NasDecodeError::MalformedIe {
							iei,
							reason: "RES* must be sixteen octets",
						});
					}
					message.res_star = Some(value.try_into().expect("16 octets"));
				}
				IEI_EAP => {
					buf.take_lv_e()?;
				}
				_ => skip_unknown_ie(iei, &mut buf)?,
			}
		}
		Ok(message)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NasAuthenticationReject {}

impl NasAuthenticationReject {
	pub fn encode(&self) -> Vec<u8> {
		let mut out = Vec::new();
		plain_header(&mut out, MT_AUTHENTICATION_REJECT);
		out
	}

	pub fn decode_body(_body: &[u8]) -> Result<Self, NasDecodeError> {
		Ok(Self {})
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NasSecurityModeCommand {
	/// Selected NAS algorithms: ciphering in the high nibble, integrity low.
	pub algorithms: u8,
	pub ngksi: u8,
	pub replayed_capability: UeSecurityCapability,
	pub imeisv_requested: bool,
	pub additional_security: Option<u8>,
}

impl NasSecurityModeCommand {
	pub fn rinmr_requested(&self) -> bool {
		self.additional_security.is_some_and(|octet| octet & 0x02 != 0)
	}

	pub fn horizontal_derivation(&self) -> bool {
		self.additional_security.is_some_and(|octet| octet & 0x01 != 0)
	}

	pub fn encode(&self) -> Vec<u8> {
		let mut out = Vec::new();
		plain_header(&mut out, MT_SECURITY_MODE_COMMAND);
		out.put_u8(self.algorithms);
		out.put_u8(self.ngksi & 0x0F);
		let capability = self.replayed_capability.encode_value();
		out.put_u8(capability.len() as u8);
		out.extend_from_slice(&capability);
		if self.imeisv_requested {
			out.put_u8(0xE1);
		}
		if let Some(additional) = self.additional_security {
			out.extend_from_slice(&[IEI_ADDITIONAL_SECURITY_INFORMATION, 1, additional]);
		}
		out
	}

	pub fn decode_body(body: &[u8]) -> Result<Self, NasDecodeError> {
		let mut buf = NasBuf::new(body);
		let algorithms = buf.take_u8()?;
		let ngksi = buf.take_u8()? & 0x0F;
		let replayed_capability = UeSecurityCapability::decode_value(buf.take_lv()?)?;
		let mut message = Self {
			algorithms,
			ngksi,
			replayed_capability,
			imeisv_requested: false,
			additional_security: None,
		};
		while !buf.is_empty() {
			let iei = buf.take_u8()?;
			match iei {
				_ if iei & 0xF0 == 0xE0 => message.imeisv_requested = iei & 0x07 == 1,
				IEI_ADDITIONAL_SECURITY_INFORMATION => {
					let value = buf.take_lv()?;
					message.additional_security = value.first().copied();
				}
				IEI_SELECTED_EPS_ALGORITHMS => {
					buf.take(1)?;
				}
				IEI_EAP => {
					buf.take_lv_e()?;
				}
				_ => skip_unknown_ie(iei, &mut buf)?,
			}
		}
		Ok(message)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NasSecurityModeComplete {
	pub imeisv: Option<String>,
	pub nas_container: Option<Vec<u8>>,
}

impl NasSecurityModeComplete {
	pub fn encode(&self) -> Result<Vec<u8>, NasEncodeError> {
		let mut out = Vec::new();
		plain_header(&mut out, MT_SECURITY_MODE_COMPLETE);
		if let Some(imeisv) = &self.imeisv {
			let value = MobileIdentity::Imeisv(imeisv.clone()).encode_value()?;
			out.put_u8(IEI_MOBILE_IDENTITY);
			out.put_u16(value.len() as u16);
			out.extend_from_slice(&value);
		}
		if let Some(container) = &self.nas_container {
			out.put_u8(IEI_NAS_MESSAGE_CONTAINER);
			out.put_u16(container.len() as u16);
			out.extend_from_slice(container);
		}
		Ok(out)
	}

	pub fn decode_body(body: &[u8]) -> Result<Self, NasDecodeError> {
		let mut buf = NasBuf::new(body);
		let mut message = Self::default();
		while !buf.is_empty() {
			let iei = buf.take_u8()?;
			match iei {
				IEI_MOBILE_IDENTITY => {
					if let MobileIdentity::Imeisv(digits) =
						MobileIdentity::decode_value(buf.take_lv_e()?)?
					{
						message.imeisv = Some(digits);
					}
				}
				IEI_NAS_MESSAGE_CONTAINER => {
					message.nas_container = Some(buf.take_lv_e()?.to_vec());
				}
				_ => skip_unknown_ie(iei, &mut buf)?,
			}
		}
		Ok(message)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NasGmmStatus {
	pub cause: u8,
}

impl NasGmmStatus {
	pub fn encode(&self) -> Vec<u8> {
		let mut out = Vec::new();
		plain_header(&mut out, MT_GMM_STATUS);
		out.put_u8(self.cause);
		out
	}

	pub fn decode_body(body: &[u8]) -> Result<Self, NasDecodeError> {
		let mut buf = NasBuf::new(body);
		Ok(Self { cause: buf.take_u8()? })
	}
}

/// Kept undissected: the simulator only observes that the window fired.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NasConfigurationUpdateCommand {
	pub body: Vec<u8>,
}

impl NasConfigurationUpdateCommand {
	pub fn encode(&self) -> Vec<u8> {
		let mut out = Vec::new();
		plain_header(&mut out, MT_CONFIGURATION_UPDATE_COMMAND);
		out.extend_from_slice(&self.body);
		out
	}

	pub fn decode_body(body: &[u8]) -> Result<Self, NasDecodeError> {
		Ok(Self { body: body.to_vec() })
	}
}

fn encode_dnn_value(dnn: &str) -> Vec<u8> {
	let mut out = Vec::new();
	for label in dnn.split('.') {
		out.put_u8(label.len() as u8);
		out.extend_from_slice(label.as_bytes());
	}
	out
}

fn decode_dnn_value(value: &[u8]) -> Result<String, NasDecodeError> {
	let mut buf = NasBuf::new(value);
	let mut labels = Vec::new();
	while !buf.is_empty() {
		let label = buf.take_lv()?;
		labels.push(String::from_utf8_lossy(label).into_owned());
	}
	Ok(labels.join("."))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NasUlNasTransport {
	pub payload_container_type: u8,
	pub payload: Vec<u8>,
	pub pdu_session_id: Option<u8>,
	pub request_type: Option<u8>,
	pub snssai: Option<Snssai>,
	pub dnn: Option<String>,
}

impl NasUlNasTransport {
	pub fn encode(&self) -> Vec<u8> {
		let mut out = Vec::new();
		plain_header(&mut out, MT_UL_NAS_TRANSPORT);
		out.put_u8(self.payload_container_type & 0x0F);
		out.put_u16(self.payload.len() as u16);
		out.extend_from_slice(&self.payload);
		if let Some(psi) = self.pdu_session_id {
			out.extend_from_slice(&[IEI_PDU_SESSION_ID, psi]);
		}
		if let Some(request_type) = self.request_type {
			out.put_u8(0x80 | request_type & 0x07);
		}
		if let Some(snssai) = &self.snssai {
			let value = snssai.encode_value();
			out.put_u8(IEI_SNSSAI);
			out.put_u8(value.len() as u8);
			out.extend_from_slice(&value);
		}
		if let Some(dnn) = &self.dnn {
			let value = encode_dnn_value(dnn);
			out.put_u8(IEI_DNN);
			out.put_u8(value.len() as u8);
			out.extend_from_slice(&value);
		}
		out
	}

	pub fn decode_body(body: &[u8]) -> Result<Self, NasDecodeError> {
		let mut buf = NasBuf::new(body);
		let payload_container_type = buf.take_u8()? & 0x0F;
		let payload = buf.take_lv_e()?.to_vec();
		let mut message = Self {
			payload_container_type,
			payload,
			pdu_session_id: None,
			request_type: None,
			snssai: None,
			dnn: None,
		};
		while !buf.is_empty() {
			let iei = buf.take_u8()?;
			match iei {
				IEI_PDU_SESSION_ID => message.pdu_session_id = Some(buf.take_u8()?),
				_ if iei & 0xF0 == 0x80 => message.request_type = Some(iei & 0x07),
				IEI_SNSSAI => message.snssai = Some(Snssai::decode_value(buf.take_lv()?)?),
				IEI_DNN => message.dnn = Some(decode_dnn_value(buf.take_lv()?)?),
				_ => skip_unknown_ie(iei, &mut buf)?,
			}
		}
		Ok(message)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NasDlNasTransport {
	pub payload_container_type: u8,
	pub payload: Vec<u8>,
	pub pdu_session_id: Option<u8>,
	pub cause: Option<u8>,
}

impl NasDlNasTransport {
	pub fn encode(&self) -> Vec<u8> {
		let mut out = Vec::new();
		plain_header(&mut out, MT_DL_NAS_TRANSPORT);
		out.put_u8(self.payload_container_type & 0x0F);
		out.put_u16(self.payload.len() as u16);
		out.extend_from_slice(&self.payload);
		if let Some(psi) = self.pdu_session_id {
			out.extend_from_slice(&[IEI_PDU_SESSION_ID, psi]);
		}
		if let Some(cause) = self.cause {
			out.extend_from_slice(&[IEI_5GMM_CAUSE, cause]);
		}
		out
	}

	pub fn decode_body(body: &[u8]) -> Result<Self, NasDecodeError> {
		let mut buf = NasBuf::new(body);
		let payload_container_type = buf.take_u8()? & 0x0F;
		let payload = buf.take_lv_e()?.to_vec();
		let mut message = Self {
			payload_container_type,
			payload,
			pdu_session_id: None,
			cause: None,
		};
		while !buf.is_empty() {
			let iei = buf.take_u8()?;
			match iei {
				IEI_PDU_SESSION_ID => message.pdu_session_id = Some(buf.take_u8()?),
				IEI_5GMM_CAUSE => message.cause = Some(buf.take_u8()?),
				IEI_BACKOFF_TIMER => {
					buf.take_lv()?;
				}
				_ => skip_unknown_ie(iei, &mut buf)?,
			}
		}
		Ok(message)
	}
}
