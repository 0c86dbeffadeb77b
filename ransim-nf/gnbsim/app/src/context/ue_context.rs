//! Per-UE session context: subscription material, the 5G security context
//! once derived, NAS COUNT bookkeeping and what registration handed back.

use std::collections::VecDeque;
use std::net::Ipv4Addr;

use gnbsim_nas::error::{NasDecodeError, NasEncodeError};
use gnbsim_nas::parser::GmmMessage;
use gnbsim_nas::security::{
	self,
	NasDirection,
	SecurityHeaderType,
};
use gnbsim_nas::types::{
	FiveGGuti,
	GprsTimer2,
	GprsTimer3,
	MobileIdentity,
	Plmn,
	Snssai,
	Suci,
	TaiList,
};
use tracing::{debug, warn};

use crate::config::UeTemplateConfig;
use crate::nas::NasEngineError;

/// Auxiliary receive-state: the last downlink that drove an uplink. Reported
/// in procedure timeouts and protocol errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rcvd {
	#[default]
	Null,
	AuthRequest,
	SecModeCommand,
	RegAccept,
}

/// Keys derived during 5G-AKA. Kenc and Kint are the truncated 128-bit
/// algorithm keys; the anchor chain stays at 256 bits.
#[derive(Clone)]
pub struct SecurityKeys {
	pub kausf: [u8; 32],
	pub kseaf: [u8; 32],
	pub kamf: [u8; 32],
	pub kenc: [u8; 16],
	pub kint: [u8; 16],
}

impl std::fmt::Debug for SecurityKeys {
	fn fmt(
		&self,
		f: &mut std::fmt::Formatter<'_>,
	) -> std::fmt::Result {
		// Key material stays out of logs.
		f.debug_struct("SecurityKeys").finish_non_exhaustive()
	}
}

#[derive(Debug)]
pub struct UeContext {
	pub plmn: Plmn,
	pub msin: String,
	pub imeisv: String,
	pub k: [u8; 16],
	pub opc: [u8; 16],
	pub amf: [u8; 2],
	pub routing_indicator: String,
	pub protection_scheme: u8,
	pub dnn: String,
	pub snssai: Snssai,
	pub pdu_session_id: u8,
	pub serving_network: String,
	pub force_initial_nas_replay: bool,

	pub keys: Option<SecurityKeys>,
	pub ul_count: u32,
	pub dl_count: u32,

	pub imeisv_requested: bool,
	pub rinmr_requested: bool,

	pub registration_result: Option<u8>,
	pub guti: Option<FiveGGuti>,
	pub tai_list: Option<TaiList>,
	pub allowed_nssai: Option<Vec<Snssai>>,
	pub t3512: Option<GprsTimer3>,
	pub t3502: Option<GprsTimer2>,
	pub pdu_ipv4: Option<Ipv4Addr>,

	pub last_rcvd: Rcvd,
	/// Encoded NAS frames the state machine queued for the next uplink.
	pub pending_uplinks: VecDeque<Vec<u8>>,
	/// Failure raised inside a state-machine handler, collected by the
	/// engine after dispatch.
	pub procedure_error: Option<NasEngineError>,
}

impl UeContext {
	/// Clones the template for the `index`-th UE: the MSIN is incremented by
	/// `index` and the IMEISV serial by `100 * index`.
	pub fn from_template(
		template: &UeTemplateConfig,
		serving_plmn: &Plmn,
		index: u32,
	) -> Result<Self, NasEncodeError> {
		let msin = increment_digits("msin", &template.msin, index as u64)?;
		let imeisv = increment_digits("imeisv", &template.imeisv, 100 * index as u64)?;
		Ok(Self {
			plmn: template.plmn.clone(),
			msin,
			imeisv,
			k: template.k,
			opc: template.opc,
			amf: template.amf,
			routing_indicator: template.routing_indicator.clone(),
			protection_scheme: template.protection_scheme,
			dnn: template.dnn.clone(),
			snssai: template.snssai,
			pdu_session_id: template.pdu_session_id,
			serving_network: security::kdf::serving_network_name(
				&serving_plmn.mcc,
				&serving_plmn.mnc,
			),
			force_initial_nas_replay: template.force_initial_nas_replay,
			keys: None,
			ul_count: 0,
			dl_count: 0,
			imeisv_requested: false,
			rinmr_requested: false,
			registration_result: None,
			guti: None,
			tai_list: None,
			allowed_nssai: None,
			t3512: None,
			t3502: None,
			pdu_ipv4: None,
			last_rcvd: Rcvd::default(),
			pending_uplinks: VecDeque::new(),
			procedure_error: None,
		})
	}

	pub fn supi(&self) -> String {
		format!("{}{}{}", self.plmn.mcc, self.plmn.mnc, self.msin)
	}

	pub fn suci(&self) -> MobileIdentity {
		MobileIdentity::Suci(Suci {
			plmn: self.plmn.clone(),
			routing_indicator: self.routing_indicator.clone(),
			protection_scheme: self.protection_scheme,
			home_network_pki: 0,
			msin: self.msin.clone(),
		})
	}

	/// Seals an uplink NAS PDU under the current security context. The
	/// uplink COUNT moves exactly once per protected emission; before
	/// security activation the plain frame goes out untouched.
	pub fn seal_uplink(
		&mut self,
		plain: Vec<u8>,
		sht: SecurityHeaderType,
	) -> Vec<u8> {
		let Some(keys) = &self.keys else {
			return plain;
		};
		if sht == SecurityHeaderType::Plain {
			return plain;
		}
		let frame = security::protect(&plain, sht, &keys.kint, self.ul_count, NasDirection::Uplink);
		self.ul_count += 1;
		frame
	}

	/// Opens one downlink NAS frame: verifies and strips security when a
	/// nonzero security header is present, then decodes the inner message.
	/// Failed integrity discards the frame without moving any COUNT.
	pub fn open_downlink(
		&mut self,
		raw: &[u8],
	) -> Result<GmmMessage, NasEngineError> {
		if raw.len() < 3 {
			return Err(NasDecodeError::TruncatedPdu { needed: 3 - raw.len(), available: raw.len() }
				.into());
		}
		let sht = raw[1] & 0x0F;
		if sht == 0 {
			return Ok(GmmMessage::decode(raw)?);
		}
		// Some cores put a nonzero security header on an otherwise plain
		// message; if no nested frame follows, parse the remainder directly.
		if raw.len() < 8 || raw[7] != gnbsim_nas::EPD_5GMM {
			debug!(sht, "security header without a nested frame, parsing as plain");
			return Ok(GmmMessage::decode_typed(raw[2], &raw[3..])?);
		}
		let (header, inner) = security::split_secured(raw)?;
		let Some(keys) = &self.keys else {
			warn!("secured downlink before key derivation, parsing without verification");
			return Ok(GmmMessage::decode(inner)?);
		};
		let count = next_downlink_count(self.dl_count, header.sqn);
		security::verify_mac(
			&keys.kint,
			count,
			NasDirection::Downlink,
			header.sqn,
			inner,
			&header.mac,
		)
		.map_err(|source| NasEngineError::Integrity { source, state: self.last_rcvd })?;
		self.dl_count = count.wrapping_add(1);
		Ok(GmmMessage::decode(inner)?)
	}
}

/// The downlink COUNT follows the received SQN; a smaller SQN than the
/// current low byte means the 8-bit sequence wrapped and carries into the
/// overflow counter.
fn next_downlink_count(
	current: u32,
	sqn: u8,
) -> u32 {
	let mut overflow = current >> 8;
	if sqn < current as u8 {
		overflow += 1;
	}
	(overflow << 8) | u32::from(sqn)
}

fn increment_digits(
	field: &'static str,
	digits: &str,
	increment: u64,
) -> Result<String, NasEncodeError> {
	let value: u64 = digits.parse().map_err(|_| NasEncodeError::InvalidDigits {
		field,
		value: digits.to_owned(),
	})?;
	Ok(format!("{:0width$}", value + increment, width = digits.len()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn downlink_count_tracks_sqn_with_wraparound() {
		assert_eq!(next_downlink_count(0, 0), 0);
		assert_eq!(next_downlink_count(0, 1), 1);
		assert_eq!(next_downlink_count(0x05, 0x04), 0x104);
		assert_eq!(next_downlink_count(0x1FF, 0x00), 0x200);
	}

	#[test]
	fn digit_increment_preserves_width() {
		assert_eq!(increment_digits("msin", "0000000003", 2).unwrap(), "0000000005");
		assert_eq!(increment_digits("imeisv", "4370816125816151", 100).unwrap(), "4370816125816251");
	}
}
