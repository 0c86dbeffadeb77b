//! Common 5GS types: PLMN and BCD packing, slice and tracking-area
//! identifiers, mobile identities and GPRS timers.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NasDecodeError, NasEncodeError};
use crate::ie::NasBuf;

pub(crate) fn digits_of(
	field: &'static str,
	value: &str,
) -> Result<Vec<u8>, NasEncodeError> {
	value
		.chars()
		.map(|c| {
			c.to_digit(10)
				.map(|d| d as u8)
				.ok_or_else(|| NasEncodeError::InvalidDigits {
					field,
					value: value.to_owned(),
				})
		})
		.collect()
}

/// Packs decimal digits two per octet, low nibble first, with 0xF filling an
/// odd tail.
pub fn bcd_pack(digits: &[u8]) -> Vec<u8> {
	digits
		.chunks(2)
		.map(|pair| pair[0] | pair.get(1).copied().unwrap_or(0x0F) << 4)
		.collect()
}

/// Unpacks nibble-swapped BCD, dropping 0xF fillers.
pub fn bcd_unpack(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len() * 2);
	for octet in bytes {
		for nibble in [octet & 0x0F, octet >> 4] {
			if nibble != 0x0F {
				out.push(char::from(b'0' + nibble));
			}
		}
	}
	out
}

/// PLMN identity as configured: MCC of three digits, MNC of two or three.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Plmn {
	pub mcc: String,
	pub mnc: String,
}

impl Plmn {
	/// 3GPP nibble-swapped BCD packing with an 0xF filler for 2-digit MNCs.
	pub fn pack(&self) -> Result<[u8; 3], NasEncodeError> {
		let mcc = digits_of("mcc", &self.mcc)?;
		let mnc = digits_of("mnc", &self.mnc)?;
		if mcc.len() != 3 {
			return Err(NasEncodeError::InvalidDigitCount {
				field: "mcc",
				expected: 3,
				actual: mcc.len(),
			});
		}
		if mnc.len() != 2 && mnc.len() != 3 {
			return Err(NasEncodeError::InvalidDigitCount {
				field: "mnc",
				expected: 2,
				actual: mnc.len(),
			});
		}
		let mnc3 = if mnc.len() == 3 { mnc[2] } else { 0x0F };
		Ok([mcc[1] << 4 | mcc[0], mnc3 << 4 | mcc[2], mnc[1] << 4 | mnc[0]])
	}

	pub fn unpack(bytes: [u8; 3]) -> Self {
		let digit = |n: u8| char::from(b'0' + n);
		let mcc: String = [bytes[0] & 0x0F, bytes[0] >> 4, bytes[1] & 0x0F]
			.into_iter()
			.map(digit)
			.collect();
		let mut mnc: String = [bytes[2] & 0x0F, bytes[2] >> 4].into_iter().map(digit).collect();
		if bytes[1] >> 4 != 0x0F {
			mnc.push(digit(bytes[1] >> 4));
		}
		Self { mcc, mnc }
	}
}

impl fmt::Display for Plmn {
	fn fmt(
		&self,
		f: &mut fmt::Formatter<'_>,
	) -> fmt::Result {
		write!(f, "{}-{}", self.mcc, self.mnc)
	}
}

/// S-NSSAI: mandatory SST plus an optional 24-bit SD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snssai {
	pub sst: u8,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sd: Option<u32>,
}

impl Snssai {
	pub fn encode_value(&self) -> Vec<u8> {
		match self.sd {
			None => vec![self.sst],
			Some(sd) => {
				let sd = sd.to_be_bytes();
				vec![self.sst, sd[1], sd[2], sd[3]]
			}
		}
	}

	/// Accepts the value lengths of TS 24.501 §9.11.2.8; mapped S-NSSAI
	/// fields are ignored.
	pub fn decode_value(value: &[u8]) -> Result<Self, NasDecodeError> {
		match value.len() {
			1 | 2 => Ok(Self { sst: value[0], sd: None }),
			4 | 5 | 7 | 8 => Ok(Self {
				sst: value[0],
				sd: Some(u32::from_be_bytes([0, value[1], value[2], value[3]])),
			}),
			_ => Err(NasDecodeError::MalformedIe {
				iei: 0x22,
				reason: "S-NSSAI value length",
			}),
		}
	}
}

/// Tracking area: PLMN plus a 24-bit TAC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tai {
	pub plmn: Plmn,
	pub tac: u32,
}

/// 5GS tracking area identity list (TS 24.501 §9.11.3.9), partial list
/// types 00, 01 and 10.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaiList(pub Vec<Tai>);

impl TaiList {
	pub fn decode_value(value: &[u8]) -> Result<Self, NasDecodeError> {
		let mut buf = NasBuf::new(value);
		let mut tais = Vec::new();
		while !buf.is_empty() {
			let head = buf.take_u8()?;
			let list_type = (head >> 5) & 0x03;
			let count = (head & 0x1F) as usize + 1;
			match list_type {
				0 => {
					let plmn = Plmn::unpack(buf.take(3)?.try_into().expect("3 octets"));
					for _ in 0..count {
						let tac = take_tac(&mut buf)?;
						tais.push(Tai { plmn: plmn.clone(), tac });
					}
				}
				1 => {
					let plmn = Plmn::unpack(buf.take(3)?.try_into().expect("3 octets"));
					let first = take_tac(&mut buf)?;
					for offset in 0..count as u32 {
						tais.push(Tai { plmn: plmn.clone(), tac: first + offset });
					}
				}
				2 => {
					for _ in 0..count {
						let plmn = Plmn::unpack(buf.take(3)?.try_into().expect("3 octets"));
						let tac = take_tac(&mut buf)?;
						tais.push(Tai { plmn, tac });
					}
				}
				_ => {
					return Err(NasDecodeError::MalformedIe {
						iei: 0x54,
						reason: "reserved TAI list type",
					});
				}
			}
		}
		Ok(Self(tais))
	}

	/// Emits a type-00 partial list per PLMN, the shape cores commonly send.
	pub fn encode_value(&self) -> Result<Vec<u8>, NasEncodeError> {
		let mut out = Vec::new();
		let mut index = 0;
		while index < self.0.len() {
			let plmn = &self.0[index].plmn;
			let group_end = self.0[index..]
				.iter()
				.position(|t| &t.plmn != plmn)
				.map_or(self.0.len(), |p| index + p);
			let group = &self.0[index..group_end];
			out.push((group.len() - 1) as u8);
			out.extend_from_slice(&plmn.pack()?);
			for tai in group {
				out.extend_from_slice(&tai.tac.to_be_bytes()[1..4]);
			}
			index = group_end;
		}
		Ok(out)
	}
}

fn take_tac(buf: &mut NasBuf<'_>) -> Result<u32, NasDecodeError> {
	let bytes = buf.take(3)?;
	Ok(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
}

/// 5G-GUTI (TS 23.003 §2.10.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiveGGuti {
	pub plmn: Plmn,
	pub amf_region_id: u8,
	pub amf_set_id: u16,
	pub amf_pointer: u8,
	pub tmsi: u32,
}

impl fmt::Display for FiveGGuti {
	fn fmt(
		&self,
		f: &mut fmt::Formatter<'_>,
	) -> fmt::Result {
		write!(
			f,
			"{}-{:02x}-{:03x}-{:02x}-{:08x}",
			self.plmn, self.amf_region_id, self.amf_set_id, self.amf_pointer, self.tmsi
		)
	}
}

/// SUCI with the null protection scheme: the scheme output is the BCD-packed
/// MSIN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suci {
	pub plmn: Plmn,
	pub routing_indicator: String,
	pub protection_scheme: u8,
	pub home_network_pki: u8,
	pub msin: String,
}

/// 5GS mobile identity (TS 24.501 §9.11.3.4), the identity types this
/// simulator produces or observes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MobileIdentity {
	NoIdentity,
	Suci(Suci),
	Guti(FiveGGuti),
	Imeisv(String),
}

const IDENTITY_SUCI: u8 = 1;
const IDENTITY_GUTI: u8 = 2;
const IDENTITY_IMEISV: u8 = 5;

impl MobileIdentity {
	pub fn encode_value(&self) -> Result<Vec<u8>, NasEncodeError> {
		match self {
			Self::NoIdentity => Ok(vec![0x00]),
			Self::Suci(suci) => {
				let mut out = Vec::with_capacity(13);
				out.push(IDENTITY_SUCI);
				out.extend_from_slice(&suci.plmn.pack()?);
				let ri = digits_of("routingIndicator", &suci.routing_indicator)?;
				let mut ri_packed = bcd_pack(&ri);
				ri_packed.resize(2, 0xFF);
				out.extend_from_slice(&ri_packed);
				out.push(suci.protection_scheme);
				out.push(suci.home_network_pki);
				out.extend_from_slice(&bcd_pack(&digits_of("msin", &suci.msin)?));
				Ok(out)
			}
			Self::Guti(guti) => {
				let mut out = Vec::with_capacity(11);
				out.push(0xF0 | IDENTITY_GUTI);
				out.extend_from_slice(&guti.plmn.pack()?);
				out.push(guti.amf_region_id);
				out.extend_from_slice(&((guti.amf_set_id << 6) | u16::from(guti.amf_pointer)).to_be_bytes());
				out.extend_from_slice(&guti.tmsi.to_be_bytes());
				Ok(out)
			}
			Self::Imeisv(digits) => {
				let digits = digits_of("imeisv", digits)?;
				if digits.len() != 16 {
					return Err(NasEncodeError::InvalidDigitCount {
						field: "imeisv",
						expected: 16,
						actual: digits.len(),
					});
				}
				let mut out = Vec::with_capacity(9);
				// Digit 1 in the high nibble, even-count parity bit clear.
				out.push(digits[0] << 4 | IDENTITY_IMEISV);
				out.extend_from_slice(&bcd_pack(&digits[1..]));
				Ok(out)
			}
		}
	}

	pub fn decode_value(value: &[u8]) -> Result<Self, NasDecodeError> {
		let mut buf = NasBuf::new(value);
		let head = buf.take_u8()?;
		match head & 0x07 {
			0 => Ok(Self::NoIdentity),
			IDENTITY_SUCI => {
				let plmn = Plmn::unpack(buf.take(3)?.try_into().expect("3 octets"));
				let ri = bcd_unpack(buf.take(2)?);
				let protection_scheme = buf.take_u8()?;
				let home_network_pki = buf.take_u8()?;
				let msin = bcd_unpack(buf.take(buf.remaining())?);
				Ok(Self::Suci(Suci {
					plmn,
					routing_indicator: ri,
					protection_scheme,
					home_network_pki,
					msin,
				}))
			}
			IDENTITY_GUTI => {
				let plmn = Plmn::unpack(buf.take(3)?.try_into().expect("3 octets"));
				let amf_region_id = buf.take_u8()?;
				let set_ptr = buf.take_u16()?;
				let tmsi = buf.take(4)?;
				Ok(Self::Guti(FiveGGuti {
					plmn,
					amf_region_id,
					amf_set_id: set_ptr >> 6,
					amf_pointer: (set_ptr & 0x3F) as u8,
					tmsi: u32::from_be_bytes(tmsi.try_into().expect("4 octets")),
				}))
			}
			IDENTITY_IMEISV => {
				let mut digits = String::new();
				digits.push(char::from(b'0' + (head >> 4)));
				digits.push_str(&bcd_unpack(buf.take(buf.remaining())?));
				Ok(Self::Imeisv(digits))
			}
			other => Err(NasDecodeError::MalformedIe {
				iei: other,
				reason: "unsupported mobile identity type",
			}),
		}
	}
}

/// UE security capability (TS 24.501 §9.11.3.54): one octet of 5G-EA bits,
/// one of 5G-IA bits, optionally followed by the EPS pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UeSecurityCapability {
	pub ea: u8,
	pub ia: u8,
	pub eps: Option<(u8, u8)>,
}

impl UeSecurityCapability {
	/// NEA0 ciphering plus NIA2 integrity, the only algorithms this
	/// simulator implements.
	pub fn nea0_nia2() -> Self {
		Self { ea: 0x80, ia: 0x20, eps: None }
	}

	pub fn encode_value(&self) -> Vec<u8> {
		match self.eps {
			None => vec![self.ea, self.ia],
			Some((eea, eia)) => vec![self.ea, self.ia, eea, eia],
		}
	}

	pub fn decode_value(value: &[u8]) -> Result<Self, NasDecodeError> {
		if value.len() < 2 {
			return Err(NasDecodeError::MalformedIe {
				iei: 0x2E,
				reason: "security capability shorter than two octets",
			});
		}
		let eps = (value.len() >= 4).then(|| (value[2], value[3]));
		Ok(Self { ea: value[0], ia: value[1], eps })
	}
}

/// GPRS timer 3 (TS 24.008 §10.5.7.4a): 3-bit unit, 5-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GprsTimer3(pub u8);

impl GprsTimer3 {
	pub fn to_duration(self) -> Option<Duration> {
		let value = u64::from(self.0 & 0x1F);
		let secs = match self.0 >> 5 {
			0 => value * 600,
			1 => value * 3600,
			2 => value * 36000,
			3 => value * 2,
			4 => value * 30,
			5 => value * 60,
			6 => value * 320 * 3600,
			_ => return None, // deactivated
		};
		Some(Duration::from_secs(secs))
	}
}

/// GPRS timer 2 (TS 24.008 §10.5.7.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GprsTimer2(pub u8);

impl GprsTimer2 {
	pub fn to_duration(self) -> Option<Duration> {
		let value = u64::from(self.0 & 0x1F);
		let secs = match self.0 >> 5 {
			0 => value * 2,
			1 => value * 60,
			2 => value * 360,
			_ => return None,
		};
		Some(Duration::from_secs(secs))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn plmn_packs_with_mnc_filler() {
		let plmn = Plmn { mcc: "208".into(), mnc: "93".into() };
		assert_eq!(plmn.pack().unwrap(), [0x02, 0xF8, 0x39]);
		assert_eq!(Plmn::unpack([0x02, 0xF8, 0x39]), plmn);
	}

	#[test]
	fn plmn_packs_three_digit_mnc() {
		let plmn = Plmn { mcc: "310".into(), mnc: "410".into() };
		assert_eq!(plmn.pack().unwrap(), [0x13, 0x00, 0x14]);
		assert_eq!(Plmn::unpack([0x13, 0x00, 0x14]), plmn);
	}

	#[test]
	fn suci_null_scheme_layout() {
		let identity = MobileIdentity::Suci(Suci {
			plmn: Plmn { mcc: "208".into(), mnc: "93".into() },
			routing_indicator: "0".into(),
			protection_scheme: 0,
			home_network_pki: 0,
			msin: "0000000003".into(),
		});
		let value = identity.encode_value().unwrap();
		assert_eq!(
			value,
			vec![0x01, 0x02, 0xF8, 0x39, 0xF0, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x30]
		);
		assert_eq!(MobileIdentity::decode_value(&value).unwrap(), identity);
	}

	#[test]
	fn imeisv_packs_sixteen_digits_with_parity_clear() {
		let identity = MobileIdentity::Imeisv("1122334455667788".into());
		let value = identity.encode_value().unwrap();
		assert_eq!(value.len(), 9);
		assert_eq!(value[0], 0x15);
		assert_eq!(value[1], 0x21);
		assert_eq!(value[8], 0xF8);
		assert_eq!(MobileIdentity::decode_value(&value).unwrap(), identity);
	}

	#[test]
	fn guti_round_trips() {
		let identity = MobileIdentity::Guti(FiveGGuti {
			plmn: Plmn { mcc: "208".into(), mnc: "93".into() },
			amf_region_id: 0x80,
			amf_set_id: 0x101,
			amf_pointer: 1,
			tmsi: 0xDEADBEEF,
		});
		let value = identity.encode_value().unwrap();
		assert_eq!(value.len(), 11);
		assert_eq!(MobileIdentity::decode_value(&value).unwrap(), identity);
	}

	#[test]
	fn tai_list_type0_round_trips() {
		let list = TaiList(vec![
			Tai { plmn: Plmn { mcc: "208".into(), mnc: "93".into() }, tac: 1 },
			Tai { plmn: Plmn { mcc: "208".into(), mnc: "93".into() }, tac: 2 },
		]);
		let value = list.encode_value().unwrap();
		assert_eq!(value[0], 0x01);
		assert_eq!(TaiList::decode_value(&value).unwrap(), list);
	}

	#[test]
	fn consecutive_tac_list_expands() {
		// Type-01 list: PLMN + first TAC, three elements.
		let value = [0x22, 0x02, 0xF8, 0x39, 0x00, 0x00, 0x10];
		let list = TaiList::decode_value(&value).unwrap();
		assert_eq!(list.0.len(), 3);
		assert_eq!(list.0[2].tac, 0x12);
	}
}
