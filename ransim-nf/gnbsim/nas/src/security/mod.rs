//! NAS security: header framing (TS 24.501 §9.1), NIA2 integrity, Milenage
//! and the 3GPP key-derivation tree.

pub mod kdf;
pub mod milenage;
pub mod nia2;

use thiserror::Error;

use crate::EPD_5GMM;
use crate::error::NasDecodeError;

/// Bearer identity used for NAS connections over 3GPP access.
pub const NAS_BEARER_3GPP: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SecurityHeaderType {
	Plain = 0,
	IntegrityProtected = 1,
	IntegrityProtectedAndCiphered = 2,
	IntegrityProtectedWithNewContext = 3,
	IntegrityProtectedAndCipheredWithNewContext = 4,
}

impl TryFrom<u8> for SecurityHeaderType {
	type Error = NasDecodeError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value & 0x0F {
			0 => Ok(Self::Plain),
			1 => Ok(Self::IntegrityProtected),
			2 => Ok(Self::IntegrityProtectedAndCiphered),
			3 => Ok(Self::IntegrityProtectedWithNewContext),
			4 => Ok(Self::IntegrityProtectedAndCipheredWithNewContext),
			other => Err(NasDecodeError::UnknownSecurityHeader(other)),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NasDirection {
	Uplink = 0,
	Downlink = 1,
}

#[derive(Error, Debug)]
#[error("IntegrityError: NAS MAC mismatch (received {received:02x?}, calculated {calculated:02x?})")]
pub struct IntegrityError {
	pub received: [u8; 4],
	pub calculated: [u8; 4],
}

/// Header of a security-protected frame: MAC over SQN plus the inner PDU.
#[derive(Debug, Clone, Copy)]
pub struct SecuredHeader {
	pub sht: SecurityHeaderType,
	pub mac: [u8; 4],
	pub sqn: u8,
}

/// MAC of a NAS frame; the protected input is the sequence number followed
/// by the inner PDU (I2).
pub fn compute_mac(
	kint: &[u8; 16],
	count: u32,
	direction: NasDirection,
	sqn: u8,
	inner: &[u8],
) -> [u8; 4] {
	nia2::mac_parts(kint, count, NAS_BEARER_3GPP, direction as u8, &[&[sqn], inner])
}

/// Wraps a plain NAS PDU into a security-protected frame.
pub fn protect(
	inner: &[u8],
	sht: SecurityHeaderType,
	kint: &[u8; 16],
	count: u32,
	direction: NasDirection,
) -> Vec<u8> {
	let sqn = count as u8;
	let mac = compute_mac(kint, count, direction, sqn, inner);
	let mut out = Vec::with_capacity(7 + inner.len());
	out.push(EPD_5GMM);
	out.push(sht as u8);
	out.extend_from_slice(&mac);
	out.push(sqn);
	out.extend_from_slice(inner);
	out
}

/// Splits a secured frame into its header and the inner PDU. The caller is
/// expected to have checked that the security header type is nonzero.
pub fn split_secured(buf: &[u8]) -> Result<(SecuredHeader, &[u8]), NasDecodeError> {
	if buf.len() < 7 {
		return Err(NasDecodeError::TruncatedPdu { needed: 7 - buf.len(), available: buf.len() });
	}
	if buf[0] != EPD_5GMM {
		return Err(NasDecodeError::UnexpectedProtocolDiscriminator(buf[0]));
	}
	let sht = SecurityHeaderType::try_from(buf[1])?;
	Ok((
		SecuredHeader {
			sht,
			mac: [buf[2], buf[3], buf[4], buf[5]],
			sqn: buf[6],
		},
		&buf[7..],
	))
}

/// Constant-time MAC check of a received secured frame.
pub fn verify_mac(
	kint: &[u8; 16],
	count: u32,
	direction: NasDirection,
	sqn: u8,
	inner: &[u8],
	received: &[u8; 4],
) -> Result<(), IntegrityError> {
	nia2::verify_parts(
		kint,
		count,
		NAS_BEARER_3GPP,
		direction as u8,
		&[&[sqn], inner],
		received,
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	const KINT: [u8; 16] = [
		0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD,
		0xEE, 0xFF,
	];

	#[test]
	fn protect_then_verify_round_trips() {
		let inner = [0x7E, 0x00, 0x57, 0x2D, 0x10, 0xAB, 0xCD];
		let frame = protect(&inner, SecurityHeaderType::IntegrityProtected, &KINT, 0, NasDirection::Uplink);
		let (header, payload) = split_secured(&frame).unwrap();
		assert_eq!(header.sqn, 0);
		assert_eq!(payload, inner);
		verify_mac(&KINT, 0, NasDirection::Uplink, header.sqn, payload, &header.mac).unwrap();
	}

	#[test]
	fn any_flipped_bit_fails_verification() {
		let inner = [0x7E, 0x00, 0x43];
		let frame = protect(&inner, SecurityHeaderType::IntegrityProtectedAndCiphered, &KINT, 7, NasDirection::Uplink);
		for bit in 0..(inner.len() * 8) {
			let mut tampered = inner.to_vec();
			tampered[bit / 8] ^= 0x80 >> (bit % 8);
			let (header, _) = split_secured(&frame).unwrap();
			let result = verify_mac(&KINT, 7, NasDirection::Uplink, header.sqn, &tampered, &header.mac);
			assert!(result.is_err(), "bit {bit} did not break the MAC");
		}
	}

	#[test]
	fn direction_and_count_are_bound_into_the_mac() {
		let inner = [0x7E, 0x00, 0x43];
		let frame = protect(&inner, SecurityHeaderType::IntegrityProtected, &KINT, 3, NasDirection::Uplink);
		let (header, payload) = split_secured(&frame).unwrap();
		assert!(verify_mac(&KINT, 3, NasDirection::Downlink, header.sqn, payload, &header.mac).is_err());
		assert!(verify_mac(&KINT, 4, NasDirection::Uplink, header.sqn, payload, &header.mac).is_err());
	}

	#[test]
	fn secured_frame_layout_carries_sqn_low_byte() {
		let inner = [0x7E, 0x00, 0x43];
		let frame = protect(&inner, SecurityHeaderType::IntegrityProtected, &KINT, 0x0102, NasDirection::Uplink);
		assert_eq!(frame[0], 0x7E);
		assert_eq!(frame[1], 0x01);
		assert_eq!(frame[6], 0x02);
	}
}
