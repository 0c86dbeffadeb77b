//! 3GPP key derivation (TS 33.501 Annex A): every key in the chain comes
//! from `HMAC-SHA-256(Key, FC ‖ P0 ‖ L0 ‖ P1 ‖ L1 ‖ …)` with big-endian
//! 16-bit parameter lengths.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const FC_KAUSF: u8 = 0x6A;
const FC_RES_STAR: u8 = 0x6B;
const FC_KSEAF: u8 = 0x6C;
const FC_KAMF: u8 = 0x6D;
const FC_ALGORITHM_KEY: u8 = 0x69;

/// N-NAS-enc algorithm type distinguisher.
pub const ALGORITHM_TYPE_NAS_ENC: u8 = 0x01;
/// N-NAS-int algorithm type distinguisher.
pub const ALGORITHM_TYPE_NAS_INT: u8 = 0x02;

pub fn kdf(
	key: &[u8],
	fc: u8,
	params: &[&[u8]],
) -> [u8; 32] {
	let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
	mac.update(&[fc]);
	for param in params {
		mac.update(param);
		mac.update(&(param.len() as u16).to_be_bytes());
	}
	mac.finalize().into_bytes().into()
}

/// Serving network name of TS 24.501 §9.12.1, e.g.
/// `5G:mnc093.mcc208.3gppnetwork.org`.
pub fn serving_network_name(
	mcc: &str,
	mnc: &str,
) -> String {
	format!("5G:mnc{mnc:0>3}.mcc{mcc:0>3}.3gppnetwork.org")
}

pub fn derive_kausf(
	ck: &[u8; 16],
	ik: &[u8; 16],
	serving_network: &str,
	sqn_xor_ak: &[u8; 6],
) -> [u8; 32] {
	let mut key = [0u8; 32];
	key[..16].copy_from_slice(ck);
	key[16..].copy_from_slice(ik);
	kdf(&key, FC_KAUSF, &[serving_network.as_bytes(), sqn_xor_ak])
}

/// RES* is the low 128 bits of the derivation output.
pub fn derive_res_star(
	ck: &[u8; 16],
	ik: &[u8; 16],
	serving_network: &str,
	rand: &[u8; 16],
	res: &[u8; 8],
) -> [u8; 16] {
	let mut key = [0u8; 32];
	key[..16].copy_from_slice(ck);
	key[16..].copy_from_slice(ik);
	let out = kdf(&key, FC_RES_STAR, &[serving_network.as_bytes(), rand, res]);
	out[16..].try_into().expect("16 octets")
}

pub fn derive_kseaf(
	kausf: &[u8; 32],
	serving_network: &str,
) -> [u8; 32] {
	kdf(kausf, FC_KSEAF, &[serving_network.as_bytes()])
}

pub fn derive_kamf(
	kseaf: &[u8; 32],
	supi: &str,
	abba: &[u8],
) -> [u8; 32] {
	kdf(kseaf, FC_KAMF, &[supi.as_bytes(), abba])
}

/// NAS algorithm keys are the low 128 bits of the FC 0x69 derivation.
pub fn derive_algorithm_key(
	kamf: &[u8; 32],
	algorithm_type: u8,
	algorithm_id: u8,
) -> [u8; 16] {
	let out = kdf(kamf, FC_ALGORITHM_KEY, &[&[algorithm_type], &[algorithm_id]]);
	out[16..].try_into().expect("16 octets")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn serving_network_name_zero_pads_the_mnc() {
		assert_eq!(serving_network_name("208", "93"), "5G:mnc093.mcc208.3gppnetwork.org");
		assert_eq!(serving_network_name("310", "410"), "5G:mnc410.mcc310.3gppnetwork.org");
	}

	#[test]
	fn kdf_folds_parameter_lengths_into_the_input() {
		// Same concatenated bytes, different parameter split: the length
		// fields must make the outputs differ.
		let a = kdf(&[0x01; 32], 0x6A, &[b"ab", b"c"]);
		let b = kdf(&[0x01; 32], 0x6A, &[b"a", b"bc"]);
		assert_ne!(a, b);
	}

	#[test]
	fn algorithm_keys_differ_by_type_and_id() {
		let kamf = [0x42; 32];
		let kenc = derive_algorithm_key(&kamf, ALGORITHM_TYPE_NAS_ENC, 0);
		let kint = derive_algorithm_key(&kamf, ALGORITHM_TYPE_NAS_INT, 2);
		assert_ne!(kenc, kint);
	}
}
