//! Milenage (TS 35.205/35.206): f1/f1*, f2..f5 and f5* over a single-block
//! AES-128 keyed with K and the operator variant OPc.

use aes::Aes128;
use aes::cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray};

const C1: [u8; 16] = [0; 16];
const C2: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];
const C3: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2];
const C4: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4];
const C5: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 8];

const R1: usize = 8;
const R2: usize = 0;
const R3: usize = 4;
const R4: usize = 8;
const R5: usize = 12;

fn xor(
	a: [u8; 16],
	b: &[u8; 16],
) -> [u8; 16] {
	let mut out = a;
	for (byte, other) in out.iter_mut().zip(b) {
		*byte ^= other;
	}
	out
}

/// Left-rotation by whole octets; every Milenage rotation constant is a
/// multiple of eight bits.
fn rotate(
	block: [u8; 16],
	octets: usize,
) -> [u8; 16] {
	let mut out = [0u8; 16];
	for (index, byte) in out.iter_mut().enumerate() {
		*byte = block[(index + octets) % 16];
	}
	out
}

pub struct Milenage {
	cipher: Aes128,
	opc: [u8; 16],
}

impl Milenage {
	pub fn new(
		k: &[u8; 16],
		opc: &[u8; 16],
	) -> Self {
		Self {
			cipher: Aes128::new(GenericArray::from_slice(k)),
			opc: *opc,
		}
	}

	/// OPc = E_K(OP) ⊕ OP, for subscriptions provisioned with OP.
	pub fn compute_opc(
		k: &[u8; 16],
		op: &[u8; 16],
	) -> [u8; 16] {
		let cipher = Aes128::new(GenericArray::from_slice(k));
		let mut block = GenericArray::clone_from_slice(op);
		cipher.encrypt_block(&mut block);
		let mut out: [u8; 16] = block.into();
		for (byte, other) in out.iter_mut().zip(op) {
			*byte ^= other;
		}
		out
	}

	fn encrypt(
		&self,
		input: [u8; 16],
	) -> [u8; 16] {
		let mut block = GenericArray::from(input);
		self.cipher.encrypt_block(&mut block);
		block.into()
	}

	fn temp(
		&self,
		rand: &[u8; 16],
	) -> [u8; 16] {
		self.encrypt(xor(*rand, &self.opc))
	}

	fn out1(
		&self,
		rand: &[u8; 16],
		sqn: &[u8; 6],
		amf: &[u8; 2],
	) -> [u8; 16] {
		let mut in1 = [0u8; 16];
		in1[..6].copy_from_slice(sqn);
		in1[6..8].copy_from_slice(amf);
		in1[8..14].copy_from_slice(sqn);
		in1[14..16].copy_from_slice(amf);
		let rotated = rotate(xor(in1, &self.opc), R1);
		let input = xor(xor(self.temp(rand), &rotated), &C1);
		xor(self.encrypt(input), &self.opc)
	}

	fn out_n(
		&self,
		rand: &[u8; 16],
		rotation: usize,
		constant: &[u8; 16],
	) -> [u8; 16] {
		let rotated = rotate(xor(self.temp(rand), &self.opc), rotation);
		xor(self.encrypt(xor(rotated, constant)), &self.opc)
	}

	/// Network authentication code MAC-A.
	pub fn f1(
		&self,
		rand: &[u8; 16],
		sqn: &[u8; 6],
		amf: &[u8; 2],
	) -> [u8; 8] {
		self.out1(rand, sqn, amf)[..8].try_into().expect("8 octets")
	}

	/// Resynchronisation code MAC-S.
	pub fn f1_star(
		&self,
		rand: &[u8; 16],
		sqn: &[u8; 6],
		amf: &[u8; 2],
	) -> [u8; 8] {
		self.out1(rand, sqn, amf)[8..].try_into().expect("8 octets")
	}

	/// RES, CK, IK and AK in one pass.
	pub fn f2345(
		&self,
		rand: &[u8; 16],
	) -> ([u8; 8], [u8; 16], [u8; 16], [u8; 6]) {
		let out2 = self.out_n(rand, R2, &C2);
		let ck = self.out_n(rand, R3, &C3);
		let ik = self.out_n(rand, R4, &C4);
		let res = out2[8..].try_into().expect("8 octets");
		let ak = out2[..6].try_into().expect("6 octets");
		(res, ck, ik, ak)
	}

	/// Resynchronisation anonymity key AK*.
	pub fn f5_star(
		&self,
		rand: &[u8; 16],
	) -> [u8; 6] {
		self.out_n(rand, R5, &C5)[..6].try_into().expect("6 octets")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// TS 35.207 test set 1.
	const K: [u8; 16] = [
		0x46, 0x5B, 0x5C, 0xE8, 0xB1, 0x99, 0xB4, 0x9F, 0xAA, 0x5F, 0x0A, 0x2E, 0xE2, 0x38,
		0xA6, 0xBC,
	];
	const OP: [u8; 16] = [
		0xCD, 0xC2, 0x02, 0xD5, 0x12, 0x3E, 0x20, 0xF6, 0x2B, 0x6D, 0x67, 0x6A, 0xC7, 0x2C,
		0xB3, 0x18,
	];
	const OPC: [u8; 16] = [
		0xCD, 0x63, 0xCB, 0x71, 0x95, 0x4A, 0x9F, 0x4E, 0x48, 0xA5, 0x99, 0x4E, 0x37, 0xA0,
		0x2B, 0xAF,
	];
	const RAND: [u8; 16] = [
		0x23, 0x55, 0x3C, 0xBE, 0x96, 0x37, 0xA8, 0x9D, 0x21, 0x8A, 0xE6, 0x4D, 0xAE, 0x47,
		0xBF, 0x35,
	];
	const SQN: [u8; 6] = [0xFF, 0x9B, 0xB4, 0xD0, 0xB6, 0x07];
	const AMF: [u8; 2] = [0xB9, 0xB9];

	#[test]
	fn opc_derivation_matches_test_set_1() {
		assert_eq!(Milenage::compute_opc(&K, &OP), OPC);
	}

	#[test]
	fn f1_reproduces_mac_a() {
		let milenage = Milenage::new(&K, &OPC);
		assert_eq!(
			milenage.f1(&RAND, &SQN, &AMF),
			[0x4A, 0x9F, 0xFA, 0xC3, 0x54, 0xDF, 0xAF, 0xB3]
		);
	}

	#[test]
	fn f2345_reproduces_res_ck_ik_ak() {
		let milenage = Milenage::new(&K, &OPC);
		let (res, ck, ik, ak) = milenage.f2345(&RAND);
		assert_eq!(res, [0xA5, 0x42, 0x11, 0xD5, 0xE3, 0xBA, 0x50, 0xBF]);
		assert_eq!(
			ck,
			[
				0xB4, 0x0B, 0xA9, 0xA3, 0xC5, 0x8B, 0x2A, 0x05, 0xBB, 0xF0, 0xD9, 0x87, 0xB2,
				0x1B, 0xF8, 0xCB
			]
		);
		assert_eq!(
			ik,
			[
				0xF7, 0x69, 0xBC, 0xD7, 0x51, 0x04, 0x46, 0x04, 0x12, 0x76, 0x72, 0x71, 0x1C,
				0x6D, 0x34, 0x41
			]
		);
		assert_eq!(ak, [0xAA, 0x68, 0x9C, 0x64, 0x83, 0x70]);
	}
}
