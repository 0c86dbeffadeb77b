//! Aligned PER (ITU-T X.691) primitives for the NGAP subset spoken on N2.
//!
//! Encoders append to a [`PerCodecData`], a bit buffer that carries an exact
//! bit length; sub-octet fragments are merged most-significant-bit first and
//! alignment pads with zero bits up to the next octet boundary. Decoders read
//! from the same buffer through a bit cursor.

pub mod decode;
pub mod encode;
mod error;

use bitvec::prelude::*;

pub use error::PerCodecError;

/// Sentinel upper bound for unconstrained lengths.
pub const UNBOUNDED: usize = usize::MAX;

/// Bit buffer shared by the encode and decode paths.
#[derive(Debug, Default, Clone)]
pub struct PerCodecData {
	bits: BitVec<u8, Msb0>,
	decode_offset: usize,
}

impl PerCodecData {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_slice(bytes: &[u8]) -> Self {
		Self {
			bits: BitVec::from_slice(bytes),
			decode_offset: 0,
		}
	}

	pub fn len_bits(&self) -> usize {
		self.bits.len()
	}

	/// Bits left between the decode cursor and the end of the buffer.
	pub fn remaining_bits(&self) -> usize {
		self.bits.len() - self.decode_offset
	}

	/// Consumes the buffer, zero-padding the trailing partial octet.
	pub fn into_bytes(mut self) -> Vec<u8> {
		self.align();
		self.bits.into_vec()
	}

	/// Pads the encode side with zero bits up to the next octet boundary.
	pub fn align(&mut self) {
		let trailing = self.bits.len() % 8;
		if trailing != 0 {
			for _ in trailing..8 {
				self.bits.push(false);
			}
		}
	}

	/// Advances the decode cursor to the next octet boundary.
	pub fn decode_align(&mut self) -> Result<(), PerCodecError> {
		let trailing = self.decode_offset % 8;
		if trailing != 0 {
			self.advance(8 - trailing)?;
		}
		Ok(())
	}

	/// Appends the low `width` bits of `value`, most significant first.
	pub fn append_bits(
		&mut self,
		value: u64,
		width: usize,
	) {
		debug_assert!(width <= 64);
		for shift in (0..width).rev() {
			self.bits.push((value >> shift) & 1 == 1);
		}
	}

	pub fn append_bytes(&mut self, bytes: &[u8]) {
		self.bits.extend_from_bitslice(bytes.view_bits::<Msb0>());
	}

	/// Appends the first `bit_len` bits of `bytes`, most significant first.
	pub fn append_bit_field(
		&mut self,
		bytes: &[u8],
		bit_len: usize,
	) {
		self.bits
			.extend_from_bitslice(&bytes.view_bits::<Msb0>()[..bit_len]);
	}

	pub fn read_bits(
		&mut self,
		width: usize,
	) -> Result<u64, PerCodecError> {
		debug_assert!(width <= 64);
		self.check_remaining(width)?;
		let mut value = 0u64;
		for _ in 0..width {
			value = (value << 1) | u64::from(self.bits[self.decode_offset]);
			self.decode_offset += 1;
		}
		Ok(value)
	}

	pub fn read_bytes(
		&mut self,
		count: usize,
	) -> Result<Vec<u8>, PerCodecError> {
		self.check_remaining(count * 8)?;
		let mut out = Vec::with_capacity(count);
		for _ in 0..count {
			out.push(self.read_bits(8)? as u8);
		}
		Ok(out)
	}

	/// Reads `bit_len` bits into a left-aligned octet vector.
	pub fn read_bit_field(
		&mut self,
		bit_len: usize,
	) -> Result<Vec<u8>, PerCodecError> {
		self.check_remaining(bit_len)?;
		let mut out = vec![0u8; bit_len.div_ceil(8)];
		for index in 0..bit_len {
			if self.bits[self.decode_offset] {
				out[index / 8] |= 0x80 >> (index % 8);
			}
			self.decode_offset += 1;
		}
		Ok(out)
	}

	pub fn advance(
		&mut self,
		width: usize,
	) -> Result<(), PerCodecError> {
		self.check_remaining(width)?;
		self.decode_offset += width;
		Ok(())
	}

	fn check_remaining(
		&self,
		needed: usize,
	) -> Result<(), PerCodecError> {
		if needed > self.remaining_bits() {
			return Err(PerCodecError::BufferExhausted {
				needed,
				available: self.remaining_bits(),
			});
		}
		Ok(())
	}
}

/// Two-way PER codec implemented by every NGAP model type.
pub trait PerCodec: Sized {
	fn encode(
		&self,
		data: &mut PerCodecData,
	) -> Result<(), PerCodecError>;

	fn decode(data: &mut PerCodecData) -> Result<Self, PerCodecError>;
}

pub fn to_bytes<T: PerCodec>(value: &T) -> Result<Vec<u8>, PerCodecError> {
	let mut data = PerCodecData::new();
	value.encode(&mut data)?;
	Ok(data.into_bytes())
}

pub fn from_bytes<T: PerCodec>(bytes: &[u8]) -> Result<T, PerCodecError> {
	let mut data = PerCodecData::from_slice(bytes);
	T::decode(&mut data)
}
