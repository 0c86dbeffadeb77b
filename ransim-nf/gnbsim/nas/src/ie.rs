//! Cursor and skip helpers for the TLV / TV information-element grammar of
//! TS 24.007 §11.2.

use crate::error::NasDecodeError;

pub struct NasBuf<'a> {
	buf: &'a [u8],
	pos: usize,
}

impl<'a> NasBuf<'a> {
	pub fn new(buf: &'a [u8]) -> Self {
		Self { buf, pos: 0 }
	}

	pub fn remaining(&self) -> usize {
		self.buf.len() - self.pos
	}

	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	pub fn take(
		&mut self,
		count: usize,
	) -> Result<&'a [u8], NasDecodeError> {
		if count > self.remaining() {
			return Err(NasDecodeError::TruncatedPdu {
				needed: count - self.remaining(),
				available: self.remaining(),
			});
		}
		let slice = &self.buf[self.pos..self.pos + count];
		self.pos += count;
		Ok(slice)
	}

	pub fn take_u8(&mut self) -> Result<u8, NasDecodeError> {
		Ok(self.take(1)?[0])
	}

	pub fn take_u16(&mut self) -> Result<u16, NasDecodeError> {
		let bytes = self.take(2)?;
		Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
	}

	/// Length-prefixed value with a one-octet length (LV).
	pub fn take_lv(&mut self) -> Result<&'a [u8], NasDecodeError> {
		let len = self.take_u8()? as usize;
		self.take(len)
	}

	/// Length-prefixed value with a two-octet length (LV-E).
	pub fn take_lv_e(&mut self) -> Result<&'a [u8], NasDecodeError> {
		let len = self.take_u16()? as usize;
		self.take(len)
	}
}

/// Skips an information element whose IEI the caller does not understand.
/// IEIs with the top bit set carry their value in the low nibble (TV of one
/// octet); the rest are TLV with a one-octet length. Type-3 and TLV-E IEs
/// must be matched by the caller before falling back here.
pub fn skip_unknown_ie(
	iei: u8,
	buf: &mut NasBuf<'_>,
) -> Result<(), NasDecodeError> {
	if iei & 0x80 == 0 {
		let len = buf.take_u8()? as usize;
		buf.take(len)?;
	}
	Ok(())
}
