//! GTPv1-U header encode/decap (TS 29.281) with the PDU Session Container
//! extension of TS 38.415.

use bytes::BufMut;

use super::GtpuDecodeError;

pub const MSG_ECHO_REQUEST: u8 = 1;
pub const MSG_ECHO_RESPONSE: u8 = 2;
pub const MSG_TPDU: u8 = 0xFF;

const EXT_PDU_SESSION_CONTAINER: u8 = 0x85;
const FLAG_EXTENSION: u8 = 0x04;
const FLAG_SEQUENCE: u8 = 0x02;
/// PDU type 1 in the container's high nibble marks an uplink PDU.
const PDU_TYPE_UL: u8 = 0x10;

/// Encapsulates one IP packet as a T-PDU with an uplink PDU Session
/// Container carrying the QFI.
pub fn encap_tpdu(
	teid: u32,
	qfi: u8,
	packet: &[u8],
) -> Vec<u8> {
	let mut out = Vec::with_capacity(16 + packet.len());
	out.put_u8(0x20 | 0x10 | FLAG_EXTENSION);
	out.put_u8(MSG_TPDU);
	// Everything after the TEID: sequence/N-PDU pad, the extension chain
	// and the payload.
	out.put_u16((8 + packet.len()) as u16);
	out.put_u32(teid);
	// Mandatory sequence + N-PDU octets, zero when unused.
	out.put_u8(0x00);
	out.put_u8(0x00);
	out.put_u8(0x00);
	out.put_u8(EXT_PDU_SESSION_CONTAINER);
	// Length in 4-octet units, then PDU type, QFI and the chain terminator.
	out.put_u8(0x01);
	out.put_u8(PDU_TYPE_UL);
	out.put_u8(qfi & 0x3F);
	out.put_u8(0x00);
	out.extend_from_slice(packet);
	out
}

#[derive(Debug, PartialEq, Eq)]
pub enum GtpuMessage<'a> {
	/// Decapsulated T-PDU: the inner IP packet.
	Tpdu { teid: u32, payload: &'a [u8] },
	EchoRequest { sequence: Option<u16> },
	Other { message_type: u8, teid: u32 },
}

/// Strips the GTP-U header: 8 octets without extensions, 16 with the
/// minimum PDU Session Container chain.
pub fn decap(buf: &[u8]) -> Result<GtpuMessage<'_>, GtpuDecodeError> {
	if buf.len() < 8 {
		return Err(GtpuDecodeError::TruncatedHeader { needed: 8, available: buf.len() });
	}
	let version = buf[0] >> 5;
	if version != 1 {
		return Err(GtpuDecodeError::UnsupportedVersion(version));
	}
	let message_type = buf[1];
	let announced = u16::from_be_bytes([buf[2], buf[3]]) as usize;
	let teid = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);
	if buf.len() < 8 + announced {
		return Err(GtpuDecodeError::TruncatedPayload {
			announced,
			available: buf.len() - 8,
		});
	}
	let end = 8 + announced;

	match message_type {
		MSG_TPDU => {
			let offset = if buf[0] & FLAG_EXTENSION != 0 { 16 } else { 8 };
			if end < offset {
				return Err(GtpuDecodeError::TruncatedHeader {
					needed: offset,
					available: end,
				});
			}
			Ok(GtpuMessage::Tpdu { teid, payload: &buf[offset..end] })
		}
		MSG_ECHO_REQUEST => {
			let sequence = (buf[0] & FLAG_SEQUENCE != 0 && end >= 10)
				.then(|| u16::from_be_bytes([buf[8], buf[9]]));
			Ok(GtpuMessage::EchoRequest { sequence })
		}
		other => Ok(GtpuMessage::Other { message_type: other, teid }),
	}
}

/// Echo Response with the sequence mirrored and the Recovery IE, TS 29.281
/// §7.2.2.
pub fn encode_echo_response(sequence: Option<u16>) -> Vec<u8> {
	let mut out = Vec::with_capacity(14);
	out.put_u8(0x20 | 0x10 | FLAG_SEQUENCE);
	out.put_u8(MSG_ECHO_RESPONSE);
	out.put_u16(6);
	out.put_u32(0);
	out.put_u16(sequence.unwrap_or(0));
	out.put_u8(0x00);
	out.put_u8(0x00);
	// Recovery IE; the restart counter is unused in GTP-U but mandatory.
	out.put_u8(14);
	out.put_u8(0x00);
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn plain_header_is_exactly_eight_octets() {
		let buf = [0x30, 0xFF, 0x00, 0x04, 0x12, 0x34, 0x56, 0x78, 0x45, 0x00, 0x00, 0x00];
		let message = decap(&buf).unwrap();
		assert_eq!(
			message,
			GtpuMessage::Tpdu { teid: 0x12345678, payload: &[0x45, 0x00, 0x00, 0x00] }
		);
	}

	#[test]
	fn extension_header_strips_sixteen_octets() {
		let mut buf = vec![
			0x34, 0xFF, 0x00, 0x1C, 0x12, 0x34, 0x56, 0x78, // header
			0x00, 0x00, 0x00, 0x85, // seq, N-PDU, next type
			0x01, 0x10, 0x01, 0x00, // PDU session container
		];
		let ip_packet = [0x45u8; 20];
		buf.extend_from_slice(&ip_packet);
		let message = decap(&buf).unwrap();
		assert_eq!(message, GtpuMessage::Tpdu { teid: 0x12345678, payload: &ip_packet });
	}

	#[test]
	fn encap_produces_the_sixteen_octet_form() {
		let packet = [0x45u8; 20];
		let frame = encap_tpdu(0x12345678, 1, &packet);
		assert_eq!(frame.len(), 36);
		assert_eq!(
			&frame[..16],
			&[
				0x34, 0xFF, 0x00, 0x1C, 0x12, 0x34, 0x56, 0x78, 0x00, 0x00, 0x00, 0x85, 0x01,
				0x10, 0x01, 0x00
			]
		);
		// Decap undoes encap.
		assert_eq!(
			decap(&frame).unwrap(),
			GtpuMessage::Tpdu { teid: 0x12345678, payload: &packet }
		);
	}

	#[test]
	fn truncated_and_misversioned_frames_are_rejected() {
		assert_eq!(
			decap(&[0x30, 0xFF, 0x00]),
			Err(GtpuDecodeError::TruncatedHeader { needed: 8, available: 3 })
		);
		assert_eq!(
			decap(&[0x50, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01]),
			Err(GtpuDecodeError::UnsupportedVersion(2))
		);
		assert_eq!(
			decap(&[0x30, 0xFF, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01, 0x45]),
			Err(GtpuDecodeError::TruncatedPayload { announced: 8, available: 1 })
		);
	}

	#[test]
	fn echo_request_yields_an_echo_response_with_the_sequence() {
		let request = [0x32, 0x01, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x07, 0x00, 0x00];
		let GtpuMessage::EchoRequest { sequence } = decap(&request).unwrap() else {
			panic!("echo request expected");
		};
		assert_eq!(sequence, Some(7));
		let response = encode_echo_response(sequence);
		assert_eq!(response[1], MSG_ECHO_RESPONSE);
		assert_eq!(&response[8..10], &[0x00, 0x07]);
		assert_eq!(&response[12..14], &[14, 0x00]);
	}
}
