use asn1_per::{PerCodecData, PerCodecError, UNBOUNDED, decode, encode};
use proptest::prelude::*;

#[test]
fn constrained_whole_number_range_256_is_one_aligned_octet() {
	let mut data = PerCodecData::new();
	encode::encode_constrained_whole_number(&mut data, 128, 0, 255, false).unwrap();
	assert_eq!(data.len_bits(), 8);
	assert_eq!(data.into_bytes(), vec![0x80]);
}

#[test]
fn constrained_whole_number_aligns_regardless_of_preamble() {
	let mut data = PerCodecData::new();
	data.append_bits(1, 1);
	encode::encode_constrained_whole_number(&mut data, 5, 0, 255, false).unwrap();
	// Preamble bit, seven pad bits, then the value in its own octet.
	assert_eq!(data.into_bytes(), vec![0x80, 0x05]);
}

#[test]
fn small_range_stays_in_the_bit_stream() {
	let mut data = PerCodecData::new();
	encode::encode_constrained_whole_number(&mut data, 3, 0, 7, false).unwrap();
	assert_eq!(data.len_bits(), 3);
	assert_eq!(data.into_bytes(), vec![0b0110_0000]);
}

#[test]
fn two_octet_case_covers_range_65536() {
	let mut data = PerCodecData::new();
	encode::encode_constrained_whole_number(&mut data, 0x1234, 0, 65535, false).unwrap();
	assert_eq!(data.into_bytes(), vec![0x12, 0x34]);
}

#[test]
fn length_determinant_one_and_two_octet_boundary() {
	let mut data = PerCodecData::new();
	encode::encode_length_determinant(&mut data, 127, 0, UNBOUNDED).unwrap();
	assert_eq!(data.clone().into_bytes(), vec![0x7F]);

	let mut data = PerCodecData::new();
	encode::encode_length_determinant(&mut data, 128, 0, UNBOUNDED).unwrap();
	assert_eq!(data.into_bytes(), vec![0x80, 0x80]);

	let mut data = PerCodecData::new();
	encode::encode_length_determinant(&mut data, 16383, 0, UNBOUNDED).unwrap();
	assert_eq!(data.into_bytes(), vec![0xBF, 0xFF]);

	let mut data = PerCodecData::new();
	let err = encode::encode_length_determinant(&mut data, 16384, 0, UNBOUNDED);
	assert!(matches!(err, Err(PerCodecError::UnsupportedLength(16384))));
}

#[test]
fn length_determinant_decode_mirrors_encode() {
	for len in [0usize, 1, 127, 128, 255, 16383] {
		let mut data = PerCodecData::new();
		encode::encode_length_determinant(&mut data, len, 0, UNBOUNDED).unwrap();
		let mut data = PerCodecData::from_slice(&data.into_bytes());
		assert_eq!(decode::decode_length_determinant(&mut data, 0, UNBOUNDED).unwrap(), len);
	}
}

#[test]
fn variable_bit_string_aligns_content() {
	// 22-bit value 1 under a (22..32) constraint: a 4-bit length, pad to the
	// octet boundary, then three content octets.
	let mut data = PerCodecData::new();
	encode::encode_bit_string(&mut data, &[0x00, 0x00, 0x04], 22, 22, 32, false).unwrap();
	assert_eq!(data.into_bytes(), vec![0x00, 0x00, 0x00, 0x04]);
}

#[test]
fn short_fixed_octet_string_is_a_bit_field() {
	let mut data = PerCodecData::new();
	data.append_bits(0, 1);
	encode::encode_octet_string(&mut data, &[0xAB, 0xCD], 2, 2, false).unwrap();
	// One preamble bit followed immediately by sixteen content bits.
	assert_eq!(data.len_bits(), 17);
	assert_eq!(data.into_bytes(), vec![0x55, 0xE6, 0x80]);
}

#[test]
fn fixed_octet_string_of_three_aligns_without_length() {
	let mut data = PerCodecData::new();
	data.append_bits(0, 1);
	encode::encode_octet_string(&mut data, &[0x02, 0xF8, 0x39], 3, 3, false).unwrap();
	assert_eq!(data.into_bytes(), vec![0x00, 0x02, 0xF8, 0x39]);
}

#[test]
fn sequence_preamble_packs_msb_first() {
	let mut data = PerCodecData::new();
	encode::encode_sequence_preamble(&mut data, true, &[true, false, true]);
	assert_eq!(data.len_bits(), 4);
	assert_eq!(data.into_bytes(), vec![0b0101_0000]);
}

#[test]
fn choice_index_and_procedure_code_form_the_ngap_header() {
	let mut data = PerCodecData::new();
	encode::encode_choice_index(&mut data, 0, 3, true).unwrap();
	encode::encode_constrained_whole_number(&mut data, 21, 0, 255, false).unwrap();
	assert_eq!(data.into_bytes(), vec![0x00, 0x15]);
}

#[test]
fn open_type_round_trip() {
	let content = vec![0xDE, 0xAD, 0xBE, 0xEF];
	let mut data = PerCodecData::new();
	data.append_bits(0, 3);
	encode::encode_open_type(&mut data, &content).unwrap();
	let bytes = data.into_bytes();

	let mut data = PerCodecData::from_slice(&bytes);
	data.advance(3).unwrap();
	assert_eq!(decode::decode_open_type(&mut data).unwrap(), content);
}

#[test]
fn enumerated_with_extension_mark() {
	// pagingDRX v128 is index 2 of an extensible four-value root.
	let mut data = PerCodecData::new();
	encode::encode_enumerated(&mut data, 2, 4, true).unwrap();
	assert_eq!(data.len_bits(), 3);
	assert_eq!(data.into_bytes(), vec![0x40]);
}

proptest! {
	#[test]
	fn constrained_whole_number_round_trips(
		min in -65536i128..65536,
		span in 0i128..200_000,
		offset in 0i128..200_000,
	) {
		let max = min + span;
		let value = min + offset % (span + 1);
		let mut data = PerCodecData::new();
		encode::encode_constrained_whole_number(&mut data, value, min, max, false).unwrap();
		let mut data = PerCodecData::from_slice(&data.into_bytes());
		prop_assert_eq!(
			decode::decode_constrained_whole_number(&mut data, min, max, false).unwrap(),
			value
		);
	}

	#[test]
	fn octet_string_round_trips(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
		let mut data = PerCodecData::new();
		encode::encode_octet_string(&mut data, &bytes, 0, UNBOUNDED, false).unwrap();
		let mut data = PerCodecData::from_slice(&data.into_bytes());
		prop_assert_eq!(
			decode::decode_octet_string(&mut data, 0, UNBOUNDED, false).unwrap(),
			bytes
		);
	}

	#[test]
	fn bounded_octet_string_round_trips(bytes in proptest::collection::vec(any::<u8>(), 1..32)) {
		let mut data = PerCodecData::new();
		encode::encode_octet_string(&mut data, &bytes, 1, 32, false).unwrap();
		let mut data = PerCodecData::from_slice(&data.into_bytes());
		prop_assert_eq!(
			decode::decode_octet_string(&mut data, 1, 32, false).unwrap(),
			bytes
		);
	}
}
