// Malformed and truncated input handling, plus a regression case for a nested-array encoding bug.

use cbor_codec::bytes::MemoryBuffer;
use cbor_codec::decode::Decoder;
use cbor_codec::encode::Encoder;
use cbor_codec::error::DecodeError;

fn decoder(bytes: &[u8]) -> Decoder<MemoryBuffer<'_>> {
    Decoder::new(MemoryBuffer::from_slice(bytes))
}

#[test]
fn nested_array_as_first_item_encodes_correctly() {
    // [[1, 2], [3, 4]]
    let mut enc = Encoder::new(MemoryBuffer::new());
    enc.array(2, |enc| {
        enc.array(2, |enc| {
            enc.int(1)?;
            enc.int(2)
        })?;
        enc.array(2, |enc| {
            enc.int(3)?;
            enc.int(4)
        })
    })
    .unwrap();
    assert_eq!(
        enc.into_inner().as_slice(),
        &[0x82, 0x82, 0x01, 0x02, 0x82, 0x03, 0x04]
    );
}

#[test]
fn empty_input_is_a_clean_end_of_sequence() {
    let mut dec = decoder(&[]);
    assert_eq!(dec.next_value().unwrap(), None);
}

#[test]
fn truncated_definite_blob_length_is_unexpected_eof() {
    // Header declares 10 bytes but only 2 follow.
    let mut dec = decoder(&[0x4a, 0x01, 0x02]);
    assert_eq!(dec.blob(None).unwrap_err(), DecodeError::UnexpectedEof);
}

#[test]
fn reserved_additional_information_bytes_are_rejected() {
    for head in [0x1c, 0x1d, 0x1e] {
        let mut dec = decoder(&[head]);
        assert_eq!(
            dec.int().unwrap_err(),
            DecodeError::ReservedAdditionalInformation
        );
    }
}

#[test]
fn indefinite_length_on_an_integer_major_type_is_rejected() {
    // Major type 0, additional information 31: nonsensical, not a legal encoding.
    let mut dec = decoder(&[0x1f]);
    assert_eq!(dec.int().unwrap_err(), DecodeError::IndefiniteNotAllowed);
}

#[test]
fn bare_break_with_no_enclosing_indefinite_context_is_rejected() {
    let mut dec = decoder(&[0xff]);
    assert_eq!(dec.int().unwrap_err(), DecodeError::UnexpectedBreak);
}

#[test]
fn indefinite_map_with_a_dangling_key_is_rejected() {
    // {_ 1: 2, 3 <break>} — a key with no paired value; the break is not legal where a value
    // header is required.
    let bytes = [0xbf, 0x01, 0x02, 0x03, 0xff];
    let mut dec = decoder(&bytes);
    assert_eq!(dec.value().unwrap_err(), DecodeError::UnexpectedBreak);
}

#[test]
fn truncated_utf8_text_body_is_unexpected_eof() {
    // Header declares 4 bytes of text, only 1 follows.
    let mut dec = decoder(&[0x64, b'I']);
    assert_eq!(dec.string().unwrap_err(), DecodeError::UnexpectedEof);
}

#[test]
fn invalid_utf8_in_a_definite_text_string_is_rejected() {
    let mut dec = decoder(&[0x41, 0xff]);
    assert_eq!(dec.string().unwrap_err(), DecodeError::InvalidUtf8);
}

#[test]
fn trailing_garbage_after_a_complete_value_is_rejected_by_from_slice() {
    let bytes = [0x01, 0x02];
    assert_eq!(
        cbor_codec::from_slice(&bytes).unwrap_err(),
        DecodeError::PayloadNotFullyConsumed
    );
}
