// Decoder behavior over nested containers, indefinite forms, field probing, skipping and the
// decoder's error/poisoned-state handling.

use cbor_codec::bytes::MemoryBuffer;
use cbor_codec::decode::Decoder;
use cbor_codec::error::DecodeError;
use cbor_codec::CborValue;

fn decoder(bytes: &[u8]) -> Decoder<MemoryBuffer<'_>> {
    Decoder::new(MemoryBuffer::from_slice(bytes))
}

#[test]
fn nested_arrays_decode_as_generic_values() {
    // [1, [2, 3], [4, [5, 6]]]
    let bytes = [
        0x83, 0x01, 0x82, 0x02, 0x03, 0x82, 0x04, 0x82, 0x05, 0x06,
    ];
    let mut dec = decoder(&bytes);
    let v = dec.value().unwrap();
    assert_eq!(
        v,
        CborValue::Array(vec![
            CborValue::Int(1),
            CborValue::Array(vec![CborValue::Int(2), CborValue::Int(3)]),
            CborValue::Array(vec![
                CborValue::Int(4),
                CborValue::Array(vec![CborValue::Int(5), CborValue::Int(6)]),
            ]),
        ])
    );
    assert!(dec.at_eof());
}

#[test]
fn indefinite_map_of_arrays_decodes() {
    // {_ 1: [_ 2, 3]}
    let bytes = [0xbf, 0x01, 0x9f, 0x02, 0x03, 0xff, 0xff];
    let mut dec = decoder(&bytes);
    let v = dec.value().unwrap();
    assert_eq!(
        v,
        CborValue::Map(vec![(
            CborValue::Int(1),
            CborValue::Array(vec![CborValue::Int(2), CborValue::Int(3)])
        )])
    );
}

#[test]
fn typed_array_rejects_wrong_inner_type() {
    // [1, "two"]
    let bytes = [0x82, 0x01, 0x63, b't', b'w', b'o'];
    let mut dec = decoder(&bytes);
    let err = dec.array(Decoder::int_body).unwrap_err();
    assert_eq!(err, DecodeError::UnexpectedType);
}

#[test]
fn field_probing_skips_unrequested_entries() {
    // {0: 1, 1: "skip me", 2: 99}
    let bytes = [
        0xa3, 0x00, 0x01, 0x01, 0x67, b's', b'k', b'i', b'p', b' ', b'm', b'e', 0x02, 0x18, 0x63,
    ];
    let mut dec = decoder(&bytes);
    let v = dec
        .obj(|p| {
            let a = p.field(0, Decoder::int_body)?;
            let b = p.field(2, Decoder::int_body)?;
            Ok((a, b))
        })
        .unwrap();
    assert_eq!(v, (Some(1), Some(99)));
    assert!(dec.at_eof());
}

#[test]
fn skip_drains_an_indefinite_nested_structure() {
    // [_ 1, {_ 2: 3}]
    let bytes = [0x9f, 0x01, 0xbf, 0x02, 0x03, 0xff, 0xff];
    let mut dec = decoder(&bytes);
    assert!(dec.skip().unwrap());
    assert!(dec.at_eof());
}

#[test]
fn truncated_array_header_is_unexpected_eof() {
    let mut dec = decoder(&[0x1a, 0x00]);
    assert_eq!(dec.int().unwrap_err(), DecodeError::UnexpectedEof);
}

#[test]
fn decoder_is_poisoned_after_an_error_until_reset() {
    let mut dec = decoder(&[0xff]);
    assert_eq!(dec.int().unwrap_err(), DecodeError::UnexpectedBreak);
    assert_eq!(dec.int().unwrap_err(), DecodeError::PoisonedAfterError);
    dec.reset();
    assert!(dec.at_eof());
}

#[test]
fn next_value_returns_none_at_clean_end_of_sequence() {
    let mut dec = decoder(&[0x01]);
    assert_eq!(dec.next_value().unwrap(), Some(CborValue::Int(1)));
    assert_eq!(dec.next_value().unwrap(), None);
}

#[test]
fn indefinite_text_split_across_a_multibyte_codepoint() {
    // (_ "caf\xc3", "\xa9!") — the 'é' (c3 a9) is split across the chunk boundary.
    let bytes = [
        0x7f, 0x44, b'c', b'a', b'f', 0xc3, 0x42, 0xa9, b'!', 0xff,
    ];
    let mut dec = decoder(&bytes);
    assert_eq!(dec.string().unwrap(), "café!");
}
