// decode -> encode -> decode invariants: a value decoded from arbitrary (non-canonical) input
// always re-encodes to the RFC 8949 shortest form, and decoding that output reproduces the same
// value.

use cbor_codec::{from_slice, to_vec, CborValue};

fn round_trip(v: &CborValue) {
    let bytes = to_vec(v);
    let back = from_slice(&bytes).unwrap();
    assert_eq!(&back, v);
}

#[test]
fn scalars_round_trip() {
    round_trip(&CborValue::Int(0));
    round_trip(&CborValue::Int(-1));
    round_trip(&CborValue::Int(i64::MAX));
    round_trip(&CborValue::Int(i64::MIN));
    round_trip(&CborValue::True);
    round_trip(&CborValue::False);
    round_trip(&CborValue::Null);
    round_trip(&CborValue::Undefined);
    round_trip(&CborValue::Text("hello, world".to_owned()));
    round_trip(&CborValue::Blob(vec![0xde, 0xad, 0xbe, 0xef]));
}

#[test]
fn nested_containers_round_trip() {
    let v = CborValue::Array(vec![
        CborValue::Int(1),
        CborValue::Map(vec![(
            CborValue::Text("k".to_owned()),
            CborValue::Array(vec![CborValue::Int(2), CborValue::Int(3)]),
        )]),
        CborValue::Tag(0, Box::new(CborValue::Text("2013-03-21T20:04:00Z".to_owned()))),
    ]);
    round_trip(&v);
}

#[test]
fn non_canonical_long_form_argument_re_encodes_to_shortest_form() {
    // Value 0 encoded with an unnecessary 4-byte argument (major 0, AI 26).
    let bytes = [0x1a, 0x00, 0x00, 0x00, 0x00];
    let v = from_slice(&bytes).unwrap();
    assert_eq!(v, CborValue::Int(0));
    assert_eq!(to_vec(&v), vec![0x00]);
}

#[test]
fn indefinite_input_re_encodes_to_definite_shortest_form() {
    // [_ 1, 2] re-encodes as the definite [1, 2].
    let bytes = [0x9f, 0x01, 0x02, 0xff];
    let v = from_slice(&bytes).unwrap();
    assert_eq!(to_vec(&v), vec![0x82, 0x01, 0x02]);
}

#[test]
fn floats_preserve_their_source_width_through_a_round_trip() {
    // 1.0 as a half-precision float keeps its two-byte header on re-encode.
    let bytes = [0xf9, 0x3c, 0x00];
    let v = from_slice(&bytes).unwrap();
    assert_eq!(v, CborValue::Float(1.0, 2));
    assert_eq!(to_vec(&v), bytes);
}
