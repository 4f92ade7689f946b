// Encoder behavior: value-count assertions, shortest-form argument widths, indefinite writers and
// field-id monotonicity.

use cbor_codec::bytes::{ByteWrite, MemoryBuffer};
use cbor_codec::encode::Encoder;
use cbor_codec::error::EncodeError;

fn encoder() -> Encoder<MemoryBuffer<'static>> {
    Encoder::new(MemoryBuffer::new())
}

#[test]
fn argument_widths_follow_shortest_form() {
    let mut enc = encoder();
    enc.int(23).unwrap();
    enc.int(24).unwrap();
    enc.int(256).unwrap();
    enc.int(65536).unwrap();
    enc.int(4_294_967_296).unwrap();
    let bytes = enc.into_inner();
    assert_eq!(
        bytes.as_slice(),
        &[
            0x17, // 23: fits in the header byte
            0x18, 0x18, // 24: one-byte argument
            0x19, 0x01, 0x00, // 256: two-byte argument
            0x1a, 0x00, 0x01, 0x00, 0x00, // 65536: four-byte argument
            0x1b, 0, 0, 0, 1, 0, 0, 0, 0, // 2^32: eight-byte argument
        ]
    );
}

#[test]
fn negative_integers_use_major_type_one() {
    let mut enc = encoder();
    enc.int(-1).unwrap();
    enc.int(-100).unwrap();
    let bytes = enc.into_inner();
    assert_eq!(bytes.as_slice(), &[0x20, 0x38, 0x63]);
}

#[test]
fn indefinite_array_writer_is_not_value_count_checked() {
    let mut enc = encoder();
    enc.array_indefinite(|enc| {
        enc.int(1)?;
        enc.int(2)?;
        enc.int(3)
    })
    .unwrap();
    assert_eq!(
        enc.into_inner().as_slice(),
        &[0x9f, 0x01, 0x02, 0x03, 0xff]
    );
}

#[test]
fn indefinite_map_rejects_odd_value_count() {
    let mut enc = encoder();
    let err = enc
        .map_indefinite(|enc| {
            enc.int(1)?;
            enc.int(2)?;
            enc.int(3)
        })
        .unwrap_err();
    assert_eq!(err, EncodeError::OddMapLength);
}

#[test]
fn blob_sized_rejects_mismatched_byte_count() {
    let mut enc = encoder();
    let err = enc
        .blob_sized(3, |w| {
            w.write_raw(&[1, 2]);
            Ok(())
        })
        .unwrap_err();
    assert_eq!(err, EncodeError::BlobSizeMismatch);
}

#[test]
fn blob_indefinite_frames_each_sub_write_as_its_own_chunk() {
    let mut enc = encoder();
    let mut chunks = vec![b"AB".to_vec(), b"C".to_vec()];
    enc.blob_indefinite(|proxy| {
        let chunk = chunks.remove(0);
        proxy.write(&chunk);
        Ok(!chunks.is_empty())
    })
    .unwrap();
    assert_eq!(
        enc.into_inner().as_slice(),
        &[0x5f, 0x42, b'A', b'B', 0x41, b'C', 0xff]
    );
}

#[test]
fn array_from_serializes_a_slice() {
    let mut enc = encoder();
    enc.array_from(&[1i64, 2, 3], |enc, v| enc.int(*v)).unwrap();
    assert_eq!(enc.into_inner().as_slice(), &[0x83, 0x01, 0x02, 0x03]);
}

#[test]
fn map_from_serializes_pairs_in_order() {
    let mut enc = encoder();
    enc.map_from(&[(1i64, 10i64), (2, 20)], |enc, k| enc.int(*k), |enc, v| enc.int(*v))
        .unwrap();
    assert_eq!(
        enc.into_inner().as_slice(),
        &[0xa2, 0x01, 0x0a, 0x02, 0x14]
    );
}

#[test]
fn obj_rejects_non_monotonic_field_ids() {
    let mut enc = encoder();
    let err = enc
        .obj(|o| {
            o.field(3, |e| e.int(1))?;
            o.field(2, |e| e.int(2))
        })
        .unwrap_err();
    assert_eq!(err, EncodeError::NonMonotonicFieldId);
}

#[test]
fn obj_stages_fields_behind_a_single_definite_map_header() {
    let mut enc = encoder();
    enc.obj(|o| {
        o.field(0, |e| e.string("hello"))?;
        o.field(1, |e| e.boolean(true))
    })
    .unwrap();
    let bytes = enc.into_inner();
    assert_eq!(
        bytes.as_slice(),
        &[0xa2, 0x00, 0x65, b'h', b'e', b'l', b'l', b'o', 0x01, 0xf5]
    );
}
