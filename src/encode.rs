/***************************************************************************************************
 * Copyright (c) 2020-2026 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/// # CBOR encoder
///
/// Unlike a fixed-buffer encoder that must fix up container lengths after the fact, this encoder
/// writes straight through a [`ByteWrite`] sink: every scope that takes a writer callback (tag,
/// sized array/map, obj, size-checked blob) is required to know its own length up front, so the
/// header is always written before the body and nothing is ever rewritten in place.
use crate::bytes::ByteWrite;
use crate::constants::*;
use crate::error::{EncodeError, EncodeResult};
use crate::value::CborValue;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// A streaming CBOR encoder over any [`ByteWrite`] sink.
#[derive(Debug)]
pub struct Encoder<W: ByteWrite> {
    pub(crate) writer: W,
    values_written: u64,
    next_field_at_least: u32,
}

impl<W: ByteWrite> Encoder<W> {
    /// Wrap `writer` in a fresh encoder.
    pub fn new(writer: W) -> Self {
        Encoder {
            writer,
            values_written: 0,
            next_field_at_least: 0,
        }
    }

    /// Consume the encoder, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_header(&mut self, major: u8, argument: u64) -> EncodeResult<()> {
        if argument < PAYLOAD_AI_BITS as u64 {
            self.writer.write_raw_be(major as u64 | argument, 1);
        } else if argument <= u8::MAX as u64 {
            self.writer.write_raw_be(major as u64 | PAYLOAD_ONE_BYTE as u64, 1);
            self.writer.write_raw_be(argument, 1);
        } else if argument <= u16::MAX as u64 {
            self.writer.write_raw_be(major as u64 | PAYLOAD_TWO_BYTES as u64, 1);
            self.writer.write_raw_be(argument, 2);
        } else if argument <= u32::MAX as u64 {
            self.writer.write_raw_be(major as u64 | PAYLOAD_FOUR_BYTES as u64, 1);
            self.writer.write_raw_be(argument, 4);
        } else {
            self.writer.write_raw_be(major as u64 | PAYLOAD_EIGHT_BYTES as u64, 1);
            self.writer.write_raw_be(argument, 8);
        }
        self.values_written += 1;
        Ok(())
    }

    fn write_indefinite_header(&mut self, major: u8) {
        self.writer.write_raw_be(major as u64 | PAYLOAD_INDEFINITE_OR_BREAK as u64, 1);
    }

    fn write_break(&mut self) {
        self.writer
            .write_raw_be(MT_SIMPLE as u64 | PAYLOAD_INDEFINITE_OR_BREAK as u64, 1);
    }

    /// Run `body` inside a new value-count scope, asserting it produced exactly `expected` top
    /// level values (spec.md §4.3's value-count assertion discipline).
    fn counted_scope<T>(
        &mut self,
        expected: u64,
        body: impl FnOnce(&mut Self) -> EncodeResult<T>,
    ) -> EncodeResult<T> {
        let before = self.values_written;
        let result = body(self)?;
        let produced = self.values_written - before;
        if produced != expected {
            return Err(EncodeError::ValueCountMismatch);
        }
        Ok(result)
    }

    /// Write a required `Int`, using major 0 for non-negative and major 1 for negative values.
    #[cfg_attr(feature = "trace", trace)]
    pub fn int(&mut self, v: i64) -> EncodeResult<()> {
        if v < 0 {
            self.write_header(MT_NINT, (-(v + 1)) as u64)
        } else {
            self.write_header(MT_UINT, v as u64)
        }
    }

    /// Write a required `Bool`.
    pub fn boolean(&mut self, v: bool) -> EncodeResult<()> {
        self.write_header(MT_SIMPLE, if v { SIMPLE_TRUE } else { SIMPLE_FALSE } as u64)
    }

    /// Write a required `Null`.
    pub fn null(&mut self) -> EncodeResult<()> {
        self.write_header(MT_SIMPLE, SIMPLE_NULL as u64)
    }

    /// Write a required `Undefined`.
    pub fn undefined(&mut self) -> EncodeResult<()> {
        self.write_header(MT_SIMPLE, SIMPLE_UNDEFINED as u64)
    }

    /// Write a half-precision float, fixed at 3 bytes.
    #[cfg(feature = "float")]
    pub fn float16(&mut self, v: f64) -> EncodeResult<()> {
        let bits = crate::f16::f64_to_f16_bits(v);
        self.writer
            .write_raw_be(MT_SIMPLE as u64 | AI_FLOAT16 as u64, 1);
        self.writer.write_raw_be(bits as u64, 2);
        self.values_written += 1;
        Ok(())
    }

    /// Write a single-precision float, fixed at 5 bytes.
    #[cfg(feature = "float")]
    pub fn float32(&mut self, v: f32) -> EncodeResult<()> {
        self.writer
            .write_raw_be(MT_SIMPLE as u64 | AI_FLOAT32 as u64, 1);
        self.writer.write_raw_be(v.to_bits() as u64, 4);
        self.values_written += 1;
        Ok(())
    }

    /// Write a double-precision float, fixed at 9 bytes.
    #[cfg(feature = "float")]
    pub fn float64(&mut self, v: f64) -> EncodeResult<()> {
        self.writer
            .write_raw_be(MT_SIMPLE as u64 | AI_FLOAT64 as u64, 1);
        self.writer.write_raw_be(v.to_bits(), 8);
        self.values_written += 1;
        Ok(())
    }

    /// Write a definite-length blob of exactly `bytes`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn blob(&mut self, bytes: &[u8]) -> EncodeResult<()> {
        self.write_header(MT_BSTR, bytes.len() as u64)?;
        self.writer.write_raw(bytes);
        Ok(())
    }

    /// Write a definite-length blob of declared `size`, checking that `writer` emitted exactly
    /// that many bytes.
    pub fn blob_sized(
        &mut self,
        size: u64,
        writer: impl FnOnce(&mut W) -> EncodeResult<()>,
    ) -> EncodeResult<()> {
        self.write_header(MT_BSTR, size)?;
        let before = self.writer.total_written_bytes();
        writer(&mut self.writer)?;
        let written = self.writer.total_written_bytes() - before;
        if written != size {
            return Err(EncodeError::BlobSizeMismatch);
        }
        Ok(())
    }

    /// Write an indefinite blob: each call the sub-writer makes to its `ChunkProxy` becomes one
    /// definite chunk, framed automatically, terminated by a break. `writer` returns `true` to
    /// request another chunk, `false` once it has written everything.
    pub fn blob_indefinite(
        &mut self,
        mut writer: impl FnMut(&mut ChunkProxy) -> EncodeResult<bool>,
    ) -> EncodeResult<()> {
        self.write_indefinite_header(MT_BSTR);
        loop {
            let mut chunk = Vec::new();
            let more = {
                let mut push = |bytes: &[u8]| chunk.extend_from_slice(bytes);
                let mut proxy = ChunkProxy { push: &mut push };
                writer(&mut proxy)?
            };
            if !chunk.is_empty() {
                self.write_header(MT_BSTR, chunk.len() as u64)?;
                self.writer.write_raw(&chunk);
            }
            if !more {
                break;
            }
        }
        self.write_break();
        self.values_written += 1;
        Ok(())
    }

    /// Write a required UTF-8 `Text` string.
    #[cfg_attr(feature = "trace", trace)]
    pub fn string(&mut self, s: &str) -> EncodeResult<()> {
        self.write_header(MT_TSTR, s.len() as u64)?;
        self.writer.write_raw(s.as_bytes());
        Ok(())
    }

    /// Write a tag header followed by exactly one value from `writer`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn tag(
        &mut self,
        tag: u64,
        writer: impl FnOnce(&mut Self) -> EncodeResult<()>,
    ) -> EncodeResult<()> {
        self.write_header(MT_TAG, tag)?;
        self.counted_scope(1, writer)
    }

    /// Write a definite-length array; `writer` must emit exactly `length` values.
    #[cfg_attr(feature = "trace", trace)]
    pub fn array(
        &mut self,
        length: u64,
        writer: impl FnOnce(&mut Self) -> EncodeResult<()>,
    ) -> EncodeResult<()> {
        self.write_header(MT_ARRAY, length)?;
        self.counted_scope(length, writer)
    }

    /// Write an indefinite-length array.
    pub fn array_indefinite(
        &mut self,
        writer: impl FnOnce(&mut Self) -> EncodeResult<()>,
    ) -> EncodeResult<()> {
        self.write_indefinite_header(MT_ARRAY);
        writer(self)?;
        self.write_break();
        self.values_written += 1;
        Ok(())
    }

    /// Write a collection as a definite-length array via `serialize`.
    pub fn array_from<T>(
        &mut self,
        items: &[T],
        mut serialize: impl FnMut(&mut Self, &T) -> EncodeResult<()>,
    ) -> EncodeResult<()> {
        self.array(items.len() as u64, |enc| {
            for item in items {
                serialize(enc, item)?;
            }
            Ok(())
        })
    }

    /// Write a definite-length map; `writer` must emit exactly `2 * length` values, alternating
    /// key/value.
    #[cfg_attr(feature = "trace", trace)]
    pub fn map(
        &mut self,
        length: u64,
        writer: impl FnOnce(&mut Self) -> EncodeResult<()>,
    ) -> EncodeResult<()> {
        self.write_header(MT_MAP, length)?;
        self.counted_scope(2 * length, writer)
    }

    /// Write an indefinite-length map; `writer` must emit an even number of values.
    pub fn map_indefinite(
        &mut self,
        writer: impl FnOnce(&mut Self) -> EncodeResult<()>,
    ) -> EncodeResult<()> {
        self.write_indefinite_header(MT_MAP);
        let before = self.values_written;
        writer(self)?;
        if (self.values_written - before) % 2 != 0 {
            return Err(EncodeError::OddMapLength);
        }
        self.write_break();
        self.values_written += 1;
        Ok(())
    }

    /// Write a collection of key/value pairs as a definite-length map.
    pub fn map_from<K, V>(
        &mut self,
        entries: &[(K, V)],
        mut key_s: impl FnMut(&mut Self, &K) -> EncodeResult<()>,
        mut value_s: impl FnMut(&mut Self, &V) -> EncodeResult<()>,
    ) -> EncodeResult<()> {
        self.map(entries.len() as u64, |enc| {
            for (k, v) in entries {
                key_s(enc, k)?;
                value_s(enc, v)?;
            }
            Ok(())
        })
    }

    /// Write a definite map whose keys are strictly increasing field ids, via an `ObjWriter`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn obj(
        &mut self,
        writer: impl FnOnce(&mut ObjWriter<W>) -> EncodeResult<()>,
    ) -> EncodeResult<()> {
        let saved_next_field = self.next_field_at_least;
        self.next_field_at_least = 0;
        let before = self.values_written;
        // Header length is not yet known (field count is determined by the callback), so fields
        // are staged into a scratch encoder and the definite map header is written once we know
        // how many pairs were produced.
        let mut staging = Encoder::new(crate::bytes::MemoryBuffer::new());
        {
            let mut probe = ObjWriter {
                enc: &mut staging,
            };
            writer(&mut probe)?;
        }
        let pairs = staging.values_written / 2;
        self.write_header(MT_MAP, pairs)?;
        self.writer.write_raw(staging.writer.as_slice());
        self.values_written = before + staging.values_written;
        self.next_field_at_least = saved_next_field;
        Ok(())
    }

    /// Write a generic [`CborValue`] tree.
    #[cfg_attr(feature = "trace", trace)]
    pub fn value(&mut self, v: &CborValue) -> EncodeResult<()> {
        match v {
            CborValue::Int(i) => self.int(*i),
            CborValue::Float(f, width) => self.write_float_value(*f, *width),
            CborValue::Text(s) => self.string(s),
            CborValue::Blob(b) => self.blob(b),
            CborValue::Array(items) => self.array(items.len() as u64, |enc| {
                for item in items {
                    enc.value(item)?;
                }
                Ok(())
            }),
            CborValue::Map(pairs) => self.map(pairs.len() as u64, |enc| {
                for (k, val) in pairs {
                    enc.value(k)?;
                    enc.value(val)?;
                }
                Ok(())
            }),
            CborValue::Tag(tag, inner) => self.tag(*tag, |enc| enc.value(inner)),
            CborValue::False => self.boolean(false),
            CborValue::True => self.boolean(true),
            CborValue::Null => self.null(),
            CborValue::Undefined => self.undefined(),
        }
    }

    #[cfg(feature = "float")]
    fn write_float_value(&mut self, f: f64, width: u8) -> EncodeResult<()> {
        match width {
            2 => self.float16(f),
            4 => self.float32(f as f32),
            8 => self.float64(f),
            _ => match crate::f16::narrowest_lossless_width(f) {
                crate::f16::FloatWidth::Half => self.float16(f),
                crate::f16::FloatWidth::Single => self.float32(f as f32),
                crate::f16::FloatWidth::Double => self.float64(f),
            },
        }
    }

    #[cfg(not(feature = "float"))]
    fn write_float_value(&mut self, _f: f64, _width: u8) -> EncodeResult<()> {
        Err(EncodeError::ValueCountMismatch)
    }
}

/// Proxy byte sink handed to an indefinite blob's sub-writer; each write call becomes one chunk.
pub struct ChunkProxy<'a> {
    push: &'a mut dyn FnMut(&[u8]),
}

impl<'a> ChunkProxy<'a> {
    /// Append bytes to the chunk currently being assembled.
    pub fn write(&mut self, bytes: &[u8]) {
        (self.push)(bytes)
    }
}

/// Drives field-by-field writing of one `obj` map, enforcing that field ids are written in
/// strictly increasing order (spec.md §4.3).
pub struct ObjWriter<'e, W: ByteWrite> {
    enc: &'e mut Encoder<W>,
}

impl<'e, W: ByteWrite> ObjWriter<'e, W> {
    /// Write field `id`'s value via `value_fn`, which must emit exactly one value.
    ///
    /// # Errors
    /// Returns [`EncodeError::NonMonotonicFieldId`] if `id` is not strictly greater than the id of
    /// the previously written field.
    pub fn field(
        &mut self,
        id: u32,
        value_fn: impl FnOnce(&mut Encoder<W>) -> EncodeResult<()>,
    ) -> EncodeResult<()> {
        if id < self.enc.next_field_at_least {
            return Err(EncodeError::NonMonotonicFieldId);
        }
        self.enc.int(id as i64)?;
        self.enc.counted_scope(1, value_fn)?;
        self.enc.next_field_at_least = id + 1;
        Ok(())
    }
}

/// Write a definite map's fields with no map header, as a bare top-level sequence of alternating
/// key/value pairs (spec.md §4.3's `implicit_obj`).
pub fn implicit_obj<W: ByteWrite>(
    enc: &mut Encoder<W>,
    writer: impl FnOnce(&mut ObjWriter<W>) -> EncodeResult<()>,
) -> EncodeResult<()> {
    let saved_next_field = enc.next_field_at_least;
    enc.next_field_at_least = 0;
    let before = enc.values_written;
    {
        let mut probe = ObjWriter { enc };
        writer(&mut probe)?;
    }
    if (enc.values_written - before) % 2 != 0 {
        return Err(EncodeError::OddFieldCount);
    }
    enc.next_field_at_least = saved_next_field;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes::MemoryBuffer;

    fn encoder() -> Encoder<MemoryBuffer<'static>> {
        Encoder::new(MemoryBuffer::new())
    }

    #[test]
    fn encodes_small_uint_on_one_byte() {
        let mut enc = encoder();
        enc.int(0).unwrap();
        assert_eq!(enc.into_inner().as_slice(), &[0x00]);
    }

    #[test]
    fn encodes_negative_int_via_major_one() {
        let mut enc = encoder();
        enc.int(-1).unwrap();
        assert_eq!(enc.into_inner().as_slice(), &[0x20]);
    }

    #[test]
    fn encodes_one_byte_argument_form() {
        let mut enc = encoder();
        enc.int(255).unwrap();
        assert_eq!(enc.into_inner().as_slice(), &[0x18, 0xff]);
    }

    #[test]
    fn array_rejects_wrong_value_count() {
        let mut enc = encoder();
        let err = enc
            .array(2, |enc| {
                enc.int(1)?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err, EncodeError::ValueCountMismatch);
    }

    #[test]
    fn map_rejects_odd_value_count() {
        let mut enc = encoder();
        let err = enc
            .map(1, |enc| {
                enc.int(1)?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err, EncodeError::ValueCountMismatch);
    }

    #[test]
    fn obj_rejects_non_monotonic_field_ids() {
        let mut enc = encoder();
        let err = enc
            .obj(|o| {
                o.field(2, |e| e.int(1))?;
                o.field(1, |e| e.int(2))
            })
            .unwrap_err();
        assert_eq!(err, EncodeError::NonMonotonicFieldId);
    }

    #[test]
    fn obj_writes_definite_map_header() {
        let mut enc = encoder();
        enc.obj(|o| {
            o.field(0, |e| e.int(10))?;
            o.field(5, |e| e.int(20))
        })
        .unwrap();
        let bytes = enc.into_inner();
        assert_eq!(bytes.as_slice(), &[0xa2, 0x00, 0x0a, 0x05, 0x14]);
    }

    #[test]
    fn value_round_trips_generic_array() {
        let mut enc = encoder();
        let v = CborValue::Array(vec![CborValue::Int(1), CborValue::Int(2)]);
        enc.value(&v).unwrap();
        assert_eq!(enc.into_inner().as_slice(), &[0x82, 0x01, 0x02]);
    }
}
