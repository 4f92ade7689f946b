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
/// # One-shot convenience helpers
///
/// Most callers decoding or encoding a single complete value in memory don't want to construct a
/// `Decoder`/`Encoder` and a `MemoryBuffer` themselves. `to_vec`/`from_slice` do that bookkeeping.
use crate::bytes::MemoryBuffer;
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::{DecodeError, DecodeResult};
use crate::value::CborValue;

/// Encode `v` to a freshly allocated byte vector.
pub fn to_vec(v: &CborValue) -> Vec<u8> {
    let mut enc = Encoder::new(MemoryBuffer::new());
    // `value()` only fails on EncodeError, which a well-formed CborValue tree cannot trigger:
    // every scope it opens supplies the exact value count it asserts.
    enc.value(v).expect("CborValue tree is always encodable");
    enc.into_inner().as_slice().to_vec()
}

/// Decode exactly one value from `bytes`, requiring the entire slice to be consumed.
pub fn from_slice(bytes: &[u8]) -> DecodeResult<CborValue> {
    let mut dec = Decoder::new(MemoryBuffer::from_slice(bytes));
    let v = dec.value()?;
    if !dec.at_eof() {
        return Err(DecodeError::PayloadNotFullyConsumed);
    }
    Ok(v)
}

/// Template for mapping a small closed set of values to/from CBOR integers, the way a field id or
/// a protocol enum typically is. Implement this on an enum and its `CborValue` round trip follows
/// `to_code`/`from_code` rather than hand-written match arms at every call site.
pub trait EnumCode: Sized {
    /// The wire representation of `self`.
    fn to_code(&self) -> i64;
    /// Reconstruct a value from its wire representation, or `None` if `code` is not a member.
    fn from_code(code: i64) -> Option<Self>;
}
