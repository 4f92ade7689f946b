/***************************************************************************************************
 * Copyright (c) 2020-2026, Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * cbor_codec module definition
 *
 * A streaming encoder and decoder for CBOR (RFC 8949), built around a reentrant state machine
 * rather than an explicit parse-context stack.
 **************************************************************************************************/
#![warn(missing_docs)]

//! # cbor_codec
//!
//! `cbor_codec` decodes and encodes CBOR (RFC 8949) over a stream abstraction rather than a single
//! in-memory slice, so large or chunked sources don't need to be materialized up front.
//!
//! ## Features
//!
//! - A [`decode::Decoder`] that drives typed reads (`int`, `blob`, `string`, `array`, `map`, `tag`)
//!   through nested "scopes" implemented on Rust's own call stack, instead of an explicit context
//!   stack.
//! - An [`encode::Encoder`] that writes the shortest-form header for every value and asserts, for
//!   every scope that takes a writer callback, that the callback produced exactly the value count
//!   it declared.
//! - [`field::ObjProbe`] / [`encode::ObjWriter`] for decoding and encoding "objects" modeled as
//!   maps with small integer field ids requested or written in strictly increasing order.
//! - An owned [`value::CborValue`] tree for callers that want to decode arbitrary CBOR without
//!   defining a schema, with [`diag`] producing RFC 8949 §8 diagnostic notation.
//!
//! ## Example
//!
//! ```
//! use cbor_codec::bytes::MemoryBuffer;
//! use cbor_codec::decode::Decoder;
//! use cbor_codec::encode::Encoder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut enc = Encoder::new(MemoryBuffer::new());
//!     enc.array(2, |enc| {
//!         enc.int(1)?;
//!         enc.int(2)
//!     })?;
//!     let bytes = enc.into_inner();
//!
//!     let mut dec = Decoder::new(MemoryBuffer::from_slice(bytes.as_slice()));
//!     let items = dec.array(Decoder::int_body)?;
//!     assert_eq!(items, vec![1, 2]);
//!     Ok(())
//! }
//! ```

#[cfg(feature = "float")]
extern crate half;

#[cfg(feature = "trace")]
extern crate func_trace;

extern crate thiserror;

/// Byte-oriented reader/writer abstraction and the in-memory / chunked implementations of it.
pub mod bytes;
/// Wire-format constants (major type bytes, additional-information thresholds).
pub mod constants;
/// The streaming decoder state machine.
pub mod decode;
/// Convenience one-shot helpers (`to_vec`, `from_slice`) and the `EnumCode` template.
pub mod convenience;
/// RFC 8949 §8 diagnostic notation.
pub mod diag;
/// The streaming encoder.
pub mod encode;
/// Error types shared by the decoder and encoder.
pub mod error;
/// Object/field probing shared between the decoder and encoder.
pub mod field;
/// Half-precision float conversion.
pub mod f16;
/// The owned generic value tree.
pub mod value;

pub use bytes::{ByteRead, ByteWrite, ChunkSource, ChunkedReader, MemoryBuffer};
pub use decode::{Decoder, HeaderType};
pub use encode::Encoder;
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
pub use field::ObjProbe;
pub use value::CborValue;
pub use convenience::{from_slice, to_vec, EnumCode};
