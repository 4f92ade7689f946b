/***************************************************************************************************
 * Copyright (c) 2021-2026 Qualcomm Innovation Center, Inc. All rights reserved.
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
 * cbor_codec Error API
 *
 * Errors are split by which side of the codec raises them. `DecodeError` covers both recoverable
 * input-shaped failures (malformed encoding, EOF, type mismatch) and assertion-shaped misuse of the
 * decoder (requesting fields out of order, reading after the stream entered its error state); the
 * variant produced tells a caller which kind it got. `EncodeError` covers the encoder's value-count
 * and ordering assertions.
 **************************************************************************************************/
use std::result;

use thiserror::Error;

/// An alias for `Result<T, DecodeError>` used throughout the decode side of this crate.
pub type DecodeResult<T> = result::Result<T, DecodeError>;

/// An alias for `Result<T, EncodeError>` used throughout the encode side of this crate.
pub type EncodeResult<T> = result::Result<T, EncodeError>;

/// Errors raised while decoding CBOR.
///
/// The first group of variants are input-shaped: the bytes on the wire did not match what was
/// requested, or ran out before a value was complete. The second group are assertion-shaped: the
/// caller used the decoder in a way its state machine does not allow (see spec.md §7). Once any
/// variant is returned from a read, the decoder that produced it has moved to its `Error` state and
/// every later operation fails with [`DecodeError::PoisonedAfterError`] until `reset()`.
#[derive(Copy, Clone, Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The byte source ran out while a header or payload was still expected.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// Additional Information 28, 29 or 30 was seen on a head byte. Reserved by RFC 8949.
    #[error("reserved additional information value in header")]
    ReservedAdditionalInformation,
    /// A break byte (0xff) appeared where the current context does not allow one.
    #[error("break encountered outside an indefinite-length context that allows it")]
    UnexpectedBreak,
    /// Additional Information 31 (indefinite length) was seen on a major type that cannot be
    /// indefinite (0, 1, 6, 7).
    #[error("indefinite length is not legal for this major type")]
    IndefiniteNotAllowed,
    /// A typed reader (`int`, `array`, `blob`, ...) was called but the next header is a different
    /// CBOR type.
    #[error("CBOR type did not match the requested read")]
    UnexpectedType,
    /// `tag(Some(expected), ...)` was called but the decoded tag number differs.
    #[error("tag number did not match the expected value")]
    UnexpectedTag,
    /// A caller-supplied expected length did not match the actual decoded length.
    #[error("declared or expected length did not match the actual length")]
    LengthMismatch,
    /// Bytes decoded under major type 3 (text) were not valid UTF-8.
    #[error("text string payload was not valid UTF-8")]
    InvalidUtf8,
    /// An indefinite-length map's reader produced an odd number of values (dangling key).
    #[error("map payload had an odd number of key/value slots")]
    OddMapLength,
    /// A read-one scope's callback did not fully consume the payload it was given.
    #[error("callback did not consume the declared payload exactly")]
    PayloadNotFullyConsumed,
    /// The requested `header_argument` overflowed the target integer type.
    #[error("decoded integer value is out of range for the requested type")]
    OutOfRange,
    /// `obj()` field probing was asked for a field id at or below the last consumed id.
    #[error("requested field id is not strictly greater than the previously consumed field id")]
    FieldProbeOutOfOrder,
    /// A read was attempted after the decoder already entered its terminal error state.
    #[error("decoder is in the terminal error state; call reset() before reading again")]
    PoisonedAfterError,
    /// Internal invariant failure: `payload_remaining` went negative where a non-negative count
    /// was required. Indicates a bug in this crate rather than malformed input.
    #[error("internal decoder state went negative where a count was required")]
    NegativeRemaining,
}

/// Errors raised while encoding CBOR. All are assertion violations: the caller's callback did not
/// respect the contract of the scope it was given (spec.md §7).
#[derive(Copy, Clone, Error, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// A sized scope (`array(n, ..)`, `map(n, ..)`, `tag`, `blob(size, ..)`) declared a value count
    /// or byte length that the callback's actual output did not match.
    #[error("callback wrote a different number of values or bytes than the scope declared")]
    ValueCountMismatch,
    /// `map(writer)` (indefinite) was given a callback that wrote an odd number of values.
    #[error("indefinite map callback wrote an odd number of values")]
    OddMapLength,
    /// `obj`/`implicit_obj` field writer was asked to emit a field id that is not strictly greater
    /// than the previously emitted field id.
    #[error("field id is not strictly greater than the previously emitted field id")]
    NonMonotonicFieldId,
    /// `implicit_obj` writer emitted an odd number of values.
    #[error("implicit object callback wrote an odd number of values")]
    OddFieldCount,
    /// A declared `blob(size, writer)` length did not match the bytes the writer actually wrote.
    #[error("declared blob size did not match the number of bytes written")]
    BlobSizeMismatch,
}
