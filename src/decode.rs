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
/// # Decoder state machine
///
/// Nested reads are driven entirely by Rust's own call stack: every typed read is a "scope" that
/// snapshots the enclosing [`PayloadState`] in a local variable, resolves one header, runs a
/// caller-supplied body, and then folds the body's final state back into the snapshot. A nested
/// read inside that body repeats the same dance with its own local snapshot, so the decoder
/// itself only ever needs to remember the *current* position, never a stack of outer positions.
use crate::bytes::ByteRead;
use crate::constants::*;
use crate::error::{DecodeError, DecodeResult};
use crate::value::CborValue;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// The type of the most recently parsed header. `End` means the enclosing context has no more
/// values (a definite container is exhausted, an indefinite one hit its break, or the top-level
/// sequence ran out of bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderType {
    End,
    Int,
    Blob,
    Text,
    Array,
    Map,
    Tag,
    Bool,
    Null,
    Undefined,
    Float16,
    Float32,
    Float64,
}

/// The decoder's notion of "how much payload is left in the current context". Definite
/// containers and blob/text bodies carry an explicit count; everything else is one of the
/// sentinel states below (spec.md §3, §9 design note: an explicit enum rather than a sentinel
/// integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadState {
    /// Top level: an unlimited sequence of values until EOF.
    Sequence,
    /// A non-negative count of remaining items (array elements, map key+value slots, blob/text
    /// bytes, or the single pending value under a tag).
    Count(u32),
    /// Inside an indefinite blob, awaiting the next chunk header or a break.
    BlobChunks,
    /// Inside an indefinite text string, awaiting the next chunk header or a break.
    TextChunks,
    /// Inside an indefinite array, awaiting the next item header or a break.
    IndefiniteList,
    /// Inside an indefinite map, awaiting a key header or a break.
    IndefiniteMapNextKey,
    /// Inside an indefinite map, a key was just read; a value header must follow (no break here).
    IndefiniteMapNextValue,
    /// A break byte was just consumed; the enclosing scope should terminate on this pass.
    Break,
    /// Terminal: the decoder is unusable until [`Decoder::reset`].
    Error,
}

/// A streaming CBOR decoder over any [`ByteRead`] source.
///
/// `reset()` returns it to the initial top-level sequence state; every other operation is a typed
/// read performed through [`Decoder::read_scope`] (see the module documentation).
#[derive(Debug)]
pub struct Decoder<R: ByteRead> {
    pub(crate) reader: R,
    header_type: HeaderType,
    header_argument: u64,
    pub(crate) payload_remaining: PayloadState,
}

impl<R: ByteRead> Decoder<R> {
    /// Wrap `reader` in a fresh decoder positioned at the start of a top-level sequence.
    pub fn new(reader: R) -> Self {
        Decoder {
            reader,
            header_type: HeaderType::End,
            header_argument: 0,
            payload_remaining: PayloadState::Sequence,
        }
    }

    /// Restore the initial top-level sequence state. Required before reusing a decoder that
    /// entered [`PayloadState::Error`].
    pub fn reset(&mut self) {
        self.header_type = HeaderType::End;
        self.header_argument = 0;
        self.payload_remaining = PayloadState::Sequence;
    }

    /// The type of the most recently resolved header.
    pub fn header_type(&self) -> HeaderType {
        self.header_type
    }

    /// The raw argument of the most recently resolved header (see [`HeaderType`] docs for how to
    /// interpret it per type).
    pub fn header_argument(&self) -> u64 {
        self.header_argument
    }

    /// `true` once every byte the underlying source can currently supply has been consumed. Per
    /// spec.md §8, a successful top-level decode always leaves this `true`.
    pub fn at_eof(&self) -> bool {
        !self.reader.can_read(1)
    }

    fn fail<T>(&mut self, e: DecodeError) -> DecodeResult<T> {
        self.payload_remaining = PayloadState::Error;
        Err(e)
    }

    fn check_context_allows(&mut self, major: u8) -> DecodeResult<()> {
        match self.payload_remaining {
            PayloadState::BlobChunks if major != MT_BSTR => self.fail(DecodeError::UnexpectedType),
            PayloadState::TextChunks if major != MT_TSTR => self.fail(DecodeError::UnexpectedType),
            _ => Ok(()),
        }
    }

    fn read_arg(&mut self, width: usize) -> DecodeResult<u64> {
        match self.reader.read_raw_be(width) {
            Some(v) => Ok(v),
            None => self.fail(DecodeError::UnexpectedEof),
        }
    }

    fn consume_break(&mut self) -> DecodeResult<HeaderType> {
        match self.payload_remaining {
            PayloadState::BlobChunks
            | PayloadState::TextChunks
            | PayloadState::IndefiniteList
            | PayloadState::IndefiniteMapNextKey => {
                self.payload_remaining = PayloadState::Break;
                self.header_type = HeaderType::End;
                Ok(HeaderType::End)
            }
            _ => self.fail(DecodeError::UnexpectedBreak),
        }
    }

    fn open_indefinite(&mut self, major: u8) -> DecodeResult<HeaderType> {
        self.header_argument = 0;
        self.header_type = match major {
            MT_BSTR => {
                self.payload_remaining = PayloadState::BlobChunks;
                HeaderType::Blob
            }
            MT_TSTR => {
                self.payload_remaining = PayloadState::TextChunks;
                HeaderType::Text
            }
            MT_ARRAY => {
                self.payload_remaining = PayloadState::IndefiniteList;
                HeaderType::Array
            }
            MT_MAP => {
                self.payload_remaining = PayloadState::IndefiniteMapNextKey;
                HeaderType::Map
            }
            _ => unreachable!("caller already checked major is a container type"),
        };
        Ok(self.header_type)
    }

    fn resolve_header(&mut self, major: u8, argument: u64) -> DecodeResult<HeaderType> {
        match major {
            MT_UINT => {
                self.header_type = HeaderType::Int;
                self.header_argument = argument as i64 as u64;
                self.payload_remaining = PayloadState::Count(0);
            }
            MT_NINT => {
                self.header_type = HeaderType::Int;
                let value: i64 = -(argument as i64) - 1;
                self.header_argument = value as u64;
                self.payload_remaining = PayloadState::Count(0);
            }
            MT_BSTR => {
                if !self.reader.can_read(argument as usize) {
                    return self.fail(DecodeError::UnexpectedEof);
                }
                self.header_type = HeaderType::Blob;
                self.header_argument = argument;
                self.payload_remaining = PayloadState::Count(argument as u32);
            }
            MT_TSTR => {
                if !self.reader.can_read(argument as usize) {
                    return self.fail(DecodeError::UnexpectedEof);
                }
                self.header_type = HeaderType::Text;
                self.header_argument = argument;
                self.payload_remaining = PayloadState::Count(argument as u32);
            }
            MT_ARRAY => {
                self.header_type = HeaderType::Array;
                self.header_argument = argument;
                self.payload_remaining = PayloadState::Count(argument as u32);
            }
            MT_MAP => {
                self.header_type = HeaderType::Map;
                self.header_argument = argument;
                self.payload_remaining = PayloadState::Count(2 * argument as u32);
            }
            MT_TAG => {
                self.header_type = HeaderType::Tag;
                self.header_argument = argument;
                self.payload_remaining = PayloadState::Count(1);
            }
            MT_SIMPLE => {
                self.payload_remaining = PayloadState::Count(0);
                match argument as u8 {
                    SIMPLE_FALSE => {
                        self.header_type = HeaderType::Bool;
                        self.header_argument = 0;
                    }
                    SIMPLE_TRUE => {
                        self.header_type = HeaderType::Bool;
                        self.header_argument = 1;
                    }
                    SIMPLE_NULL => self.header_type = HeaderType::Null,
                    SIMPLE_UNDEFINED => self.header_type = HeaderType::Undefined,
                    AI_FLOAT16 => {
                        self.header_type = HeaderType::Float16;
                        self.header_argument = argument;
                    }
                    AI_FLOAT32 => {
                        self.header_type = HeaderType::Float32;
                        self.header_argument = argument;
                    }
                    AI_FLOAT64 => {
                        self.header_type = HeaderType::Float64;
                        self.header_argument = argument;
                    }
                    _ => return self.fail(DecodeError::UnexpectedType),
                }
            }
            _ => unreachable!("major is masked to one of the eight values above"),
        }
        Ok(self.header_type)
    }

    /// Resolve the next header, per spec.md §4.4. Returns `HeaderType::End` (without consuming a
    /// byte) when the current context is legitimately exhausted.
    #[cfg_attr(feature = "trace", trace)]
    pub fn read_header(&mut self) -> DecodeResult<HeaderType> {
        match self.payload_remaining {
            PayloadState::Error => return Err(DecodeError::PoisonedAfterError),
            PayloadState::Count(0) | PayloadState::Break => {
                self.header_type = HeaderType::End;
                return Ok(HeaderType::End);
            }
            _ => {}
        }
        if !self.reader.can_read(1) {
            return match self.payload_remaining {
                PayloadState::Sequence => {
                    self.header_type = HeaderType::End;
                    Ok(HeaderType::End)
                }
                _ => self.fail(DecodeError::UnexpectedEof),
            };
        }
        let byte = self.reader.read_u8_or(0);
        let major = byte & 0b111_00000;
        let minor = byte & AI_MASK;

        if minor == PAYLOAD_INDEFINITE_OR_BREAK {
            if major == MT_SIMPLE {
                return self.consume_break();
            }
            if !matches!(major, MT_BSTR | MT_TSTR | MT_ARRAY | MT_MAP) {
                return self.fail(DecodeError::IndefiniteNotAllowed);
            }
            self.check_context_allows(major)?;
            return self.open_indefinite(major);
        }

        if PAYLOAD_RESERVED.contains(&minor) {
            return self.fail(DecodeError::ReservedAdditionalInformation);
        }

        self.check_context_allows(major)?;

        let argument: u64 = match minor {
            0..=23 => minor as u64,
            PAYLOAD_ONE_BYTE => self.read_arg(1)?,
            PAYLOAD_TWO_BYTES => self.read_arg(2)?,
            PAYLOAD_FOUR_BYTES => self.read_arg(4)?,
            PAYLOAD_EIGHT_BYTES => self.read_arg(8)?,
            _ => unreachable!("minor is masked to 0..=31 and every other case handled above"),
        };

        self.resolve_header(major, argument)
    }

    pub(crate) fn read_value_end(&mut self, outer: PayloadState) -> DecodeResult<()> {
        let new_outer = match self.payload_remaining {
            PayloadState::Break => match outer {
                PayloadState::IndefiniteList
                | PayloadState::IndefiniteMapNextKey
                | PayloadState::BlobChunks
                | PayloadState::TextChunks => PayloadState::Count(0),
                _ => return self.fail(DecodeError::UnexpectedBreak),
            },
            PayloadState::Count(0) => match outer {
                PayloadState::Sequence => PayloadState::Sequence,
                PayloadState::Count(n) => {
                    if n == 0 {
                        return self.fail(DecodeError::NegativeRemaining);
                    }
                    PayloadState::Count(n - 1)
                }
                PayloadState::IndefiniteMapNextKey => PayloadState::IndefiniteMapNextValue,
                PayloadState::IndefiniteMapNextValue => PayloadState::IndefiniteMapNextKey,
                PayloadState::IndefiniteList => PayloadState::IndefiniteList,
                PayloadState::BlobChunks => PayloadState::BlobChunks,
                PayloadState::TextChunks => PayloadState::TextChunks,
                _ => return self.fail(DecodeError::NegativeRemaining),
            },
            _ => return self.fail(DecodeError::PayloadNotFullyConsumed),
        };
        self.payload_remaining = new_outer;
        Ok(())
    }

    /// Run one "read-one" scope (spec.md §4.4): snapshot the current context, resolve a header,
    /// run `body` with that header, then fold the result back. `Ok(None)` means the context was
    /// already exhausted (`End`) and `body` never ran; callers that require a value map that to
    /// [`DecodeError::UnexpectedEof`].
    pub(crate) fn read_scope<T>(
        &mut self,
        body: impl FnOnce(&mut Self, HeaderType) -> DecodeResult<T>,
    ) -> DecodeResult<Option<T>> {
        let outer = self.payload_remaining;
        let ht = self.read_header()?;
        if ht == HeaderType::End {
            return Ok(None);
        }
        match body(self, ht) {
            Ok(v) => {
                self.read_value_end(outer)?;
                Ok(Some(v))
            }
            Err(e) => {
                self.payload_remaining = PayloadState::Error;
                Err(e)
            }
        }
    }

    fn require<T>(opt: DecodeResult<Option<T>>) -> DecodeResult<T> {
        opt.and_then(|o| o.ok_or(DecodeError::UnexpectedEof))
    }

    /// Interpret an already-resolved `Int` header. Used as an item reader for
    /// [`Decoder::array`]/[`Decoder::map`] over homogeneous integer containers.
    pub fn int_body(dec: &mut Self, ht: HeaderType) -> DecodeResult<i64> {
        if ht != HeaderType::Int {
            return Err(DecodeError::UnexpectedType);
        }
        Ok(dec.header_argument as i64)
    }

    /// Read a required `Int` value (spec.md §4.4).
    #[cfg_attr(feature = "trace", trace)]
    pub fn int(&mut self) -> DecodeResult<i64> {
        let r = self.read_scope(Self::int_body);
        Self::require(r)
    }

    /// As [`Decoder::int`], saturating the result to the `i32` range rather than failing on
    /// overflow (spec.md §9 design note: the dual behavior is intentional).
    pub fn int32(&mut self) -> DecodeResult<i32> {
        let v = self.int()?;
        Ok(v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }

    /// Read a required `Bool` value.
    pub fn boolean(&mut self) -> DecodeResult<bool> {
        let r = self.read_scope(|dec, ht| {
            if ht != HeaderType::Bool {
                return Err(DecodeError::UnexpectedType);
            }
            Ok(dec.header_argument != 0)
        });
        Self::require(r)
    }

    /// Read a required `Null` value.
    pub fn null(&mut self) -> DecodeResult<()> {
        let r = self.read_scope(|_, ht| {
            if ht != HeaderType::Null {
                return Err(DecodeError::UnexpectedType);
            }
            Ok(())
        });
        Self::require(r)
    }

    /// Read a required `Undefined` value.
    pub fn undefined(&mut self) -> DecodeResult<()> {
        let r = self.read_scope(|_, ht| {
            if ht != HeaderType::Undefined {
                return Err(DecodeError::UnexpectedType);
            }
            Ok(())
        });
        Self::require(r)
    }

    /// Read a required float of any width, widened to `f64` (spec.md §4.4).
    #[cfg(feature = "float")]
    pub fn float(&mut self) -> DecodeResult<f64> {
        let r = self.read_scope(|dec, ht| match ht {
            HeaderType::Float16 => Ok(crate::f16::f16_bits_to_f64(dec.header_argument as u16)),
            HeaderType::Float32 => Ok(f32::from_bits(dec.header_argument as u32) as f64),
            HeaderType::Float64 => Ok(f64::from_bits(dec.header_argument)),
            _ => Err(DecodeError::UnexpectedType),
        });
        Self::require(r)
    }

    /// Read a required `Tag`, checking the tag number if `expected` is given, then run `reader`
    /// on the exactly-one inner value.
    #[cfg_attr(feature = "trace", trace)]
    pub fn tag<T>(
        &mut self,
        expected: Option<u64>,
        reader: impl FnOnce(&mut Self) -> DecodeResult<T>,
    ) -> DecodeResult<T> {
        let r = self.read_scope(|dec, ht| {
            if ht != HeaderType::Tag {
                return Err(DecodeError::UnexpectedType);
            }
            if let Some(exp) = expected {
                if dec.header_argument != exp {
                    return Err(DecodeError::UnexpectedTag);
                }
            }
            reader(dec)
        });
        Self::require(r)
    }

    /// Pull up to `buf.len()` raw payload bytes for the current Blob/Text scope, transparently
    /// advancing across indefinite-length chunk boundaries. `chunk_major` is `MT_BSTR` or
    /// `MT_TSTR`, matching the type being decoded.
    fn payload_read_raw(
        &mut self,
        buf: &mut [u8],
        indefinite: bool,
        chunk_major: u8,
    ) -> DecodeResult<usize> {
        let mut written = 0;
        while written < buf.len() {
            match self.payload_remaining {
                PayloadState::BlobChunks | PayloadState::TextChunks => {
                    match self.read_header()? {
                        HeaderType::End => break,
                        _ => continue,
                    }
                }
                PayloadState::Count(0) => {
                    if indefinite {
                        self.payload_remaining = if chunk_major == MT_BSTR {
                            PayloadState::BlobChunks
                        } else {
                            PayloadState::TextChunks
                        };
                        continue;
                    }
                    break;
                }
                PayloadState::Count(n) => {
                    let want = std::cmp::min(n as usize, buf.len() - written);
                    let got = self.reader.read_raw(&mut buf[written..written + want]);
                    if got == 0 {
                        return self.fail(DecodeError::UnexpectedEof);
                    }
                    self.payload_remaining = PayloadState::Count(n - got as u32);
                    written += got;
                }
                PayloadState::Break => break,
                _ => return self.fail(DecodeError::PayloadNotFullyConsumed),
            }
        }
        Ok(written)
    }

    /// Read a required `Blob`. `expected_length`, if given, is checked against the total number
    /// of bytes actually present (summed across chunks for the indefinite form).
    #[cfg_attr(feature = "trace", trace)]
    pub fn blob(&mut self, expected_length: Option<u64>) -> DecodeResult<Vec<u8>> {
        let r = self.read_scope(|dec, ht| {
            if ht != HeaderType::Blob {
                return Err(DecodeError::UnexpectedType);
            }
            let indefinite = matches!(dec.payload_remaining, PayloadState::BlobChunks);
            let mut bytes = Vec::new();
            let mut scratch = [0u8; 4096];
            loop {
                let got = dec.payload_read_raw(&mut scratch, indefinite, MT_BSTR)?;
                if got == 0 {
                    break;
                }
                bytes.extend_from_slice(&scratch[..got]);
            }
            if let Some(exp) = expected_length {
                if bytes.len() as u64 != exp {
                    return Err(DecodeError::LengthMismatch);
                }
            }
            Ok(bytes)
        });
        Self::require(r)
    }

    /// Read a required `Text` value. Bytes are accumulated across chunk boundaries before UTF-8
    /// validation, so a multi-byte codepoint split across two indefinite chunks decodes
    /// correctly.
    #[cfg_attr(feature = "trace", trace)]
    pub fn string(&mut self) -> DecodeResult<String> {
        let r = self.read_scope(|dec, ht| {
            if ht != HeaderType::Text {
                return Err(DecodeError::UnexpectedType);
            }
            let indefinite = matches!(dec.payload_remaining, PayloadState::TextChunks);
            let mut bytes = Vec::new();
            let mut scratch = [0u8; 4096];
            loop {
                let got = dec.payload_read_raw(&mut scratch, indefinite, MT_TSTR)?;
                if got == 0 {
                    break;
                }
                bytes.extend_from_slice(&scratch[..got]);
            }
            String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)
        });
        Self::require(r)
    }

    /// Read a required `Array`. `item` receives each element's already-resolved header and runs
    /// entirely inside that element's own nested scope (it must not call another top-level
    /// `read_header`-driven method recursively on a header it was not given).
    #[cfg_attr(feature = "trace", trace)]
    pub fn array<T>(
        &mut self,
        mut item: impl FnMut(&mut Self, HeaderType) -> DecodeResult<T>,
    ) -> DecodeResult<Vec<T>> {
        let r = self.read_scope(|dec, ht| {
            if ht != HeaderType::Array {
                return Err(DecodeError::UnexpectedType);
            }
            let mut items = Vec::new();
            loop {
                match dec.read_scope(&mut item)? {
                    Some(v) => items.push(v),
                    None => break,
                }
            }
            Ok(items)
        });
        Self::require(r)
    }

    /// Read a required `Map` as an ordered list of key/value pairs.
    #[cfg_attr(feature = "trace", trace)]
    pub fn map<K, V>(
        &mut self,
        mut key_fn: impl FnMut(&mut Self, HeaderType) -> DecodeResult<K>,
        mut val_fn: impl FnMut(&mut Self, HeaderType) -> DecodeResult<V>,
    ) -> DecodeResult<Vec<(K, V)>> {
        let r = self.read_scope(|dec, ht| {
            if ht != HeaderType::Map {
                return Err(DecodeError::UnexpectedType);
            }
            let mut pairs = Vec::new();
            loop {
                let key = match dec.read_scope(&mut key_fn)? {
                    Some(k) => k,
                    None => break,
                };
                let value = dec
                    .read_scope(&mut val_fn)?
                    .ok_or(DecodeError::OddMapLength)?;
                pairs.push((key, value));
            }
            Ok(pairs)
        });
        Self::require(r)
    }

    /// Discard an already-resolved header's body, recursing into containers. Used as an item
    /// reader for [`Decoder::array`]/[`Decoder::map`] when the values themselves are unneeded.
    pub fn skip_body(dec: &mut Self, ht: HeaderType) -> DecodeResult<()> {
        match ht {
            HeaderType::Int
            | HeaderType::Bool
            | HeaderType::Null
            | HeaderType::Undefined
            | HeaderType::Float16
            | HeaderType::Float32
            | HeaderType::Float64 => Ok(()),
            HeaderType::Blob => dec.skip_payload_bytes(MT_BSTR),
            HeaderType::Text => dec.skip_payload_bytes(MT_TSTR),
            HeaderType::Array => {
                loop {
                    if dec.read_scope(Self::skip_body)?.is_none() {
                        break;
                    }
                }
                Ok(())
            }
            HeaderType::Map => {
                loop {
                    if dec.read_scope(Self::skip_body)?.is_none() {
                        break;
                    }
                    if dec.read_scope(Self::skip_body)?.is_none() {
                        return Err(DecodeError::OddMapLength);
                    }
                }
                Ok(())
            }
            HeaderType::Tag => {
                dec.read_scope(Self::skip_body)?
                    .ok_or(DecodeError::UnexpectedEof)?;
                Ok(())
            }
            HeaderType::End => unreachable!("read_scope filters End before invoking the body"),
        }
    }

    fn skip_payload_bytes(&mut self, chunk_major: u8) -> DecodeResult<()> {
        let indefinite = matches!(
            self.payload_remaining,
            PayloadState::BlobChunks | PayloadState::TextChunks
        );
        let mut scratch = [0u8; 4096];
        loop {
            let got = self.payload_read_raw(&mut scratch, indefinite, chunk_major)?;
            if got == 0 {
                break;
            }
        }
        Ok(())
    }

    /// Discard one value of any shape, recursing into containers and draining blob/text bytes.
    /// Returns `true` if a value was skipped, `false` if the context was already exhausted.
    #[cfg_attr(feature = "trace", trace)]
    pub fn skip(&mut self) -> DecodeResult<bool> {
        Ok(self.read_scope(Self::skip_body)?.is_some())
    }

    /// Materialize an already-resolved header's body as a [`CborValue`], recursing into
    /// containers. Used as an item reader for [`Decoder::array`]/[`Decoder::map`] over
    /// heterogeneous containers.
    pub fn value_body(dec: &mut Self, ht: HeaderType) -> DecodeResult<CborValue> {
        match ht {
            HeaderType::Int => Ok(CborValue::Int(dec.header_argument as i64)),
            HeaderType::Bool => Ok(if dec.header_argument != 0 {
                CborValue::True
            } else {
                CborValue::False
            }),
            HeaderType::Null => Ok(CborValue::Null),
            HeaderType::Undefined => Ok(CborValue::Undefined),
            HeaderType::Float16 => Ok(CborValue::Float(
                crate::f16::f16_bits_to_f64(dec.header_argument as u16),
                2,
            )),
            HeaderType::Float32 => Ok(CborValue::Float(
                f32::from_bits(dec.header_argument as u32) as f64,
                4,
            )),
            HeaderType::Float64 => Ok(CborValue::Float(f64::from_bits(dec.header_argument), 8)),
            HeaderType::Blob => {
                let indefinite = matches!(dec.payload_remaining, PayloadState::BlobChunks);
                let mut bytes = Vec::new();
                let mut scratch = [0u8; 4096];
                loop {
                    let got = dec.payload_read_raw(&mut scratch, indefinite, MT_BSTR)?;
                    if got == 0 {
                        break;
                    }
                    bytes.extend_from_slice(&scratch[..got]);
                }
                Ok(CborValue::Blob(bytes))
            }
            HeaderType::Text => {
                let indefinite = matches!(dec.payload_remaining, PayloadState::TextChunks);
                let mut bytes = Vec::new();
                let mut scratch = [0u8; 4096];
                loop {
                    let got = dec.payload_read_raw(&mut scratch, indefinite, MT_TSTR)?;
                    if got == 0 {
                        break;
                    }
                    bytes.extend_from_slice(&scratch[..got]);
                }
                let s = String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
                Ok(CborValue::Text(s))
            }
            HeaderType::Array => {
                let mut items = Vec::new();
                loop {
                    match dec.read_scope(Self::value_body)? {
                        Some(v) => items.push(v),
                        None => break,
                    }
                }
                Ok(CborValue::Array(items))
            }
            HeaderType::Map => {
                let mut pairs = Vec::new();
                loop {
                    let key = match dec.read_scope(Self::value_body)? {
                        Some(k) => k,
                        None => break,
                    };
                    let value = dec
                        .read_scope(Self::value_body)?
                        .ok_or(DecodeError::OddMapLength)?;
                    pairs.push((key, value));
                }
                Ok(CborValue::Map(pairs))
            }
            HeaderType::Tag => {
                let tag_num = dec.header_argument;
                let inner = dec
                    .read_scope(Self::value_body)?
                    .ok_or(DecodeError::UnexpectedEof)?;
                Ok(CborValue::Tag(tag_num, Box::new(inner)))
            }
            HeaderType::End => unreachable!("read_scope filters End before invoking the body"),
        }
    }

    /// Materialize the next value as a generic [`CborValue`] tree, recursing into containers.
    #[cfg_attr(feature = "trace", trace)]
    pub fn value(&mut self) -> DecodeResult<CborValue> {
        let r = self.read_scope(Self::value_body);
        Self::require(r)
    }

    /// Materialize the next value, or `None` if the enclosing context is exhausted. Used to drive
    /// top-level multi-value sequences without treating a clean end as an error.
    pub fn next_value(&mut self) -> DecodeResult<Option<CborValue>> {
        self.read_scope(Self::value_body)
    }

    pub(crate) fn field_key_body(dec: &mut Self, ht: HeaderType) -> DecodeResult<i64> {
        Self::int_body(dec, ht)
    }
}
