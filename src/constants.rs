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
/***************************************************************************************************
 * cbor_codec wire constants
 **************************************************************************************************/
/// Additional Information bitmask
pub const AI_MASK: u8 = 0b000_11111;

/// Major Type 0 (Positive integers)
pub const MT_UINT: u8 = 0b000_00000;
/// Major Type 1 (Negative integers)
pub const MT_NINT: u8 = 0b001_00000;
/// Major Type 2 (Byte Strings)
pub const MT_BSTR: u8 = 0b010_00000;
/// Major Type 3 (Text Strings)
pub const MT_TSTR: u8 = 0b011_00000;
/// Major Type 4 (Array)
pub const MT_ARRAY: u8 = 0b100_00000;
/// Major Type 5 (Map)
pub const MT_MAP: u8 = 0b101_00000;
/// Major Type 6 (Tag)
pub const MT_TAG: u8 = 0b110_00000;
/// Major Type 7 (Floats, simple types etc.)
pub const MT_SIMPLE: u8 = 0b111_00000;
pub const MT_FLOAT: u8 = 0b111_00000;

/// Maximum value of a "simple" payload mapped on AI bits
pub const PAYLOAD_AI_BITS: u8 = 23;
/// Indicates one byte of length of value information follows MT/AI byte
pub const PAYLOAD_ONE_BYTE: u8 = 24;
/// Indicates two bytes of length of value information follows MT/AI byte
pub const PAYLOAD_TWO_BYTES: u8 = 25;
/// Indicates four bytes of length of value information follows MT/AI byte
pub const PAYLOAD_FOUR_BYTES: u8 = 26;
/// Indicates eight bytes of length of value information follows MT/AI byte
pub const PAYLOAD_EIGHT_BYTES: u8 = 27;
/// Reserved Additional Information values. RFC 8949 leaves these undefined; a head byte carrying
/// one of these is always a decode error.
pub const PAYLOAD_RESERVED: [u8; 3] = [28, 29, 30];
/// Indicates an indefinite-length container, or (under Major Type 7) the break marker.
pub const PAYLOAD_INDEFINITE_OR_BREAK: u8 = 31;

/// Simple-value codes produced and accepted by this crate. RFC 8949 assigns the rest of 0..=19 and
/// 32..=255 to simple values this crate does not produce or interpret (spec.md Non-goals).
pub const SIMPLE_FALSE: u8 = 20;
pub const SIMPLE_TRUE: u8 = 21;
pub const SIMPLE_NULL: u8 = 22;
pub const SIMPLE_UNDEFINED: u8 = 23;

/// Additional Information values that introduce a half/single/double precision float under
/// Major Type 7.
pub const AI_FLOAT16: u8 = 25;
pub const AI_FLOAT32: u8 = 26;
pub const AI_FLOAT64: u8 = 27;
