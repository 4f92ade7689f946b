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
/// # CBOR diagnostic notation
///
/// Formats a [`CborValue`] the way RFC 8949 §8 describes: ints as decimal, floats as Rust's
/// shortest round-trip decimal, text quoted with `\uXXXX` escapes, byte strings as `h'HEXUPPER'`,
/// arrays and maps bracketed, tags as `TAG(inner)`.
use std::fmt;
use std::fmt::Write as _;

use crate::value::CborValue;

const HEX_UPPER: [u8; 16] = *b"0123456789ABCDEF";

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    write!(f, "h'")?;
    for b in bytes {
        f.write_char(HEX_UPPER[(b >> 4) as usize] as char)?;
        f.write_char(HEX_UPPER[(b & 0x0f) as usize] as char)?;
    }
    write!(f, "'")
}

fn write_text(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            c if (c as u32) <= 0x1f => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

/// Write `v` in CBOR diagnostic notation to `f`. Used by [`CborValue`]'s `Display` impl.
pub fn write_diagnostic(v: &CborValue, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match v {
        CborValue::Int(i) => write!(f, "{}", i),
        CborValue::Float(x, _) => {
            if x.is_nan() {
                write!(f, "NaN")
            } else if x.is_infinite() {
                write!(f, "{}", if *x > 0.0 { "Infinity" } else { "-Infinity" })
            } else {
                write!(f, "{}", x)
            }
        }
        CborValue::Text(s) => write_text(f, s),
        CborValue::Blob(b) => write_hex(f, b),
        CborValue::Array(items) => {
            write!(f, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_diagnostic(item, f)?;
            }
            write!(f, "]")
        }
        CborValue::Map(pairs) => {
            write!(f, "{{")?;
            for (i, (k, val)) in pairs.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_diagnostic(k, f)?;
                write!(f, ": ")?;
                write_diagnostic(val, f)?;
            }
            write!(f, "}}")
        }
        CborValue::Tag(tag, inner) => {
            write!(f, "{}(", tag)?;
            write_diagnostic(inner, f)?;
            write!(f, ")")
        }
        CborValue::False => write!(f, "false"),
        CborValue::True => write!(f, "true"),
        CborValue::Null => write!(f, "null"),
        CborValue::Undefined => write!(f, "undefined"),
    }
}
