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
/// # Generic value tree
///
/// `CborValue` is an owned, in-memory mirror of every CBOR value this crate can decode. It is an
/// optional materialization used by tests and by "decode arbitrary CBOR" callers; the decoder and
/// encoder core paths never require it.
use std::convert::TryFrom;
use std::fmt;

use crate::error::DecodeError;

/// An owned CBOR value.
///
/// Unlike a borrowed tree over the original bytes, every variant here owns its data, because the
/// decoder that builds it is stream-driven and cannot keep slice borrows alive across chunk
/// boundaries (see DESIGN.md).
#[derive(Debug, Clone)]
pub enum CborValue {
    /// Any value representable in signed 64-bit, covering both CBOR major types 0 and 1.
    Int(i64),
    /// `width` records the source encoding: 0 means "no preference, encoder picks the narrowest
    /// lossless width"; 2/4/8 mean the value was decoded from (or should be encoded as) a half,
    /// single or double-precision header.
    Float(f64, u8),
    /// Valid UTF-8 text.
    Text(String),
    /// Arbitrary bytes.
    Blob(Vec<u8>),
    /// An ordered sequence of values.
    Array(Vec<CborValue>),
    /// An ordered sequence of key/value pairs. Duplicate keys are permitted; order is preserved.
    Map(Vec<(CborValue, CborValue)>),
    /// A tag number paired with exactly one inner value.
    Tag(u64, Box<CborValue>),
    /// CBOR simple value 20.
    False,
    /// CBOR simple value 21.
    True,
    /// CBOR simple value 22.
    Null,
    /// CBOR simple value 23.
    Undefined,
}

impl CborValue {
    /// A value is valid if every value nested within it is valid; primitives are always valid.
    /// This crate currently has no value shape that can be structurally parsed yet semantically
    /// invalid, so this recurses without ever returning `false`; it exists so callers have a
    /// single place to call regardless of which variant they hold, and so that a future addition
    /// with a real invalidity condition has a home.
    pub fn is_valid(&self) -> bool {
        match self {
            CborValue::Array(items) => items.iter().all(CborValue::is_valid),
            CborValue::Map(pairs) => pairs
                .iter()
                .all(|(k, v)| k.is_valid() && v.is_valid()),
            CborValue::Tag(_, inner) => inner.is_valid(),
            _ => true,
        }
    }

    /// `true` if this is [`CborValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, CborValue::Null)
    }
}

impl PartialEq for CborValue {
    fn eq(&self, other: &Self) -> bool {
        use CborValue::*;
        match (self, other) {
            (Int(a), Int(b)) => a == b,
            // Bit-identical comparison: NaN == NaN (same representation), +0.0 != -0.0.
            (Float(a, _), Float(b, _)) => a.to_bits() == b.to_bits(),
            (Text(a), Text(b)) => a == b,
            (Blob(a), Blob(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Tag(ta, a), Tag(tb, b)) => ta == tb && a == b,
            (False, False) | (True, True) | (Null, Null) | (Undefined, Undefined) => true,
            _ => false,
        }
    }
}

impl Eq for CborValue {}

impl fmt::Display for CborValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::diag::write_diagnostic(self, f)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for CborValue {
            fn from(v: $t) -> Self {
                CborValue::Int(v as i64)
            }
        })*
    };
}
impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for CborValue {
    fn from(v: u64) -> Self {
        CborValue::Int(v as i64)
    }
}

impl From<bool> for CborValue {
    fn from(v: bool) -> Self {
        if v {
            CborValue::True
        } else {
            CborValue::False
        }
    }
}

impl From<String> for CborValue {
    fn from(v: String) -> Self {
        CborValue::Text(v)
    }
}

impl<'a> From<&'a str> for CborValue {
    fn from(v: &'a str) -> Self {
        CborValue::Text(v.to_owned())
    }
}

impl From<Vec<u8>> for CborValue {
    fn from(v: Vec<u8>) -> Self {
        CborValue::Blob(v)
    }
}

macro_rules! impl_try_from_int {
    ($($t:ty),*) => {
        $(impl TryFrom<CborValue> for $t {
            type Error = DecodeError;
            fn try_from(v: CborValue) -> Result<Self, Self::Error> {
                match v {
                    CborValue::Int(i) => <$t>::try_from(i).map_err(|_| DecodeError::OutOfRange),
                    _ => Err(DecodeError::UnexpectedType),
                }
            }
        })*
    };
}
impl_try_from_int!(u8, u16, u32, u64, i8, i16, i32, i64, i128);

impl TryFrom<CborValue> for bool {
    type Error = DecodeError;
    fn try_from(v: CborValue) -> Result<Self, Self::Error> {
        match v {
            CborValue::False => Ok(false),
            CborValue::True => Ok(true),
            _ => Err(DecodeError::UnexpectedType),
        }
    }
}

impl TryFrom<CborValue> for String {
    type Error = DecodeError;
    fn try_from(v: CborValue) -> Result<Self, Self::Error> {
        match v {
            CborValue::Text(s) => Ok(s),
            _ => Err(DecodeError::UnexpectedType),
        }
    }
}

impl TryFrom<CborValue> for Vec<u8> {
    type Error = DecodeError;
    fn try_from(v: CborValue) -> Result<Self, Self::Error> {
        match v {
            CborValue::Blob(b) => Ok(b),
            _ => Err(DecodeError::UnexpectedType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_equals_nan_but_not_negative_zero() {
        let a = CborValue::Float(f64::NAN, 0);
        let b = CborValue::Float(f64::NAN, 8);
        assert_eq!(a, b);
        assert_ne!(CborValue::Float(0.0, 0), CborValue::Float(-0.0, 0));
    }

    #[test]
    fn is_valid_recurses() {
        let v = CborValue::Array(vec![CborValue::Tag(6, Box::new(CborValue::Int(3)))]);
        assert!(v.is_valid());
    }

    #[test]
    fn try_from_rejects_wrong_type() {
        let v = CborValue::Text("hi".to_owned());
        assert!(u32::try_from(v).is_err());
    }
}
