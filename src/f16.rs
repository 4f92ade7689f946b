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
/// # Half-precision float support
///
/// Conversion itself is delegated entirely to the `half` crate, which already implements
/// round-to-nearest-even with correct subnormal and NaN-payload handling. This module adds only
/// the "pick the narrowest lossless width" decision the encoder needs for `Float{width=0}`.
use half::f16;

/// Bit width chosen for a float whose source didn't request one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    /// 3-byte header + 2-byte payload.
    Half,
    /// 5-byte header + 4-byte payload.
    Single,
    /// 9-byte header + 8-byte payload.
    Double,
}

/// Decode `bits` (as read from a Float16 header) to `f64`.
pub fn f16_bits_to_f64(bits: u16) -> f64 {
    f16::from_bits(bits).to_f64()
}

/// Encode `value` as the bit pattern of the nearest `f16`, rounding to nearest-even.
pub fn f64_to_f16_bits(value: f64) -> u16 {
    f16::from_f64(value).to_bits()
}

/// Returns `true` if converting `value` to `f16` and back reproduces the identical bit pattern,
/// i.e. encoding as half-precision loses nothing.
fn round_trips_as_f16(value: f64) -> bool {
    let half = f16::from_f64(value);
    if value.is_nan() {
        return half.to_f64().is_nan();
    }
    half.to_f64().to_bits() == value.to_bits()
}

/// Returns `true` if converting `value` to `f32` and back reproduces the identical bit pattern.
fn round_trips_as_f32(value: f64) -> bool {
    let single = value as f32;
    if value.is_nan() {
        return (single as f64).is_nan();
    }
    (single as f64).to_bits() == value.to_bits()
}

/// Choose the narrowest of half/single/double precision that represents `value` losslessly,
/// used by the encoder's `value()` path for `Float{width=0}` (spec.md §4.3, §4.6).
pub fn narrowest_lossless_width(value: f64) -> FloatWidth {
    if round_trips_as_f16(value) {
        FloatWidth::Half
    } else if round_trips_as_f32(value) {
        FloatWidth::Single
    } else {
        FloatWidth::Double
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_fit_in_half_precision() {
        assert_eq!(narrowest_lossless_width(55.0), FloatWidth::Half);
    }

    #[test]
    fn pi_needs_at_least_single() {
        assert_ne!(
            narrowest_lossless_width(std::f64::consts::PI),
            FloatWidth::Half
        );
    }

    #[test]
    fn pi_as_f64_needs_double() {
        assert_eq!(
            narrowest_lossless_width(std::f64::consts::PI),
            FloatWidth::Double
        );
    }

    #[test]
    fn nan_round_trips_as_half() {
        assert_eq!(narrowest_lossless_width(f64::NAN), FloatWidth::Half);
    }

    #[test]
    fn bits_round_trip() {
        let bits = f64_to_f16_bits(55.0);
        assert_eq!(f16_bits_to_f64(bits), 55.0);
    }
}
