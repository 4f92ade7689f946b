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
/// # Object field probing
///
/// Objects are encoded as maps whose keys are small integer field ids. A caller asks for field
/// ids in increasing order; any keys present in the map but skipped over (because the caller
/// didn't ask for them, or because they are absent) are discarded without being handed to the
/// caller. This lets forward- and backward-compatible schemas add or drop optional fields without
/// the reader needing to know about every one in advance.
use crate::bytes::ByteRead;
use crate::decode::{Decoder, HeaderType};
use crate::error::{DecodeError, DecodeResult};

#[cfg(feature = "trace")]
use func_trace::trace;

/// Drives field-by-field access to one decoded map, enforcing that field ids are requested in
/// strictly increasing order (spec.md §4.5).
pub struct ObjProbe<'d, R: ByteRead> {
    dec: &'d mut Decoder<R>,
    /// Key of the most recently read-but-not-yet-consumed map entry, if any.
    pending_key: Option<u32>,
    /// The last field id a caller successfully consumed a value for.
    last_requested: Option<u32>,
    /// `true` once the map has no more entries to offer.
    exhausted: bool,
}

impl<'d, R: ByteRead> ObjProbe<'d, R> {
    fn new(dec: &'d mut Decoder<R>) -> Self {
        ObjProbe {
            dec,
            pending_key: None,
            last_requested: None,
            exhausted: false,
        }
    }

    fn fill_pending(&mut self) -> DecodeResult<()> {
        if self.pending_key.is_some() || self.exhausted {
            return Ok(());
        }
        match self.dec.read_scope(Decoder::<R>::field_key_body)? {
            Some(key) => {
                let key = u32::try_from(key).map_err(|_| DecodeError::OutOfRange)?;
                self.pending_key = Some(key);
            }
            None => self.exhausted = true,
        }
        Ok(())
    }

    /// Discard the value paired with the currently pending key (already peeked) without handing
    /// it to a caller.
    fn skip_pending_value(&mut self) -> DecodeResult<()> {
        self.dec
            .read_scope(Decoder::<R>::skip_body)?
            .ok_or(DecodeError::OddMapLength)?;
        Ok(())
    }

    /// Request the value for field `id`. Returns `Ok(None)` if `id` is absent from the map
    /// (either because a higher id came first, or the map ran out of entries). Any lower-numbered
    /// entries encountered along the way are skipped and discarded.
    ///
    /// # Errors
    /// Returns [`DecodeError::FieldProbeOutOfOrder`] if `id` is not strictly greater than the id
    /// of the last field successfully read.
    #[cfg_attr(feature = "trace", trace)]
    pub fn field<T>(
        &mut self,
        id: u32,
        value_fn: impl FnOnce(&mut Decoder<R>, HeaderType) -> DecodeResult<T>,
    ) -> DecodeResult<Option<T>> {
        if let Some(last) = self.last_requested {
            if id <= last {
                return Err(DecodeError::FieldProbeOutOfOrder);
            }
        }
        loop {
            self.fill_pending()?;
            let key = match self.pending_key {
                Some(k) => k,
                None => return Ok(None),
            };
            if key < id {
                self.pending_key = None;
                self.skip_pending_value()?;
                continue;
            }
            if key > id {
                return Ok(None);
            }
            self.pending_key = None;
            self.last_requested = Some(id);
            let value = self
                .dec
                .read_scope(value_fn)?
                .ok_or(DecodeError::OddMapLength)?;
            return Ok(Some(value));
        }
    }

    /// Discard every remaining entry in the map, including any currently pending key.
    pub fn drain_rest(&mut self) -> DecodeResult<()> {
        if let Some(_) = self.pending_key.take() {
            self.skip_pending_value()?;
        }
        while !self.exhausted {
            self.fill_pending()?;
            if self.pending_key.take().is_some() {
                self.skip_pending_value()?;
            }
        }
        Ok(())
    }
}

impl<R: ByteRead> Decoder<R> {
    /// Read a required `Map` as a field-probed object, per spec.md §4.5. `reader` runs inside the
    /// map's scope and should call [`ObjProbe::field`] for each field id it wants, in increasing
    /// order; any entries it never asks for are drained automatically afterward.
    #[cfg_attr(feature = "trace", trace)]
    pub fn obj<T>(
        &mut self,
        reader: impl FnOnce(&mut ObjProbe<R>) -> DecodeResult<T>,
    ) -> DecodeResult<T> {
        let outer = self.payload_remaining;
        let outer_type = self.read_header()?;
        if outer_type != HeaderType::Map {
            return Err(DecodeError::UnexpectedType);
        }
        // `obj` resolves its own header manually (rather than via `read_scope`) because the body
        // needs mutable access to `self` through the `ObjProbe` wrapper for the entire
        // field-probing walk, not just a single nested read. It still has to fold its own
        // terminal state back into `outer` via `read_value_end`, exactly as `read_scope` would.
        let mut probe = ObjProbe::new(self);
        let result = reader(&mut probe)?;
        probe.drain_rest()?;
        self.read_value_end(outer)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes::MemoryBuffer;

    fn decoder(bytes: &[u8]) -> Decoder<MemoryBuffer<'_>> {
        Decoder::new(MemoryBuffer::from_slice(bytes))
    }

    #[test]
    fn reads_fields_in_order_skipping_gaps() {
        // {0: 10, 2: 20, 5: 30}
        let mut dec = decoder(&[
            0xa3, 0x00, 0x0a, 0x02, 0x14, 0x05, 0x18, 0x1e,
        ]);
        let (a, b) = dec
            .obj(|p| {
                let a = p.field(0, Decoder::<MemoryBuffer<'_>>::field_key_body)?;
                let b = p.field(5, Decoder::<MemoryBuffer<'_>>::field_key_body)?;
                Ok((a, b))
            })
            .unwrap();
        assert_eq!(a, Some(10));
        assert_eq!(b, Some(30));
    }

    #[test]
    fn missing_field_returns_none() {
        let mut dec = decoder(&[0xa1, 0x02, 0x14]);
        let v = dec
            .obj(|p| p.field(0, Decoder::<MemoryBuffer<'_>>::field_key_body))
            .unwrap();
        assert_eq!(v, None);
    }

    #[test]
    fn out_of_order_request_is_rejected() {
        let mut dec = decoder(&[0xa2, 0x00, 0x0a, 0x01, 0x0b]);
        let err = dec
            .obj(|p| {
                p.field(1, Decoder::<MemoryBuffer<'_>>::field_key_body)?;
                p.field(0, Decoder::<MemoryBuffer<'_>>::field_key_body)
            })
            .unwrap_err();
        assert_eq!(err, DecodeError::FieldProbeOutOfOrder);
    }

    #[test]
    fn unread_fields_are_drained_so_stream_stays_aligned() {
        let mut dec = decoder(&[0xa2, 0x00, 0x0a, 0x01, 0x0b, 0x02]);
        let v = dec.obj(|p| p.field(0, Decoder::<MemoryBuffer<'_>>::field_key_body));
        assert_eq!(v.unwrap(), Some(10));
        assert_eq!(dec.int().unwrap(), 2);
    }
}
