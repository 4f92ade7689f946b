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
/// # Byte stream abstraction
///
/// The decoder and encoder never touch a concrete I/O type directly. They read through
/// [`ByteRead`] and write through [`ByteWrite`], so the same state machine drives an in-memory
/// buffer ([`MemoryBuffer`]) or a chunked pull source ([`ChunkedReader`]) without caring which.
///
/// Adapters for files, sockets or async streams are collaborators outside this crate's scope
/// (spec.md §1); they only need to implement [`ChunkSource`].
use std::borrow::Cow;
use std::cmp;
use std::mem::size_of;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// The floor below which [`MemoryBuffer`] never shrinks its backing allocation, and the size it
/// starts at for a freshly-constructed writable buffer.
const MIN_CAPACITY: usize = 16;

/// The floor for [`ChunkedReader`]'s internal buffer.
const MIN_CHUNK_BUFFER: usize = 4096;

/***************************************************************************************************
 * ByteRead / ByteWrite traits
 **************************************************************************************************/

/// Byte-oriented read capability used by the decoder. All operations are infallible in the Rust
/// sense (they never panic on short input); instead they signal insufficiency through `bool`,
/// `usize` short-counts or `Option`, per spec.md §4.1.
pub trait ByteRead {
    /// Returns `true` if at least `n` more bytes can be read without blocking.
    fn can_read(&self, n: usize) -> bool;

    /// A hint for how many bytes can usefully be read in one bulk call. May under-report (even
    /// return 0) when more data is reachable only via further I/O.
    fn suggest_available(&self) -> usize;

    /// Read `width` (1..=8) bytes and interpret them as a big-endian unsigned integer. Returns
    /// `None` on short input; the cursor is not advanced in that case.
    fn read_raw_be(&mut self, width: usize) -> Option<u64>;

    /// As [`ByteRead::read_raw_be`], but little-endian.
    fn read_raw_le(&mut self, width: usize) -> Option<u64>;

    /// Read up to `buf.len()` bytes into `buf`, returning the number actually read. A result
    /// shorter than `buf.len()` means the source reached EOF.
    fn read_raw(&mut self, buf: &mut [u8]) -> usize;

    /// Skip up to `n` bytes, returning the number actually skipped.
    fn read_skip(&mut self, n: usize) -> usize;

    /// Read exactly `n` bytes and interpret them as UTF-8. `None` on short input or invalid UTF-8.
    fn read_utf8(&mut self, n: usize) -> Option<String>;

    /// Drain everything currently reachable by repeatedly consulting
    /// [`ByteRead::suggest_available`], growing a chunk list and concatenating only at the end.
    fn read_all_available(&mut self) -> Vec<u8> {
        let mut chunks: Vec<u8> = Vec::new();
        loop {
            let hint = self.suggest_available();
            if hint == 0 {
                if !self.can_read(1) {
                    break;
                }
                // suggest_available under-reported; fall back to reading one byte at a time.
                let mut one = [0u8; 1];
                if self.read_raw(&mut one) == 0 {
                    break;
                }
                chunks.push(one[0]);
                continue;
            }
            let start = chunks.len();
            chunks.resize(start + hint, 0);
            let got = self.read_raw(&mut chunks[start..]);
            chunks.truncate(start + got);
            if got < hint {
                break;
            }
        }
        chunks
    }

    /// Read a `u8`, or return `default` if fewer than 1 byte remains. Never fails.
    #[inline]
    fn read_u8_or(&mut self, default: u8) -> u8 {
        self.read_raw_be(1).map(|v| v as u8).unwrap_or(default)
    }

    /// Read an `i8`, or return `default` on short input.
    #[inline]
    fn read_i8_or(&mut self, default: i8) -> i8 {
        self.read_raw_be(1).map(|v| v as u8 as i8).unwrap_or(default)
    }

    /// Read a big-endian `u16`, or return `default` on short input.
    #[inline]
    fn read_u16_or(&mut self, default: u16) -> u16 {
        self.read_raw_be(2).map(|v| v as u16).unwrap_or(default)
    }

    /// Read a big-endian `i16`, or return `default` on short input.
    #[inline]
    fn read_i16_or(&mut self, default: i16) -> i16 {
        self.read_raw_be(2)
            .map(|v| v as u16 as i16)
            .unwrap_or(default)
    }

    /// Read a big-endian `u32`, or return `default` on short input.
    #[inline]
    fn read_u32_or(&mut self, default: u32) -> u32 {
        self.read_raw_be(4).map(|v| v as u32).unwrap_or(default)
    }

    /// Read a big-endian `i32`, or return `default` on short input.
    #[inline]
    fn read_i32_or(&mut self, default: i32) -> i32 {
        self.read_raw_be(4)
            .map(|v| v as u32 as i32)
            .unwrap_or(default)
    }

    /// Read a big-endian `u64`, or return `default` on short input.
    #[inline]
    fn read_u64_or(&mut self, default: u64) -> u64 {
        self.read_raw_be(8).unwrap_or(default)
    }

    /// Read a big-endian `i64`, or return `default` on short input.
    #[inline]
    fn read_i64_or(&mut self, default: i64) -> i64 {
        self.read_raw_be(8).map(|v| v as i64).unwrap_or(default)
    }

    /// Read a big-endian IEEE-754 `f32`, or return `default` on short input.
    #[cfg(feature = "float")]
    #[inline]
    fn read_f32_or(&mut self, default: f32) -> f32 {
        self.read_raw_be(4)
            .map(|v| f32::from_bits(v as u32))
            .unwrap_or(default)
    }

    /// Read a big-endian IEEE-754 `f64`, or return `default` on short input.
    #[cfg(feature = "float")]
    #[inline]
    fn read_f64_or(&mut self, default: f64) -> f64 {
        self.read_raw_be(8).map(f64::from_bits).unwrap_or(default)
    }
}

/// Byte-oriented write capability used by the encoder. Operations are infallible provided the
/// sink has capacity; [`MemoryBuffer`] always has capacity because it grows on demand.
pub trait ByteWrite {
    /// Write the `width` (1..=8) least-significant bytes of `value`, most-significant byte first.
    fn write_raw_be(&mut self, value: u64, width: usize);

    /// As [`ByteWrite::write_raw_be`], but least-significant byte first.
    fn write_raw_le(&mut self, value: u64, width: usize);

    /// Write `bytes` verbatim.
    fn write_raw(&mut self, bytes: &[u8]);

    /// Monotonically increasing count of bytes written so far. The encoder uses deltas in this
    /// counter to validate that sized callbacks wrote exactly what they declared.
    fn total_written_bytes(&self) -> u64;

    #[inline]
    fn write_i8(&mut self, v: i8) {
        self.write_raw_be(v as u8 as u64, 1)
    }

    #[inline]
    fn write_i16(&mut self, v: i16) {
        self.write_raw_be(v as u16 as u64, 2)
    }

    #[inline]
    fn write_i32(&mut self, v: i32) {
        self.write_raw_be(v as u32 as u64, 4)
    }

    #[inline]
    fn write_i64(&mut self, v: i64) {
        self.write_raw_be(v as u64, 8)
    }

    #[cfg(feature = "float")]
    #[inline]
    fn write_f32(&mut self, v: f32) {
        self.write_raw_be(v.to_bits() as u64, 4)
    }

    #[cfg(feature = "float")]
    #[inline]
    fn write_f64(&mut self, v: f64) {
        self.write_raw_be(v.to_bits(), 8)
    }

    /// Write a "short string": a 2-byte little-endian length prefix followed by the UTF-8 bytes.
    /// Used by diagnostic and test-support code, not by the CBOR wire format itself.
    fn write_short_string(&mut self, s: &str) {
        debug_assert!(s.len() <= u16::MAX as usize);
        self.write_raw_le(s.len() as u64, 2);
        self.write_raw(s.as_bytes());
    }
}

/***************************************************************************************************
 * MemoryBuffer
 **************************************************************************************************/

/// A growable in-memory byte buffer with independent read and write cursors.
///
/// A freshly-constructed buffer ([`MemoryBuffer::new`]) owns its storage and doubles it on demand
/// from a floor of [`MIN_CAPACITY`] bytes. [`MemoryBuffer::from_slice`] instead borrows an external
/// slice with no copy; such a buffer is read-only until the first write promotes it to owned
/// storage (which does copy the existing bytes in, same as any `Cow` mutation).
#[derive(Debug, Clone)]
pub struct MemoryBuffer<'a> {
    data: Cow<'a, [u8]>,
    read_pos: usize,
    written: u64,
}

impl<'a> MemoryBuffer<'a> {
    /// Construct an empty, owned, writable buffer.
    #[cfg_attr(feature = "trace", trace)]
    pub fn new() -> MemoryBuffer<'static> {
        MemoryBuffer {
            data: Cow::Owned(Vec::with_capacity(MIN_CAPACITY)),
            read_pos: 0,
            written: 0,
        }
    }

    /// Construct a read-only view over `bytes` without copying.
    #[cfg_attr(feature = "trace", trace)]
    pub fn from_slice(bytes: &'a [u8]) -> MemoryBuffer<'a> {
        MemoryBuffer {
            data: Cow::Borrowed(bytes),
            read_pos: 0,
            written: 0,
        }
    }

    /// Reset cursors and, if owned, clear the backing storage for reuse. A borrowed view just has
    /// its read cursor rewound.
    #[cfg_attr(feature = "trace", trace)]
    pub fn reset(&mut self) {
        self.read_pos = 0;
        self.written = 0;
        if let Cow::Owned(v) = &mut self.data {
            v.clear();
        }
    }

    /// The bytes written (or viewed) so far, in full.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Remaining unread bytes.
    #[inline]
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.read_pos..]
    }

    fn reserve_for_write(&mut self, extra: usize) -> &mut Vec<u8> {
        let v = self.data.to_mut();
        let needed = v.len() + extra;
        if v.capacity() < needed {
            let mut new_cap = v.capacity().max(MIN_CAPACITY);
            while new_cap < needed {
                new_cap *= 2;
            }
            v.reserve(new_cap - v.len());
        }
        v
    }
}

impl<'a> Default for MemoryBuffer<'a> {
    fn default() -> Self {
        MemoryBuffer::new()
    }
}

impl<'a> ByteRead for MemoryBuffer<'a> {
    #[cfg_attr(feature = "trace", trace)]
    fn can_read(&self, n: usize) -> bool {
        self.data.len() - self.read_pos >= n
    }

    #[cfg_attr(feature = "trace", trace)]
    fn suggest_available(&self) -> usize {
        self.data.len() - self.read_pos
    }

    #[cfg_attr(feature = "trace", trace)]
    fn read_raw_be(&mut self, width: usize) -> Option<u64> {
        debug_assert!(width >= 1 && width <= 8);
        if !self.can_read(width) {
            return None;
        }
        let mut v: u64 = 0;
        for i in 0..width {
            v = (v << 8) | self.data[self.read_pos + i] as u64;
        }
        self.read_pos += width;
        Some(v)
    }

    #[cfg_attr(feature = "trace", trace)]
    fn read_raw_le(&mut self, width: usize) -> Option<u64> {
        debug_assert!(width >= 1 && width <= 8);
        if !self.can_read(width) {
            return None;
        }
        let mut v: u64 = 0;
        for i in (0..width).rev() {
            v = (v << 8) | self.data[self.read_pos + i] as u64;
        }
        self.read_pos += width;
        Some(v)
    }

    #[cfg_attr(feature = "trace", trace)]
    fn read_raw(&mut self, buf: &mut [u8]) -> usize {
        let n = cmp::min(buf.len(), self.data.len() - self.read_pos);
        buf[..n].copy_from_slice(&self.data[self.read_pos..self.read_pos + n]);
        self.read_pos += n;
        n
    }

    #[cfg_attr(feature = "trace", trace)]
    fn read_skip(&mut self, n: usize) -> usize {
        let skipped = cmp::min(n, self.data.len() - self.read_pos);
        self.read_pos += skipped;
        skipped
    }

    #[cfg_attr(feature = "trace", trace)]
    fn read_utf8(&mut self, n: usize) -> Option<String> {
        if !self.can_read(n) {
            return None;
        }
        let slice = &self.data[self.read_pos..self.read_pos + n];
        match std::str::from_utf8(slice) {
            Ok(s) => {
                let owned = s.to_owned();
                self.read_pos += n;
                Some(owned)
            }
            Err(_) => None,
        }
    }
}

impl<'a> ByteWrite for MemoryBuffer<'a> {
    #[cfg_attr(feature = "trace", trace)]
    fn write_raw_be(&mut self, value: u64, width: usize) {
        debug_assert!(width >= 1 && width <= 8);
        let bytes = value.to_be_bytes();
        self.write_raw(&bytes[size_of::<u64>() - width..]);
    }

    #[cfg_attr(feature = "trace", trace)]
    fn write_raw_le(&mut self, value: u64, width: usize) {
        debug_assert!(width >= 1 && width <= 8);
        let bytes = value.to_le_bytes();
        self.write_raw(&bytes[..width]);
    }

    #[cfg_attr(feature = "trace", trace)]
    fn write_raw(&mut self, bytes: &[u8]) {
        let v = self.reserve_for_write(bytes.len());
        v.extend_from_slice(bytes);
        self.written += bytes.len() as u64;
    }

    #[inline]
    fn total_written_bytes(&self) -> u64 {
        self.written
    }
}

/***************************************************************************************************
 * Chunked pull adapter
 **************************************************************************************************/

/// A source of bytes pulled in chunks, the collaborator that [`ChunkedReader`] wraps. Concrete
/// adapters over files, sockets or async streams are outside this crate's scope (spec.md §1);
/// implement this trait over them.
pub trait ChunkSource {
    /// Fill as much of `buf` as is immediately available, returning the number of bytes written,
    /// `0` if none are available right now but more may arrive later, or `-1` at EOF.
    fn read_chunk(&mut self, buf: &mut [u8]) -> i64;

    /// Skip `len` bytes without materializing them, returning the number skipped or `-1` at EOF.
    /// The default implementation reads and discards into a scratch buffer.
    fn skip_chunk(&mut self, len: usize) -> i64 {
        let mut scratch = vec![0u8; cmp::min(len, MIN_CHUNK_BUFFER)];
        let mut total = 0usize;
        while total < len {
            let want = cmp::min(len - total, scratch.len());
            match self.read_chunk(&mut scratch[..want]) {
                -1 => return if total == 0 { -1 } else { total as i64 },
                0 => break,
                n => total += n as usize,
            }
        }
        total as i64
    }
}

/// Wraps a [`ChunkSource`] with a bounded internal buffer, presenting it through [`ByteRead`].
///
/// The buffer starts at [`MIN_CHUNK_BUFFER`] and grows to whatever a single read demands;
/// previously-consumed bytes at the front are compacted away rather than retained. EOF is sticky:
/// once the source reports `-1`, every later fill attempt is a no-op.
#[derive(Debug)]
pub struct ChunkedReader<S: ChunkSource> {
    source: S,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    eof: bool,
}

impl<S: ChunkSource> ChunkedReader<S> {
    /// Wrap `source` in a fresh reader with the default-sized internal buffer.
    pub fn new(source: S) -> Self {
        ChunkedReader {
            source,
            buf: vec![0u8; MIN_CHUNK_BUFFER],
            start: 0,
            end: 0,
            eof: false,
        }
    }

    fn available(&self) -> usize {
        self.end - self.start
    }

    fn compact(&mut self) {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
    }

    /// Pull more bytes from the source until at least `want` bytes are buffered or EOF is hit.
    fn fill(&mut self, want: usize) {
        if self.eof || self.available() >= want {
            return;
        }
        self.compact();
        if self.buf.len() < want {
            self.buf.resize(want, 0);
        }
        while self.available() < want && !self.eof {
            let n = self.source.read_chunk(&mut self.buf[self.end..]);
            if n < 0 {
                self.eof = true;
            } else if n == 0 {
                break;
            } else {
                self.end += n as usize;
            }
        }
    }
}

impl<S: ChunkSource> ByteRead for ChunkedReader<S> {
    fn can_read(&self, n: usize) -> bool {
        // Cannot be satisfied without mutation if not already buffered; callers needing a
        // guarantee should rely on the read_* methods, which fill as needed. This reports only
        // what is already resident, matching suggest_available's "may under-report" contract.
        self.available() >= n
    }

    fn suggest_available(&self) -> usize {
        self.available()
    }

    fn read_raw_be(&mut self, width: usize) -> Option<u64> {
        self.fill(width);
        if self.available() < width {
            return None;
        }
        let mut v: u64 = 0;
        for i in 0..width {
            v = (v << 8) | self.buf[self.start + i] as u64;
        }
        self.start += width;
        Some(v)
    }

    fn read_raw_le(&mut self, width: usize) -> Option<u64> {
        self.fill(width);
        if self.available() < width {
            return None;
        }
        let mut v: u64 = 0;
        for i in (0..width).rev() {
            v = (v << 8) | self.buf[self.start + i] as u64;
        }
        self.start += width;
        Some(v)
    }

    fn read_raw(&mut self, out: &mut [u8]) -> usize {
        let mut written = 0;
        while written < out.len() {
            self.fill(out.len() - written);
            let n = cmp::min(self.available(), out.len() - written);
            if n == 0 {
                break;
            }
            out[written..written + n].copy_from_slice(&self.buf[self.start..self.start + n]);
            self.start += n;
            written += n;
        }
        written
    }

    fn read_skip(&mut self, n: usize) -> usize {
        let mut skipped = 0;
        while skipped < n {
            if self.available() == 0 {
                self.fill(cmp::min(n - skipped, MIN_CHUNK_BUFFER));
                if self.available() == 0 {
                    break;
                }
            }
            let take = cmp::min(self.available(), n - skipped);
            self.start += take;
            skipped += take;
        }
        skipped
    }

    fn read_utf8(&mut self, n: usize) -> Option<String> {
        self.fill(n);
        if self.available() < n {
            return None;
        }
        let slice = &self.buf[self.start..self.start + n];
        match std::str::from_utf8(slice) {
            Ok(s) => {
                let owned = s.to_owned();
                self.start += n;
                Some(owned)
            }
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_buffer_round_trips_be_widths() {
        let mut buf = MemoryBuffer::new();
        buf.write_raw_be(0x1234, 2);
        buf.write_raw_be(0xff, 1);
        assert_eq!(buf.as_slice(), &[0x12, 0x34, 0xff]);
        assert_eq!(buf.read_raw_be(2), Some(0x1234));
        assert_eq!(buf.read_raw_be(1), Some(0xff));
        assert_eq!(buf.read_raw_be(1), None);
    }

    #[test]
    fn memory_buffer_from_slice_is_read_only_view() {
        let bytes = [1u8, 2, 3, 4];
        let mut buf = MemoryBuffer::from_slice(&bytes);
        assert!(buf.can_read(4));
        assert_eq!(buf.read_raw_be(4), Some(0x01020304));
        assert!(!buf.can_read(1));
    }

    #[test]
    fn read_or_default_never_fails() {
        let mut buf = MemoryBuffer::new();
        assert_eq!(buf.read_u32_or(99), 99);
        buf.write_raw_be(7, 4);
        assert_eq!(buf.read_u32_or(99), 7);
    }

    struct VecSource {
        chunks: Vec<Vec<u8>>,
    }

    impl ChunkSource for VecSource {
        fn read_chunk(&mut self, buf: &mut [u8]) -> i64 {
            if self.chunks.is_empty() {
                return -1;
            }
            let chunk = self.chunks.remove(0);
            let n = cmp::min(chunk.len(), buf.len());
            buf[..n].copy_from_slice(&chunk[..n]);
            if n < chunk.len() {
                self.chunks.insert(0, chunk[n..].to_vec());
            }
            n as i64
        }
    }

    #[test]
    fn chunked_reader_concatenates_across_chunk_boundaries() {
        let source = VecSource {
            chunks: vec![vec![1, 2, 3], vec![4, 5], vec![6]],
        };
        let mut reader = ChunkedReader::new(source);
        let mut out = [0u8; 6];
        assert_eq!(reader.read_raw(&mut out), 6);
        assert_eq!(out, [1, 2, 3, 4, 5, 6]);
        assert_eq!(reader.read_raw(&mut [0u8; 1]), 0);
    }

    #[test]
    fn chunked_reader_skip_then_read() {
        let source = VecSource {
            chunks: vec![vec![0; 6], vec![0; 6], b"hello!".to_vec()],
        };
        let mut reader = ChunkedReader::new(source);
        assert_eq!(reader.read_skip(12), 12);
        let mut out = [0u8; 6];
        assert_eq!(reader.read_raw(&mut out), 6);
        assert_eq!(&out, b"hello!");
    }
}
