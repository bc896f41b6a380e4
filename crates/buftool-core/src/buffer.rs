//! # Byte Buffer
//!
//! The growable byte container and the mutation primitives built on it.
//!
//! A [`ByteBuffer`] owns a single `Vec<u8>`. Growth only ever goes through
//! [`ByteBuffer::extend`], which calls [`ByteBuffer::resize`], the one place
//! that reallocates. Every other operation validates its own offset and length
//! first and refuses to touch memory it can't prove is in range.
//!
//! ## Offsets and lengths
//!
//! - A length of `0` means "the rest of the buffer" wherever a range is validated.
//! - [`Offset::End`] means "append at the current end" wherever a range is grown.
//!
//! ## Example
//!
//! ```rust
//! use buftool_core::ByteBuffer;
//!
//! let mut buf = ByteBuffer::new("scratch");
//! buf.print(0, "hello")?;
//! buf.fill(b'!', 5, 3)?;
//! assert_eq!(buf.as_bytes(), b"hello!!!");
//! # Ok::<(), buftool_core::BufferError>(())
//! ```

use tracing::{debug, warn};

use crate::error::{BufferError, BufferResult};
use crate::hexdump::HexDump;
use crate::types::Offset;

/// Outcome of a successful [`ByteBuffer::extend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent
{
    /// Resolved start offset of the requested range
    pub offset: usize,
    /// Total buffer size after the call
    pub size: usize,
}

/// Named, growable region of raw bytes
///
/// The name is only used by whoever keeps a registry of buffers; the engine
/// itself never looks at it.
///
/// ## Invariant
///
/// An empty buffer holds no allocation. Every mutating call starts by
/// releasing storage left behind by an empty buffer, so the two can't drift
/// apart between operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer
{
    name: String,
    bytes: Vec<u8>,
}

impl ByteBuffer
{
    /// Create an empty buffer (no storage)
    pub fn new(name: impl Into<String>) -> Self
    {
        Self {
            name: name.into(),
            bytes: Vec::new(),
        }
    }

    /// Create a buffer of `size` zero bytes
    pub fn with_size(name: impl Into<String>, size: usize) -> Self
    {
        let mut buffer = Self::new(name);
        if size > 0 {
            buffer.bytes = vec![0; size];
        }
        buffer
    }

    /// Name used for registry lookup
    pub fn name(&self) -> &str
    {
        &self.name
    }

    /// Current size in bytes
    pub fn len(&self) -> usize
    {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8]
    {
        &self.bytes
    }

    /// Address of the backing storage, or `None` when nothing is allocated
    pub fn storage_address(&self) -> Option<usize>
    {
        if self.bytes.capacity() == 0 {
            None
        } else {
            Some(self.bytes.as_ptr() as usize)
        }
    }

    /// Release storage held by an empty buffer
    fn checkup(&mut self)
    {
        if self.bytes.is_empty() && self.bytes.capacity() != 0 {
            self.bytes = Vec::new();
        }
    }

    /// Validate a range against the current contents
    ///
    /// Returns the number of bytes that can be touched starting at `offset`.
    /// A `length` of `0` resolves to everything from `offset` to the end; a
    /// length that runs past the end is clamped. Never mutates the buffer.
    ///
    /// ## Errors
    ///
    /// - `InvalidRange`: the buffer is empty, `offset` is at or past the end,
    ///   or `offset` is [`Offset::End`]
    ///
    /// ```rust
    /// use buftool_core::ByteBuffer;
    ///
    /// let buf = ByteBuffer::with_size("b", 10);
    /// assert_eq!(buf.available(4, 0)?, 6);
    /// assert_eq!(buf.available(4, 100)?, 6);
    /// assert!(buf.available(10, 1).is_err());
    /// # Ok::<(), buftool_core::BufferError>(())
    /// ```
    pub fn available(&self, offset: impl Into<Offset>, length: usize) -> BufferResult<usize>
    {
        let size = self.bytes.len();
        let offset = match offset.into() {
            Offset::At(offset) if offset < size => offset,
            other => {
                return Err(BufferError::InvalidRange {
                    offset: other.resolve(size),
                    size,
                });
            }
        };

        let rest = size - offset;
        Ok(if length == 0 { rest } else { length.min(rest) })
    }

    /// Make `[offset, offset + length)` addressable, growing if needed
    ///
    /// [`Offset::End`] resolves to the current size, so the range is appended.
    /// Existing bytes are preserved and new bytes are zero.
    ///
    /// ## Errors
    ///
    /// - `GrowthFailure`: `length` is `0`, the range end overflows `usize`, or
    ///   the storage can't be allocated
    pub fn extend(&mut self, offset: impl Into<Offset>, length: usize) -> BufferResult<Extent>
    {
        self.checkup();

        // Without a length there is no way to know how far to grow
        if length == 0 {
            return Err(BufferError::GrowthFailure);
        }

        let offset = offset.into().resolve(self.bytes.len());
        let end = offset.checked_add(length).ok_or(BufferError::GrowthFailure)?;

        if end > self.bytes.len() {
            self.resize(end)?;
        }

        Ok(Extent {
            offset,
            size: self.bytes.len(),
        })
    }

    /// Set the buffer size to exactly `new_size` bytes
    ///
    /// Keeps the overlapping prefix. There is no zero-init switch: a grown
    /// tail is always zero-filled.
    ///
    /// ## Errors
    ///
    /// - `GrowthFailure`: `new_size` is `0`, or the extra storage can't be
    ///   allocated (the buffer is left as it was)
    pub fn resize(&mut self, new_size: usize) -> BufferResult<usize>
    {
        self.checkup();

        if new_size == 0 {
            return Err(BufferError::GrowthFailure);
        }

        let old_size = self.bytes.len();
        if new_size > old_size {
            if let Err(e) = self.bytes.try_reserve_exact(new_size - old_size) {
                warn!(buffer = %self.name, old_size, new_size, error = %e, "buffer growth failed");
                return Err(BufferError::GrowthFailure);
            }
        }
        self.bytes.resize(new_size, 0);
        if new_size < old_size {
            self.bytes.shrink_to_fit();
        }

        debug!(buffer = %self.name, old_size, new_size, "resized buffer");
        Ok(new_size)
    }

    /// Resolve a range for an operation that may either grow the buffer or
    /// work on existing bytes
    ///
    /// A `length` of `0` can't grow anything, so it is checked with
    /// [`available`](Self::available) over what is there. Any other length
    /// goes through [`extend`](Self::extend), and a failed growth is returned.
    pub(crate) fn writable_range(&mut self, offset: impl Into<Offset>, length: usize) -> BufferResult<(usize, usize)>
    {
        let offset = offset.into();
        if length == 0 {
            let length = self.available(offset, length)?;
            return Ok((offset.resolve(self.bytes.len()), length));
        }

        let extent = self.extend(offset, length)?;
        Ok((extent.offset, length))
    }

    /// Copy bytes out of `source` into this buffer
    ///
    /// `src_offset` must fall inside `source`. A `length` of `0` copies the
    /// rest of `source`; longer lengths are clamped to what `source` holds.
    /// This buffer grows as needed. Returns the number of bytes copied.
    ///
    /// ## Errors
    ///
    /// - `InvalidRange`: `source` is empty or `src_offset` is out of range
    pub fn copy(
        &mut self,
        source: &ByteBuffer,
        dst_offset: impl Into<Offset>,
        src_offset: usize,
        length: usize,
    ) -> BufferResult<usize>
    {
        let length = source.available(src_offset, length)?;
        let extent = self.extend(dst_offset, length)?;

        self.bytes[extent.offset..extent.offset + length]
            .copy_from_slice(&source.bytes[src_offset..src_offset + length]);

        debug!(
            dst = %self.name,
            src = %source.name,
            dst_offset = extent.offset,
            src_offset,
            length,
            "copied bytes"
        );
        Ok(length)
    }

    /// Set `length` bytes starting at `offset` to `byte`
    ///
    /// Grows the buffer when the range runs past the end. A `length` of `0`
    /// fills from `offset` to the current end. Returns the number of bytes
    /// written.
    ///
    /// ## Errors
    ///
    /// - `InvalidRange`: `length` is `0` and `offset` is not inside the buffer
    /// - `GrowthFailure`: the buffer can't be grown to cover the range
    pub fn fill(&mut self, byte: u8, offset: impl Into<Offset>, length: usize) -> BufferResult<usize>
    {
        let (start, length) = self.writable_range(offset, length)?;
        self.bytes[start..start + length].fill(byte);

        debug!(buffer = %self.name, byte, offset = start, length, "filled bytes");
        Ok(length)
    }

    /// Write `data` at `offset`, growing the buffer to fit
    ///
    /// Returns the number of bytes written.
    ///
    /// ## Errors
    ///
    /// - `GrowthFailure`: `data` is empty
    pub fn patch(&mut self, offset: impl Into<Offset>, data: &[u8]) -> BufferResult<usize>
    {
        let extent = self.extend(offset, data.len())?;
        self.bytes[extent.offset..extent.offset + data.len()].copy_from_slice(data);

        debug!(buffer = %self.name, offset = extent.offset, length = data.len(), "patched bytes");
        Ok(data.len())
    }

    /// Write the UTF-8 bytes of `text` at `offset`, with no terminator
    ///
    /// ## Errors
    ///
    /// - `GrowthFailure`: `text` is empty
    pub fn print(&mut self, offset: impl Into<Offset>, text: &str) -> BufferResult<usize>
    {
        self.patch(offset, text.as_bytes())
    }

    /// Hex + ASCII dump of a validated range
    ///
    /// The range follows [`available`](Self::available). The returned
    /// [`HexDump`] is both an iterator over rows and `Display`.
    ///
    /// ```rust
    /// use buftool_core::ByteBuffer;
    ///
    /// let buf = ByteBuffer::with_size("b", 20);
    /// let rows: Vec<_> = buf.view(0, 0)?.collect();
    /// assert_eq!(rows.len(), 2);
    /// assert_eq!(rows[1].offset(), 0x10);
    /// # Ok::<(), buftool_core::BufferError>(())
    /// ```
    ///
    /// ## Errors
    ///
    /// - `InvalidRange`: see [`available`](Self::available)
    pub fn view(&self, offset: impl Into<Offset>, length: usize) -> BufferResult<HexDump<'_>>
    {
        let offset = offset.into();
        let length = self.available(offset, length)?;
        let start = offset.resolve(self.bytes.len());

        Ok(HexDump::new(&self.bytes[start..start + length], start))
    }

    /// Mutable access to a range that has already been validated
    pub(crate) fn range_mut(&mut self, start: usize, length: usize) -> &mut [u8]
    {
        &mut self.bytes[start..start + length]
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn numbered(size: usize) -> ByteBuffer
    {
        let mut buf = ByteBuffer::new("n");
        let data: Vec<u8> = (0..size).map(|i| i as u8).collect();
        buf.patch(0, &data).unwrap();
        buf
    }

    #[test]
    fn test_new_buffer_has_no_storage()
    {
        let buf = ByteBuffer::new("a");
        assert!(buf.is_empty());
        assert_eq!(buf.storage_address(), None);
        assert_eq!(buf.name(), "a");
    }

    #[test]
    fn test_with_size_is_zeroed()
    {
        let buf = ByteBuffer::with_size("a", 8);
        assert_eq!(buf.as_bytes(), &[0; 8]);
        assert!(buf.storage_address().is_some());
    }

    #[test]
    fn test_available_rest_of_buffer()
    {
        let buf = ByteBuffer::with_size("a", 32);
        for off in 0..32 {
            assert_eq!(buf.available(off, 0).unwrap(), 32 - off);
        }
    }

    #[test]
    fn test_available_clamps_long_length()
    {
        let buf = ByteBuffer::with_size("a", 10);
        assert_eq!(buf.available(8, 5).unwrap(), 2);
        assert_eq!(buf.available(2, 3).unwrap(), 3);
    }

    #[test]
    fn test_available_rejects_bad_ranges()
    {
        let empty = ByteBuffer::new("e");
        assert!(matches!(empty.available(0, 0), Err(BufferError::InvalidRange { .. })));

        let buf = ByteBuffer::with_size("a", 4);
        assert!(matches!(buf.available(4, 0), Err(BufferError::InvalidRange { offset: 4, size: 4 })));
        assert!(matches!(buf.available(Offset::End, 1), Err(BufferError::InvalidRange { .. })));
    }

    #[test]
    fn test_extend_zero_length_fails()
    {
        let mut buf = ByteBuffer::with_size("a", 4);
        assert!(matches!(buf.extend(0, 0), Err(BufferError::GrowthFailure)));
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn test_extend_grows_and_preserves()
    {
        let mut buf = numbered(8);
        let extent = buf.extend(6, 10).unwrap();
        assert_eq!(extent, Extent { offset: 6, size: 16 });
        assert_eq!(&buf.as_bytes()[..8], &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(buf.as_bytes()[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_extend_never_shrinks()
    {
        let mut buf = numbered(16);
        let extent = buf.extend(2, 3).unwrap();
        assert_eq!(extent.size, 16);
        assert_eq!(buf.as_bytes(), numbered(16).as_bytes());
    }

    #[test]
    fn test_extend_end_appends()
    {
        let mut buf = numbered(5);
        let extent = buf.extend(Offset::End, 3).unwrap();
        assert_eq!(extent, Extent { offset: 5, size: 8 });
    }

    #[test]
    fn test_extend_overflow_fails()
    {
        let mut buf = ByteBuffer::with_size("a", 1);
        assert!(matches!(buf.extend(usize::MAX, 2), Err(BufferError::GrowthFailure)));
    }

    #[test]
    fn test_resize_grow_zero_fills()
    {
        let mut buf = numbered(4);
        buf.resize(9).unwrap();
        assert_eq!(buf.as_bytes(), &[0, 1, 2, 3, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_resize_shrink_keeps_prefix()
    {
        let mut buf = numbered(10);
        buf.resize(3).unwrap();
        assert_eq!(buf.as_bytes(), &[0, 1, 2]);
    }

    #[test]
    fn test_resize_zero_is_rejected()
    {
        let mut buf = numbered(3);
        assert!(buf.resize(0).is_err());
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_resize_beyond_allocator_fails()
    {
        let mut buf = numbered(3);
        assert!(matches!(buf.resize(usize::MAX), Err(BufferError::GrowthFailure)));
        assert_eq!(buf.as_bytes(), &[0, 1, 2]);
    }

    #[test]
    fn test_checkup_releases_empty_storage()
    {
        let mut buf = ByteBuffer::new("a");
        buf.bytes = Vec::with_capacity(64);
        assert!(buf.storage_address().is_some());
        let _ = buf.extend(0, 0);
        assert_eq!(buf.storage_address(), None);
    }

    #[test]
    fn test_copy_between_buffers()
    {
        let src = numbered(10);
        let mut dst = ByteBuffer::with_size("d", 4);
        let copied = dst.copy(&src, 2, 3, 4).unwrap();
        assert_eq!(copied, 4);
        assert_eq!(dst.as_bytes(), &[0, 0, 3, 4, 5, 6]);
    }

    #[test]
    fn test_copy_zero_length_takes_rest()
    {
        let src = numbered(6);
        let mut dst = ByteBuffer::new("d");
        assert_eq!(dst.copy(&src, 0, 2, 0).unwrap(), 4);
        assert_eq!(dst.as_bytes(), &[2, 3, 4, 5]);
    }

    #[test]
    fn test_copy_clamps_to_source()
    {
        let src = numbered(6);
        let mut dst = ByteBuffer::new("d");
        assert_eq!(dst.copy(&src, 0, 4, 100).unwrap(), 2);
        assert_eq!(dst.len(), 2);
    }

    #[test]
    fn test_copy_from_empty_source_fails()
    {
        let src = ByteBuffer::new("s");
        let mut dst = numbered(3);
        assert!(dst.copy(&src, 0, 0, 0).is_err());
        assert_eq!(dst.as_bytes(), &[0, 1, 2]);
    }

    #[test]
    fn test_fill_range()
    {
        let mut buf = ByteBuffer::new("f");
        assert_eq!(buf.fill(0xaa, 2, 4).unwrap(), 4);
        assert_eq!(buf.as_bytes(), &[0, 0, 0xaa, 0xaa, 0xaa, 0xaa]);
    }

    #[test]
    fn test_fill_zero_length_fills_to_end()
    {
        let mut buf = numbered(6);
        assert_eq!(buf.fill(0xff, 4, 0).unwrap(), 2);
        assert_eq!(buf.as_bytes(), &[0, 1, 2, 3, 0xff, 0xff]);
    }

    #[test]
    fn test_fill_zero_length_on_empty_fails()
    {
        let mut buf = ByteBuffer::new("f");
        assert!(buf.fill(1, 0, 0).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_patch_and_print()
    {
        let mut buf = ByteBuffer::new("p");
        buf.patch(0, &[0xde, 0xad]).unwrap();
        buf.print(Offset::End, "hi").unwrap();
        assert_eq!(buf.as_bytes(), &[0xde, 0xad, b'h', b'i']);
    }

    #[test]
    fn test_patch_empty_payload_fails()
    {
        let mut buf = numbered(2);
        assert!(matches!(buf.patch(0, &[]), Err(BufferError::GrowthFailure)));
        assert!(matches!(buf.print(0, ""), Err(BufferError::GrowthFailure)));
    }

    #[test]
    fn test_view_validates_range()
    {
        let buf = ByteBuffer::new("v");
        assert!(buf.view(0, 0).is_err());

        let buf = numbered(20);
        let rows: Vec<_> = buf.view(0, 0).unwrap().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bytes().len(), 16);
        assert_eq!(rows[1].bytes().len(), 4);
        assert_eq!(rows[1].offset(), 16);
    }
}
