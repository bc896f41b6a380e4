//! # File Persistence
//!
//! Moving bytes between a [`ByteBuffer`] and a file on disk.
//!
//! Files are treated as raw bytes: nothing is added or stripped. Positions in
//! the file are signed; a negative position counts back from the end of the
//! file, so `-4` is "the last four bytes".
//!
//! ## Saving
//!
//! - **New or empty file**: the file is (re)created with `pos` zero bytes
//!   followed by the buffer slice, so the data lands at byte `pos`.
//! - **Existing file, [`SaveMode::Insert`]**: the slice is spliced in at `pos`
//!   and the rest of the file moves forward. Positions past the end are
//!   zero-padded first.
//! - **Existing file, [`SaveMode::Overwrite`]**: bytes are replaced in place.
//!   The replaced span is clamped at the end of the file, so the file never
//!   grows.
//!
//! Every save rewrites the whole file.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::buffer::ByteBuffer;
use crate::error::{BufferError, BufferResult};
use crate::types::{Offset, SaveMode};

/// Resolve a possibly negative file position against the file size
fn resolve_position(pos: i64, file_size: u64) -> i64
{
    if pos < 0 {
        i64::try_from(file_size).unwrap_or(i64::MAX).saturating_add(pos)
    } else {
        pos
    }
}

/// Make room for `additional` more bytes of file content
fn reserve(content: &mut Vec<u8>, additional: usize, path: &Path) -> BufferResult<()>
{
    content.try_reserve(additional).map_err(|e| {
        warn!(path = %path.display(), additional, error = %e, "file content too large");
        BufferError::GrowthFailure
    })
}

fn to_usize(value: u64) -> usize
{
    usize::try_from(value).unwrap_or(usize::MAX)
}

impl ByteBuffer
{
    /// Read part of a file into the buffer at `off`
    ///
    /// `pos` is where reading starts in the file (negative counts back from
    /// the end). A `len` of `0` reads to the end of the file; longer lengths
    /// read only what the file holds, although the buffer is still grown to
    /// `off + len`. Returns the number of bytes read.
    ///
    /// ## Errors
    ///
    /// - `FileUnavailable`: the file can't be opened or read, or is empty
    /// - `FilePositionInvalid`: the resolved `pos` is outside the file
    /// - `GrowthFailure`: the buffer can't be grown to hold the data
    ///
    /// ## Example
    ///
    /// ```rust,no_run
    /// use buftool_core::ByteBuffer;
    ///
    /// let mut buf = ByteBuffer::new("header");
    /// // First 64 bytes of the file into the start of the buffer
    /// buf.load("/bin/ls", 0, 64, 0)?;
    /// # Ok::<(), buftool_core::BufferError>(())
    /// ```
    pub fn load(&mut self, path: impl AsRef<Path>, pos: i64, len: usize, off: impl Into<Offset>) -> BufferResult<usize>
    {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| BufferError::file(path, e))?;
        let file_size = file.metadata().map_err(|e| BufferError::file(path, e))?.len();
        if file_size == 0 {
            return Err(BufferError::file(path, io::Error::new(ErrorKind::UnexpectedEof, "file is empty")));
        }

        let pos = resolve_position(pos, file_size);
        let start = match u64::try_from(pos) {
            Ok(start) if start < file_size => start,
            _ => {
                warn!(path = %path.display(), pos, file_size, "load position outside file");
                return Err(BufferError::FilePositionInvalid { pos, size: file_size });
            }
        };

        let space = to_usize(file_size - start);
        let len = if len == 0 { space } else { len };
        let read_size = len.min(space);

        let extent = self.extend(off, len)?;

        file.seek(SeekFrom::Start(start)).map_err(|e| BufferError::file(path, e))?;
        file.read_exact(self.range_mut(extent.offset, read_size))
            .map_err(|e| BufferError::file(path, e))?;

        info!(
            path = %path.display(),
            buffer = %self.name(),
            pos = start,
            offset = extent.offset,
            bytes = read_size,
            "loaded file"
        );
        Ok(read_size)
    }

    /// Write part of the buffer into a file
    ///
    /// The source range is `len` bytes at `off`, growing the buffer if it
    /// runs past the end; a `len` of `0` takes everything from `off` to the
    /// end. See the [module docs](self) for how `pos` and `mode` place the
    /// bytes. Returns the number of bytes written from the buffer.
    ///
    /// ## Errors
    ///
    /// - `InvalidRange`: the source range can't be resolved
    /// - `GrowthFailure`: the buffer or the new file content can't be grown
    ///   to the requested size
    /// - `FileUnavailable`: the file can't be read, removed or written
    /// - `FilePositionInvalid`: `pos` is negative for a new file, resolves
    ///   before the start of an existing file, or is at/after the end in
    ///   overwrite mode
    pub fn save(
        &mut self,
        path: impl AsRef<Path>,
        pos: i64,
        len: usize,
        off: impl Into<Offset>,
        mode: SaveMode,
    ) -> BufferResult<usize>
    {
        let path = path.as_ref();
        let (start, len) = self.writable_range(off, len)?;
        let slice = &self.as_bytes()[start..start + len];

        let existing = match fs::read(path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(BufferError::file(path, e)),
        };

        let content = match existing {
            Some(content) if !content.is_empty() => content,
            existing => {
                if existing.is_some() {
                    debug!(path = %path.display(), "removing empty file");
                    fs::remove_file(path).map_err(|e| BufferError::file(path, e))?;
                }
                let Ok(pad) = usize::try_from(pos) else {
                    return Err(BufferError::FilePositionInvalid { pos, size: 0 });
                };

                let mut out = Vec::new();
                reserve(&mut out, pad.saturating_add(len), path)?;
                out.resize(pad, 0);
                out.extend_from_slice(slice);
                fs::write(path, &out).map_err(|e| BufferError::file(path, e))?;

                info!(path = %path.display(), buffer = %self.name(), pos = pad, bytes = len, "created file");
                return Ok(len);
            }
        };

        let file_size = content.len() as u64;
        let resolved = resolve_position(pos, file_size);
        let pos = match usize::try_from(resolved) {
            Ok(pos) if mode == SaveMode::Insert || pos < content.len() => pos,
            _ => {
                warn!(path = %path.display(), pos = resolved, file_size, ?mode, "save position outside file");
                return Err(BufferError::FilePositionInvalid {
                    pos: resolved,
                    size: file_size,
                });
            }
        };

        let mut content = content;
        let written = match mode {
            SaveMode::Insert => {
                let additional = pos.saturating_sub(content.len()).saturating_add(len);
                reserve(&mut content, additional, path)?;
                if pos > content.len() {
                    content.resize(pos, 0);
                }
                content.splice(pos..pos, slice.iter().copied());
                len
            }
            SaveMode::Overwrite => {
                let span = len.min(content.len() - pos);
                content[pos..pos + span].copy_from_slice(&slice[..span]);
                span
            }
        };

        fs::write(path, &content).map_err(|e| BufferError::file(path, e))?;

        info!(
            path = %path.display(),
            buffer = %self.name(),
            pos,
            bytes = written,
            file_size = content.len(),
            ?mode,
            "saved file"
        );
        Ok(written)
    }
}
