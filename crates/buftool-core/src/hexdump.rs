//! Hex + ASCII rendering of buffer contents.
//!
//! Each row covers 16 bytes:
//!
//! ```text
//!        0 | 48 65 6c 6c - 6f 2c 20 77 - 6f 72 6c 64 - 21 0a 00 ff | Hello, world!...
//!       10 | 41 42 43 44                                           | ABCD
//! ```
//!
//! The offset is absolute (relative to the start of the buffer, not of the
//! dumped range), right-aligned in 8 hex digits. Short rows are padded so the
//! ASCII column always lines up.

use std::fmt::{self, Write};
use std::slice::Chunks;

use tracing::trace;

/// Bytes per row
pub const ROW_SIZE: usize = 16;

/// Bytes between `-` dividers
const GROUP_SIZE: usize = 4;

/// Width of the hex column of a full row: 16 × "xx " plus 3 × "- "
const HEX_COLUMN_WIDTH: usize = ROW_SIZE * 3 + (ROW_SIZE / GROUP_SIZE - 1) * 2;

/// Lazy sequence of [`HexRow`]s over a validated byte range
///
/// Produced by [`ByteBuffer::view`](crate::ByteBuffer::view). Formatting the
/// dump with `{}` renders every row followed by a newline.
#[derive(Debug, Clone)]
pub struct HexDump<'a>
{
    chunks: Chunks<'a, u8>,
    offset: usize,
}

impl<'a> HexDump<'a>
{
    pub(crate) fn new(bytes: &'a [u8], offset: usize) -> Self
    {
        Self {
            chunks: bytes.chunks(ROW_SIZE),
            offset,
        }
    }
}

impl<'a> Iterator for HexDump<'a>
{
    type Item = HexRow<'a>;

    fn next(&mut self) -> Option<Self::Item>
    {
        let bytes = self.chunks.next()?;
        let row = HexRow {
            offset: self.offset,
            bytes,
        };
        self.offset += bytes.len();
        trace!(offset = row.offset, len = bytes.len(), "rendering hex row");
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>)
    {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for HexDump<'_> {}

impl fmt::Display for HexDump<'_>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        for row in self.clone() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// One row of a [`HexDump`]: up to 16 bytes and their absolute offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexRow<'a>
{
    offset: usize,
    bytes: &'a [u8],
}

impl<'a> HexRow<'a>
{
    pub fn offset(&self) -> usize
    {
        self.offset
    }

    pub fn bytes(&self) -> &'a [u8]
    {
        self.bytes
    }

    /// The bytes as ASCII, non-printable ones shown as `.`
    pub fn ascii(&self) -> String
    {
        self.bytes.iter().map(|&b| printable(b)).collect()
    }

    fn hex_column(&self) -> String
    {
        let mut column = String::with_capacity(HEX_COLUMN_WIDTH);
        let last = self.bytes.len().saturating_sub(1);
        for (i, byte) in self.bytes.iter().enumerate() {
            let _ = write!(column, "{byte:02x} ");
            if i % GROUP_SIZE == GROUP_SIZE - 1 && i != last {
                column.push_str("- ");
            }
        }
        column
    }
}

impl fmt::Display for HexRow<'_>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(
            f,
            "{:>8x} | {:<width$}| {}",
            self.offset,
            self.hex_column(),
            self.ascii(),
            width = HEX_COLUMN_WIDTH
        )
    }
}

/// `' '` up to but not including `'~'` prints as itself
fn printable(byte: u8) -> char
{
    if (b' '..b'~').contains(&byte) {
        byte as char
    } else {
        '.'
    }
}
