//! Buffer offsets and file write modes.

use std::fmt;

/// Where a write lands in a buffer
///
/// `End` is the "no offset given" case: the data is appended at the current
/// end of the buffer. Plain `usize` values convert into `At`, so most calls
/// can pass a number directly.
///
/// ```rust
/// use buftool_core::types::Offset;
///
/// assert_eq!(Offset::from(4), Offset::At(4));
/// assert_eq!(Offset::End.resolve(10), 10);
/// assert_eq!(Offset::At(3).resolve(10), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Offset
{
    /// Absolute byte offset
    At(usize),
    /// Current end of the buffer
    #[default]
    End,
}

impl Offset
{
    /// Resolve against a buffer of `size` bytes
    pub fn resolve(self, size: usize) -> usize
    {
        match self {
            Offset::At(offset) => offset,
            Offset::End => size,
        }
    }
}

impl From<usize> for Offset
{
    fn from(offset: usize) -> Self
    {
        Offset::At(offset)
    }
}

impl fmt::Display for Offset
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Offset::At(offset) => write!(f, "{offset:#x}"),
            Offset::End => write!(f, "end"),
        }
    }
}

/// How [`ByteBuffer::save`](crate::ByteBuffer::save) places bytes into an existing file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SaveMode
{
    /// Splice the bytes in, shifting the rest of the file forward
    #[default]
    Insert,
    /// Replace bytes in place; the file never grows
    Overwrite,
}
