//! # Error Types
//!
//! Error handling for buffer, file and process-memory operations.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::ProcessId;

/// Main error type for buffer operations
///
/// Every public operation on [`ByteBuffer`](crate::ByteBuffer) either succeeds
/// or returns one of these. A failed operation never leaves the buffer in a
/// partially written state.
///
/// ## Error Categories
///
/// 1. **Range errors**: InvalidRange, GrowthFailure
/// 2. **File errors**: FileUnavailable, FilePositionInvalid
/// 3. **Process errors**: ProcessUnavailable
#[derive(Error, Debug)]
pub enum BufferError
{
    /// The offset/length pair does not describe bytes inside the buffer
    ///
    /// This happens when:
    /// - The buffer is empty
    /// - The offset is at or past the end of the buffer
    /// - The offset was `Offset::End`, which has no bytes to validate
    #[error("Invalid range: offset {offset} (buffer size: {size})")]
    InvalidRange
    {
        /// Requested offset, or the buffer size for `Offset::End`
        offset: usize,
        /// Buffer size at the time of the request
        size: usize,
    },

    /// A growth request could not be honoured
    ///
    /// `extend` needs a non-zero length; an empty payload or a zero length
    /// gives it nothing to work with. Sizes the allocator refuses end up here
    /// too.
    #[error("Cannot grow buffer: zero length or size too large")]
    GrowthFailure,

    /// The target file could not be opened, created, read or written
    #[error("Could not open {}: {source}", path.display())]
    FileUnavailable
    {
        /// Path of the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The resolved file position is outside the file
    #[error("Invalid file position {pos} (file size: {size})")]
    FilePositionInvalid
    {
        /// Resolved position (negative positions are measured from the end)
        pos: i64,
        /// Size of the file
        size: u64,
    },

    /// The target process could not be opened, attached or accessed
    #[error("Process {pid} unavailable: {source}")]
    ProcessUnavailable
    {
        /// Target process
        pid: ProcessId,
        /// What went wrong, and at which stage
        #[source]
        source: ProcessError,
    },
}

impl BufferError
{
    /// Negative status code for callers that speak in sentinels.
    ///
    /// - `-1`: the local range could not be validated
    /// - `-2`: the process could not be opened
    /// - `-3`: the attach step failed
    /// - `-4`: waiting for the attach to take effect failed
    /// - `-5`: anything else
    pub fn code(&self) -> i32
    {
        match self {
            BufferError::InvalidRange { .. } | BufferError::GrowthFailure => -1,
            BufferError::ProcessUnavailable { source, .. } => match source {
                ProcessError::Open(_) => -2,
                ProcessError::Attach(_) => -3,
                ProcessError::Wait(_) => -4,
                _ => -5,
            },
            _ => -5,
        }
    }

    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self
    {
        BufferError::FileUnavailable {
            path: path.into(),
            source,
        }
    }
}

/// Failure while talking to another process
///
/// The variants follow the order of the access sequence: open a handle,
/// attach, wait for the target to stop, transfer. Detaching never fails
/// from the caller's point of view; it runs on drop.
#[derive(Error, Debug)]
pub enum ProcessError
{
    /// The process handle could not be opened (no such process, or no permission)
    #[error("could not open process: {0}")]
    Open(#[source] io::Error),

    /// The debug-attach primitive failed
    #[error("could not attach to process: {0}")]
    Attach(#[source] io::Error),

    /// Waiting for the attached process to stop failed
    #[error("could not wait for process: {0}")]
    Wait(#[source] io::Error),

    /// The read or write itself failed after a successful attach
    #[error("memory transfer failed at 0x{addr:x}: {source}")]
    Transfer
    {
        /// Target address of the transfer
        addr: u64,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// No process memory backend exists for this platform
    #[error("process memory access is not supported on {0}")]
    Unsupported(&'static str),
}

/// Convenience type alias for `Result<T, BufferError>`
///
/// ```rust
/// use buftool_core::error::BufferResult;
/// fn foo() -> BufferResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type BufferResult<T> = std::result::Result<T, BufferError>;
