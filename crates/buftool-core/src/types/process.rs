//! Process identifier and access direction.

use std::fmt;

/// Process identifier (PID)
///
/// Newtype over the kernel's process id so it can't be swapped with a length
/// or an offset in [`ByteBuffer::memacc`](crate::ByteBuffer::memacc).
///
/// ## Example
///
/// ```rust
/// use buftool_core::types::ProcessId;
///
/// let pid = ProcessId::from(4242);
/// assert_eq!(u32::from(pid), 4242);
/// assert_eq!(pid.to_string(), "4242");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(pub u32);

impl From<u32> for ProcessId
{
    fn from(pid: u32) -> Self
    {
        ProcessId(pid)
    }
}

impl From<ProcessId> for u32
{
    fn from(pid: ProcessId) -> Self
    {
        pid.0
    }
}

impl fmt::Display for ProcessId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

/// Direction of a foreign-process memory transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode
{
    /// Copy target memory into the buffer
    Read,
    /// Copy buffer bytes into target memory
    Write,
}

impl AccessMode
{
    /// Whether the process handle must be opened writable
    pub fn is_write(self) -> bool
    {
        matches!(self, AccessMode::Write)
    }
}

impl fmt::Display for AccessMode
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            AccessMode::Read => write!(f, "read"),
            AccessMode::Write => write!(f, "write"),
        }
    }
}
