//! # Process Accessor Trait
//!
//! The capability interface for reading and writing another process's memory.
//!
//! Each platform implements it with its own system APIs:
//!
//! - **Linux**: `ptrace(PTRACE_ATTACH)` + `waitpid()`, then `pread`/`pwrite` on
//!   `/proc/<pid>/mem`
//! - **macOS**: `task_for_pid()` + `task_suspend()`, then
//!   `mach_vm_read_overwrite()`/`vm_write()`
//!
//! ## Lifecycle
//!
//! 1. Pick an accessor: [`create_accessor()`]
//! 2. Attach: [`ProcessAccessor::attach`] returns a [`ProcessSession`]; the
//!    target is stopped for as long as the session lives
//! 3. Transfer: [`ProcessSession::read`] / [`ProcessSession::write`]
//! 4. Detach: drop the session
//!
//! Detaching lives in `Drop` so the target is released on every path out of
//! a transfer, including `?` returns and panics.

use crate::error::ProcessError;
use crate::types::{AccessMode, Address, ProcessId};

/// Opens transfer sessions against running processes
pub trait ProcessAccessor
{
    /// Open a handle to `pid` and stop it
    ///
    /// `mode` decides whether the handle is opened writable.
    ///
    /// ## Errors
    ///
    /// - `Open`: no such process, or not allowed to open it
    /// - `Attach`: the attach primitive failed
    /// - `Wait`: the target never reported stopped
    /// - `Unsupported`: no backend on this platform
    fn attach(&self, pid: ProcessId, mode: AccessMode) -> Result<Box<dyn ProcessSession>, ProcessError>;
}

/// An attached, stopped process
///
/// Implementations must detach and release their handle when dropped.
pub trait ProcessSession
{
    /// The attached process
    fn pid(&self) -> ProcessId;

    /// Read target memory at `addr` into `buf`
    ///
    /// Returns the number of bytes read, which is less than `buf.len()` when
    /// the range runs into unmapped memory.
    fn read(&mut self, addr: Address, buf: &mut [u8]) -> Result<usize, ProcessError>;

    /// Write `data` into target memory at `addr`
    ///
    /// Returns the number of bytes written.
    fn write(&mut self, addr: Address, data: &[u8]) -> Result<usize, ProcessError>;

    /// Make freshly written code visible to the target's instruction fetch
    ///
    /// The default does nothing, for backends where the kernel already keeps
    /// caches coherent on remote writes.
    fn flush_instruction_cache(&mut self, _addr: Address, _len: usize) -> Result<(), ProcessError>
    {
        Ok(())
    }
}

/// Accessor for platforms without a backend
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedAccessor;

impl ProcessAccessor for UnsupportedAccessor
{
    fn attach(&self, _pid: ProcessId, _mode: AccessMode) -> Result<Box<dyn ProcessSession>, ProcessError>
    {
        Err(ProcessError::Unsupported(std::env::consts::OS))
    }
}

/// Factory function for the platform's process accessor
///
/// Selected at compile time with `#[cfg]`:
///
/// - ✅ Linux: [`PtraceAccessor`](crate::platform::linux::PtraceAccessor)
/// - ✅ macOS: [`MachAccessor`](crate::platform::macos::MachAccessor)
/// - ⏳ Everything else: [`UnsupportedAccessor`]
///
/// ## Example
///
/// ```rust,no_run
/// use buftool_core::accessor::create_accessor;
/// use buftool_core::types::{AccessMode, Address, ProcessId};
/// use buftool_core::ByteBuffer;
///
/// let accessor = create_accessor();
/// let mut buf = ByteBuffer::new("stack");
/// let read = buf.memacc(&*accessor, AccessMode::Read, ProcessId::from(12345), Address::from(0x7ffd_0000_0000), 64, 0)?;
/// println!("read {read} bytes");
/// # Ok::<(), buftool_core::BufferError>(())
/// ```
pub fn create_accessor() -> Box<dyn ProcessAccessor>
{
    #[cfg(target_os = "linux")]
    {
        Box::new(crate::platform::linux::PtraceAccessor)
    }

    #[cfg(target_os = "macos")]
    {
        Box::new(crate::platform::macos::MachAccessor)
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        Box::new(UnsupportedAccessor)
    }
}
