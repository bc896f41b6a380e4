//! # macOS Process Memory
//!
//! Handle-based access through Mach task ports.
//!
//! macOS has no `/proc` and no usable `PTRACE_PEEKDATA`; instead, a task port
//! from `task_for_pid()` is a direct handle to the target's address space.
//!
//! ## Sequence
//!
//! 1. `task_for_pid()` → task port (the "open" step)
//! 2. `task_suspend()` stops all threads (the "attach" step; it is synchronous,
//!    so there is nothing to wait for)
//! 3. `mach_vm_read_overwrite()` / `vm_write()`
//! 4. `task_resume()`, then `mach_port_deallocate()`
//!
//! Steps 2/4 and 1/4 are paired by the guards in [`guards`].
//!
//! ## Dependencies
//!
//! - **mach2 crate**: `mach_task_self`, `mach_vm_read_overwrite`, `KERN_SUCCESS`
//! - **libc crate**: type definitions (`mach_port_t`, `vm_map_t`, ...)
//! - **extern "C"**: the restricted calls in [`ffi`]

pub mod error;
pub mod ffi;
pub mod guards;
pub mod memory;

use std::io;

use crate::accessor::{ProcessAccessor, ProcessSession};
use crate::error::ProcessError;
use crate::types::{AccessMode, Address, ProcessId};
use guards::{TaskPort, TaskSuspendGuard};

/// [`ProcessAccessor`] backed by Mach task ports
#[derive(Debug, Default, Clone, Copy)]
pub struct MachAccessor;

impl ProcessAccessor for MachAccessor
{
    fn attach(&self, pid: ProcessId, _mode: AccessMode) -> Result<Box<dyn ProcessSession>, ProcessError>
    {
        let task = TaskPort::open(pid).map_err(|e| ProcessError::Open(io::Error::from(e)))?;
        let suspended = TaskSuspendGuard::new(&task).map_err(|e| ProcessError::Attach(io::Error::from(e)))?;

        Ok(Box::new(MachSession {
            _suspended: suspended,
            task,
        }))
    }
}

/// A suspended task
///
/// `_suspended` is declared first so the task resumes before its port is
/// released.
struct MachSession
{
    _suspended: TaskSuspendGuard,
    task: TaskPort,
}

impl ProcessSession for MachSession
{
    fn pid(&self) -> ProcessId
    {
        self.task.pid()
    }

    fn read(&mut self, addr: Address, buf: &mut [u8]) -> Result<usize, ProcessError>
    {
        memory::read_into(self.task.raw(), addr, buf).map_err(|e| ProcessError::Transfer {
            addr: addr.value(),
            source: e.into(),
        })
    }

    fn write(&mut self, addr: Address, data: &[u8]) -> Result<usize, ProcessError>
    {
        memory::write_from(self.task.raw(), addr, data).map_err(|e| ProcessError::Transfer {
            addr: addr.value(),
            source: e.into(),
        })
    }
}
