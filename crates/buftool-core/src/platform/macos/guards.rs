//! # RAII Guards for Mach Task Access
//!
//! - **TaskPort**: a send right from `task_for_pid()`, deallocated on drop
//! - **TaskSuspendGuard**: suspends a task and resumes it on drop
//!
//! Declare the suspend guard after the port it borrows from so it drops
//! first: resume, then release the port.

use libc::{c_int, mach_port_t};
use mach2::kern_return::KERN_SUCCESS;
use mach2::traps::mach_task_self;
use tracing::{debug, warn};

use super::error::MachError;
use super::ffi;
use crate::types::ProcessId;

/// Owned Mach task port for another process
pub struct TaskPort
{
    port: mach_port_t,
    pid: ProcessId,
}

impl TaskPort
{
    /// `task_for_pid()` on `pid`
    ///
    /// ## Errors
    ///
    /// The Mach error. `KERN_FAILURE` for a process that exists is reported
    /// as `ProtectionFailure`, since macOS returns it for missing permissions
    /// as well as for missing processes.
    pub fn open(pid: ProcessId) -> Result<Self, MachError>
    {
        let raw = c_int::try_from(pid.0).map_err(|_| MachError::InvalidArgument)?;
        let mut port: mach_port_t = 0;
        let result = unsafe { ffi::task_for_pid(mach_task_self(), raw, &mut port) };

        if result != KERN_SUCCESS {
            if result == libc::KERN_FAILURE {
                // Signal 0 only checks that the process exists
                let exists = unsafe { libc::kill(raw, 0) } == 0;
                if exists {
                    return Err(MachError::ProtectionFailure);
                }
            }
            return Err(MachError::from(result));
        }

        debug!(%pid, port, "acquired task port");
        Ok(Self { port, pid })
    }

    pub fn raw(&self) -> mach_port_t
    {
        self.port
    }

    pub fn pid(&self) -> ProcessId
    {
        self.pid
    }
}

impl Drop for TaskPort
{
    fn drop(&mut self)
    {
        let result = unsafe { ffi::mach_port_deallocate(mach_task_self(), self.port) };
        if result != KERN_SUCCESS {
            warn!(pid = %self.pid, error = %MachError::from(result), "mach_port_deallocate failed");
        }
    }
}

/// RAII guard that keeps a task suspended
pub struct TaskSuspendGuard
{
    task: mach_port_t,
    pid: ProcessId,
}

impl TaskSuspendGuard
{
    /// Suspend every thread of `task`
    ///
    /// ## Errors
    ///
    /// The Mach error from `task_suspend()`.
    pub fn new(task: &TaskPort) -> Result<Self, MachError>
    {
        let result = unsafe { ffi::task_suspend(task.raw()) };
        if result != KERN_SUCCESS {
            return Err(MachError::from(result));
        }

        debug!(pid = %task.pid(), "task suspended");
        Ok(Self {
            task: task.raw(),
            pid: task.pid(),
        })
    }
}

impl Drop for TaskSuspendGuard
{
    fn drop(&mut self)
    {
        // Best effort resume; the task may have died while suspended
        let result = unsafe { ffi::task_resume(self.task) };
        if result == KERN_SUCCESS {
            debug!(pid = %self.pid, "task resumed");
        } else {
            warn!(pid = %self.pid, error = %MachError::from(result), "task_resume failed");
        }
    }
}
