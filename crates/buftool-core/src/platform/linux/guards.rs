//! # RAII Guard for ptrace Attachment
//!
//! [`PtraceGuard`] attaches to a process and detaches when dropped, so the
//! target is never left stopped behind an early return or a panic.

use std::io;
use std::ptr;

use tracing::{debug, warn};

use crate::types::ProcessId;

/// RAII guard that holds a `ptrace` attachment
///
/// ## Example
///
/// ```rust,no_run
/// use buftool_core::platform::linux::guards::PtraceGuard;
/// use buftool_core::types::ProcessId;
///
/// let guard = PtraceGuard::attach(ProcessId::from(12345))?;
/// guard.wait_stopped()?;
/// // Target is stopped here; dropping the guard resumes it
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct PtraceGuard
{
    pid: ProcessId,
}

impl PtraceGuard
{
    /// `PTRACE_ATTACH` to `pid`
    ///
    /// The target is sent `SIGSTOP`; call [`wait_stopped`](Self::wait_stopped)
    /// before touching its memory.
    ///
    /// ## Errors
    ///
    /// The OS error from `ptrace` (`EPERM`, `ESRCH`, ...).
    pub fn attach(pid: ProcessId) -> io::Result<Self>
    {
        let raw = raw_pid(pid)?;
        let result = unsafe {
            libc::ptrace(
                libc::PTRACE_ATTACH,
                raw,
                ptr::null_mut::<libc::c_void>(),
                ptr::null_mut::<libc::c_void>(),
            )
        };
        if result < 0 {
            return Err(io::Error::last_os_error());
        }

        debug!(%pid, "ptrace attached");
        Ok(Self { pid })
    }

    /// Block until the attached process reports stopped
    ///
    /// ## Errors
    ///
    /// The OS error from `waitpid`, or `Other` if `waitpid` returned for a
    /// different child.
    pub fn wait_stopped(&self) -> io::Result<()>
    {
        let raw = raw_pid(self.pid)?;
        let mut status: libc::c_int = 0;
        loop {
            let waited = unsafe { libc::waitpid(raw, &mut status, 0) };
            if waited == raw {
                return Ok(());
            }
            let err = io::Error::last_os_error();
            if waited < 0 && err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(if waited < 0 {
                err
            } else {
                io::Error::other(format!("waitpid returned {waited}, expected {raw}"))
            });
        }
    }

    pub fn pid(&self) -> ProcessId
    {
        self.pid
    }
}

impl Drop for PtraceGuard
{
    fn drop(&mut self)
    {
        let Ok(raw) = raw_pid(self.pid) else {
            return;
        };
        // Best effort detach; the target may already be gone
        let result = unsafe {
            libc::ptrace(
                libc::PTRACE_DETACH,
                raw,
                ptr::null_mut::<libc::c_void>(),
                ptr::null_mut::<libc::c_void>(),
            )
        };
        if result < 0 {
            warn!(pid = %self.pid, error = %io::Error::last_os_error(), "ptrace detach failed");
        } else {
            debug!(pid = %self.pid, "ptrace detached");
        }
    }
}

fn raw_pid(pid: ProcessId) -> io::Result<libc::pid_t>
{
    libc::pid_t::try_from(pid.0).map_err(|_| io::Error::from_raw_os_error(libc::ESRCH))
}
