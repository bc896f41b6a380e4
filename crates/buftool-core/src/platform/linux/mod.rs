//! # Linux Process Memory
//!
//! Attach-based access through `ptrace` and procfs.
//!
//! ## Sequence
//!
//! 1. Open `/proc/<pid>/mem` (read-only, or read-write for writes)
//! 2. `ptrace(PTRACE_ATTACH, pid)` sends the target a `SIGSTOP`
//! 3. `waitpid(pid)` blocks until the stop is observed
//! 4. `pread`/`pwrite` on the mem file at the target address
//! 5. `ptrace(PTRACE_DETACH, pid)` lets it run again
//!
//! Steps 2 and 5 are paired by [`guards::PtraceGuard`].
//!
//! ## Permissions
//!
//! Attaching needs the same uid as the target and a permissive
//! `/proc/sys/kernel/yama/ptrace_scope`, or `CAP_SYS_PTRACE`.

pub mod guards;

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::FileExt;

use tracing::trace;

use crate::accessor::{ProcessAccessor, ProcessSession};
use crate::error::ProcessError;
use crate::types::{AccessMode, Address, ProcessId};
use guards::PtraceGuard;

/// [`ProcessAccessor`] backed by `ptrace` + `/proc/<pid>/mem`
#[derive(Debug, Default, Clone, Copy)]
pub struct PtraceAccessor;

impl ProcessAccessor for PtraceAccessor
{
    fn attach(&self, pid: ProcessId, mode: AccessMode) -> Result<Box<dyn ProcessSession>, ProcessError>
    {
        let path = format!("/proc/{pid}/mem");
        let mem = OpenOptions::new()
            .read(true)
            .write(mode.is_write())
            .open(&path)
            .map_err(ProcessError::Open)?;

        let guard = PtraceGuard::attach(pid).map_err(ProcessError::Attach)?;
        // On failure the guard drops here and detaches
        guard.wait_stopped().map_err(ProcessError::Wait)?;

        Ok(Box::new(PtraceSession { mem, guard }))
    }
}

/// A stopped tracee and its open mem file
///
/// Field order matters: the guard is declared last so it drops (detaches)
/// after the file is closed.
struct PtraceSession
{
    mem: File,
    guard: PtraceGuard,
}

impl PtraceSession
{
    /// Run `op` until `len` bytes are moved, the range ends (`Ok(0)`), or it fails
    ///
    /// An error after some bytes already moved is reported as a short count.
    fn transfer<F>(&self, addr: Address, len: usize, mut op: F) -> Result<usize, ProcessError>
    where
        F: FnMut(usize, u64) -> io::Result<usize>,
    {
        let mut done = 0;
        while done < len {
            let Some(at) = addr.checked_add(done as u64) else {
                break;
            };
            match op(done, at.value()) {
                Ok(0) => break,
                Ok(n) => done += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) if done == 0 => {
                    return Err(ProcessError::Transfer {
                        addr: at.value(),
                        source: e,
                    });
                }
                Err(e) => {
                    trace!(pid = %self.guard.pid(), addr = %at, error = %e, "short transfer");
                    break;
                }
            }
        }
        Ok(done)
    }
}

impl ProcessSession for PtraceSession
{
    fn pid(&self) -> ProcessId
    {
        self.guard.pid()
    }

    fn read(&mut self, addr: Address, buf: &mut [u8]) -> Result<usize, ProcessError>
    {
        let len = buf.len();
        let mem = &self.mem;
        self.transfer(addr, len, |done, at| mem.read_at(&mut buf[done..], at))
    }

    // The kernel's remote write path (copy_to_user_page) already flushes the
    // icache, so the default no-op flush is correct here.
    fn write(&mut self, addr: Address, data: &[u8]) -> Result<usize, ProcessError>
    {
        let mem = &self.mem;
        self.transfer(addr, data.len(), |done, at| mem.write_at(&data[done..], at))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_attach_missing_process_fails_to_open()
    {
        // PIDs are capped well below this by pid_max
        let result = PtraceAccessor.attach(ProcessId::from(u32::MAX - 1), AccessMode::Read);
        assert!(matches!(result, Err(ProcessError::Open(_))));
    }
}
