//! Transfers between a buffer and another process's memory.

use tracing::{debug, info};

use crate::accessor::ProcessAccessor;
use crate::buffer::ByteBuffer;
use crate::error::{BufferError, BufferResult};
use crate::types::{AccessMode, Address, Offset, ProcessId};

impl ByteBuffer
{
    /// Read or write `len` bytes of process `pid` at `addr`
    ///
    /// The local range is `len` bytes at `off`, growing the buffer if needed;
    /// a `len` of `0` uses everything from `off` to the end. The target is
    /// attached, the bytes are moved, and the target is detached again before
    /// this returns, whether or not the transfer worked. A write is followed
    /// by an instruction cache flush over the written range.
    ///
    /// Returns the number of bytes actually transferred. This can be less
    /// than requested when the target range runs into unmapped memory.
    ///
    /// ## Errors
    ///
    /// - `InvalidRange`: the local range can't be resolved (code `-1`)
    /// - `GrowthFailure`: the buffer can't be grown to cover the range (`-1`)
    /// - `ProcessUnavailable`: opening (`-2`), attaching (`-3`), waiting (`-4`)
    ///   or the transfer itself failed
    pub fn memacc(
        &mut self,
        accessor: &dyn ProcessAccessor,
        mode: AccessMode,
        pid: ProcessId,
        addr: Address,
        len: usize,
        off: impl Into<Offset>,
    ) -> BufferResult<usize>
    {
        let (start, len) = self.writable_range(off, len)?;
        let unavailable = |source| BufferError::ProcessUnavailable { pid, source };

        let mut session = accessor.attach(pid, mode).map_err(unavailable)?;
        info!(%pid, %mode, %addr, len, "attached to process");

        let range = self.range_mut(start, len);
        let transferred = match mode {
            AccessMode::Read => session.read(addr, range).map_err(unavailable)?,
            AccessMode::Write => {
                let written = session.write(addr, range).map_err(unavailable)?;
                session.flush_instruction_cache(addr, written).map_err(unavailable)?;
                written
            }
        };

        drop(session);
        debug!(%pid, %mode, %addr, offset = start, transferred, requested = len, "detached from process");
        Ok(transferred)
    }
}
