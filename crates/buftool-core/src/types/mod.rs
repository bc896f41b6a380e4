//! # Types
//!
//! Small value types shared by the buffer engine and the process backends.
//!
//! They keep addresses, process ids and buffer offsets apart at the type level,
//! so a call like `memacc(mode, pid, addr, len, off)` can't silently mix them up.

pub mod address;
pub mod offset;
pub mod process;

// Re-export all public types
pub use address::Address;
pub use offset::{Offset, SaveMode};
pub use process::{AccessMode, ProcessId};
