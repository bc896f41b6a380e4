//! # buftool-core
//!
//! Growable byte buffers and the operations of the buftool editor.
//!
//! This crate provides:
//! - [`ByteBuffer`]: a named, growable region of raw bytes with bounds
//!   checking (`available`), growth (`extend`, `resize`) and mutation
//!   (`copy`, `fill`, `patch`, `print`)
//! - A hex + ASCII renderer (`view`)
//! - File persistence (`load`, `save`) with insert and overwrite modes
//! - Foreign-process memory access (`memacc`) behind the
//!   [`ProcessAccessor`](accessor::ProcessAccessor) capability trait
//!
//! Every operation validates its own offsets and lengths and reports failure
//! through [`BufferError`]; nothing here trusts a caller-supplied range.
//!
//! ## Platform Support
//!
//! - **Linux**: `ptrace` + `/proc/<pid>/mem`
//! - **macOS**: Mach task ports (`task_for_pid`, `mach_vm_read_overwrite`)
//! - **Others**: buffers and files work; process access reports `Unsupported`
//!
//! ## Why unsafe code is needed
//!
//! Attaching to another process goes through `ptrace`/`waitpid` on Linux and
//! Mach traps on macOS. Those calls are wrapped in RAII guards in
//! [`platform`]; the buffer engine itself is safe code.

#![allow(unsafe_code)] // Required for ptrace and Mach system calls

pub mod accessor;
pub mod buffer;
pub mod error;
pub mod hexdump;
pub mod memacc;
pub mod persist;
pub mod platform;
pub mod prelude;
pub mod types;

// Re-export commonly used types
pub use accessor::{create_accessor, ProcessAccessor, ProcessSession};
pub use buffer::{ByteBuffer, Extent};
pub use error::{BufferError, BufferResult, ProcessError};
pub use hexdump::{HexDump, HexRow};
pub use types::{AccessMode, Address, Offset, ProcessId, SaveMode};
