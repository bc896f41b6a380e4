//! # Platform-Specific Implementations
//!
//! Each platform has its own submodule that implements
//! [`ProcessAccessor`](crate::accessor::ProcessAccessor) using that platform's
//! native debugging APIs:
//!
//! - **Linux**: attach-based. `ptrace(PTRACE_ATTACH)` stops the target, then
//!   `/proc/<pid>/mem` is read or written at the target address.
//!   - See: [ptrace(2) man page](https://man7.org/linux/man-pages/man2/ptrace.2.html)
//! - **macOS**: handle-based. `task_for_pid()` yields a task port, the task is
//!   suspended, and the Mach VM calls move the bytes.
//!   - See: [Apple Mach Kernel Programming](https://developer.apple.com/library/archive/documentation/Darwin/Conceptual/KernelProgramming/Mach/Mach.html)
//!
//! Only the module for the current target is compiled.

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "macos")]
pub mod macos;
