//! # macOS Mach API Errors
//!
//! Mach APIs return `kern_return_t` integer codes. This module turns the ones
//! the memory backend runs into into a typed error with a readable message.

use std::io;

use thiserror::Error;

/// Mach kernel API error
///
/// Common values:
///
/// - `KERN_SUCCESS` (0): Operation succeeded
/// - `KERN_INVALID_ADDRESS` (1): Address not mapped in the target
/// - `KERN_PROTECTION_FAILURE` (2): Permission denied
/// - `KERN_INVALID_ARGUMENT` (4): Invalid argument
/// - `KERN_FAILURE` (5): General failure (often means process not found)
///
/// ## References
///
/// - [kern_return_t documentation](https://developer.apple.com/documentation/kernel/kern_return_t)
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachError
{
    /// Blocked by the security system: run with `sudo` or grant the
    /// `com.apple.security.cs.debugger` entitlement
    #[error("KERN_PROTECTION_FAILURE: Permission denied")]
    ProtectionFailure,

    /// The target address isn't mapped
    #[error("KERN_INVALID_ADDRESS: Address not mapped")]
    InvalidAddress,

    #[error("KERN_INVALID_ARGUMENT: Invalid PID or argument")]
    InvalidArgument,

    #[error("KERN_FAILURE: Process not found")]
    ProcessNotFound,

    /// Code we don't map; the value is kept so it can be looked up
    #[error("Unknown Mach error: {0}")]
    Unknown(i32),
}

impl From<libc::kern_return_t> for MachError
{
    fn from(code: libc::kern_return_t) -> Self
    {
        match code {
            libc::KERN_PROTECTION_FAILURE => MachError::ProtectionFailure,
            libc::KERN_INVALID_ADDRESS => MachError::InvalidAddress,
            libc::KERN_INVALID_ARGUMENT => MachError::InvalidArgument,
            libc::KERN_FAILURE => MachError::ProcessNotFound,
            _ => MachError::Unknown(code),
        }
    }
}

impl From<MachError> for io::Error
{
    fn from(err: MachError) -> Self
    {
        let kind = match err {
            MachError::ProtectionFailure => io::ErrorKind::PermissionDenied,
            MachError::ProcessNotFound => io::ErrorKind::NotFound,
            MachError::InvalidAddress | MachError::InvalidArgument => io::ErrorKind::InvalidInput,
            MachError::Unknown(_) => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}
