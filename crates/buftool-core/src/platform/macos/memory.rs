//! # macOS Memory Operations
//!
//! Reading and writing task memory with the Mach VM calls.
//!
//! - **mach_vm_read_overwrite()**: copy target memory straight into our slice
//! - **vm_write()**: copy our slice into the target
//!
//! ## References
//!
//! - [vm_write(3) man page](https://developer.apple.com/documentation/kernel/1585462-vm_write/)

use std::cmp::min;

use libc::{mach_msg_type_number_t, mach_port_t, vm_address_t, vm_map_t, vm_offset_t};
use mach2::kern_return::KERN_SUCCESS;
use mach2::vm::mach_vm_read_overwrite;
use mach2::vm_types::{mach_vm_address_t, mach_vm_size_t};

use super::error::MachError;
use super::ffi;
use crate::types::Address;

/// Largest single Mach VM transfer; bigger ranges are chunked
pub const MAX_VM_CHUNK: usize = 64 * 1024;

/// Read task memory at `addr` into `dst`
///
/// Stops at the first chunk the kernel refuses, so the count can be short
/// when the range runs into unmapped memory.
///
/// ## Errors
///
/// The Mach error if not even the first chunk could be read.
pub fn read_into(task: mach_port_t, addr: Address, dst: &mut [u8]) -> Result<usize, MachError>
{
    let mut total = 0usize;

    while total < dst.len() {
        let chunk_len = min(MAX_VM_CHUNK, dst.len() - total);
        let mut actual: mach_vm_size_t = 0;

        let result = unsafe {
            mach_vm_read_overwrite(
                task as vm_map_t,
                addr.value() + total as u64,
                chunk_len as mach_vm_size_t,
                dst[total..].as_mut_ptr() as mach_vm_address_t,
                &mut actual,
            )
        };

        if result != KERN_SUCCESS {
            if total == 0 {
                return Err(MachError::from(result));
            }
            break;
        }
        if actual == 0 {
            break;
        }

        total += actual as usize;
    }

    Ok(total)
}

/// Write `data` into task memory at `addr`
///
/// ## Errors
///
/// The Mach error if not even the first chunk could be written.
pub fn write_from(task: mach_port_t, addr: Address, data: &[u8]) -> Result<usize, MachError>
{
    let mut total = 0usize;

    for chunk in data.chunks(MAX_VM_CHUNK) {
        let result = unsafe {
            ffi::vm_write(
                task as vm_map_t,
                (addr.value() + total as u64) as vm_address_t,
                chunk.as_ptr() as vm_offset_t,
                chunk.len() as mach_msg_type_number_t,
            )
        };

        if result != KERN_SUCCESS {
            if total == 0 {
                return Err(MachError::from(result));
            }
            break;
        }

        total += chunk.len();
    }

    Ok(total)
}
