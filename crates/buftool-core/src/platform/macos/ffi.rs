//! # macOS Mach API FFI Declarations
//!
//! Mach calls used by the macOS backend that we declare ourselves rather than
//! take from `mach2`. `task_for_pid` is restricted (it needs root or the
//! debugger entitlement); the rest are declared here so the whole attach /
//! transfer / detach sequence reads from one place.
//!
//! These functions are wrapped in safe abstractions in [`super::guards`] and
//! [`super::memory`].

// Doc comments in extern blocks are for readers; rustdoc skips them
#![allow(unused_doc_comments)]

use libc::{c_int, kern_return_t, mach_msg_type_number_t, mach_port_t, vm_address_t, vm_map_t, vm_offset_t};

#[link(name = "c", kind = "dylib")]
extern "C" {
    /// Get the task port for a process
    ///
    /// ## Returns
    ///
    /// - `KERN_SUCCESS` (0) on success
    /// - `KERN_PROTECTION_FAILURE` if permissions denied
    /// - `KERN_FAILURE` if the process doesn't exist (or, sometimes, on
    ///   permission problems too)
    pub fn task_for_pid(target_task: mach_port_t, pid: c_int, task: *mut mach_port_t) -> kern_return_t;

    /// Release a port obtained from `task_for_pid()`
    pub fn mach_port_deallocate(target_task: mach_port_t, name: mach_port_t) -> kern_return_t;

    /// Stop every thread in the task (counted; pair with `task_resume`)
    pub fn task_suspend(target_task: mach_port_t) -> kern_return_t;

    /// Undo one `task_suspend`
    pub fn task_resume(target_task: mach_port_t) -> kern_return_t;

    /// Copy `data_count` bytes from our address space into the task at `address`
    ///
    /// See: [vm_write(3) man page](https://developer.apple.com/documentation/kernel/1585462-vm_write/)
    pub fn vm_write(
        target_task: vm_map_t,
        address: vm_address_t,
        data: vm_offset_t,
        data_count: mach_msg_type_number_t,
    ) -> kern_return_t;
}
