//! Build script for buftool-core
//!
//! Checks system requirements before compilation:
//! - Minimum Rust version (1.74.0+ for `io::Error::other`)
//! - Whether the target has a foreign-process memory backend
//!
//! ## Backends
//!
//! - **Linux**: `ptrace` attach + `/proc/<pid>/mem`
//! - **macOS**: Mach task port (`task_for_pid`, `mach_vm_read_overwrite`, `vm_write`)
//! - Anything else builds, but `read`/`write` report the platform as unsupported

fn main()
{
    if let Ok(rustc_version) = rustc_version::version() {
        let min_rust_version = rustc_version::Version::new(1, 74, 0);

        if rustc_version < min_rust_version {
            panic!(
                "buftool-core requires Rust {} or newer, found {}",
                min_rust_version, rustc_version
            );
        }
    } else {
        // Some build environments hide rustc; don't fail the build over it
        println!("cargo:warning=could not verify Rust version");
    }

    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "linux" && target_os != "macos" {
        println!("cargo:warning=no process memory backend for target_os={target_os}; read/write will be unsupported");
    }
}
