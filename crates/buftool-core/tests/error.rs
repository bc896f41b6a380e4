//! Tests for error handling

use std::io;

use buftool_core::error::{BufferError, BufferResult, ProcessError};
use buftool_core::types::ProcessId;

fn unavailable(source: ProcessError) -> BufferError
{
    BufferError::ProcessUnavailable {
        pid: ProcessId::from(4242),
        source,
    }
}

#[test]
fn test_invalid_range_display()
{
    let error = BufferError::InvalidRange { offset: 12, size: 8 };
    let message = format!("{}", error);
    assert!(message.contains("Invalid range"));
    assert!(message.contains("12"));
    assert!(message.contains("8"));
}

#[test]
fn test_file_position_display()
{
    let error = BufferError::FilePositionInvalid { pos: -3, size: 10 };
    let message = format!("{}", error);
    assert!(message.contains("-3"));
    assert!(message.contains("file size: 10"));
}

#[test]
fn test_process_unavailable_display()
{
    let error = unavailable(ProcessError::Attach(io::Error::from(io::ErrorKind::PermissionDenied)));
    let message = format!("{}", error);
    assert!(message.contains("4242"));
    assert!(message.contains("attach"));
}

#[test]
fn test_sentinel_codes()
{
    assert_eq!(BufferError::InvalidRange { offset: 0, size: 0 }.code(), -1);
    assert_eq!(BufferError::GrowthFailure.code(), -1);
    assert_eq!(unavailable(ProcessError::Open(io::Error::from(io::ErrorKind::NotFound))).code(), -2);
    assert_eq!(unavailable(ProcessError::Attach(io::Error::from(io::ErrorKind::Other))).code(), -3);
    assert_eq!(unavailable(ProcessError::Wait(io::Error::from(io::ErrorKind::Other))).code(), -4);
    assert_eq!(unavailable(ProcessError::Unsupported("plan9")).code(), -5);
    let file = BufferError::FileUnavailable {
        path: "missing.bin".into(),
        source: io::Error::from(io::ErrorKind::NotFound),
    };
    assert_eq!(file.code(), -5);
}

#[test]
fn test_result_type()
{
    // Test that Result type is properly aliased
    let _result: BufferResult<()> = Ok(());
    let _error_result: BufferResult<()> = Err(BufferError::GrowthFailure);
}
