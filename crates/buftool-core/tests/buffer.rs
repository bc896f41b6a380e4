//! End-to-end editing scenarios on buffers

use buftool_core::types::Offset;
use buftool_core::{BufferError, ByteBuffer};

#[test]
fn test_edit_then_view()
{
    let mut buf = ByteBuffer::new("a");
    buf.fill(0x41, 0, 20).unwrap();
    buf.print(4, "hi").unwrap();

    let dump = buf.view(0, 0).unwrap().to_string();
    let lines: Vec<&str> = dump.lines().collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "       0 | 41 41 41 41 - 68 69 41 41 - 41 41 41 41 - 41 41 41 41 | AAAAhiAAAAAAAAAA"
    );
    assert!(lines[1].starts_with("      10 | 41 41 41 41 "));
    assert!(lines[1].ends_with("| AAAA"));
    assert_eq!(lines[0].find("| A"), lines[1].find("| A"));
}

#[test]
fn test_view_of_subrange_keeps_absolute_offsets()
{
    let buf = ByteBuffer::with_size("z", 64);
    let rows: Vec<_> = buf.view(0x18, 0x10).unwrap().collect();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].offset(), 0x18);
    assert!(rows[0].to_string().starts_with("      18 | 00 00"));
}

#[test]
fn test_copy_appends_between_buffers()
{
    let mut src = ByteBuffer::new("src");
    src.print(0, "0123456789").unwrap();
    let mut dst = ByteBuffer::new("dst");
    dst.print(0, "ab").unwrap();

    assert_eq!(dst.copy(&src, Offset::End, 2, 3).unwrap(), 3);
    assert_eq!(dst.as_bytes(), b"ab234");

    assert_eq!(dst.copy(&src, 10, 8, 0).unwrap(), 2);
    assert_eq!(dst.as_bytes(), b"ab234\0\0\0\0\089");
}

#[test]
fn test_copy_from_own_snapshot()
{
    let mut buf = ByteBuffer::new("self");
    buf.print(0, "abcd").unwrap();

    let snapshot = buf.clone();
    buf.copy(&snapshot, 2, 0, 0).unwrap();
    assert_eq!(buf.as_bytes(), b"ababcd");
}

#[test]
fn test_failed_operations_leave_buffer_untouched()
{
    let mut buf = ByteBuffer::new("b");
    buf.print(0, "data").unwrap();
    let before = buf.clone();

    assert!(matches!(buf.view(4, 1), Err(BufferError::InvalidRange { offset: 4, size: 4 })));
    assert!(matches!(buf.fill(0, Offset::End, 0), Err(BufferError::InvalidRange { .. })));
    assert!(matches!(buf.patch(0, &[]), Err(BufferError::GrowthFailure)));
    assert!(matches!(buf.resize(0), Err(BufferError::GrowthFailure)));
    assert_eq!(buf, before);
}

#[test]
fn test_resize_round_trip()
{
    let mut buf = ByteBuffer::new("r");
    buf.print(0, "abcdef").unwrap();

    buf.resize(3).unwrap();
    assert_eq!(buf.as_bytes(), b"abc");
    buf.resize(5).unwrap();
    assert_eq!(buf.as_bytes(), b"abc\0\0");
}

#[test]
fn test_oversized_growth_is_an_error()
{
    let mut buf = ByteBuffer::with_size("a", 4);
    let before = buf.clone();

    assert!(matches!(buf.fill(0, 0, usize::MAX - 8), Err(BufferError::GrowthFailure)));
    assert!(matches!(buf.patch(usize::MAX / 2, b"x"), Err(BufferError::GrowthFailure)));
    assert!(matches!(buf.extend(Offset::End, usize::MAX - 8), Err(BufferError::GrowthFailure)));
    assert_eq!(buf, before);
}
