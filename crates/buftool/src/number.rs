//! Numeric literals typed at the prompt.
//!
//! In [`Radix::Auto`] mode the prefix picks the base: `0x`/`0X` for hex, a
//! leading `0` for octal, decimal otherwise. [`Radix::Hex`] always reads
//! hex and still tolerates a `0x` prefix. Both accept a leading `-`.
//!
//! Unlike `strtol`, trailing garbage is an error rather than ignored.

use buftool_core::types::Offset;

use crate::error::{ShellError, ShellResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix
{
    Auto,
    Hex,
}

/// Parse a signed integer literal
pub fn read_number(text: &str, radix: Radix) -> ShellResult<i64>
{
    let invalid = || ShellError::InvalidNumber(text.to_string());

    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (digits, base) = split_radix(magnitude, radix);
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(invalid());
    }

    let value = u64::from_str_radix(digits, base).map_err(|_| invalid())?;
    if negative {
        0i64.checked_sub_unsigned(value).ok_or_else(invalid)
    } else {
        i64::try_from(value).map_err(|_| invalid())
    }
}

/// Parse a hexadecimal target address; the whole `u64` range is allowed
pub fn read_address(text: &str) -> ShellResult<u64>
{
    let (digits, base) = split_radix(text, Radix::Hex);
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(ShellError::InvalidNumber(text.to_string()));
    }
    u64::from_str_radix(digits, base).map_err(|_| ShellError::InvalidNumber(text.to_string()))
}

/// Buffer offset; anything negative means "at the end"
pub fn read_offset(text: &str) -> ShellResult<Offset>
{
    let value = read_number(text, Radix::Auto)?;
    Ok(usize::try_from(value).map_or(Offset::End, Offset::At))
}

/// Length argument; `0` keeps its "everything" meaning
pub fn read_length(text: &str) -> ShellResult<usize>
{
    let value = read_number(text, Radix::Auto)?;
    usize::try_from(value).map_err(|_| ShellError::InvalidArgument {
        what: "length",
        value: text.to_string(),
    })
}

/// The low byte of a number, the way a C `(u8)` cast truncates
pub fn low_byte(value: i64) -> u8
{
    value.to_le_bytes()[0]
}

fn split_radix(text: &str, radix: Radix) -> (&str, u32)
{
    let hex = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"));
    match (radix, hex) {
        (_, Some(rest)) => (rest, 16),
        (Radix::Hex, None) => (text, 16),
        (Radix::Auto, None) if text.len() > 1 && text.starts_with('0') => (&text[1..], 8),
        (Radix::Auto, None) => (text, 10),
    }
}
