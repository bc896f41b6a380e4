//! Encoding typed values for the `set` command.

use std::str::FromStr;

use crate::error::{ShellError, ShellResult};
use crate::number::{low_byte, read_number, Radix};

/// Width and interpretation of a `set` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType
{
    Byte,
    Short,
    #[default]
    Int,
    Long,
    Float,
    Double,
}

impl FromStr for ValueType
{
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s {
            "byte" => Ok(ValueType::Byte),
            "short" => Ok(ValueType::Short),
            "int" => Ok(ValueType::Int),
            "long" => Ok(ValueType::Long),
            "float" => Ok(ValueType::Float),
            "double" => Ok(ValueType::Double),
            _ => Err(ShellError::UnknownType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian
{
    #[default]
    Little,
    Big,
}

impl Endian
{
    /// Anything starting with `b` or `B` is big endian
    pub fn parse(text: &str) -> Self
    {
        if text.starts_with(['b', 'B']) {
            Endian::Big
        } else {
            Endian::Little
        }
    }
}

/// Encode `text` as `ty` in the given byte order
///
/// Integers are truncated to the width of the type. A `byte` written as
/// `/c` stores the character `c` itself.
pub fn encode(text: &str, ty: ValueType, endian: Endian) -> ShellResult<Vec<u8>>
{
    let invalid = || ShellError::InvalidNumber(text.to_string());

    let mut bytes = match ty {
        ValueType::Byte => {
            let byte = match text.strip_prefix('/') {
                Some(literal) => *literal.as_bytes().first().ok_or_else(invalid)?,
                None => low_byte(read_number(text, Radix::Auto)?),
            };
            return Ok(vec![byte]);
        }
        ValueType::Short => read_number(text, Radix::Auto)?.to_le_bytes()[..2].to_vec(),
        ValueType::Int => read_number(text, Radix::Auto)?.to_le_bytes()[..4].to_vec(),
        ValueType::Long => read_number(text, Radix::Auto)?.to_le_bytes().to_vec(),
        ValueType::Float => text.parse::<f32>().map_err(|_| invalid())?.to_le_bytes().to_vec(),
        ValueType::Double => text.parse::<f64>().map_err(|_| invalid())?.to_le_bytes().to_vec(),
    };

    if endian == Endian::Big {
        bytes.reverse();
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_integers()
    {
        assert_eq!(encode("0x1234", ValueType::Short, Endian::Little).unwrap(), [0x34, 0x12]);
        assert_eq!(encode("0x1234", ValueType::Short, Endian::Big).unwrap(), [0x12, 0x34]);
        assert_eq!(encode("1", ValueType::Int, Endian::Little).unwrap(), [1, 0, 0, 0]);
        assert_eq!(encode("-1", ValueType::Int, Endian::Big).unwrap(), [0xff; 4]);
        assert_eq!(
            encode("0x0102030405060708", ValueType::Long, Endian::Big).unwrap(),
            [1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn test_truncation()
    {
        assert_eq!(encode("0x12345", ValueType::Short, Endian::Little).unwrap(), [0x45, 0x23]);
        assert_eq!(encode("0x1ff", ValueType::Byte, Endian::Little).unwrap(), [0xff]);
    }

    #[test]
    fn test_byte_literal()
    {
        assert_eq!(encode("/A", ValueType::Byte, Endian::Big).unwrap(), [b'A']);
        assert_eq!(encode("//", ValueType::Byte, Endian::Little).unwrap(), [b'/']);
        assert!(encode("/", ValueType::Byte, Endian::Little).is_err());
    }

    #[test]
    fn test_floats()
    {
        assert_eq!(encode("1.5", ValueType::Float, Endian::Little).unwrap(), 1.5f32.to_le_bytes());
        assert_eq!(encode("-2", ValueType::Double, Endian::Big).unwrap(), (-2.0f64).to_be_bytes());
        assert!(encode("abc", ValueType::Float, Endian::Little).is_err());
    }

    #[test]
    fn test_type_and_endian_names()
    {
        assert_eq!("double".parse::<ValueType>().unwrap(), ValueType::Double);
        assert!(matches!("word".parse::<ValueType>(), Err(ShellError::UnknownType(_))));
        assert_eq!(Endian::parse("big"), Endian::Big);
        assert_eq!(Endian::parse("B"), Endian::Big);
        assert_eq!(Endian::parse("little"), Endian::Little);
    }
}
