//! Virtual address in a foreign process.

use std::fmt;
use std::ops::Add;

/// Strongly typed virtual address
///
/// Wraps a `u64` so a target address can't be confused with a buffer offset
/// or a length when calling [`ByteBuffer::memacc`](crate::ByteBuffer::memacc).
/// The value is never dereferenced locally; it only names a location in the
/// address space of the process being read or written.
///
/// ## Example
///
/// ```rust
/// use buftool_core::types::Address;
///
/// let addr = Address::from(0x1000);
/// assert_eq!((addr + 0x10).value(), 0x1010);
/// assert_eq!(addr.to_string(), "0x0000000000001000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u64);

impl Address
{
    /// Create an address in const contexts
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Raw `u64` value, for handing to platform APIs
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Add a byte count, returning `None` if the range would wrap the address space
    ///
    /// ```rust
    /// use buftool_core::types::Address;
    ///
    /// assert_eq!(Address::new(0x1000).checked_add(0x10), Some(Address::new(0x1010)));
    /// assert_eq!(Address::new(u64::MAX).checked_add(1), None);
    /// ```
    pub fn checked_add(self, len: u64) -> Option<Self>
    {
        self.0.checked_add(len).map(Address)
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:016x}", self.0)
    }
}

impl fmt::LowerHex for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl Add<u64> for Address
{
    type Output = Address;

    fn add(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_add(rhs))
    }
}
