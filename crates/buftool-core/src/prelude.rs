//! Common module for library exports

pub use crate::accessor::{create_accessor, ProcessAccessor, ProcessSession};
pub use crate::buffer::ByteBuffer;
pub use crate::error::{BufferError, BufferResult, ProcessError};
pub use crate::types::{AccessMode, Address, Offset, ProcessId, SaveMode};
