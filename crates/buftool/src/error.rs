//! Errors reported by the shell.

use std::io;

use buftool_core::BufferError;
use thiserror::Error;

/// Why a command line could not be carried out
#[derive(Error, Debug)]
pub enum ShellError
{
    #[error("Unknown command \"{0}\"")]
    UnknownCommand(String),

    #[error("Not enough arguments to \"{0}\"\nType \"help {0}\" for valid usage")]
    NotEnoughArguments(&'static str),

    #[error("Too many arguments to \"{0}\"\nType \"help {0}\" for valid usage")]
    TooManyArguments(&'static str),

    /// Text that doesn't parse as the number it should be
    #[error("Invalid number \"{0}\"")]
    InvalidNumber(String),

    /// A number that parsed but is out of range for its argument
    #[error("Invalid {what}: {value}")]
    InvalidArgument
    {
        what: &'static str,
        value: String,
    },

    #[error("Unrecognised variable type \"{0}\"")]
    UnknownType(String),

    #[error("Could not find buffer \"{0}\"")]
    UnknownBuffer(String),

    #[error("Failed to {action} memory: {source}")]
    Transfer
    {
        action: &'static str,
        #[source]
        source: BufferError,
    },

    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type ShellResult<T> = std::result::Result<T, ShellError>;
