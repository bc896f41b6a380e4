//! The command table: names, argument counts, usage text.

use std::fmt::Write;

use crate::error::{ShellError, ShellResult};

/// Every command the shell understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command
{
    Help,
    Quit,
    Info,
    Delete,
    Copy,
    Fill,
    Set,
    Patch,
    Print,
    View,
    Load,
    Save,
    Read,
    Write,
}

/// One row of the command table
#[derive(Debug)]
pub struct CommandSpec
{
    pub command: Command,
    pub name: &'static str,
    pub min_args: usize,
    /// `None` for commands that take any number of trailing words
    pub max_args: Option<usize>,
    pub desc: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: Command::Help,
        name: "help",
        min_args: 0,
        max_args: Some(1),
        desc: "Prints this help message",
        usage: "help [command]",
    },
    CommandSpec {
        command: Command::Quit,
        name: "quit",
        min_args: 0,
        max_args: Some(0),
        desc: "Exits the program",
        usage: "quit",
    },
    CommandSpec {
        command: Command::Info,
        name: "info",
        min_args: 0,
        max_args: Some(1),
        desc: "Prints the current list of buffers",
        usage: "info [buffer]",
    },
    CommandSpec {
        command: Command::Delete,
        name: "delete",
        min_args: 1,
        max_args: Some(1),
        desc: "Deletes an existing buffer",
        usage: "delete <name of buffer>",
    },
    CommandSpec {
        command: Command::Copy,
        name: "copy",
        min_args: 2,
        max_args: Some(5),
        desc: "Copies data from one buffer to another",
        usage: "copy <dest buffer> <src buffer> [dst offset] [src offset] [length]",
    },
    CommandSpec {
        command: Command::Fill,
        name: "fill",
        min_args: 1,
        max_args: Some(4),
        desc: "Fills a range of data in a buffer with a value",
        usage: "fill <buffer> [byte value] [offset] [length]",
    },
    CommandSpec {
        command: Command::Set,
        name: "set",
        min_args: 2,
        max_args: Some(5),
        desc: "Sets data to a buffer as if it were a variable",
        usage: "set <buffer> <value> [byte|short|int|long|float|double] [offset] [little|big]",
    },
    CommandSpec {
        command: Command::Patch,
        name: "patch",
        min_args: 3,
        max_args: None,
        desc: "Patches a byte array to a buffer at an offset",
        usage: "patch <buffer> <offset> <byte array...>",
    },
    CommandSpec {
        command: Command::Print,
        name: "print",
        min_args: 3,
        max_args: None,
        desc: "Patches an ascii string to a buffer at an offset",
        usage: "print <buffer> <offset> <string...>",
    },
    CommandSpec {
        command: Command::View,
        name: "view",
        min_args: 1,
        max_args: Some(3),
        desc: "Displays data from a buffer",
        usage: "view <buffer> [offset] [length]",
    },
    CommandSpec {
        command: Command::Load,
        name: "load",
        min_args: 2,
        max_args: Some(5),
        desc: "Loads data from a file into a buffer",
        usage: "load <buffer> <file name> [position] [length] [offset]",
    },
    CommandSpec {
        command: Command::Save,
        name: "save",
        min_args: 2,
        max_args: Some(6),
        desc: "Saves data from a buffer to a file",
        usage: "save <buffer> <file name> [position] [length] [offset] [insert (default=true)]",
    },
    CommandSpec {
        command: Command::Read,
        name: "read",
        min_args: 3,
        max_args: Some(5),
        desc: "Reads data from a running process into a buffer",
        usage: "read <buffer> <PID> <address> [length] [offset]",
    },
    CommandSpec {
        command: Command::Write,
        name: "write",
        min_args: 3,
        max_args: Some(5),
        desc: "Writes data from a buffer to a running process",
        usage: "write <buffer> <PID> <address> [length] [offset]",
    },
];

/// Look up a command by name
pub fn find(name: &str) -> Option<&'static CommandSpec>
{
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// Split a line into words and check them against the command table
///
/// Returns `None` for a blank line.
pub fn parse_line(line: &str) -> ShellResult<Option<(&'static CommandSpec, Vec<&str>)>>
{
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let spec = find(name).ok_or_else(|| ShellError::UnknownCommand(name.to_string()))?;

    let args: Vec<&str> = words.collect();
    if args.len() < spec.min_args {
        return Err(ShellError::NotEnoughArguments(spec.name));
    }
    if spec.max_args.is_some_and(|max| args.len() > max) {
        return Err(ShellError::TooManyArguments(spec.name));
    }

    Ok(Some((spec, args)))
}

/// One line per command: name and description
pub fn help_all() -> String
{
    let mut out = String::new();
    for spec in COMMANDS {
        let _ = writeln!(out, "{:<9}{}", spec.name, spec.desc);
    }
    out.push('\n');
    out
}

/// Description and usage of a single command
pub fn help_one(name: &str) -> ShellResult<String>
{
    let spec = find(name).ok_or_else(|| ShellError::UnknownCommand(name.to_string()))?;
    Ok(format!("{}\n    {}\n    Usage: {}\n\n", spec.name, spec.desc, spec.usage))
}
