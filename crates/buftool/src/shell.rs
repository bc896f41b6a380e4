//! # Command Shell
//!
//! Turns one line of input into one buffer operation.
//!
//! The shell owns the buffer [`Registry`] and the platform's process
//! accessor. Output that belongs to the user (help, tables, hex dumps,
//! transfer reports) goes to the writer passed to [`Shell::execute`];
//! failures come back as [`ShellError`] for the caller to print.

use std::io::Write;

use buftool_core::accessor::ProcessAccessor;
use buftool_core::types::{AccessMode, Address, Offset, ProcessId, SaveMode};
use tracing::{debug, warn};

use crate::commands::{self, Command};
use crate::error::{ShellError, ShellResult};
use crate::number::{low_byte, read_address, read_length, read_number, read_offset, Radix};
use crate::registry::Registry;
use crate::value::{encode, Endian, ValueType};

/// Whether the shell should keep reading lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow
{
    Continue,
    Quit,
}

pub struct Shell
{
    registry: Registry,
    accessor: Box<dyn ProcessAccessor>,
}

/// Optional positional argument `i`, parsed with `parse`
fn optional<'a, T>(args: &[&'a str], i: usize, parse: impl FnOnce(&'a str) -> ShellResult<T>) -> ShellResult<Option<T>>
{
    args.get(i).copied().map(parse).transpose()
}

/// `false`, `0`, `no` and `n` select overwrite; anything else inserts
fn save_mode(text: &str) -> SaveMode
{
    match text.to_lowercase().as_str() {
        "false" | "0" | "no" | "n" => SaveMode::Overwrite,
        _ => SaveMode::Insert,
    }
}

impl Shell
{
    pub fn new(accessor: Box<dyn ProcessAccessor>) -> Self
    {
        Self {
            registry: Registry::new(),
            accessor,
        }
    }

    pub fn registry(&self) -> &Registry
    {
        &self.registry
    }

    /// Run one line of input
    ///
    /// ## Errors
    ///
    /// Unknown commands, bad argument counts, unparseable numbers and every
    /// failed buffer operation. The registry is left as the failed
    /// operation left it, so the shell can keep going.
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> ShellResult<Flow>
    {
        let Some((spec, args)) = commands::parse_line(line)? else {
            return Ok(Flow::Continue);
        };
        debug!(command = spec.name, ?args, "executing");

        match spec.command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => match args.first() {
                Some(name) => write!(out, "{}", commands::help_one(name)?)?,
                None => write!(out, "{}", commands::help_all())?,
            },
            Command::Info => match args.first() {
                Some(name) => write!(out, "{}", self.registry.describe(name)?)?,
                None => write!(out, "{}", self.registry.summary())?,
            },
            Command::Delete => {
                self.registry.delete(args[0])?;
            }
            Command::Copy => self.copy(&args)?,
            Command::Fill => self.fill(&args)?,
            Command::Set => self.set(&args)?,
            Command::Patch => {
                let offset = read_offset(args[1])?;
                let bytes = args[2..]
                    .iter()
                    .map(|text| read_number(text, Radix::Hex).map(low_byte))
                    .collect::<ShellResult<Vec<u8>>>()?;
                self.registry.get_or_create(args[0]).patch(offset, &bytes)?;
            }
            Command::Print => {
                let offset = read_offset(args[1])?;
                let text = args[2..].join(" ");
                self.registry.get_or_create(args[0]).print(offset, &text)?;
            }
            Command::View => {
                let offset = optional(&args, 1, read_offset)?.unwrap_or(Offset::At(0));
                let length = optional(&args, 2, read_length)?.unwrap_or(0);
                let buffer = self.registry.get_or_create(args[0]);
                writeln!(out, "{}", buffer.view(offset, length)?)?;
            }
            Command::Load => {
                let pos = optional(&args, 2, |s| read_number(s, Radix::Auto))?.unwrap_or(0);
                let length = optional(&args, 3, read_length)?.unwrap_or(0);
                let offset = optional(&args, 4, read_offset)?.unwrap_or(Offset::At(0));
                self.registry.get_or_create(args[0]).load(args[1], pos, length, offset)?;
            }
            Command::Save => {
                let pos = optional(&args, 2, |s| read_number(s, Radix::Auto))?.unwrap_or(0);
                let length = optional(&args, 3, read_length)?.unwrap_or(0);
                let offset = optional(&args, 4, read_offset)?.unwrap_or(Offset::At(0));
                let mode = args.get(5).map_or(SaveMode::Insert, |s| save_mode(s));
                self.registry
                    .get_or_create(args[0])
                    .save(args[1], pos, length, offset, mode)?;
            }
            Command::Read => self.memacc(AccessMode::Read, &args, out)?,
            Command::Write => self.memacc(AccessMode::Write, &args, out)?,
        }

        Ok(Flow::Continue)
    }

    fn copy(&mut self, args: &[&str]) -> ShellResult<()>
    {
        let dst_offset = optional(args, 2, read_offset)?.unwrap_or(Offset::At(0));
        let src_offset = match optional(args, 3, |s| read_number(s, Radix::Auto))? {
            Some(value) => usize::try_from(value).map_err(|_| ShellError::InvalidArgument {
                what: "source offset",
                value: value.to_string(),
            })?,
            None => 0,
        };
        let length = optional(args, 4, read_length)?.unwrap_or(0);

        self.registry.copy(args[0], args[1], dst_offset, src_offset, length)?;
        Ok(())
    }

    fn fill(&mut self, args: &[&str]) -> ShellResult<()>
    {
        let byte = optional(args, 1, |s| read_number(s, Radix::Auto))?.map_or(0, low_byte);
        let offset = optional(args, 2, read_offset)?.unwrap_or(Offset::At(0));
        let length = optional(args, 3, read_length)?.unwrap_or(0);

        self.registry.get_or_create(args[0]).fill(byte, offset, length)?;
        Ok(())
    }

    fn set(&mut self, args: &[&str]) -> ShellResult<()>
    {
        let ty = optional(args, 2, str::parse::<ValueType>)?.unwrap_or_default();
        let offset = optional(args, 3, read_offset)?.unwrap_or(Offset::At(0));
        let endian = args.get(4).map_or(Endian::Little, |s| Endian::parse(s));

        let bytes = encode(args[1], ty, endian)?;
        self.registry.get_or_create(args[0]).patch(offset, &bytes)?;
        Ok(())
    }

    fn memacc(&mut self, mode: AccessMode, args: &[&str], out: &mut dyn Write) -> ShellResult<()>
    {
        let pid = read_number(args[1], Radix::Auto)?;
        let pid = u32::try_from(pid).map_err(|_| ShellError::InvalidArgument {
            what: "PID",
            value: pid.to_string(),
        })?;
        let addr = read_address(args[2])?;
        let length = optional(args, 3, read_length)?.unwrap_or(0);
        let offset = optional(args, 4, read_offset)?.unwrap_or(Offset::At(0));

        let action = match mode {
            AccessMode::Read => "read",
            AccessMode::Write => "write",
        };
        let buffer = self.registry.get_or_create(args[0]);
        // Append offsets resolve against the size before the transfer grows it
        let start = offset.resolve(buffer.len());
        let moved = buffer
            .memacc(
                self.accessor.as_ref(),
                mode,
                ProcessId::from(pid),
                Address::from(addr),
                length,
                offset,
            )
            .map_err(|source| ShellError::Transfer { action, source })?;

        let goal = buffer.available(start, length).unwrap_or(moved);
        if moved < goal {
            warn!(pid, addr, moved, goal, "incomplete {action}");
            writeln!(out, "Incomplete {action} ({moved} / {goal} bytes)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use std::fs;

    use buftool_core::accessor::{ProcessSession, UnsupportedAccessor};
    use buftool_core::error::ProcessError;
    use tempfile::TempDir;

    use super::*;

    /// Every transfer stops after two bytes, as if the rest were unmapped
    struct TwoByteAccessor;

    struct TwoByteSession(ProcessId);

    impl ProcessAccessor for TwoByteAccessor
    {
        fn attach(&self, pid: ProcessId, _mode: AccessMode) -> Result<Box<dyn ProcessSession>, ProcessError>
        {
            Ok(Box::new(TwoByteSession(pid)))
        }
    }

    impl ProcessSession for TwoByteSession
    {
        fn pid(&self) -> ProcessId
        {
            self.0
        }

        fn read(&mut self, _addr: Address, buf: &mut [u8]) -> Result<usize, ProcessError>
        {
            let n = buf.len().min(2);
            buf[..n].fill(0xaa);
            Ok(n)
        }

        fn write(&mut self, _addr: Address, data: &[u8]) -> Result<usize, ProcessError>
        {
            Ok(data.len().min(2))
        }
    }

    fn shell() -> Shell
    {
        Shell::new(Box::new(UnsupportedAccessor))
    }

    /// Run each line, returning everything written to the output
    fn run(shell: &mut Shell, lines: &[&str]) -> String
    {
        let mut out = Vec::new();
        for line in lines {
            shell.execute(line, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    fn bytes(shell: &Shell, name: &str) -> Vec<u8>
    {
        shell.registry().get(name).unwrap().as_bytes().to_vec()
    }

    #[test]
    fn test_quit_and_blank_lines()
    {
        let mut sh = shell();
        let mut out = Vec::new();
        assert_eq!(sh.execute("", &mut out).unwrap(), Flow::Continue);
        assert_eq!(sh.execute("quit", &mut out).unwrap(), Flow::Quit);
        assert!(out.is_empty());
    }

    #[test]
    fn test_help_output()
    {
        let mut sh = shell();
        let out = run(&mut sh, &["help patch"]);
        assert!(out.contains("Usage: patch <buffer> <offset> <byte array...>"));
        assert!(matches!(
            sh.execute("help bogus", &mut Vec::new()),
            Err(ShellError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_fill_patch_print_view()
    {
        let mut sh = shell();
        let out = run(
            &mut sh,
            &["fill a 0x2e 0 16", "patch a 2 de ad be ef", "print a -1 hi  there", "view a 0x10"],
        );

        let mut expected = b"..".to_vec();
        expected.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        expected.extend_from_slice(&[b'.'; 10]);
        expected.extend_from_slice(b"hi there");
        assert_eq!(bytes(&sh, "a"), expected);

        assert_eq!(
            out,
            format!("      10 | 68 69 20 74 - 68 65 72 65 {}| hi there\n\n", " ".repeat(28))
        );
    }

    #[test]
    fn test_fill_defaults_to_zero()
    {
        let mut sh = shell();
        run(&mut sh, &["print a 0 abcd", "fill a"]);
        assert_eq!(bytes(&sh, "a"), [0, 0, 0, 0]);
    }

    #[test]
    fn test_set_values()
    {
        let mut sh = shell();
        run(
            &mut sh,
            &[
                "set v 0x11223344",
                "set v 0x5566 short 4 big",
                "set v /Z byte -1",
                "set v 1 double 8",
            ],
        );

        let mut expected = vec![0x44, 0x33, 0x22, 0x11, 0x55, 0x66, b'Z', 0];
        expected.extend_from_slice(&1.0f64.to_le_bytes());
        assert_eq!(bytes(&sh, "v"), expected);

        assert!(matches!(
            sh.execute("set v 1 word", &mut Vec::new()),
            Err(ShellError::UnknownType(_))
        ));
    }

    #[test]
    fn test_copy_commands()
    {
        let mut sh = shell();
        run(&mut sh, &["print src 0 0123456789", "copy dst src", "copy dst src -1 8", "copy src src 2 0 2"]);

        assert_eq!(bytes(&sh, "dst"), b"012345678989");
        assert_eq!(bytes(&sh, "src"), b"0101456789");
    }

    #[test]
    fn test_info_and_delete()
    {
        let mut sh = shell();
        let out = run(&mut sh, &["fill buf 0 0 0x20", "info"]);
        assert!(out.lines().any(|line| line.starts_with("  buf ") && line.ends_with("| 0x20 (32)")));

        run(&mut sh, &["delete buf"]);
        assert!(sh.registry().is_empty());
        assert!(matches!(
            sh.execute("info buf", &mut Vec::new()),
            Err(ShellError::UnknownBuffer(_))
        ));
    }

    #[test]
    fn test_bad_numbers_are_rejected()
    {
        let mut sh = shell();
        assert!(matches!(
            sh.execute("fill a 0 zero 4", &mut Vec::new()),
            Err(ShellError::InvalidNumber(_))
        ));
        assert!(matches!(
            sh.execute("view a 0 -4", &mut Vec::new()),
            Err(ShellError::InvalidArgument { what: "length", .. })
        ));
        assert!(matches!(
            sh.execute("read a -5 1000", &mut Vec::new()),
            Err(ShellError::InvalidArgument { what: "PID", .. })
        ));
    }

    #[test]
    fn test_buffer_errors_surface()
    {
        let mut sh = shell();
        let err = sh.execute("view empty", &mut Vec::new()).unwrap_err();
        assert!(matches!(err, ShellError::Buffer(ref e) if e.code() == -1));
        assert!(sh.registry().get("empty").unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_files()
    {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.bin");
        let file = path.to_str().unwrap();
        let mut sh = shell();

        run(
            &mut sh,
            &[
                "print a 0 abcdef",
                &format!("save a {file}"),
                "print b 0 XY",
                &format!("save b {file} 2 0 0 false"),
                &format!("save b {file} -1"),
                &format!("load c {file} 1 3"),
            ],
        );

        assert_eq!(fs::read(&path).unwrap(), b"abXYeXYf");
        assert_eq!(bytes(&sh, "c"), b"bXY");
    }

    #[test]
    fn test_memory_access_without_backend()
    {
        let mut sh = shell();
        run(&mut sh, &["print a 0 keep"]);

        let err = sh.execute("write a 1 7fff0000", &mut Vec::new()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to write memory: "));
        assert_eq!(bytes(&sh, "a"), b"keep");
    }

    #[test]
    fn test_incomplete_transfers_are_reported()
    {
        let mut sh = Shell::new(Box::new(TwoByteAccessor));

        let out = run(&mut sh, &["print a 0 keep", "read a 1 1000 6 -1"]);
        assert_eq!(out, "Incomplete read (2 / 6 bytes)\n");
        assert_eq!(bytes(&sh, "a"), b"keep\xaa\xaa\0\0\0\0");

        let out = run(&mut sh, &["write a 1 1000 0 2", "write a 1 1000 2"]);
        assert_eq!(out, "Incomplete write (2 / 8 bytes)\n");
    }

    #[test]
    fn test_save_mode_words()
    {
        for word in ["false", "0", "no", "N"] {
            assert_eq!(save_mode(word), SaveMode::Overwrite);
        }
        for word in ["true", "1", "yes", "insert"] {
            assert_eq!(save_mode(word), SaveMode::Insert);
        }
    }
}
