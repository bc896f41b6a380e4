mod commands;
mod error;
mod number;
mod registry;
mod shell;
mod value;

use std::io::{self, BufRead, Write};
use std::process;

use buftool_core::create_accessor;
use buftool_utils::{info, init_logging_with, LogFormat, LogLevel};
use clap::Parser;

use crate::shell::{Flow, Shell};

/// Interactive editor for named in-memory byte buffers.
#[derive(Parser, Debug)]
#[command(name = "buftool")]
#[command(version)]
#[command(
    about = "Interactive editor for named byte buffers: hex dumps, files and live process memory",
    long_about = None
)]
struct Cli
{
    /// Log level (error, warn, info, debug, trace); overrides RUST_LOG
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Log output format (pretty or json); overrides BUFTOOL_LOG_FORMAT
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Run a shell command instead of reading from stdin (repeatable)
    #[arg(short, long = "command", value_name = "LINE")]
    commands: Vec<String>,

    /// Don't print the banner
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

fn main()
{
    let cli = Cli::parse();

    let format = cli.log_format.unwrap_or_else(LogFormat::from_env);
    let guard = match init_logging_with(cli.log_level, format) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    let mut shell = Shell::new(create_accessor());

    let result = if cli.commands.is_empty() {
        run_interactive(&mut shell, cli.quiet)
    } else {
        run_script(&mut shell, &cli.commands)
    };

    let succeeded = result.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        false
    });

    // Flush the log file before exiting
    drop(guard);
    if !succeeded {
        process::exit(1);
    }
}

/// Read-eval-print loop over stdin
///
/// Command failures are reported and the loop goes on. Ends on `quit` or
/// end of input.
fn run_interactive(shell: &mut Shell, quiet: bool) -> io::Result<bool>
{
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    if !quiet {
        write!(
            stdout,
            "Buffer Tool\nType \"help\" for the list of available commands or\n\"help <command>\" for how to use a particular command\n\n"
        )?;
    }

    let mut line = String::new();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            writeln!(stdout)?;
            break;
        }

        match shell.execute(&line, &mut stdout) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    if !shell.registry().is_empty() {
        info!(buffers = shell.registry().len(), "leaving shell");
    }
    Ok(true)
}

/// Run `-c` lines in order, stopping at the first failure or `quit`
///
/// Returns `false` if a line failed.
fn run_script(shell: &mut Shell, lines: &[String]) -> io::Result<bool>
{
    let mut stdout = io::stdout().lock();

    for line in lines {
        match shell.execute(line, &mut stdout) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => {
                eprintln!("Error: {e}");
                return Ok(false);
            }
        }
    }

    stdout.flush()?;
    Ok(true)
}
