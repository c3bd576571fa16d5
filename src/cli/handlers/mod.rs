use std::io::{self, BufRead, IsTerminal, Write};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::parse::USAGE;
use crate::shell::session::{Report, Session, SessionError};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let mut config = config_io::read_config(&cli.config)?;
    if let Some(file) = cli.file {
        config.storage.data_file = file;
    }
    let mut session = Session::open(&config)?;

    match cli.command {
        None | Some(Commands::Shell) => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            cmd_shell(
                &mut session,
                stdin.lock(),
                &mut io::stdout(),
                &mut io::stderr(),
                json,
                interactive,
            )
        }
        Some(Commands::Exec(args)) => cmd_exec(&mut session, &args.lines, &mut io::stdout(), json),
    }
}

// ---------------------------------------------------------------------------
// Shell
// ---------------------------------------------------------------------------

/// Read lines from `input` until `exit` or end of input.
///
/// Parse and command errors are printed and the loop carries on; a save
/// failure ends the loop with an error.
pub fn cmd_shell<R: BufRead, W: Write, E: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    err: &mut E,
    json: bool,
    interactive: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if interactive {
        write!(out, "{}", prompt(session.directory()))?;
        out.flush()?;
    }
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        match trimmed {
            "" => {}
            "help" => write_help(out)?,
            "history" => {
                for (i, entry) in session.history().entries().iter().enumerate() {
                    writeln!(out, "{:>4}  {}", i + 1, entry)?;
                }
            }
            _ => match run_or_repeat(session, trimmed) {
                Ok(report) => {
                    write_report(out, &report, json)?;
                    if report.exit {
                        return Ok(());
                    }
                }
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => write_error(out, err, &e, json)?,
            },
        }
        if interactive {
            write!(out, "{}", prompt(session.directory()))?;
            out.flush()?;
        }
    }
    // end of input without `exit`
    session.save()?;
    Ok(())
}

/// `!!` reruns the newest history entry; anything else runs as typed.
fn run_or_repeat(session: &mut Session, line: &str) -> Result<Report, SessionError> {
    if line != "!!" {
        return session.run_line(line);
    }
    let last = session.history_mut().previous().map(str::to_string);
    match last {
        Some(last) => session.run_line(&last),
        None => Err(SessionError::Parse(crate::parse::ParseError::Empty)),
    }
}

// ---------------------------------------------------------------------------
// Exec
// ---------------------------------------------------------------------------

/// Run each line in order; the first failure aborts the rest. Lines that
/// succeeded before it are still saved.
pub fn cmd_exec<W: Write>(
    session: &mut Session,
    lines: &[String],
    out: &mut W,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut failure = None;
    for line in lines {
        match session.run_line(line) {
            Ok(report) => {
                write_report(out, &report, json)?;
                if report.exit {
                    break;
                }
            }
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }
    session.save()?;
    match failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

fn write_report<W: Write>(out: &mut W, report: &Report, json: bool) -> io::Result<()> {
    if json {
        let text = serde_json::to_string(&report_to_json(report)).map_err(io::Error::other)?;
        writeln!(out, "{}", text)
    } else {
        for line in format_report(report) {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

fn write_error<W: Write, E: Write>(
    out: &mut W,
    err: &mut E,
    error: &SessionError,
    json: bool,
) -> io::Result<()> {
    if json {
        let body = ErrorJson {
            error: error.to_string(),
        };
        let text = serde_json::to_string(&body).map_err(io::Error::other)?;
        writeln!(out, "{}", text)
    } else {
        writeln!(err, "error: {}", error)
    }
}

fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    for (_, usage) in USAGE {
        writeln!(out, "  {}", usage)?;
    }
    writeln!(out, "  !!")?;
    writeln!(out, "  help")?;
    writeln!(out, "  history")
}
