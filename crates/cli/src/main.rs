//! Custody CLI: replay custody scripts against an in-memory ledger.
//!
//! Three input sources:
//! - **Command mode**: `custody-cli -c "create_device 1" -c "get_devices"`
//! - **Script mode**: `custody-cli lifecycle.txt`
//! - **Pipe mode**: `cat lifecycle.txt | custody-cli`

mod commands;
mod format;
mod parse;
mod state;

use std::io::{self, BufRead, BufReader};
use std::process;
use std::sync::Arc;

use custody_executor::{Affiliation, Caller, DeviceLedger, Executor, LedgerConfig};
use custody_storage::MemoryStore;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_output, OutputMode};
use parse::{parse_line, CliAction, MetaCommand};
use state::SessionState;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let matches = build_cli().get_matches();
    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let fail_fast = matches.get_flag("fail-fast");

    let mut state = match open_session(&matches) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    let exit_code = if let Some(lines) = matches.get_many::<String>("command") {
        run_lines(&mut state, lines.cloned().map(Ok), mode, fail_fast)
    } else if let Some(path) = matches.get_one::<String>("script") {
        match std::fs::File::open(path) {
            Ok(file) => run_lines(&mut state, BufReader::new(file).lines(), mode, fail_fast),
            Err(e) => {
                eprintln!("Failed to open script {}: {}", path, e);
                2
            }
        }
    } else {
        run_lines(&mut state, io::stdin().lock().lines(), mode, fail_fast)
    };
    process::exit(exit_code);
}

fn open_session(matches: &clap::ArgMatches) -> Result<SessionState, String> {
    let config = match matches.get_one::<String>("config") {
        Some(path) => LedgerConfig::from_file(path).map_err(|e| e.to_string())?,
        None => LedgerConfig::default(),
    };
    let ledger = DeviceLedger::open(Arc::new(MemoryStore::new()), config)
        .map_err(|e| format!("Failed to open ledger: {}", e))?;

    let affiliation = matches
        .get_one::<String>("as")
        .map(|s| s.parse::<Affiliation>())
        .transpose()
        .map_err(|e| e.to_string())?
        .unwrap_or(Affiliation::Vendor);
    let caller = match matches.get_one::<String>("name") {
        Some(name) => Caller::new(affiliation, name.as_str()),
        None => Caller::party(affiliation),
    };

    Ok(SessionState::new(Executor::new(ledger), caller))
}

/// Run every line, returning the process exit code.
///
/// 0 if every line succeeded, 1 if any failed.
fn run_lines(
    state: &mut SessionState,
    lines: impl Iterator<Item = io::Result<String>>,
    mode: OutputMode,
    fail_fast: bool,
) -> i32 {
    let mut failed = false;
    for (index, line) in lines.enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("(error) failed to read input: {}", e);
                return 2;
            }
        };

        let ok = match parse_line(&line, state) {
            Ok(CliAction::Skip) => true,
            Ok(CliAction::Meta(MetaCommand::Quit)) => break,
            Ok(CliAction::Meta(MetaCommand::Whoami)) => {
                println!("{}", state.caller());
                true
            }
            Ok(CliAction::Meta(MetaCommand::As { affiliation, name })) => {
                state.act_as(affiliation, name);
                tracing::debug!(caller = %state.caller(), "Switched caller");
                true
            }
            Ok(CliAction::Execute(cmd)) => match state.execute(cmd) {
                Ok(output) => {
                    println!("{}", format_output(&output, mode));
                    true
                }
                Err(e) => {
                    eprintln!("{}", format_error(&e, mode));
                    false
                }
            },
            Err(e) => {
                eprintln!("(error) line {}: {}", index + 1, e);
                false
            }
        };

        if !ok {
            failed = true;
            if fail_fast {
                break;
            }
        }
    }
    i32::from(failed)
}
