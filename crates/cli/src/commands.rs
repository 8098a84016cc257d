//! Clap command definition.

use clap::{Arg, ArgAction, Command};

/// Build the top-level CLI.
pub fn build_cli() -> Command {
    Command::new("custody-cli")
        .about("Replay custody scripts against an in-memory device ledger")
        .long_about(
            "Reads one operation per line, from SCRIPT or stdin, and runs it against a fresh \
             in-memory ledger.\n\n\
             Lines are `<operation> [args...]`, e.g. `TRF_TO_WH 123456 WAREHOUSE CN-1`.\n\
             `as <AFFILIATION> [name]` switches the caller, `whoami` prints it, \
             `#` starts a comment.",
        )
        .arg(
            Arg::new("script")
                .value_name("SCRIPT")
                .help("Script file (reads stdin if omitted)"),
        )
        .arg(
            Arg::new("command")
                .short('c')
                .long("command")
                .value_name("LINE")
                .action(ArgAction::Append)
                .help("Run LINE instead of a script (repeatable)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Ledger configuration (TOML)"),
        )
        .arg(
            Arg::new("as")
                .long("as")
                .value_name("AFFILIATION")
                .default_value("VENDOR")
                .help("Initial caller affiliation"),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .value_name("NAME")
                .help("Initial caller name (defaults to the affiliation)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print results as JSON"),
        )
        .arg(
            Arg::new("fail-fast")
                .long("fail-fast")
                .action(ArgAction::SetTrue)
                .help("Stop at the first failing line"),
        )
}
