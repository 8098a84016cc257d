//! Script line → Command/MetaCommand conversion.
//!
//! Each line is split shell-style, so quoted arguments may contain spaces:
//!
//! ```text
//! create_device 123456 LENOVO "VIBE K5" 03-12-2016
//! as STORE "Store #12"
//! TRF_TO_CUST 123456 alice -
//! ```
//!
//! The first word is an operation name (canonical or legacy) and the rest
//! are its positional arguments. Meta-commands change session state
//! instead of running against the ledger.

use custody_executor::{Affiliation, Command};

use crate::state::SessionState;

/// The result of parsing one line.
pub enum CliAction {
    /// Nothing to do (blank line or comment)
    Skip,
    /// A command to execute against the ledger
    Execute(Command),
    /// A session meta-command
    Meta(MetaCommand),
}

/// Session meta-commands.
#[derive(Debug, PartialEq, Eq)]
pub enum MetaCommand {
    /// Switch the current caller
    As {
        affiliation: Affiliation,
        name: Option<String>,
    },
    /// Print the current caller
    Whoami,
    /// Stop reading the script
    Quit,
}

/// Check for meta-commands before treating the line as an operation.
///
/// Returns `Ok(None)` if the line is not a meta-command.
pub fn check_meta_command(words: &[String]) -> Result<Option<MetaCommand>, String> {
    let Some((cmd, rest)) = words.split_first() else {
        return Ok(None);
    };

    match cmd.as_str() {
        "quit" | "exit" => Ok(Some(MetaCommand::Quit)),
        "whoami" => Ok(Some(MetaCommand::Whoami)),
        "as" => {
            let (affiliation, name) = match rest {
                [affiliation] => (affiliation, None),
                [affiliation, name] => (affiliation, Some(name.clone())),
                _ => return Err("Usage: as <AFFILIATION> [name]".to_string()),
            };
            let affiliation = affiliation
                .parse::<Affiliation>()
                .map_err(|e| e.to_string())?;
            Ok(Some(MetaCommand::As { affiliation, name }))
        }
        _ => Ok(None),
    }
}

/// Convert one script line into a CliAction.
pub fn parse_line(line: &str, state: &SessionState) -> Result<CliAction, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(CliAction::Skip);
    }

    let words = shlex::split(trimmed).ok_or_else(|| "Unbalanced quotes".to_string())?;
    if let Some(meta) = check_meta_command(&words)? {
        return Ok(CliAction::Meta(meta));
    }

    let Some((name, args)) = words.split_first() else {
        return Ok(CliAction::Skip);
    };
    Command::from_positional(name, args, state.caller())
        .map(CliAction::Execute)
        .map_err(|e| e.to_string())
}
