//! Command enum and positional decoding
//!
//! [`Command`] is the typed request the executor runs. Requests arriving as
//! an operation name plus positional string arguments, the shape used by
//! scripts and the legacy dispatcher, are decoded by
//! [`Command::from_positional`].

use custody_core::DeviceSpec;
use custody_engine::{Caller, Transition, TransitionArgs, EXCHANGE, EXCHANGE_LEGACY};

use crate::{Error, Result};

/// Every operation the executor can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ==================== Mutations ====================
    /// Register a new device; `spec` of `None` uses the configured defaults
    CreateDevice {
        /// Device identifier
        id: String,
        /// Descriptive fields
        spec: Option<DeviceSpec>,
    },

    /// Apply a single-record custody transition
    Transition {
        /// Which operation
        op: Transition,
        /// Device identifier
        id: String,
        /// Caller, recipient and consignment
        args: TransitionArgs,
    },

    /// Exchange a returned device for a replacement
    Exchange {
        /// Replacement device
        id: String,
        /// Returned device
        old_id: String,
        /// Caller and recipient
        args: TransitionArgs,
    },

    // ==================== Queries ====================
    /// Fetch one record
    GetDevice {
        /// Device identifier
        id: String,
    },

    /// True iff no usable record exists
    CheckUnique {
        /// Device identifier
        id: String,
    },

    /// Every readable record in creation order
    ListDevices,

    /// Number of registered identifiers
    DeviceCount,
}

impl Command {
    /// Canonical operation name
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateDevice { .. } => "create_device",
            Command::Transition { op, .. } => op.name(),
            Command::Exchange { .. } => EXCHANGE,
            Command::GetDevice { .. } => "get_device_details",
            Command::CheckUnique { .. } => "check_unique",
            Command::ListDevices => "list_devices",
            Command::DeviceCount => "device_count",
        }
    }

    /// True for commands that write
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::CreateDevice { .. } | Command::Transition { .. } | Command::Exchange { .. }
        )
    }

    /// Decode an operation name and positional arguments
    ///
    /// Accepts canonical and legacy names. The recipient affiliation is left
    /// to the operation's canonical one.
    pub fn from_positional(name: &str, args: &[String], caller: &Caller) -> Result<Command> {
        if let Some(op) = Transition::from_name(name) {
            return transition(op, args, caller);
        }

        match name {
            "create_device" => match args {
                [id] => Ok(Command::CreateDevice {
                    id: id.clone(),
                    spec: None,
                }),
                [id, device_name, model, manufactured_on] => Ok(Command::CreateDevice {
                    id: id.clone(),
                    spec: Some(DeviceSpec::new(
                        device_name.as_str(),
                        model.as_str(),
                        manufactured_on.as_str(),
                    )),
                }),
                _ => Err(arity(name, "1 or 4", args.len())),
            },
            EXCHANGE | EXCHANGE_LEGACY => match args {
                [id, recipient, old_id] => Ok(Command::Exchange {
                    id: id.clone(),
                    old_id: old_id.clone(),
                    args: TransitionArgs::new(caller.clone(), recipient.as_str()),
                }),
                _ => Err(arity(EXCHANGE, "3", args.len())),
            },
            "get_device_details" | "get_device" => {
                let [id] = args else {
                    return Err(arity("get_device_details", "1", args.len()));
                };
                Ok(Command::GetDevice { id: id.clone() })
            }
            "check_unique" | "check_unique_imei" => {
                let [id] = args else {
                    return Err(arity("check_unique", "1", args.len()));
                };
                Ok(Command::CheckUnique { id: id.clone() })
            }
            "list_devices" | "get_devices" => {
                no_args("list_devices", args)?;
                Ok(Command::ListDevices)
            }
            "device_count" => {
                no_args("device_count", args)?;
                Ok(Command::DeviceCount)
            }
            other => Err(Error::UnknownOperation {
                name: other.to_string(),
            }),
        }
    }
}

fn transition(op: Transition, args: &[String], caller: &Caller) -> Result<Command> {
    let (id, recipient, consignment) = match (args, op) {
        ([id, recipient, consignment], _) if op.takes_consignment() => {
            (id, recipient, Some(consignment.clone()))
        }
        // The sale's third argument is ignored, so it may be left off
        ([id, recipient], Transition::SellToCustomer) => (id, recipient, None),
        ([id, recipient], _) if !op.takes_consignment() => (id, recipient, None),
        _ => {
            let expected = match op {
                Transition::SellToCustomer => "2 or 3",
                _ if op.takes_consignment() => "3",
                _ => "2",
            };
            return Err(arity(op.name(), expected, args.len()));
        }
    };

    let mut transition_args = TransitionArgs::new(caller.clone(), recipient.as_str());
    transition_args.consignment = consignment;
    Ok(Command::Transition {
        op,
        id: id.clone(),
        args: transition_args,
    })
}

fn no_args(operation: &str, args: &[String]) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(arity(operation, "0", args.len()))
    }
}

fn arity(operation: &str, expected: &str, actual: usize) -> Error {
    Error::InvalidArguments {
        operation: operation.to_string(),
        reason: format!("expected {} arguments, got {}", expected, actual),
    }
}
