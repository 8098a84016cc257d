//! Output formatting for human and JSON modes.

use custody_executor::{DeviceRecord, Error, Output, TransitionReceipt};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format a command result.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string(output)
            .unwrap_or_else(|e| format!("{{\"error\":\"Serialization\",\"message\":\"{}\"}}", e)),
        OutputMode::Human => format_human(output),
    }
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::json!({
            "error": err.kind(),
            "message": err.to_string(),
        })
        .to_string(),
        OutputMode::Human => format!("(error) {}: {}", err.kind(), err),
    }
}

fn format_human(output: &Output) -> String {
    match output {
        Output::Device(record) => format_record(record),
        Output::Devices(records) if records.is_empty() => "(empty list)".to_string(),
        Output::Devices(records) => records
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}) {}  {}  {}", i + 1, r.id, r.status, r.owner))
            .collect::<Vec<_>>()
            .join("\n"),
        Output::Bool(b) => format!("(boolean) {}", b),
        Output::Count(n) => format!("(integer) {}", n),
        Output::Receipt(receipt) => format_receipt(receipt),
    }
}

fn format_record(record: &DeviceRecord) -> String {
    let unset = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    [
        ("id", record.id.to_string()),
        ("status", record.status.to_string()),
        ("owner", record.owner.to_string()),
        ("name", record.name.clone()),
        ("model", record.model.clone()),
        ("manufactured", record.manufactured_on.clone()),
        ("consignment", unset(record.consignment_number.clone())),
        ("delivered", unset(record.delivered_at.map(|t| t.to_string()))),
        ("received", unset(record.received_at.map(|t| t.to_string()))),
        ("sold", unset(record.sold_at.map(|t| t.to_string()))),
        ("sold by", unset(record.sold_by.clone())),
        ("previous", unset(record.previous_id.as_ref().map(|id| id.to_string()))),
    ]
    .iter()
    .map(|(field, value)| format!("{:>12}: {}", field, value))
    .collect::<Vec<_>>()
    .join("\n")
}

fn format_receipt(r: &TransitionReceipt) -> String {
    let owner = if r.from_owner == r.to_owner {
        r.to_owner.to_string()
    } else {
        format!("{} -> {}", r.from_owner, r.to_owner)
    };
    format!(
        "OK {} {}: {} -> {} (owner {}, version {})",
        r.operation, r.id, r.from_status, r.to_status, owner, r.version
    )
}
