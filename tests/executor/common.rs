//! Shared helpers for executor tests

pub use custody::{
    Affiliation, Caller, Command, DeviceStatus, Executor, Output, Transition, TransitionArgs,
};
pub use custody_executor::Error;

pub fn create_executor() -> Executor {
    Executor::ephemeral().expect("Failed to create executor")
}

pub fn party(affiliation: Affiliation) -> Caller {
    Caller::party(affiliation)
}

/// Owned argument list from string literals
pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Create `id` through the command layer
pub fn create(executor: &Executor, id: &str) {
    executor
        .execute(Command::CreateDevice {
            id: id.to_string(),
            spec: None,
        })
        .expect("create failed");
}

/// Status of `id` through the command layer
pub fn status_of(executor: &Executor, id: &str) -> DeviceStatus {
    match executor.execute(Command::GetDevice { id: id.to_string() }) {
        Ok(Output::Device(record)) => record.status,
        other => panic!("Expected Device output, got {:?}", other),
    }
}
