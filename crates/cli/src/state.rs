//! Session state: the executor plus the current caller.

use custody_executor::{Affiliation, Caller, Command, Executor, Output, Result};

/// State carried across the lines of one script.
pub struct SessionState {
    executor: Executor,
    caller: Caller,
}

impl SessionState {
    pub fn new(executor: Executor, caller: Caller) -> Self {
        Self { executor, caller }
    }

    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    /// Switch the caller; without a name the caller is named after its affiliation.
    pub fn act_as(&mut self, affiliation: Affiliation, name: Option<String>) {
        self.caller = match name {
            Some(name) => Caller::new(affiliation, name),
            None => Caller::party(affiliation),
        };
    }

    pub fn execute(&self, cmd: Command) -> Result<Output> {
        self.executor.execute(cmd)
    }
}
