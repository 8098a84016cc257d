//! Executor Test Suite
//!
//! Tests the command layer directly: typed dispatch, positional requests
//! as a boundary layer would forward them, and error classification.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test executor
//! ```

mod common;

mod command_dispatch;
mod positional;
