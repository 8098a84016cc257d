//! Command handlers, one module per command family.

pub mod device;
pub mod query;
