//! Command implementations.

pub mod join;
pub mod preview;
