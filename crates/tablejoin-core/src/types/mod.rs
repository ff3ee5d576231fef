//! Core data types.

mod record;
mod window;

pub use record::Record;
pub use window::{MalformedLine, Window, WindowSpec};
