//! Byte-level text engine used by every generator stage.
//!
//! [`Buffer`] holds whole-file contents and edits them in place; the
//! filters in [`filters`] strip comments and move between lines and
//! NUL-terminated records.

pub mod buffer;
pub mod filters;

pub use buffer::{Buffer, BufferError, BufferResult, DEFAULT_INCREMENT};
pub use filters::StripOutcome;
