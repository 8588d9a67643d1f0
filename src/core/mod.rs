//! Shared byte-stream and string primitives used by every tag format this
//! crate understands.

#[macro_use]
pub(crate) mod macros;
pub mod io;
pub mod string;

pub use io::{BufStream, StreamError};
pub use string::Encoding;
