//! A character stream with a movable cursor for hand-written lexers.
//!
//! [`Stream`] wraps an in-memory text with a signed read position and offers
//! lookahead and lookbehind matching, distance queries, bulk consumption and
//! checkpoint-based backtracking. The [`script`] module drives a stream from
//! a small line-oriented command language.

pub mod error;
pub mod location;
pub mod script;
pub mod stream;
pub mod util;

pub use error::StreamError;
pub use stream::{Checkpoint, Distance, Needle, Stream, Targets};
