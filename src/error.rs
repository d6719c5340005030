use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    #[error("cannot slice backwards from {cursor} by {length}")]
    #[diagnostic(
        code(stream::invalid_argument),
        help("slice lengths must be non-negative; use `move_by` to step backwards")
    )]
    InvalidArgument { cursor: isize, length: isize },
}
