//! A line-oriented command language for driving a [`Stream`](crate::Stream).
//!
//! ```text
//! input "lorem ipsum"
//! move-to 2
//! get-until " " => "rem"
//! cursor        => 5
//! ```
//!
//! Every line holds one command, optionally followed by `=>` and the
//! expected rendering of its outcome. `#` starts a comment.

mod command;
mod lexer;
mod session;
mod token;

use std::fmt::Display;
use std::iter;

use miette::{Diagnostic, LabeledSpan};
use thiserror::Error;

use crate::error::StreamError;
use crate::location::Span;
use crate::util::{format_char, format_quoted};

pub use command::{Command, CommandName, NeedleArg};
pub use lexer::{Expectation, Lexer, Line};
pub use session::{Outcome, Session, Step};
pub use token::{Marker, Token, TokenValue};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("script failed: {kind}")]
pub struct ScriptError {
    pub kind: ScriptErrorKind,
    pub span: Span,
}

impl ScriptError {
    pub fn new(kind: impl Into<ScriptErrorKind>, span: Span) -> Self {
        Self {
            kind: kind.into(),
            span,
        }
    }
}

impl Diagnostic for ScriptError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.kind.code()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.kind.help()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(iter::once(LabeledSpan::underline(self.span))))
    }
}

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ScriptErrorKind {
    #[error("the string literal is not terminated")]
    #[diagnostic(code(script::unterminated_string))]
    UnterminatedString,

    #[error("unknown escape sequence `\\{0}`")]
    #[diagnostic(
        code(script::unknown_escape),
        help("supported escapes are \\n, \\t, \\r, \\0, \\\\, \\\" and \\'")
    )]
    UnknownEscape(char),

    #[error("encountered an unexpected character {}", format_char(*.0))]
    #[diagnostic(code(script::unexpected_character))]
    UnexpectedCharacter(char),

    #[error("the integer is malformed")]
    #[diagnostic(code(script::malformed_integer))]
    MalformedInteger,

    #[error("the integer does not fit a cursor offset")]
    #[diagnostic(code(script::integer_out_of_range))]
    IntegerOutOfRange,

    #[error("an expectation needs a command before `=>`")]
    #[diagnostic(code(script::missing_command))]
    MissingCommand,

    #[error("unknown command {}", format_quoted(.0))]
    #[diagnostic(code(script::unknown_command))]
    UnknownCommand(String),

    #[error("`{command}` is missing an argument: expected {expected}")]
    #[diagnostic(code(script::missing_argument))]
    MissingArgument {
        command: CommandName,
        expected: &'static str,
    },

    #[error("`{command}` expected {expected}, found {found}")]
    #[diagnostic(code(script::invalid_argument))]
    InvalidArgument {
        command: CommandName,
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{command}` takes no further arguments")]
    #[diagnostic(code(script::unexpected_argument))]
    UnexpectedArgument { command: CommandName },

    #[error("no checkpoint named {}", format_quoted(.0))]
    #[diagnostic(
        code(script::unknown_checkpoint),
        help("checkpoints are created with the `checkpoint` command")
    )]
    UnknownCheckpoint(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Stream(#[from] StreamError),

    #[error("expected `{expected}`, got `{actual}`")]
    #[diagnostic(code(script::expectation_failed))]
    ExpectationFailed { expected: String, actual: String },
}
