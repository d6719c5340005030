use derive_more::Display;

use crate::location::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub span: Span,
    pub value: TokenValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenValue {
    Word(String),
    Str(String),
    Int(isize),
    Marker(Marker),
}

impl TokenValue {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Word(_) => "a word",
            Self::Str(_) => "a string",
            Self::Int(_) => "an integer",
            Self::Marker(Marker::Beginning) => "`^`",
            Self::Marker(Marker::Ending) => "`$`",
            Self::Marker(Marker::Rest) => "`*`",
        }
    }
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// The start of the input.
    #[display("^")]
    Beginning,

    /// The end of the input.
    #[display("$")]
    Ending,

    /// Everything up to the end of the input.
    #[display("*")]
    Rest,
}

impl Marker {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '^' => Self::Beginning,
            '$' => Self::Ending,
            '*' => Self::Rest,
            _ => return None,
        })
    }
}
