use std::slice;
use std::str::FromStr;

use strum::{Display, EnumString};

use crate::location::Span;
use crate::stream::Needle;
use crate::util::try_match;

use super::token::{Marker, Token, TokenValue};
use super::{ScriptError, ScriptErrorKind};

#[derive(Display, EnumString, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "kebab-case")]
pub enum CommandName {
    Input,
    Current,
    Advance,
    Retreat,
    Peek,
    Cursor,
    Remaining,
    Matches,
    Before,
    After,
    DistanceTo,
    Closest,
    Checkpoint,
    Rollback,
    GetUntil,
    Slice,
    Move,
    MoveTo,
    JumpTo,
    Consume,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NeedleArg {
    Beginning,
    Ending,
    Text(String),
}

impl NeedleArg {
    pub fn as_needle(&self) -> Needle<'_> {
        match self {
            Self::Beginning => Needle::Beginning,
            Self::Ending => Needle::Ending,
            Self::Text(text) => Needle::Text(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Input(String),
    Current,
    Advance,
    Retreat,
    Peek,
    Cursor,
    Remaining,
    Matches(String),
    Before(String),
    After(String),
    DistanceTo(NeedleArg),
    Closest(Vec<String>),
    Checkpoint(String),
    Rollback(String),
    GetUntil(String),

    /// `None` slices to the end of the input.
    Slice(Option<isize>),
    Move(isize),
    MoveTo(isize),
    JumpTo(String),
    Consume(Vec<String>),
}

impl Command {
    pub fn name(&self) -> CommandName {
        match self {
            Self::Input(_) => CommandName::Input,
            Self::Current => CommandName::Current,
            Self::Advance => CommandName::Advance,
            Self::Retreat => CommandName::Retreat,
            Self::Peek => CommandName::Peek,
            Self::Cursor => CommandName::Cursor,
            Self::Remaining => CommandName::Remaining,
            Self::Matches(_) => CommandName::Matches,
            Self::Before(_) => CommandName::Before,
            Self::After(_) => CommandName::After,
            Self::DistanceTo(_) => CommandName::DistanceTo,
            Self::Closest(_) => CommandName::Closest,
            Self::Checkpoint(_) => CommandName::Checkpoint,
            Self::Rollback(_) => CommandName::Rollback,
            Self::GetUntil(_) => CommandName::GetUntil,
            Self::Slice(_) => CommandName::Slice,
            Self::Move(_) => CommandName::Move,
            Self::MoveTo(_) => CommandName::MoveTo,
            Self::JumpTo(_) => CommandName::JumpTo,
            Self::Consume(_) => CommandName::Consume,
        }
    }

    /// Builds a command from the tokens of a line; the first token names it.
    pub fn parse(tokens: &[Token]) -> Result<Self, ScriptError> {
        let Some((head, rest)) = tokens.split_first() else {
            return Err(ScriptError::new(
                ScriptErrorKind::MissingCommand,
                Span::default(),
            ));
        };

        let name = try_match!(&head.value, TokenValue::Word(word) => word.as_str())
            .and_then(|word| CommandName::from_str(word).ok())
            .ok_or_else(|| {
                let word = match &head.value {
                    TokenValue::Word(word) | TokenValue::Str(word) => word.clone(),
                    value => value.describe().into(),
                };

                ScriptError::new(ScriptErrorKind::UnknownCommand(word), head.span)
            })?;

        let mut args = Args {
            command: name,
            span: head.span,
            tokens: rest.iter(),
        };

        let command = match name {
            CommandName::Input => Self::Input(args.string()?),
            CommandName::Current => Self::Current,
            CommandName::Advance => Self::Advance,
            CommandName::Retreat => Self::Retreat,
            CommandName::Peek => Self::Peek,
            CommandName::Cursor => Self::Cursor,
            CommandName::Remaining => Self::Remaining,
            CommandName::Matches => Self::Matches(args.string()?),
            CommandName::Before => Self::Before(args.string()?),
            CommandName::After => Self::After(args.string()?),
            CommandName::DistanceTo => Self::DistanceTo(args.needle()?),
            CommandName::Closest => Self::Closest(args.strings()?),
            CommandName::Checkpoint => Self::Checkpoint(args.name()?),
            CommandName::Rollback => Self::Rollback(args.name()?),
            CommandName::GetUntil => Self::GetUntil(args.string()?),
            CommandName::Slice => Self::Slice(args.length()?),
            CommandName::Move => Self::Move(args.int()?),
            CommandName::MoveTo => Self::MoveTo(args.int()?),
            CommandName::JumpTo => Self::JumpTo(args.string()?),
            CommandName::Consume => Self::Consume(args.strings()?),
        };

        args.finish()?;

        Ok(command)
    }
}

struct Args<'t> {
    command: CommandName,
    span: Span,
    tokens: slice::Iter<'t, Token>,
}

impl<'t> Args<'t> {
    fn next(&mut self, expected: &'static str) -> Result<&'t Token, ScriptError> {
        let token = self.tokens.next().ok_or_else(|| {
            ScriptError::new(
                ScriptErrorKind::MissingArgument {
                    command: self.command,
                    expected,
                },
                self.span,
            )
        })?;
        self.span = self.span.convex_hull(&token.span);

        Ok(token)
    }

    fn invalid(&self, token: &Token, expected: &'static str) -> ScriptError {
        ScriptError::new(
            ScriptErrorKind::InvalidArgument {
                command: self.command,
                expected,
                found: token.value.describe(),
            },
            token.span,
        )
    }

    fn expect<T>(
        &mut self,
        expected: &'static str,
        f: impl FnOnce(&'t TokenValue) -> Option<T>,
    ) -> Result<T, ScriptError> {
        let token = self.next(expected)?;

        f(&token.value).ok_or_else(|| self.invalid(token, expected))
    }

    fn string(&mut self) -> Result<String, ScriptError> {
        self.expect("a string", |value| {
            try_match!(value, TokenValue::Str(s) => s.clone())
        })
    }

    fn int(&mut self) -> Result<isize, ScriptError> {
        self.expect("an integer", |value| {
            try_match!(value, TokenValue::Int(n) => *n)
        })
    }

    fn name(&mut self) -> Result<String, ScriptError> {
        self.expect("a checkpoint name", |value| match value {
            TokenValue::Word(name) | TokenValue::Str(name) => Some(name.clone()),
            _ => None,
        })
    }

    fn needle(&mut self) -> Result<NeedleArg, ScriptError> {
        self.expect("a string, `^` or `$`", |value| match value {
            TokenValue::Str(s) => Some(NeedleArg::Text(s.clone())),
            TokenValue::Marker(Marker::Beginning) => Some(NeedleArg::Beginning),
            TokenValue::Marker(Marker::Ending) => Some(NeedleArg::Ending),
            _ => None,
        })
    }

    fn length(&mut self) -> Result<Option<isize>, ScriptError> {
        self.expect("an integer or `*`", |value| match value {
            TokenValue::Int(n) => Some(Some(*n)),
            TokenValue::Marker(Marker::Rest) => Some(None),
            _ => None,
        })
    }

    /// Collects every remaining argument, each of which must be a string.
    fn strings(&mut self) -> Result<Vec<String>, ScriptError> {
        let mut result = vec![];

        while !self.tokens.as_slice().is_empty() {
            result.push(self.string()?);
        }

        Ok(result)
    }

    fn finish(mut self) -> Result<(), ScriptError> {
        match self.tokens.next() {
            None => Ok(()),

            Some(token) => Err(ScriptError::new(
                ScriptErrorKind::UnexpectedArgument {
                    command: self.command,
                },
                token.span,
            )),
        }
    }
}
