use std::fmt::{self, Display};

use fxhash::FxHashMap;
use tracing::debug;

use crate::location::Span;
use crate::stream::{Checkpoint, Distance, Stream};
use crate::util::{format_char, format_quoted};

use super::command::{Command, CommandName};
use super::lexer::Lexer;
use super::{ScriptError, ScriptErrorKind};

/// The result of running one command.
///
/// Its [`Display`] rendering is what `=>` expectations are compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Char(Option<char>),
    Flag(bool),
    Offset(isize),
    Index(Option<usize>),
    Distance(Distance),
    Ranking(Vec<(String, Distance)>),
    Text(String),
    MaybeText(Option<String>),
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "ok"),
            Self::Char(Some(c)) => format_char(*c).fmt(f),
            Self::Flag(flag) => flag.fmt(f),
            Self::Offset(offset) => offset.fmt(f),
            Self::Index(Some(idx)) => idx.fmt(f),
            Self::Distance(distance) => distance.fmt(f),
            Self::Text(text) | Self::MaybeText(Some(text)) => format_quoted(text).fmt(f),
            Self::Char(None) | Self::Index(None) | Self::MaybeText(None) => write!(f, "none"),

            Self::Ranking(ranking) => {
                write!(f, "[")?;

                for (idx, (needle, distance)) in ranking.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "({}, {distance})", format_quoted(needle))?;
                }

                write!(f, "]")
            }
        }
    }
}

/// One executed line of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// 1-based line number.
    pub line: usize,
    pub command: CommandName,
    pub outcome: Outcome,
    pub span: Span,
}

/// A stream plus the named checkpoints a script has taken on it.
#[derive(Debug, Clone)]
pub struct Session {
    stream: Stream,
    checkpoints: FxHashMap<String, Checkpoint>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Stream::new(""))
    }
}

impl Session {
    pub fn new(stream: Stream) -> Self {
        Self {
            stream,
            checkpoints: Default::default(),
        }
    }

    pub fn stream(&self) -> &Stream {
        &self.stream
    }

    pub fn into_stream(self) -> Stream {
        self.stream
    }

    pub fn execute(&mut self, command: &Command) -> Result<Outcome, ScriptErrorKind> {
        let stream = &mut self.stream;

        Ok(match command {
            Command::Input(text) => {
                *stream = Stream::new(text);
                self.checkpoints.clear();

                Outcome::Done
            }

            Command::Current => Outcome::Char(stream.current()),
            Command::Advance => Outcome::Char(stream.advance()),
            Command::Retreat => Outcome::Char(stream.retreat()),
            Command::Peek => Outcome::Char(stream.peek()),
            Command::Cursor => Outcome::Offset(stream.cursor()),
            Command::Remaining => Outcome::Text(stream.remaining()),
            Command::Matches(needle) => Outcome::Flag(stream.matches(needle)),
            Command::Before(needle) => Outcome::Flag(stream.before(needle)),
            Command::After(needle) => Outcome::Flag(stream.after(needle)),
            Command::DistanceTo(needle) => Outcome::Distance(stream.distance_to(needle.as_needle())),

            Command::Closest(needles) => {
                let needles = needles.iter().map(String::as_str).collect::<Vec<_>>();

                Outcome::Ranking(
                    stream
                        .closest(&needles)
                        .into_iter()
                        .map(|(needle, distance)| (needle.to_owned(), distance))
                        .collect(),
                )
            }

            Command::Checkpoint(name) => {
                self.checkpoints
                    .insert(name.clone(), stream.start_transaction());

                Outcome::Done
            }

            Command::Rollback(name) => {
                let checkpoint = self
                    .checkpoints
                    .get(name)
                    .copied()
                    .ok_or_else(|| ScriptErrorKind::UnknownCheckpoint(name.clone()))?;
                stream.rollback(checkpoint);

                Outcome::Done
            }

            Command::GetUntil(target) => Outcome::MaybeText(stream.get_until(target)),
            Command::Slice(Some(length)) => Outcome::Text(stream.slice(*length)?),
            Command::Slice(None) => Outcome::Text(stream.slice_to_end()),

            Command::Move(delta) => {
                stream.move_by(*delta);

                Outcome::Done
            }

            Command::MoveTo(position) => {
                stream.move_to(*position);

                Outcome::Done
            }

            Command::JumpTo(target) => Outcome::Index(stream.jump_to(target)),

            Command::Consume(targets) => Outcome::Text(stream.consume(targets)),
        })
    }

    /// Runs every line of `source`, stopping at the first error.
    ///
    /// Lines ending in `=> expected` fail unless the rendered outcome equals
    /// `expected`.
    pub fn run(&mut self, source: &str) -> Result<Vec<Step>, ScriptError> {
        let mut steps = vec![];
        let mut base = 0;

        for (idx, raw_line) in source.split_inclusive('\n').enumerate() {
            let line_start = base;
            base += raw_line.len();

            let line = Lexer::new(raw_line.trim_end_matches('\n'), line_start).tokenize()?;

            if line.tokens.is_empty() {
                match line.expectation {
                    Some(expectation) => {
                        return Err(ScriptError::new(
                            ScriptErrorKind::MissingCommand,
                            expectation.span,
                        ));
                    }

                    None => continue,
                }
            }

            let command = Command::parse(&line.tokens)?;
            let span = line
                .tokens
                .iter()
                .map(|token| token.span)
                .reduce(|lhs, rhs| lhs.convex_hull(&rhs))
                .unwrap_or_default();

            debug!(line = idx + 1, command = %command.name(), "executing script command");

            let outcome = self
                .execute(&command)
                .map_err(|kind| ScriptError::new(kind, span))?;

            if let Some(expectation) = line.expectation {
                let actual = outcome.to_string();

                if actual != expectation.text {
                    return Err(ScriptError::new(
                        ScriptErrorKind::ExpectationFailed {
                            expected: expectation.text,
                            actual,
                        },
                        expectation.span,
                    ));
                }
            }

            steps.push(Step {
                line: idx + 1,
                command: command.name(),
                outcome,
                span,
            });
        }

        Ok(steps)
    }
}
