use std::iter;

use crate::location::Span;
use crate::stream::Stream;

use super::token::{Marker, Token, TokenValue};
use super::{ScriptError, ScriptErrorKind};

/// The tokens of one script line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub tokens: Vec<Token>,
    pub expectation: Option<Expectation>,
}

/// The text after `=>`, compared verbatim with a rendered outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    pub text: String,
    pub span: Span,
}

/// Splits a single script line into tokens.
///
/// Positions in the underlying stream are character indices; `offsets` maps
/// them back to byte offsets in the script so spans stay valid for
/// multi-byte input.
pub struct Lexer {
    stream: Stream,
    offsets: Vec<usize>,
    base: usize,
}

impl Lexer {
    const BLANKS: [&'static str; 3] = [" ", "\t", "\r"];

    fn is_digit(c: char) -> bool {
        c.is_ascii_digit()
    }

    fn is_word_start(c: char) -> bool {
        c == '_' || c.is_ascii_alphabetic()
    }

    fn is_word_cont(c: char) -> bool {
        c == '-' || Self::is_word_start(c) || Self::is_digit(c)
    }
}

impl Lexer {
    /// `base` is the byte offset of `line` within the whole script.
    pub fn new(line: &str, base: usize) -> Self {
        let offsets = line
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(iter::once(line.len()))
            .collect();

        Self {
            stream: Stream::new(line),
            offsets,
            base,
        }
    }

    fn offset(&self, pos: isize) -> usize {
        let idx = usize::try_from(pos)
            .unwrap_or(0)
            .min(self.offsets.len() - 1);

        self.base + self.offsets[idx]
    }

    fn span_from(&self, start: isize) -> Span {
        (self.offset(start)..self.offset(self.stream.cursor())).into()
    }

    fn error_from(&self, start: isize, kind: ScriptErrorKind) -> ScriptError {
        ScriptError::new(kind, self.span_from(start))
    }

    pub fn tokenize(mut self) -> Result<Line, ScriptError> {
        let mut line = Line::default();

        loop {
            self.stream.consume(Self::BLANKS);
            let start = self.stream.cursor();

            let value = match self.stream.current() {
                None | Some('#') => return Ok(line),

                Some('=') if self.stream.matches("=>") => {
                    line.expectation = Some(self.scan_expectation());

                    return Ok(line);
                }

                Some('"') => self.scan_string(start)?,

                Some(c) if Self::is_digit(c) => self.scan_int(start)?,
                Some('-') if self.stream.peek().is_some_and(Self::is_digit) => {
                    self.scan_int(start)?
                }

                Some(c) if Self::is_word_start(c) => {
                    TokenValue::Word(self.stream.consume_while(Self::is_word_cont))
                }

                Some(c) => match Marker::from_char(c) {
                    Some(marker) => {
                        self.stream.advance();

                        TokenValue::Marker(marker)
                    }

                    None => {
                        self.stream.advance();

                        return Err(self.error_from(start, ScriptErrorKind::UnexpectedCharacter(c)));
                    }
                },
            };

            line.tokens.push(Token {
                span: self.span_from(start),
                value,
            });
        }
    }

    fn scan_expectation(&mut self) -> Expectation {
        self.stream.move_by(2);
        self.stream.consume(Self::BLANKS);

        let start = self.offset(self.stream.cursor());
        let text = self.stream.slice_to_end();
        let text = text.trim_end();

        Expectation {
            text: text.into(),
            span: Span::new_with_extent(start, text.len()),
        }
    }

    fn scan_string(&mut self, start: isize) -> Result<TokenValue, ScriptError> {
        let mut value = String::new();

        loop {
            match self.stream.advance() {
                None => return Err(self.error_from(start, ScriptErrorKind::UnterminatedString)),

                Some('"') => {
                    self.stream.advance();

                    return Ok(TokenValue::Str(value));
                }

                Some('\\') => {
                    let escape_start = self.stream.cursor();

                    value.push(match self.stream.advance() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some(c @ ('\\' | '"' | '\'')) => c,

                        Some(c) => {
                            self.stream.advance();

                            return Err(
                                self.error_from(escape_start, ScriptErrorKind::UnknownEscape(c))
                            );
                        }

                        None => {
                            return Err(self.error_from(start, ScriptErrorKind::UnterminatedString));
                        }
                    });
                }

                Some(c) => value.push(c),
            }
        }
    }

    fn scan_int(&mut self, start: isize) -> Result<TokenValue, ScriptError> {
        let negative = self.stream.matches("-");

        if negative {
            self.stream.move_by(1);
        }

        let digits = self.stream.consume_while(Self::is_digit);

        if self.stream.current().is_some_and(Self::is_word_cont) {
            self.stream.consume_while(Self::is_word_cont);

            return Err(self.error_from(start, ScriptErrorKind::MalformedInteger));
        }

        let text = if negative {
            format!("-{digits}")
        } else {
            digits
        };

        text.parse()
            .map(TokenValue::Int)
            .map_err(|_| self.error_from(start, ScriptErrorKind::IntegerOutOfRange))
    }
}
