use std::fmt::{self, Display, Write};

macro_rules! try_match {
    ($scrutinee:expr, $pattern:pat => $map:expr) => {
        match ($scrutinee) {
            $pattern => Some($map),
            _ => None,
        }
    };
}

pub(crate) use try_match;

fn write_escaped(f: &mut fmt::Formatter<'_>, c: char, quote: char) -> fmt::Result {
    match c {
        '\n' => f.write_str("\\n"),
        '\t' => f.write_str("\\t"),
        '\r' => f.write_str("\\r"),
        '\0' => f.write_str("\\0"),
        '\\' => f.write_str("\\\\"),
        c if c == quote => write!(f, "\\{c}"),
        c if c.is_control() => write!(f, "\\u{{{:x}}}", c as u32),
        c => f.write_char(c),
    }
}

/// Displays a string in double quotes with the escapes the script language
/// understands.
pub fn format_quoted(value: &str) -> impl Display + '_ {
    struct QuotedFormatter<'a>(&'a str);

    impl Display for QuotedFormatter<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_char('"')?;

            for c in self.0.chars() {
                write_escaped(f, c, '"')?;
            }

            f.write_char('"')
        }
    }

    QuotedFormatter(value)
}

/// Displays a character in single quotes, escaped like [`format_quoted`].
pub fn format_char(c: char) -> impl Display {
    struct CharFormatter(char);

    impl Display for CharFormatter {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_char('\'')?;
            write_escaped(f, self.0, '\'')?;
            f.write_char('\'')
        }
    }

    CharFormatter(c)
}

pub fn format_iter<'a, T, I, II>(values: II, conj: &'a str, on_empty: &'a str) -> impl Display
where
    T: Display,
    I: Iterator<Item = T> + Clone,
    II: IntoIterator<Item = T, IntoIter = I>,
{
    struct IterFormatter<'a, I> {
        iter: I,
        conj: &'a str,
        on_empty: &'a str,
    }

    impl<I, T> Display for IterFormatter<'_, I>
    where
        T: Display,
        I: Iterator<Item = T> + Clone,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut iter = self.iter.clone();

            let Some(first) = iter.next() else {
                return self.on_empty.fmt(f);
            };

            let Some(second) = iter.next() else {
                return first.fmt(f);
            };

            match iter.next() {
                None => write!(f, "{first} {} {second}", self.conj),

                Some(mut prev) => {
                    write!(f, "{first}, {second}")?;

                    for v in iter {
                        write!(f, ", {prev}")?;
                        prev = v;
                    }

                    write!(f, " {} {prev}", self.conj)
                }
            }
        }
    }

    IterFormatter {
        iter: values.into_iter(),
        conj,
        on_empty,
    }
}
