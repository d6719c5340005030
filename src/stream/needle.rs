use std::iter;

use derive_more::Display;

/// What [`Stream::distance_to`](super::Stream::distance_to) measures the distance to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Needle<'a> {
    /// The start of the source.
    Beginning,

    /// The last character of the source.
    Ending,

    /// The first occurrence of a string at or after the cursor.
    Text(&'a str),
}

impl<'a> From<&'a str> for Needle<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for Needle<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

/// Number of characters strictly between the cursor and a needle.
///
/// `Unreachable` sorts after every finite distance, so a list of distances
/// always has a total order even when some needles never occur.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Distance {
    #[display("{_0}")]
    Chars(usize),

    #[display("unreachable")]
    Unreachable,
}

impl Distance {
    pub(super) fn from_raw(raw: isize) -> Self {
        usize::try_from(raw)
            .map(Self::Chars)
            .unwrap_or(Self::Unreachable)
    }

    pub fn chars(self) -> Option<usize> {
        match self {
            Self::Chars(n) => Some(n),
            Self::Unreachable => None,
        }
    }

    pub fn is_reachable(self) -> bool {
        matches!(self, Self::Chars(_))
    }
}

/// One or more candidate strings for [`Stream::consume`](super::Stream::consume).
///
/// Candidates are tried in order; the first one matching wins.
pub trait Targets {
    fn targets(&self) -> impl Iterator<Item = &str>;
}

impl Targets for &str {
    fn targets(&self) -> impl Iterator<Item = &str> {
        iter::once(*self)
    }
}

impl Targets for String {
    fn targets(&self) -> impl Iterator<Item = &str> {
        iter::once(self.as_str())
    }
}

impl Targets for &String {
    fn targets(&self) -> impl Iterator<Item = &str> {
        iter::once(self.as_str())
    }
}

impl<T: AsRef<str>> Targets for &[T] {
    fn targets(&self) -> impl Iterator<Item = &str> {
        self.iter().map(AsRef::as_ref)
    }
}

impl<T: AsRef<str>, const N: usize> Targets for [T; N] {
    fn targets(&self) -> impl Iterator<Item = &str> {
        self.iter().map(AsRef::as_ref)
    }
}

impl<T: AsRef<str>, const N: usize> Targets for &[T; N] {
    fn targets(&self) -> impl Iterator<Item = &str> {
        self.iter().map(AsRef::as_ref)
    }
}

impl<T: AsRef<str>> Targets for Vec<T> {
    fn targets(&self) -> impl Iterator<Item = &str> {
        self.iter().map(AsRef::as_ref)
    }
}

impl<T: AsRef<str>> Targets for &Vec<T> {
    fn targets(&self) -> impl Iterator<Item = &str> {
        self.iter().map(AsRef::as_ref)
    }
}
