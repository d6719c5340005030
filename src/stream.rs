mod needle;

use tracing::{debug, trace};

use crate::error::StreamError;

pub use needle::{Distance, Needle, Targets};

/// A movable read position over an immutable sequence of characters.
///
/// The cursor is a signed offset that is never clamped: navigation may move
/// it before the first character or past the last one, where every accessor
/// reports the absence of a character instead of failing.
///
/// ```
/// use ascii_byte_stream::Stream;
///
/// let mut stream = Stream::new("lorem ipsum");
/// stream.move_to(2);
///
/// assert!(stream.matches("rem"));
/// assert_eq!(stream.get_until(" ").as_deref(), Some("rem"));
/// assert_eq!(stream.cursor(), 5);
/// ```
///
/// All mutation goes through `&mut self`; a stream belongs to one parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    source: Box<[char]>,
    cursor: isize,
}

/// A cursor position captured by [`Stream::start_transaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checkpoint {
    cursor: isize,
}

impl Checkpoint {
    pub fn cursor(&self) -> isize {
        self.cursor
    }
}

impl Stream {
    pub fn new(source: impl AsRef<str>) -> Self {
        Self {
            source: source.as_ref().chars().collect(),
            cursor: 0,
        }
    }

    pub fn source(&self) -> &[char] {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn cursor(&self) -> isize {
        self.cursor
    }

    /// Returns `true` once the cursor is at or past the end of the source.
    pub fn is_eof(&self) -> bool {
        self.cursor >= self.end()
    }

    /// Returns the character under the cursor.
    pub fn current(&self) -> Option<char> {
        self.char_at(self.cursor)
    }

    /// Returns the character after the cursor without moving.
    pub fn peek(&self) -> Option<char> {
        self.char_at(self.cursor.saturating_add(1))
    }

    /// Moves the cursor forward by one and returns the character it lands on.
    pub fn advance(&mut self) -> Option<char> {
        self.cursor = self.cursor.saturating_add(1);

        self.current()
    }

    /// Moves the cursor back by one and returns the character it lands on.
    pub fn retreat(&mut self) -> Option<char> {
        self.cursor = self.cursor.saturating_sub(1);

        self.current()
    }

    /// Returns the text from the cursor to the end of the source.
    pub fn remaining(&self) -> String {
        self.text(self.cursor.max(0), usize::MAX)
    }

    pub fn matches(&self, needle: &str) -> bool {
        Self::window_eq(self.window(self.cursor, needle), needle)
    }

    /// Checks whether `needle` ends right before the cursor.
    ///
    /// ```
    /// # use ascii_byte_stream::Stream;
    /// let mut stream = Stream::new("lorem ipsum");
    /// stream.move_to(4);
    ///
    /// assert!(stream.before("lore"));
    /// ```
    pub fn before(&self, needle: &str) -> bool {
        let len = needle.chars().count();
        let start = self.cursor.saturating_sub_unsigned(len);

        Self::window_eq(self.slice_clamped(start, len), needle)
    }

    /// Checks whether `needle` starts right after the cursor, skipping the
    /// character under it.
    ///
    /// ```
    /// # use ascii_byte_stream::Stream;
    /// let mut stream = Stream::new("lorem ipsum");
    /// stream.move_to(2);
    ///
    /// assert!(stream.after("em"));
    /// ```
    pub fn after(&self, needle: &str) -> bool {
        Self::window_eq(self.window(self.cursor.saturating_add(1), needle), needle)
    }

    /// Counts the characters strictly between the cursor and `needle`.
    ///
    /// A needle starting right after the cursor is at distance 0. A count
    /// that would be negative, including a needle starting exactly at the
    /// cursor, is reported as [`Distance::Unreachable`], as is a needle that
    /// does not occur at or after the cursor.
    ///
    /// ```
    /// # use ascii_byte_stream::{Distance, Needle, Stream};
    /// let mut stream = Stream::new("lorem ipsum");
    /// stream.move_to(2);
    ///
    /// assert_eq!(stream.distance_to("p"), Distance::Chars(4));
    /// assert_eq!(stream.distance_to(Needle::Beginning), Distance::Chars(2));
    /// assert_eq!(stream.distance_to(Needle::Ending), Distance::Chars(8));
    /// assert_eq!(stream.distance_to("x"), Distance::Unreachable);
    /// ```
    pub fn distance_to<'n>(&self, needle: impl Into<Needle<'n>>) -> Distance {
        let raw = match needle.into() {
            Needle::Beginning => self.cursor,
            Needle::Ending => self.end().saturating_sub(self.cursor).saturating_sub(1),

            Needle::Text(text) => match self.find(text, self.cursor) {
                Some(idx) => (idx as isize)
                    .saturating_sub(self.cursor)
                    .saturating_sub(1),
                None => return Distance::Unreachable,
            },
        };

        Distance::from_raw(raw)
    }

    /// Pairs every needle with its distance, nearest first.
    ///
    /// Needles at equal distances keep their relative order.
    pub fn closest<'n>(&self, needles: &[&'n str]) -> Vec<(&'n str, Distance)> {
        let mut ranked = needles
            .iter()
            .map(|&needle| (needle, self.distance_to(needle)))
            .collect::<Vec<_>>();
        ranked.sort_by_key(|&(_, distance)| distance);

        ranked
    }

    /// Captures the cursor so that it can be restored with [`Stream::rollback`].
    #[must_use = "the checkpoint is the only way to roll the transaction back"]
    pub fn start_transaction(&self) -> Checkpoint {
        Checkpoint {
            cursor: self.cursor,
        }
    }

    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        trace!(
            from = self.cursor,
            to = checkpoint.cursor,
            "rolling back transaction"
        );

        self.cursor = checkpoint.cursor;
    }

    /// Runs `f` and rolls the cursor back if it returns `None`.
    pub fn speculate<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let checkpoint = self.start_transaction();
        let result = f(self);

        if result.is_none() {
            self.rollback(checkpoint);
        }

        result
    }

    /// Returns the text between the cursor and the next occurrence of
    /// `target`, moving the cursor onto that occurrence.
    ///
    /// Returns `None` without moving if `target` does not occur. An empty
    /// `target` matches at the cursor, and a cursor past the end stays there.
    pub fn get_until(&mut self, target: &str) -> Option<String> {
        let idx = self.find(target, self.cursor)?;
        let start = self.cursor.max(0);
        let text = self.text(start, idx.saturating_sub(start as usize));
        self.cursor = self.cursor.max(idx as isize);

        Some(text)
    }

    /// Returns `length` characters starting at the cursor and moves past them.
    ///
    /// The cursor moves by the full `length` even if the source ends sooner.
    pub fn slice(&mut self, length: isize) -> Result<String, StreamError> {
        let Ok(len) = usize::try_from(length) else {
            debug!(cursor = self.cursor, length, "rejected a negative slice");

            return Err(StreamError::InvalidArgument {
                cursor: self.cursor,
                length,
            });
        };

        let text = self.text(self.cursor, len);
        self.cursor = self.cursor.saturating_add(length);

        Ok(text)
    }

    /// Returns everything from the cursor on and moves the cursor to the end.
    pub fn slice_to_end(&mut self) -> String {
        let text = self.text(self.cursor, usize::MAX);
        self.cursor = self.end();

        text
    }

    pub fn move_by(&mut self, delta: isize) -> &mut Self {
        self.cursor = self.cursor.saturating_add(delta);

        self
    }

    pub fn move_to(&mut self, position: isize) -> &mut Self {
        self.cursor = position;

        self
    }

    /// Moves the cursor onto the next occurrence of `target` and returns its
    /// index.
    ///
    /// On a miss the cursor is parked at `-1` and `None` is returned; check
    /// for it before navigating further.
    pub fn jump_to(&mut self, target: &str) -> Option<usize> {
        match self.find(target, self.cursor) {
            Some(idx) => {
                self.cursor = idx as isize;

                Some(idx)
            }

            None => {
                trace!(needle = target, from = self.cursor, "jump target not found");
                self.cursor = -1;

                None
            }
        }
    }

    /// Skips repeated occurrences of the targets and returns the skipped text.
    ///
    /// At every step the first target (in the given order) that matches at
    /// the cursor is skipped; a shorter target listed earlier shadows a
    /// longer one sharing its prefix. Empty targets never match.
    ///
    /// ```
    /// # use ascii_byte_stream::Stream;
    /// let mut stream = Stream::new("Lorem 12 12 12 ipsum");
    /// stream.move_to(6);
    ///
    /// assert_eq!(stream.consume("12 "), "12 12 12 ");
    /// assert_eq!(stream.cursor(), 15);
    /// ```
    pub fn consume(&mut self, targets: impl Targets) -> String {
        let start = self.cursor;

        while let Some(target) = targets
            .targets()
            .find(|target| !target.is_empty() && self.matches(target))
        {
            self.move_by(target.chars().count() as isize);
        }

        self.text_between(start, self.cursor)
    }

    /// Skips characters while `predicate` holds and returns the skipped text.
    pub fn consume_while(&mut self, mut predicate: impl FnMut(char) -> bool) -> String {
        let start = self.cursor;

        while self.current().is_some_and(&mut predicate) {
            self.cursor += 1;
        }

        self.text_between(start, self.cursor)
    }

    fn end(&self) -> isize {
        self.source.len() as isize
    }

    fn char_at(&self, pos: isize) -> Option<char> {
        usize::try_from(pos)
            .ok()
            .and_then(|idx| self.source.get(idx).copied())
    }

    /// Returns up to `len` characters starting at `start`, clipped to the
    /// source bounds.
    fn slice_clamped(&self, start: isize, len: usize) -> &[char] {
        let end = start.saturating_add_unsigned(len);
        let clamp = |pos: isize| pos.clamp(0, self.end()) as usize;

        &self.source[clamp(start)..clamp(end)]
    }

    fn window(&self, start: isize, needle: &str) -> &[char] {
        self.slice_clamped(start, needle.chars().count())
    }

    fn window_eq(window: &[char], needle: &str) -> bool {
        window.iter().copied().eq(needle.chars())
    }

    fn text(&self, start: isize, len: usize) -> String {
        self.slice_clamped(start, len).iter().collect()
    }

    fn text_between(&self, start: isize, end: isize) -> String {
        let len = usize::try_from(end.saturating_sub(start)).unwrap_or(0);

        self.text(start, len)
    }

    /// Finds the first occurrence of `needle` at or after `from`.
    fn find(&self, needle: &str, from: isize) -> Option<usize> {
        let needle = needle.chars().collect::<Vec<_>>();
        let from = from.clamp(0, self.end()) as usize;

        if needle.is_empty() {
            return Some(from);
        }

        self.source[from..]
            .windows(needle.len())
            .position(|window| window == needle.as_slice())
            .map(|idx| from + idx)
    }
}

impl From<&str> for Stream {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for Stream {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}
