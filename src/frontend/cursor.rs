use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    char_iterator: Peekable<CharIndices<'src>>,
}

impl<'src> Cursor<'src> {
    /// Creates a character stream for the source string.
    pub fn new(source: &'src str) -> Self {
        Cursor {
            source,
            char_iterator: source.char_indices().peekable(),
        }
    }

    /// Byte offset of the next character, or the source length at the end.
    pub fn offset(&mut self) -> usize {
        self.peek().map_or(self.source.len(), |(idx, _)| idx)
    }

    /// Source text between `start` and the current offset.
    pub fn slice_from(&mut self, start: usize) -> &'src str {
        let end = self.offset();
        &self.source[start..end]
    }

    /// Peeks the next character without consuming it.
    pub fn peek(&mut self) -> Option<(usize, char)> {
        self.char_iterator.peek().copied()
    }

    /// Peeks the next to next character without consuming it.
    pub fn peek_next(&mut self) -> Option<(usize, char)> {
        let mut temp_cursor = self.clone();
        temp_cursor.take();
        temp_cursor.peek()
    }

    /// Consumes the next character.
    pub fn take(&mut self) -> Option<(usize, char)> {
        self.char_iterator.next()
    }

    /// Consumes the next character if it equals target char.
    pub fn take_if(&mut self, target: char) -> bool {
        match self.peek() {
            Some((_, ch)) if ch == target => {
                self.take();
                true
            }
            _ => false,
        }
    }

    /// Consumes next characters as long as they meet condition.
    /// At the end, the next character fails condition.
    pub fn take_while<F>(&mut self, condition: F)
    where
        F: Fn(char) -> bool,
    {
        while let Some((_, ch)) = self.peek() {
            if !condition(ch) {
                break;
            }
            self.take();
        }
    }

    /// Consumes next characters as long as they do not meet condition.
    /// At the end, the next character meets condition.
    pub fn take_until<F>(&mut self, condition: F)
    where
        F: Fn(char) -> bool,
    {
        self.take_while(|ch| !condition(ch));
    }
}
