// Domain models shared by the catalog, the stores and the delivery pipeline

use std::fmt;

/// A single verse reference. Chapters and verses are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl Position {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

/// A resolved verse, ready to be sent. Lives only for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub position: Position,
    pub reference: String,
    pub text: String,
    /// Reference and text composed into the outbound message body
    pub display: String,
}

impl Passage {
    pub fn new(position: Position, text: impl Into<String>) -> Self {
        let text = text.into();
        let reference = position.to_string();
        let display = format!("{} - {}", reference, text.trim());
        Self {
            position,
            reference,
            text,
            display,
        }
    }
}

/// Number of verses a subscriber receives per delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BatchSize(u8);

impl BatchSize {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Clamp any requested size into `MIN..=MAX`.
    pub fn clamped(requested: i64) -> Self {
        Self(requested.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_display() {
        assert_eq!(Position::new("John", 3, 16).to_string(), "John 3:16");
    }

    #[test]
    fn passage_composes_display() {
        let p = Passage::new(Position::new("Genesis", 1, 1), "In the beginning... ");
        assert_eq!(p.reference, "Genesis 1:1");
        assert_eq!(p.display, "Genesis 1:1 - In the beginning...");
    }

    #[test]
    fn batch_size_clamps() {
        assert_eq!(BatchSize::clamped(0).get(), 1);
        assert_eq!(BatchSize::clamped(-3).get(), 1);
        assert_eq!(BatchSize::clamped(3).get(), 3);
        assert_eq!(BatchSize::clamped(9).get(), 5);
        assert_eq!(BatchSize::default().get(), 1);
    }
}
