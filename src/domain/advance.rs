//! Traversal order over the catalog.
//!
//! [`advance`] is the only place that decides what comes after a position. It
//! is total: any input, including a book the catalog does not know, maps to a
//! position inside the catalog.

use crate::catalog::Catalog;
use crate::domain::models::Position;

pub fn advance(catalog: &Catalog, position: &Position) -> Position {
    let Some(chapters) = catalog.chapter_count(&position.book) else {
        return catalog.start();
    };

    if position.chapter < 1 || position.chapter > chapters {
        return Position::new(catalog.next_book(&position.book), 1, 1);
    }

    // chapter is in range, so the count exists
    let verses = catalog
        .verse_count(&position.book, position.chapter)
        .unwrap_or(0);

    if position.verse >= verses {
        if position.chapter == chapters {
            Position::new(catalog.next_book(&position.book), 1, 1)
        } else {
            Position::new(position.book.clone(), position.chapter + 1, 1)
        }
    } else {
        Position::new(position.book.clone(), position.chapter, position.verse + 1)
    }
}

/// Map a stored position onto the catalog. Positions that no longer exist
/// (catalog changed, bad data) move forward to the next valid one.
pub fn normalize(catalog: &Catalog, position: Position) -> Position {
    if catalog.contains(&position) {
        position
    } else {
        advance(catalog, &position)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::catalog::Book;

    fn catalog(books: &[(&str, &[u32])]) -> Catalog {
        Catalog::new(
            books
                .iter()
                .map(|(name, chapters)| Book::new(*name, chapters.to_vec()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn next_verse_in_chapter() {
        let c = catalog(&[("A", &[3, 2])]);
        assert_eq!(advance(&c, &Position::new("A", 1, 1)), Position::new("A", 1, 2));
    }

    #[test]
    fn last_verse_moves_to_next_chapter() {
        let c = catalog(&[("A", &[3, 2])]);
        assert_eq!(advance(&c, &Position::new("A", 1, 3)), Position::new("A", 2, 1));
    }

    #[test]
    fn last_chapter_moves_to_next_book_and_wraps() {
        let c = catalog(&[("A", &[2]), ("B", &[1])]);
        assert_eq!(advance(&c, &Position::new("A", 1, 2)), Position::new("B", 1, 1));
        assert_eq!(advance(&c, &Position::new("B", 1, 1)), Position::new("A", 1, 1));
    }

    #[test]
    fn unknown_book_restarts() {
        let c = Catalog::builtin().unwrap();
        assert_eq!(
            advance(&c, &Position::new("Nonexistent", 1, 1)),
            Position::new(c.first_book(), 1, 1)
        );
    }

    #[test]
    fn chapter_out_of_range_skips_book() {
        let c = catalog(&[("A", &[2]), ("B", &[1])]);
        assert_eq!(advance(&c, &Position::new("A", 7, 1)), Position::new("B", 1, 1));
        assert_eq!(advance(&c, &Position::new("A", 0, 1)), Position::new("B", 1, 1));
    }

    #[test]
    fn verse_past_end_is_treated_as_last() {
        let c = catalog(&[("A", &[2, 2])]);
        assert_eq!(advance(&c, &Position::new("A", 1, 9)), Position::new("A", 2, 1));
    }

    #[test]
    fn total_over_builtin() {
        let c = Catalog::builtin().unwrap();
        for book in c.books() {
            for (i, &verses) in book.chapters.iter().enumerate() {
                for verse in 1..=verses {
                    let next = advance(&c, &Position::new(book.name.clone(), i as u32 + 1, verse));
                    assert!(c.contains(&next), "{next} escaped the catalog");
                }
            }
        }
    }

    #[test]
    fn visits_every_verse_once_per_cycle() {
        let c = Catalog::builtin().unwrap();
        let start = c.start();
        let mut seen = HashSet::new();
        let mut pos = start.clone();
        loop {
            assert!(seen.insert(pos.clone()), "{pos} visited twice");
            pos = advance(&c, &pos);
            if pos == start {
                break;
            }
        }
        assert_eq!(seen.len() as u64, c.total_verses());
    }

    #[test]
    fn normalize_keeps_valid_and_repairs_invalid() {
        let c = catalog(&[("A", &[2]), ("B", &[1])]);
        assert_eq!(normalize(&c, Position::new("A", 1, 2)), Position::new("A", 1, 2));
        assert_eq!(normalize(&c, Position::new("A", 1, 0)), Position::new("A", 1, 1));
        assert_eq!(normalize(&c, Position::new("Gone", 4, 4)), Position::new("A", 1, 1));
    }
}
