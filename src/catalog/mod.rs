//! Corpus structure: ordered books, each with the verse count of every chapter.
//!
//! The catalog is built once at startup, either from the built-in table or from
//! a YAML document supplied by the operator, and never changes afterwards.

mod builtin;

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::models::Position;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no books")]
    Empty,
    #[error("book name must not be empty (index {0})")]
    BlankName(usize),
    #[error("duplicate book name: {0}")]
    DuplicateBook(String),
    #[error("book {0} has no chapters")]
    NoChapters(String),
    #[error("book {book} chapter {chapter} has no verses")]
    EmptyChapter { book: String, chapter: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Book {
    pub name: String,
    /// `chapters[i]` is the verse count of chapter `i + 1`
    pub chapters: Vec<u32>,
}

impl Book {
    pub fn new(name: impl Into<String>, chapters: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            chapters,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    books: Vec<Book>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<Book>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, checking that every book has chapters and every chapter has verses.
    pub fn new(books: Vec<Book>) -> Result<Self, CatalogError> {
        if books.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut index = HashMap::with_capacity(books.len());
        for (i, book) in books.iter().enumerate() {
            if book.name.trim().is_empty() {
                return Err(CatalogError::BlankName(i));
            }
            if book.chapters.is_empty() {
                return Err(CatalogError::NoChapters(book.name.clone()));
            }
            if let Some(pos) = book.chapters.iter().position(|&verses| verses == 0) {
                return Err(CatalogError::EmptyChapter {
                    book: book.name.clone(),
                    chapter: pos as u32 + 1,
                });
            }
            if index.insert(book.name.clone(), i).is_some() {
                return Err(CatalogError::DuplicateBook(book.name.clone()));
            }
        }
        Ok(Self { books, index })
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(builtin::books())
    }

    pub fn from_yaml_str(doc: &str) -> anyhow::Result<Self> {
        let parsed: CatalogDocument =
            serde_yml::from_str(doc).context("Failed to parse catalog YAML")?;
        Ok(Self::new(parsed.books)?)
    }

    /// Load from `path` when given, otherwise fall back to the built-in table.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            tracing::info!("using built-in catalog");
            return Ok(Self::builtin()?);
        };
        let doc = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let catalog = Self::from_yaml_str(&doc)?;
        tracing::info!(path = %path.display(), books = catalog.books.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    fn book(&self, name: &str) -> Option<&Book> {
        self.index.get(name).map(|&i| &self.books[i])
    }

    pub fn chapter_count(&self, book: &str) -> Option<u32> {
        self.book(book).map(|b| b.chapters.len() as u32)
    }

    pub fn verse_count(&self, book: &str, chapter: u32) -> Option<u32> {
        let book = self.book(book)?;
        let idx = chapter.checked_sub(1)? as usize;
        book.chapters.get(idx).copied()
    }

    pub fn first_book(&self) -> &str {
        &self.books[0].name
    }

    /// Book following `book`, wrapping from the last book to the first.
    /// Unknown names map to the first book.
    pub fn next_book(&self, book: &str) -> &str {
        match self.index.get(book) {
            Some(&i) => &self.books[(i + 1) % self.books.len()].name,
            None => self.first_book(),
        }
    }

    pub fn start(&self) -> Position {
        Position::new(self.first_book(), 1, 1)
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.verse_count(&position.book, position.chapter)
            .is_some_and(|count| position.verse >= 1 && position.verse <= count)
    }

    pub fn total_verses(&self) -> u64 {
        self.books
            .iter()
            .flat_map(|b| b.chapters.iter())
            .map(|&v| u64::from(v))
            .sum()
    }
}
