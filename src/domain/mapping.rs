// Mapping from lookup-service DTOs to domain models

use super::models::{Passage, Position};
use crate::bible_client::VerseResponse;
use crate::delivery::ContentError;

/// Build a passage for `requested` from the service response. The reference is
/// always taken from the catalog position, so cursor and message agree even
/// when the service spells the book differently.
pub fn map_verse_to_passage(
    requested: &Position,
    verse: &VerseResponse,
) -> Result<Passage, ContentError> {
    let text = verse
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ContentError::Malformed(format!("no text for {requested}")))?;

    if let Some(chapter) = verse.chapter
        && chapter != requested.chapter
    {
        return Err(ContentError::Malformed(format!(
            "asked for {requested}, got chapter {chapter}"
        )));
    }
    let number = verse.number.or(verse.verse_number);
    if let Some(number) = number
        && number != requested.verse
    {
        return Err(ContentError::Malformed(format!(
            "asked for {requested}, got verse {number}"
        )));
    }

    Ok(Passage::new(requested.clone(), text))
}
