//! Canonical, ordered book list with per-book chapter counts.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInfo {
    pub id: String,
    pub name: String,
    pub chapters: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canon {
    books: Vec<BookInfo>,
}

// (USFM id, name, chapters)
const PROTESTANT: &[(&str, &str, u32)] = &[
    ("GEN", "Genesis", 50),
    ("EXO", "Exodus", 40),
    ("LEV", "Leviticus", 27),
    ("NUM", "Numbers", 36),
    ("DEU", "Deuteronomy", 34),
    ("JOS", "Joshua", 24),
    ("JDG", "Judges", 21),
    ("RUT", "Ruth", 4),
    ("1SA", "1 Samuel", 31),
    ("2SA", "2 Samuel", 24),
    ("1KI", "1 Kings", 22),
    ("2KI", "2 Kings", 25),
    ("1CH", "1 Chronicles", 29),
    ("2CH", "2 Chronicles", 36),
    ("EZR", "Ezra", 10),
    ("NEH", "Nehemiah", 13),
    ("EST", "Esther", 10),
    ("JOB", "Job", 42),
    ("PSA", "Psalms", 150),
    ("PRO", "Proverbs", 31),
    ("ECC", "Ecclesiastes", 12),
    ("SNG", "Song of Songs", 8),
    ("ISA", "Isaiah", 66),
    ("JER", "Jeremiah", 52),
    ("LAM", "Lamentations", 5),
    ("EZK", "Ezekiel", 48),
    ("DAN", "Daniel", 12),
    ("HOS", "Hosea", 14),
    ("JOL", "Joel", 3),
    ("AMO", "Amos", 9),
    ("OBA", "Obadiah", 1),
    ("JON", "Jonah", 4),
    ("MIC", "Micah", 7),
    ("NAM", "Nahum", 3),
    ("HAB", "Habakkuk", 3),
    ("ZEP", "Zephaniah", 3),
    ("HAG", "Haggai", 2),
    ("ZEC", "Zechariah", 14),
    ("MAL", "Malachi", 4),
    ("MAT", "Matthew", 28),
    ("MRK", "Mark", 16),
    ("LUK", "Luke", 24),
    ("JHN", "John", 21),
    ("ACT", "Acts", 28),
    ("ROM", "Romans", 16),
    ("1CO", "1 Corinthians", 16),
    ("2CO", "2 Corinthians", 13),
    ("GAL", "Galatians", 6),
    ("EPH", "Ephesians", 6),
    ("PHP", "Philippians", 4),
    ("COL", "Colossians", 4),
    ("1TH", "1 Thessalonians", 5),
    ("2TH", "2 Thessalonians", 3),
    ("1TI", "1 Timothy", 6),
    ("2TI", "2 Timothy", 4),
    ("TIT", "Titus", 3),
    ("PHM", "Philemon", 1),
    ("HEB", "Hebrews", 13),
    ("JAS", "James", 5),
    ("1PE", "1 Peter", 5),
    ("2PE", "2 Peter", 3),
    ("1JN", "1 John", 5),
    ("2JN", "2 John", 1),
    ("3JN", "3 John", 1),
    ("JUD", "Jude", 1),
    ("REV", "Revelation", 22),
];

static PROTESTANT_CANON: LazyLock<Canon> = LazyLock::new(|| {
    Canon::new(
        PROTESTANT
            .iter()
            .map(|(id, name, chapters)| BookInfo { id: (*id).to_string(), name: (*name).to_string(), chapters: *chapters })
            .collect(),
    )
});

impl Canon {
    pub fn new(books: Vec<BookInfo>) -> Self { Self { books } }

    /// The 66-book Protestant canon keyed by USFM book ids.
    pub fn protestant() -> &'static Canon { &PROTESTANT_CANON }

    pub fn books(&self) -> &[BookInfo] { &self.books }

    pub fn position(&self, book_id: &str) -> Option<usize> {
        self.books.iter().position(|b| b.id.eq_ignore_ascii_case(book_id))
    }

    pub fn book(&self, book_id: &str) -> Result<&BookInfo> {
        self.position(book_id)
            .map(|i| &self.books[i])
            .ok_or_else(|| Error::NotFound { kind: "book", id: book_id.to_string() })
    }

    pub fn chapter_count(&self, book_id: &str) -> Result<u32> { self.book(book_id).map(|b| b.chapters) }

    pub fn first(&self) -> Option<&BookInfo> { self.books.first() }

    pub fn last(&self) -> Option<&BookInfo> { self.books.last() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protestant_canon_shape() {
        let canon = Canon::protestant();
        assert_eq!(canon.books().len(), 66);
        let total: u32 = canon.books().iter().map(|b| b.chapters).sum();
        assert_eq!(total, 1189, "total chapter count");
        assert_eq!(canon.first().map(|b| b.id.as_str()), Some("GEN"));
        assert_eq!(canon.last().map(|b| b.id.as_str()), Some("REV"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let canon = Canon::protestant();
        assert_eq!(canon.chapter_count("psa").expect("psalms"), 150);
        assert!(matches!(canon.book("XYZ"), Err(Error::NotFound { kind: "book", .. })));
    }
}
