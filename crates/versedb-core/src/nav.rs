//! Previous/next chapter navigation over a [`Canon`].
//!
//! Pure boundary arithmetic: crossing into the previous book yields
//! `chapter: None` ("last chapter, resolve later"); crossing into the next book
//! also yields `chapter: None` and is chapter 1 once resolved.

use crate::canon::Canon;
use crate::error::Result;
use crate::types::{ChapterNav, NavRef};

impl Canon {
    /// Neighbours of `book`/`chapter`, where `max_chapter` is the last chapter of `book`.
    ///
    /// A book missing from the canon has no cross-book neighbours.
    pub fn compute_nav(&self, book_id: &str, chapter: u32, max_chapter: u32) -> ChapterNav {
        let pos = self.position(book_id);

        let prev = if chapter > 1 {
            Some(NavRef { book_id: book_id.to_string(), chapter: Some(chapter - 1) })
        } else {
            pos.and_then(|i| i.checked_sub(1))
                .map(|i| NavRef { book_id: self.books()[i].id.clone(), chapter: None })
        };

        let next = if chapter < max_chapter {
            Some(NavRef { book_id: book_id.to_string(), chapter: Some(chapter + 1) })
        } else {
            pos.and_then(|i| self.books().get(i + 1))
                .map(|b| NavRef { book_id: b.id.clone(), chapter: None })
        };

        ChapterNav { prev, next }
    }

    /// [`Canon::compute_nav`] using this canon's own chapter count for `book_id`.
    pub fn nav(&self, book_id: &str, chapter: u32) -> Result<ChapterNav> {
        let max_chapter = self.chapter_count(book_id)?;
        Ok(self.compute_nav(book_id, chapter, max_chapter))
    }

    /// Fill in a lazy cross-book reference produced by [`Canon::compute_nav`].
    ///
    /// `forward` selects chapter 1 (next book) instead of the final chapter
    /// (previous book). Explicit chapters pass through untouched.
    pub fn resolve(&self, nav: &NavRef, forward: bool) -> Result<NavRef> {
        if nav.chapter.is_some() {
            return Ok(nav.clone());
        }
        let book = self.book(&nav.book_id)?;
        let chapter = if forward { 1 } else { book.chapters };
        Ok(NavRef { book_id: book.id.clone(), chapter: Some(chapter) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::BookInfo;

    fn tiny() -> Canon {
        Canon::new(vec![
            BookInfo { id: "A".into(), name: "Alpha".into(), chapters: 3 },
            BookInfo { id: "B".into(), name: "Beta".into(), chapters: 50 },
            BookInfo { id: "C".into(), name: "Gamma".into(), chapters: 2 },
        ])
    }

    #[test]
    fn first_book_first_chapter_has_no_prev() {
        let nav = tiny().compute_nav("A", 1, 3);
        assert_eq!(nav.prev, None);
        assert_eq!(nav.next, Some(NavRef { book_id: "A".into(), chapter: Some(2) }));
    }

    #[test]
    fn last_book_last_chapter_has_no_next() {
        let nav = tiny().compute_nav("C", 2, 2);
        assert_eq!(nav.next, None);
        assert_eq!(nav.prev, Some(NavRef { book_id: "C".into(), chapter: Some(1) }));
    }

    #[test]
    fn book_boundaries_are_lazy() {
        let canon = tiny();
        let nav = canon.compute_nav("B", 1, 50);
        assert_eq!(nav.prev, Some(NavRef { book_id: "A".into(), chapter: None }));
        let nav = canon.compute_nav("B", 50, 50);
        assert_eq!(nav.next, Some(NavRef { book_id: "C".into(), chapter: None }));
    }

    #[test]
    fn mid_book_steps_by_one() {
        let nav = tiny().compute_nav("B", 25, 50);
        assert_eq!(nav.prev, Some(NavRef { book_id: "B".into(), chapter: Some(24) }));
        assert_eq!(nav.next, Some(NavRef { book_id: "B".into(), chapter: Some(26) }));
    }

    #[test]
    fn unknown_book_has_no_cross_book_neighbours() {
        let nav = tiny().compute_nav("Z", 1, 1);
        assert_eq!(nav, ChapterNav::default());
    }

    #[test]
    fn resolve_fills_lazy_chapter() {
        let canon = tiny();
        let prev = NavRef { book_id: "A".into(), chapter: None };
        assert_eq!(canon.resolve(&prev, false).expect("resolve").chapter, Some(3));
        let next = NavRef { book_id: "C".into(), chapter: None };
        assert_eq!(canon.resolve(&next, true).expect("resolve").chapter, Some(1));
        let fixed = NavRef { book_id: "B".into(), chapter: Some(7) };
        assert_eq!(canon.resolve(&fixed, false).expect("resolve"), fixed);
    }
}
