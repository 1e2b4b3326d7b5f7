//! Domain types shared by the ranking and context-assembly crates.
//!
//! All of these are created per request and treated as read-only once built.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub type ChunkId = String;

/// A passage returned by the external semantic search, prior to reranking.
///
/// - `chunk_id`: unique identifier of the indexed chunk
/// - `ref_start`/`ref_end`: human-readable references of the first and last verse
/// - `semantic_score`: similarity reported by the search, higher is better
/// - `text`: passage text; may be empty until the text store fills it in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub chunk_id: ChunkId,
    pub translation: String,
    pub book_id: String,
    pub chapter: u32,
    pub verse_start: u32,
    pub verse_end: u32,
    pub ref_start: String,
    pub ref_end: String,
    pub semantic_score: f32,
    #[serde(default)]
    pub text: String,
}

impl Candidate {
    pub fn is_single_verse(&self) -> bool {
        self.verse_start == self.verse_end
    }

    /// `"<ref_start>"` for a single verse, `"<ref_start> - <ref_end>"` otherwise.
    pub fn display_ref(&self) -> String {
        if self.is_single_verse() {
            self.ref_start.clone()
        } else {
            format!("{} - {}", self.ref_start, self.ref_end)
        }
    }
}

/// A static keyword rule: when any trigger appears in the query, every hit term
/// found in the passage text contributes `weight` to the evidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub triggers: Vec<String>,
    pub hits: Vec<String>,
    pub weight: f32,
}

impl KeywordRule {
    pub fn new(triggers: &[&str], hits: &[&str], weight: f32) -> Self {
        Self {
            triggers: triggers.iter().map(|s| (*s).to_string()).collect(),
            hits: hits.iter().map(|s| (*s).to_string()).collect(),
            weight,
        }
    }
}

/// Lexical evidence gathered for one passage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Matched hit terms in first-seen order, no duplicates.
    pub keyword_hits: Vec<String>,
    pub score: f32,
    pub notes: Vec<String>,
}

impl Evidence {
    pub fn is_empty(&self) -> bool {
        self.keyword_hits.is_empty() && self.notes.is_empty() && self.score == 0.0
    }
}

/// Semantic/evidence weight pair applied by the fusion step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub semantic: f32,
    pub evidence: f32,
}

impl Weights {
    pub const fn new(semantic: f32, evidence: f32) -> Self {
        Self { semantic, evidence }
    }

    pub fn fuse(&self, semantic_score: f32, evidence_score: f32) -> f32 {
        self.semantic * semantic_score + self.evidence * evidence_score
    }
}

/// Ranking profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Broad, semantic-first.
    #[default]
    Explorer,
    /// Precision-oriented; lexical similarity participates.
    Exact,
}

impl Mode {
    pub const fn default_weights(self) -> Weights {
        match self {
            Mode::Explorer => Weights::new(0.85, 0.15),
            Mode::Exact => Weights::new(0.55, 0.45),
        }
    }

    pub const fn uses_lexical_similarity(self) -> bool {
        matches!(self, Mode::Exact)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Explorer => "explorer",
            Mode::Exact => "exact",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "explorer" => Ok(Mode::Explorer),
            "exact" => Ok(Mode::Exact),
            other => Err(Error::InvalidConfig(format!("unknown mode '{other}'"))),
        }
    }
}

/// A candidate after score fusion.
///
/// `final_score = weights(mode).fuse(semantic_score, evidence_score)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankResult {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub evidence_score: f32,
    pub final_score: f32,
    pub evidence: Evidence,
}

impl RerankResult {
    pub fn chunk_id(&self) -> &str {
        &self.candidate.chunk_id
    }

    pub fn semantic_score(&self) -> f32 {
        self.candidate.semantic_score
    }
}

/// Where a passage in the assembled context came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassageSource {
    /// The anchor verse at the reader's location.
    Verse,
    /// A reranked search candidate.
    Chunk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    #[serde(rename = "ref")]
    pub reference: String,
    pub source: PassageSource,
    pub snippet: String,
    pub book_id: String,
    pub chapter: u32,
    pub verse_start: u32,
    pub verse_end: u32,
}

impl Passage {
    /// Anchor passage for `<BOOK> <CHAPTER>:<VERSE>`.
    pub fn anchor(book_id: &str, chapter: u32, verse: u32, text: String) -> Self {
        Self {
            reference: format!("{book_id} {chapter}:{verse}"),
            source: PassageSource::Verse,
            snippet: text,
            book_id: book_id.to_string(),
            chapter,
            verse_start: verse,
            verse_end: verse,
        }
    }

    pub fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            reference: candidate.display_ref(),
            source: PassageSource::Chunk,
            snippet: candidate.text.clone(),
            book_id: candidate.book_id.clone(),
            chapter: candidate.chapter,
            verse_start: candidate.verse_start,
            verse_end: candidate.verse_end,
        }
    }
}

/// A neighbouring chapter. `chapter: None` marks a neighbour in another book,
/// left for the caller to resolve: the final chapter of `book_id` for `prev`,
/// chapter 1 for `next` (see `Canon::resolve`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavRef {
    pub book_id: String,
    pub chapter: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterNav {
    pub prev: Option<NavRef>,
    pub next: Option<NavRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(verse_start: u32, verse_end: u32) -> Candidate {
        Candidate {
            chunk_id: "c1".into(),
            translation: "KJV".into(),
            book_id: "JHN".into(),
            chapter: 3,
            verse_start,
            verse_end,
            ref_start: format!("JHN 3:{verse_start}"),
            ref_end: format!("JHN 3:{verse_end}"),
            semantic_score: 0.5,
            text: "text".into(),
        }
    }

    #[test]
    fn display_ref_single_and_range() {
        assert_eq!(candidate(16, 16).display_ref(), "JHN 3:16");
        assert_eq!(candidate(16, 18).display_ref(), "JHN 3:16 - JHN 3:18");
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("EXACT".parse::<Mode>().expect("mode"), Mode::Exact);
        assert_eq!(" explorer ".parse::<Mode>().expect("mode"), Mode::Explorer);
        assert!("fuzzy".parse::<Mode>().is_err());
    }

    #[test]
    fn mode_default_weights_differ() {
        assert_ne!(Mode::Explorer.default_weights(), Mode::Exact.default_weights());
    }

    #[test]
    fn passage_serializes_ref_and_lowercase_source() {
        let p = Passage::anchor("JHN", 3, 16, "For God so loved".into());
        let v = serde_json::to_value(&p).expect("json");
        assert_eq!(v["ref"], "JHN 3:16");
        assert_eq!(v["source"], "verse");
        assert_eq!(v["verse_start"], 16);
        assert_eq!(v["verse_end"], 16);
    }
}
