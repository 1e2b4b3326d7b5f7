//! versedb-rank
//!
//! Keyword evidence extraction and mode-weighted score fusion. Both are pure and
//! synchronous; see `versedb-context` for the I/O side.
#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_imports)]

pub mod evidence;
pub mod rerank;

pub use evidence::{default_rules, load_rules, KeywordEvidenceEngine};
pub use rerank::ScoreFusionReranker;
