//! Collaborator seams consumed by the passage selector.
//!
//! Implementations live outside this workspace (storage, embedding model,
//! vector index). Errors are returned as `anyhow::Error` and propagated to the
//! caller unchanged.

use std::collections::HashMap;

use crate::types::{Candidate, ChunkId};

#[async_trait::async_trait]
pub trait QueryEmbedder: Send + Sync {
    async fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

#[async_trait::async_trait]
pub trait CandidateSearch: Send + Sync {
    /// Up to `limit` candidates ordered by descending `semantic_score`.
    async fn search_candidates(
        &self,
        query_vec: &[f32],
        limit: usize,
        translation: Option<&str>,
    ) -> anyhow::Result<Vec<Candidate>>;
}

#[async_trait::async_trait]
pub trait TextStore: Send + Sync {
    async fn fetch_text(&self, ids: &[ChunkId]) -> anyhow::Result<HashMap<ChunkId, String>>;
}

#[async_trait::async_trait]
pub trait LexicalSimilarity: Send + Sync {
    /// Similarity in `[0, 1]` per id. An unavailable backend should return an
    /// empty map; callers also treat `Err` that way.
    async fn lexical_similarity(
        &self,
        ids: &[ChunkId],
        query: &str,
    ) -> anyhow::Result<HashMap<ChunkId, f32>>;
}

#[async_trait::async_trait]
pub trait VerseStore: Send + Sync {
    async fn anchor_verse_text(
        &self,
        translation: Option<&str>,
        book_id: &str,
        chapter: u32,
        verse: u32,
    ) -> anyhow::Result<Option<String>>;
}
