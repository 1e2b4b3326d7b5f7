use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use versedb_core::config::{RetrievalConfig, DEFAULT_PASSAGE_CAP};
use versedb_core::traits::{CandidateSearch, LexicalSimilarity, QueryEmbedder, TextStore, VerseStore};
use versedb_core::types::{Candidate, ChunkId, Mode, Passage, RerankResult};
use versedb_rank::{KeywordEvidenceEngine, ScoreFusionReranker};

/// External services the selector talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub verses: Arc<dyn VerseStore>,
    pub embedder: Arc<dyn QueryEmbedder>,
    pub search: Arc<dyn CandidateSearch>,
    pub texts: Arc<dyn TextStore>,
    pub lexical: Arc<dyn LexicalSimilarity>,
}

#[derive(Debug, Clone)]
pub struct AssembleRequest {
    pub question: String,
    /// Restricts anchor lookup and search; `None` searches every translation.
    pub translation: Option<String>,
    pub book_id: String,
    pub chapter: u32,
    pub verse: u32,
    /// Candidate limit; `None` falls back to `RetrievalConfig::default_candidates`.
    pub k_passages: Option<usize>,
    pub mode: Mode,
}

pub struct PassageSelector {
    services: Collaborators,
    reranker: ScoreFusionReranker,
    config: RetrievalConfig,
}

impl PassageSelector {
    pub fn new(services: Collaborators, reranker: ScoreFusionReranker, config: RetrievalConfig) -> Self {
        Self { services, reranker, config }
    }

    /// Build the reranker from `config`, loading the keyword rule file when one
    /// is configured (relative paths resolve against `base_dir`).
    pub fn from_config(services: Collaborators, config: RetrievalConfig, base_dir: &Path) -> Result<Self> {
        config.validate()?;
        let engine = match config.keyword_rules_file(base_dir) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading keyword rules");
                KeywordEvidenceEngine::from_rules_file(&path)?
            }
            None => KeywordEvidenceEngine::default(),
        };
        let reranker = ScoreFusionReranker::new(engine, config.fusion);
        Ok(Self::new(services, reranker, config))
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Ordered, de-duplicated passages for `req`: the anchor verse first when it
    /// resolves, then reranked chunks, never more than `passage_cap` in total.
    pub async fn assemble(&self, req: &AssembleRequest) -> Result<Vec<Passage>> {
        let k = req.k_passages.unwrap_or(self.config.default_candidates);
        let translation = req.translation.as_deref();

        let (anchor_text, candidates) = futures::try_join!(
            self.services.verses.anchor_verse_text(translation, &req.book_id, req.chapter, req.verse),
            self.retrieve(&req.question, k, translation),
        )?;
        let anchor = anchor_text.map(|text| Passage::anchor(&req.book_id, req.chapter, req.verse, text));
        if anchor.is_none() {
            tracing::debug!(book = %req.book_id, chapter = req.chapter, verse = req.verse, "anchor verse not found");
        }

        let ranked = self.rank(candidates, &req.question, req.mode).await?;
        let passages = select_passages(anchor, &ranked, k, self.config.passage_cap);
        tracing::debug!(ranked = ranked.len(), selected = passages.len(), mode = %req.mode, "passages assembled");
        Ok(passages)
    }

    async fn retrieve(&self, question: &str, k: usize, translation: Option<&str>) -> Result<Vec<Candidate>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let query_vec = self.services.embedder.embed_query(question).await?;
        let candidates = self.services.search.search_candidates(&query_vec, k, translation).await?;
        tracing::debug!(k, retrieved = candidates.len(), "candidates retrieved");
        Ok(candidates)
    }

    async fn rank(&self, mut candidates: Vec<Candidate>, question: &str, mode: Mode) -> Result<Vec<RerankResult>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<ChunkId> = candidates.iter().map(|c| c.chunk_id.clone()).collect();
        let (texts, lexical) = futures::join!(
            self.services.texts.fetch_text(&ids),
            self.lexical_scores(&ids, question, mode),
        );
        let mut texts = texts?;
        tracing::debug!(requested = ids.len(), fetched = texts.len(), "candidate texts fetched");
        for c in &mut candidates {
            if let Some(text) = texts.remove(&c.chunk_id) {
                c.text = text;
            }
        }
        Ok(self.reranker.rerank(candidates, question, mode, lexical.as_ref()))
    }

    /// Exact mode only. An unavailable backend degrades to an empty map.
    async fn lexical_scores(&self, ids: &[ChunkId], question: &str, mode: Mode) -> Option<HashMap<ChunkId, f32>> {
        if !mode.uses_lexical_similarity() {
            return None;
        }
        match self.services.lexical.lexical_similarity(ids, question).await {
            Ok(scores) => Some(scores),
            Err(e) => {
                tracing::warn!(error = %e, "lexical similarity unavailable, ranking without it");
                Some(HashMap::new())
            }
        }
    }
}

/// Anchor first, then ranked chunks in order until `min(k, cap)` passages.
/// `cap` is itself bounded by [`DEFAULT_PASSAGE_CAP`].
///
/// A chunk is dropped as a duplicate only when it is exactly the anchor's single
/// verse; chunks spanning the anchor plus neighbours are kept.
pub fn select_passages(anchor: Option<Passage>, ranked: &[RerankResult], k: usize, cap: usize) -> Vec<Passage> {
    let limit = k.min(cap).min(DEFAULT_PASSAGE_CAP);
    let mut out = Vec::with_capacity(limit + 1);
    let has_anchor = anchor.is_some();
    out.extend(anchor);
    for r in ranked {
        if out.len() >= limit {
            break;
        }
        if has_anchor && is_anchor_verse(&r.candidate, &out[0]) {
            continue;
        }
        out.push(Passage::from_candidate(&r.candidate));
    }
    out
}

fn is_anchor_verse(c: &Candidate, anchor: &Passage) -> bool {
    c.book_id.eq_ignore_ascii_case(&anchor.book_id)
        && c.chapter == anchor.chapter
        && c.verse_start == anchor.verse_start
        && c.verse_end == anchor.verse_start
}
