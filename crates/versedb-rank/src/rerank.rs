//! Score fusion over semantic candidates.
//!
//! `final_score = w_sem(mode) * semantic_score + w_ev(mode) * evidence_score`.
//! In exact mode a lexical-similarity value, when supplied for a chunk, is added
//! to its evidence score scaled by `trigram_weight`. Explorer mode ignores it.

use std::collections::HashMap;

use versedb_core::config::FusionConfig;
use versedb_core::types::{Candidate, ChunkId, Mode, RerankResult};

use crate::evidence::KeywordEvidenceEngine;

#[derive(Clone, Default)]
pub struct ScoreFusionReranker {
    engine: KeywordEvidenceEngine,
    fusion: FusionConfig,
}

impl ScoreFusionReranker {
    pub fn new(engine: KeywordEvidenceEngine, fusion: FusionConfig) -> Self {
        Self { engine, fusion }
    }

    pub fn fusion(&self) -> &FusionConfig {
        &self.fusion
    }

    /// Rerank `candidates` for `query`. The output is a permutation of the input
    /// sorted by `final_score` descending; ties keep input order.
    ///
    /// # Panics
    /// If a candidate has an empty `chunk_id`.
    pub fn rerank(
        &self,
        candidates: Vec<Candidate>,
        query: &str,
        mode: Mode,
        trigram_scores: Option<&HashMap<ChunkId, f32>>,
    ) -> Vec<RerankResult> {
        if candidates.is_empty() {
            return Vec::new();
        }
        let weights = self.fusion.weights(mode);
        let trigram_scores = trigram_scores.filter(|_| mode.uses_lexical_similarity());

        let mut results: Vec<RerankResult> = candidates
            .into_iter()
            .map(|candidate| {
                assert!(!candidate.chunk_id.is_empty(), "candidate without chunk_id");
                let mut evidence = self.engine.evaluate(query, &candidate.text);
                let mut evidence_score = evidence.score;

                if let Some(&similarity) = trigram_scores.and_then(|m| m.get(&candidate.chunk_id)) {
                    let similarity = finite_or_zero(similarity).clamp(0.0, 1.0);
                    let contribution = self.fusion.trigram_weight * similarity;
                    evidence_score += contribution;
                    evidence
                        .notes
                        .push(format!("trigram similarity {similarity:.2} (+{contribution:.2})"));
                }

                let final_score = weights.fuse(finite_or_zero(candidate.semantic_score), evidence_score);
                RerankResult { candidate, evidence_score, final_score, evidence }
            })
            .collect();

        // Vec::sort_by is stable
        results.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        results
    }
}

/// NaN and infinities from upstream scorers count as no signal.
fn finite_or_zero(score: f32) -> f32 {
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use versedb_core::types::{KeywordRule, Weights};

    fn candidate(id: &str, semantic: f32, text: &str) -> Candidate {
        Candidate {
            chunk_id: id.into(),
            translation: "KJV".into(),
            book_id: "PSA".into(),
            chapter: 23,
            verse_start: 1,
            verse_end: 1,
            ref_start: "PSA 23:1".into(),
            ref_end: "PSA 23:1".into(),
            semantic_score: semantic,
            text: text.into(),
        }
    }

    fn reranker() -> ScoreFusionReranker {
        let engine = KeywordEvidenceEngine::new(&[KeywordRule::new(&["peace"], &["peace"], 0.5)]);
        ScoreFusionReranker::new(engine, FusionConfig::default())
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(reranker().rerank(Vec::new(), "peace", Mode::Exact, None).is_empty());
    }

    #[test]
    fn final_score_uses_mode_weights() {
        let r = reranker();
        let out = r.rerank(vec![candidate("a", 0.6, "peace be still")], "peace", Mode::Explorer, None);
        let w: Weights = FusionConfig::default().explorer;
        assert!((out[0].evidence_score - 0.5).abs() < 1e-6);
        assert!((out[0].final_score - (w.semantic * 0.6 + w.evidence * 0.5)).abs() < 1e-6);
    }

    #[test]
    fn evidence_can_overtake_semantic_order() {
        let r = reranker();
        let out = r.rerank(
            vec![candidate("plain", 0.70, "the lord is my shepherd"), candidate("peace", 0.60, "my peace I give")],
            "where do I find peace",
            Mode::Exact,
            None,
        );
        assert_eq!(out[0].chunk_id(), "peace");
        assert_eq!(out[1].chunk_id(), "plain");
    }

    #[test]
    fn ties_keep_input_order() {
        let r = reranker();
        let out = r.rerank(
            vec![candidate("x", 0.5, "same"), candidate("y", 0.5, "same"), candidate("z", 0.5, "same")],
            "nothing",
            Mode::Explorer,
            None,
        );
        let ids: Vec<&str> = out.iter().map(RerankResult::chunk_id).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn trigram_only_counts_in_exact_mode() {
        let r = reranker();
        let trigram = HashMap::from([("a".to_string(), 0.8_f32)]);

        let exact = r.rerank(vec![candidate("a", 0.5, "text")], "q", Mode::Exact, Some(&trigram));
        assert!((exact[0].evidence_score - 0.4).abs() < 1e-6);
        assert_eq!(exact[0].evidence.notes, vec!["trigram similarity 0.80 (+0.40)".to_string()]);

        let explorer = r.rerank(vec![candidate("a", 0.5, "text")], "q", Mode::Explorer, Some(&trigram));
        assert!(explorer[0].evidence_score.abs() < 1e-6);
        assert!(explorer[0].evidence.notes.is_empty());
    }

    #[test]
    fn missing_trigram_entry_leaves_evidence_unchanged() {
        let r = reranker();
        let trigram = HashMap::from([("other".to_string(), 0.9_f32)]);
        let out = r.rerank(vec![candidate("a", 0.5, "text")], "q", Mode::Exact, Some(&trigram));
        assert!(out[0].evidence_score.abs() < 1e-6);
    }

    #[test]
    fn non_finite_scores_rank_as_zero() {
        let r = reranker();
        let candidates: Vec<Candidate> = (0..64)
            .map(|i| {
                let semantic = if i % 7 == 0 { f32::NAN } else { 1.0 - i as f32 / 100.0 };
                candidate(&format!("c{i}"), semantic, "text")
            })
            .collect();
        let out = r.rerank(candidates, "q", Mode::Explorer, None);

        assert_eq!(out.len(), 64);
        assert!(out.iter().all(|res| res.final_score.is_finite()));
        for pair in out.windows(2) {
            assert!(pair[0].final_score >= pair[1].final_score, "sorted descending");
        }
        assert_eq!(out[0].chunk_id(), "c1");
        let tail: Vec<&str> = out[54..].iter().map(RerankResult::chunk_id).collect();
        assert_eq!(tail, vec!["c0", "c7", "c14", "c21", "c28", "c35", "c42", "c49", "c56", "c63"]);
        assert!(out[54..].iter().all(|res| res.semantic_score().is_nan() && res.final_score.abs() < 1e-9));
    }

    #[test]
    fn nan_trigram_similarity_adds_nothing() {
        let r = reranker();
        let trigram = HashMap::from([("a".to_string(), f32::NAN), ("b".to_string(), f32::INFINITY)]);
        let out = r.rerank(
            vec![candidate("a", 0.5, "text"), candidate("b", 0.4, "text")],
            "q",
            Mode::Exact,
            Some(&trigram),
        );
        let ids: Vec<&str> = out.iter().map(RerankResult::chunk_id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(out.iter().all(|res| res.evidence_score.abs() < 1e-6));
        assert_eq!(out[0].evidence.notes, vec!["trigram similarity 0.00 (+0.00)".to_string()]);
    }

    #[test]
    #[should_panic(expected = "candidate without chunk_id")]
    fn empty_chunk_id_panics() {
        reranker().rerank(vec![candidate("", 0.5, "text")], "q", Mode::Explorer, None);
    }
}
