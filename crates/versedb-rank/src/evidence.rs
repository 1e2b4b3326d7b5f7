//! Keyword evidence: rule-driven lexical signal for a (query, passage) pair.
//!
//! A rule fires when one of its trigger terms occurs in the query. Each of its
//! hit terms found in the passage adds the rule weight to the score. Matching is
//! case-insensitive and respects word boundaries; multi-word terms match as
//! phrases.

use std::fs;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use versedb_core::error::{Error, Result};
use versedb_core::types::{Evidence, KeywordRule};

static DEFAULT_RULES: LazyLock<Arc<[KeywordRule]>> = LazyLock::new(|| {
    vec![
        KeywordRule::new(
            &["love", "loves", "loved", "loving", "beloved"],
            &["love", "loved", "loveth", "beloved", "charity"],
            0.12,
        ),
        KeywordRule::new(
            &["faith", "believe", "believes", "believed", "believing", "belief", "trust", "trusting"],
            &["faith", "believe", "believed", "believeth", "trust"],
            0.12,
        ),
        KeywordRule::new(
            &["forgive", "forgives", "forgiving", "forgave", "forgiveness", "forgiven", "pardon"],
            &["forgive", "forgiven", "forgiveness", "forgave", "pardon", "remission"],
            0.15,
        ),
        KeywordRule::new(
            &["pray", "prays", "prayed", "praying", "prayer", "prayers"],
            &["pray", "prayer", "prayed", "supplication"],
            0.10,
        ),
        KeywordRule::new(
            &["fear", "fears", "afraid", "anxious", "anxiety", "worry", "worries", "worried", "worrying"],
            &["fear not", "be not afraid", "afraid", "fear", "anxious", "careful for nothing"],
            0.12,
        ),
        KeywordRule::new(&["peace"], &["peace", "rest", "quiet"], 0.10),
        KeywordRule::new(
            &["joy", "joyful", "rejoice", "rejoicing", "happy"],
            &["joy", "rejoice", "rejoiced", "gladness", "glad"],
            0.10,
        ),
        KeywordRule::new(&["hope", "hopes", "hoping"], &["hope", "hoped", "wait upon", "expectation"], 0.10),
        KeywordRule::new(&["wisdom", "wise"], &["wisdom", "wise", "understanding", "knowledge"], 0.10),
        KeywordRule::new(
            &["salvation", "save", "saved", "saving", "eternal life"],
            &["salvation", "saved", "save", "everlasting life", "eternal life"],
            0.15,
        ),
        KeywordRule::new(&["grace", "gracious", "mercy", "merciful"], &["grace", "mercy", "merciful", "compassion"], 0.12),
        KeywordRule::new(
            &["sin", "sins", "sinned", "sinning", "sinful", "transgression", "iniquity"],
            &["sin", "sins", "transgression", "iniquity", "trespass"],
            0.10,
        ),
    ]
    .into()
});

/// The built-in rule table, shared process-wide.
pub fn default_rules() -> Arc<[KeywordRule]> {
    Arc::clone(&DEFAULT_RULES)
}

/// Load a JSON array of rules (`[{"triggers": [..], "hits": [..], "weight": 0.1}]`).
pub fn load_rules(path: &Path) -> Result<Vec<KeywordRule>> {
    let raw = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    let rules: Vec<KeywordRule> = serde_json::from_str(&raw)
        .map_err(|e| Error::InvalidConfig(format!("parse keyword rules {}: {e}", path.display())))?;
    for (i, rule) in rules.iter().enumerate() {
        validate_rule(i, rule)?;
    }
    Ok(rules)
}

fn validate_rule(index: usize, rule: &KeywordRule) -> Result<()> {
    let blank = |terms: &[String]| terms.is_empty() || terms.iter().any(|t| normalize(t).is_empty());
    if blank(&rule.triggers) {
        return Err(Error::InvalidConfig(format!("rule {index}: triggers must be non-empty")));
    }
    if blank(&rule.hits) {
        return Err(Error::InvalidConfig(format!("rule {index}: hits must be non-empty")));
    }
    if !rule.weight.is_finite() || rule.weight < 0.0 {
        return Err(Error::InvalidConfig(format!("rule {index}: weight must be non-negative, got {}", rule.weight)));
    }
    Ok(())
}

/// Lowercase, fold non-alphanumerics to single spaces, trim.
fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;
    for ch in s.chars() {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    out
}

/// Normalized text padded with a space on each side, so ` term ` finds whole words.
struct Haystack(String);

impl Haystack {
    fn new(s: &str) -> Self {
        Self(format!(" {} ", normalize(s)))
    }

    fn contains(&self, normalized_term: &str) -> bool {
        !normalized_term.is_empty() && self.0.contains(&format!(" {normalized_term} "))
    }
}

struct CompiledRule {
    // (as written, normalized)
    triggers: Vec<(String, String)>,
    hits: Vec<(String, String)>,
    weight: f32,
}

impl CompiledRule {
    fn compile(rule: &KeywordRule) -> Self {
        let pairs = |terms: &[String]| -> Vec<(String, String)> { terms.iter().map(|t| (t.clone(), normalize(t))).collect() };
        Self { triggers: pairs(&rule.triggers), hits: pairs(&rule.hits), weight: rule.weight }
    }
}

#[derive(Clone)]
pub struct KeywordEvidenceEngine {
    rules: Arc<[CompiledRule]>,
}

impl Default for KeywordEvidenceEngine {
    fn default() -> Self {
        Self::new(&default_rules())
    }
}

impl KeywordEvidenceEngine {
    pub fn new(rules: &[KeywordRule]) -> Self {
        Self { rules: rules.iter().map(CompiledRule::compile).collect() }
    }

    /// Engine over the rules in `path`, see [`load_rules`].
    pub fn from_rules_file(path: &Path) -> Result<Self> {
        Ok(Self::new(&load_rules(path)?))
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn evaluate(&self, query: &str, passage_text: &str) -> Evidence {
        let query = Haystack::new(query);
        let text = Haystack::new(passage_text);
        let mut evidence = Evidence::default();

        for rule in self.rules.iter() {
            let Some((trigger, _)) = rule.triggers.iter().find(|(_, norm)| query.contains(norm)) else {
                continue;
            };
            let matched: Vec<&str> = rule
                .hits
                .iter()
                .filter(|(_, norm)| text.contains(norm))
                .map(|(term, _)| term.as_str())
                .collect();
            if matched.is_empty() {
                continue;
            }

            #[allow(clippy::cast_precision_loss)]
            let contribution = rule.weight * matched.len() as f32;
            evidence.score += contribution;
            for term in &matched {
                if !evidence.keyword_hits.iter().any(|h| h == term) {
                    evidence.keyword_hits.push((*term).to_string());
                }
            }
            evidence
                .notes
                .push(format!("'{trigger}' matched {} (+{contribution:.2})", matched.join(", ")));
        }
        evidence
    }
}
