//! Configuration loader and retrieval tunables.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nested keys, e.g. `APP_RETRIEVAL__PASSAGE_CAP=2`).

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{Mode, Weights};

/// Hard ceiling on passages returned by context assembly.
pub const DEFAULT_PASSAGE_CAP: usize = 3;
/// Candidate limit used when a request does not name one.
pub const DEFAULT_CANDIDATES: usize = 8;
/// Multiplier applied to a lexical-similarity value before it joins the evidence score.
pub const DEFAULT_TRIGRAM_WEIGHT: f32 = 0.5;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self::from_figment(figment);
        config.retrieval()?;
        tracing::info!(env = %env_name, "configuration loaded");
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// The `[retrieval]` table layered over [`RetrievalConfig::default`], validated.
    pub fn retrieval(&self) -> Result<RetrievalConfig> {
        let cfg = if self.figment.contains("retrieval") {
            self.figment
                .extract_inner::<RetrievalConfig>("retrieval")
                .map_err(|e| Error::InvalidConfig(format!("retrieval: {e}")))?
        } else {
            RetrievalConfig::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Per-mode weight pairs and the exact-mode lexical-similarity multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub explorer: Weights,
    pub exact: Weights,
    pub trigram_weight: f32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            explorer: Mode::Explorer.default_weights(),
            exact: Mode::Exact.default_weights(),
            trigram_weight: DEFAULT_TRIGRAM_WEIGHT,
        }
    }
}

impl FusionConfig {
    pub fn weights(&self, mode: Mode) -> Weights {
        match mode {
            Mode::Explorer => self.explorer,
            Mode::Exact => self.exact,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let values = [
            ("explorer.semantic", self.explorer.semantic),
            ("explorer.evidence", self.explorer.evidence),
            ("exact.semantic", self.exact.semantic),
            ("exact.evidence", self.exact.evidence),
            ("trigram_weight", self.trigram_weight),
        ];
        for (name, v) in values {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidConfig(format!("{name} must be a finite non-negative number, got {v}")));
            }
        }
        // modes must not collapse onto the same ranking
        if self.explorer == self.exact {
            return Err(Error::InvalidConfig("explorer and exact weights must differ".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub passage_cap: usize,
    pub default_candidates: usize,
    pub fusion: FusionConfig,
    pub keyword_rules_path: Option<String>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            passage_cap: DEFAULT_PASSAGE_CAP,
            default_candidates: DEFAULT_CANDIDATES,
            fusion: FusionConfig::default(),
            keyword_rules_path: None,
        }
    }
}

impl RetrievalConfig {
    /// `passage_cap` may lower the ceiling but never raise it.
    pub fn validate(&self) -> Result<()> {
        if self.passage_cap == 0 || self.passage_cap > DEFAULT_PASSAGE_CAP {
            return Err(Error::InvalidConfig(format!(
                "passage_cap must be between 1 and {DEFAULT_PASSAGE_CAP}, got {}",
                self.passage_cap
            )));
        }
        self.fusion.validate()
    }

    /// Rule file location, resolved against `base` when relative.
    pub fn keyword_rules_file(&self, base: &Path) -> Option<PathBuf> {
        self.keyword_rules_path.as_deref().map(|p| resolve_with_base(base, p))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
