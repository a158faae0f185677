use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::lda::GibbsSampler;
use crate::text::tokenizer::Tokenizer;

/// Central configuration loaded from environment variables.
///
/// Every setting has a default, so an empty environment works. The .env
/// file is loaded at startup via dotenvy; CLI flags override per run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seed shared by every fit (PLOTWEAVE_SEED)
    pub seed: u64,
    /// Dirichlet prior on document mixtures (PLOTWEAVE_ALPHA)
    pub alpha: f64,
    /// Dirichlet prior on topic-term distributions (PLOTWEAVE_ETA)
    pub eta: f64,
    pub iterations: usize,
    pub burn_in: usize,
    pub thin: usize,
    /// Terms per topic in the top-terms table (PLOTWEAVE_TOP_N)
    pub top_n: usize,
    /// Replacement stop-word list; the built-in English list when unset
    pub stopwords_path: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let sampler = GibbsSampler::default();
        Self {
            seed: 1234,
            alpha: sampler.alpha,
            eta: sampler.eta,
            iterations: sampler.iterations,
            burn_in: sampler.burn_in,
            thin: sampler.thin,
            top_n: 10,
            stopwords_path: None,
            output_dir: PathBuf::from("./output"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A variable that is set but doesn't parse is an error rather than
    /// falling back to the default.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `load` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            seed: parse_var(&lookup, "PLOTWEAVE_SEED", defaults.seed)?,
            alpha: parse_var(&lookup, "PLOTWEAVE_ALPHA", defaults.alpha)?,
            eta: parse_var(&lookup, "PLOTWEAVE_ETA", defaults.eta)?,
            iterations: parse_var(&lookup, "PLOTWEAVE_ITERATIONS", defaults.iterations)?,
            burn_in: parse_var(&lookup, "PLOTWEAVE_BURN_IN", defaults.burn_in)?,
            thin: parse_var(&lookup, "PLOTWEAVE_THIN", defaults.thin)?,
            top_n: parse_var(&lookup, "PLOTWEAVE_TOP_N", defaults.top_n)?,
            stopwords_path: lookup("PLOTWEAVE_STOPWORDS")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            output_dir: lookup("PLOTWEAVE_OUTPUT_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        })
    }

    /// The Gibbs sampler described by this configuration.
    pub fn sampler(&self) -> GibbsSampler {
        GibbsSampler {
            alpha: self.alpha,
            eta: self.eta,
            iterations: self.iterations,
            burn_in: self.burn_in,
            thin: self.thin,
        }
    }

    /// The tokenizer for this configuration: the configured stop-word
    /// file if any, otherwise the built-in English list.
    pub fn tokenizer(&self) -> Result<Tokenizer> {
        match &self.stopwords_path {
            Some(path) => Tokenizer::from_stop_word_file(path),
            None => Ok(Tokenizer::default()),
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has invalid value `{raw}`")),
        _ => Ok(default),
    }
}
