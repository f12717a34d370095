//! Configuration for the research engine.
//!
//! Uses `figment` for layered configuration: defaults -> user file -> workspace
//! file -> environment -> explicit overrides. The user file lives at
//! `<config dir>/research.toml` and the workspace file at
//! `.orenda/research.toml`.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Default location of the parsed ground-truth corpus.
pub const DEFAULT_CORPUS_PATH: &str = "data/ground_truth/ground_truth_sessions.json";

/// Default seed for the sampling RNG.
pub const DEFAULT_SEED: u64 = 13;

/// Top-level research engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Path to the `ground_truth_sessions.json` payload.
    #[serde(default = "default_corpus_path")]
    pub corpus_path: PathBuf,
    /// Seed for reproducible session sampling.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// How many archetypes reporting endpoints return by default.
    #[serde(default = "default_max_archetypes")]
    pub max_archetypes: usize,
    /// How many method suggestions reporting endpoints return by default.
    #[serde(default = "default_max_methods")]
    pub max_methods: usize,
    /// Session sampling defaults.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Research-hints digest limits.
    #[serde(default)]
    pub digest: DigestConfig,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            seed: default_seed(),
            max_archetypes: default_max_archetypes(),
            max_methods: default_max_methods(),
            simulation: SimulationConfig::default(),
            digest: DigestConfig::default(),
        }
    }
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from(DEFAULT_CORPUS_PATH)
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_max_archetypes() -> usize {
    5
}

fn default_max_methods() -> usize {
    4
}

/// Defaults for [`crate::ResearchEngine::simulate_sessions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of draws.
    #[serde(default = "default_sim_count")]
    pub count: usize,
    /// Maximum turns per sampled segment.
    #[serde(default = "default_sim_max_turns")]
    pub max_turns: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            count: default_sim_count(),
            max_turns: default_sim_max_turns(),
        }
    }
}

fn default_sim_count() -> usize {
    3
}

fn default_sim_max_turns() -> usize {
    6
}

/// Limits for the research-hints digest passed into prompt assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Keywords taken from the top archetype.
    #[serde(default = "default_keyword_limit")]
    pub keyword_limit: usize,
    /// Methods listed in the hint line.
    #[serde(default = "default_method_limit")]
    pub method_limit: usize,
    /// Suggested moves quoted per method.
    #[serde(default = "default_moves_per_method")]
    pub moves_per_method: usize,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            keyword_limit: default_keyword_limit(),
            method_limit: default_method_limit(),
            moves_per_method: default_moves_per_method(),
        }
    }
}

fn default_keyword_limit() -> usize {
    5
}

fn default_method_limit() -> usize {
    2
}

fn default_moves_per_method() -> usize {
    2
}

/// Config files merged by [`load_config`], lowest priority first.
fn config_files(workspace: Option<&Path>) -> Vec<PathBuf> {
    let user = directories::ProjectDirs::from("dev", "orenda", "orenda")
        .map(|dirs| dirs.config_dir().join("research.toml"));
    let local = workspace.map(|ws| ws.join(".orenda").join("research.toml"));
    user.into_iter().chain(local).filter(|p| p.exists()).collect()
}

/// Load configuration from layered sources.
///
/// Later layers win: built-in defaults, `research.toml` in the user config
/// dir, `.orenda/research.toml` in the workspace, `ORENDA_*` variables
/// (`ORENDA_SIMULATION__MAX_TURNS=4`), then `overrides`.
///
/// A relative `corpus_path` is resolved against `workspace` when one is
/// given, so the engine finds the corpus regardless of the process cwd.
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&ResearchConfig>,
) -> Result<ResearchConfig> {
    let figment = config_files(workspace).iter().fold(
        Figment::from(Serialized::defaults(ResearchConfig::default())),
        |figment, file| figment.merge(Toml::file(file)),
    );
    let figment = figment.merge(Env::prefixed("ORENDA_").split("__"));
    let figment = match overrides {
        Some(overrides) => figment.merge(Serialized::defaults(overrides)),
        None => figment,
    };

    let mut config: ResearchConfig = figment.extract().map_err(Box::new)?;
    if let Some(ws) = workspace {
        if config.corpus_path.is_relative() {
            config.corpus_path = ws.join(&config.corpus_path);
        }
    }
    Ok(config)
}
