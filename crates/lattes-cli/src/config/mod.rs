//! Configuration loading for the lattes tool.
//! Reads lattes.toml from the current directory or the path in the
//! LATTES_CONFIG env var. Every field has a default.

use std::path::{Path, PathBuf};

use anyhow::Context;
use lattes_analytics::{DEFAULT_AUTHOR_DELIMITERS, DEFAULT_RECENT_WINDOW_YEARS};
use lattes_catalog::{catalog::DEFAULT_MIN_SCORE, ScorerKind};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "LATTES_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "lattes.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_csv_dir")]
    pub csv_dir: PathBuf,
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
}

fn default_csv_dir()      -> PathBuf { PathBuf::from("csv_output") }
fn default_catalog_path() -> PathBuf { PathBuf::from("scimagojr 2023.csv") }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_dir: default_csv_dir(),
            catalog_path: default_catalog_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    #[serde(default)]
    pub scorer: ScorerKind,
}

fn default_min_score() -> f64 { DEFAULT_MIN_SCORE }

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            scorer: ScorerKind::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_recent_window")]
    pub recent_window_years: i32,
    #[serde(default = "default_author_delimiters")]
    pub author_delimiters: Vec<String>,
    /// Year statistics are computed against; the current year when unset.
    #[serde(default)]
    pub reference_year: Option<i32>,
}

fn default_recent_window() -> i32 { DEFAULT_RECENT_WINDOW_YEARS }
fn default_author_delimiters() -> Vec<String> {
    DEFAULT_AUTHOR_DELIMITERS.iter().map(|d| d.to_string()).collect()
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            recent_window_years: default_recent_window(),
            author_delimiters: default_author_delimiters(),
            reference_year: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_path")]
    pub path: PathBuf,
}

fn default_export_path() -> PathBuf { PathBuf::from("resultados_busca.csv") }

impl Default for ExportConfig {
    fn default() -> Self {
        Self { path: default_export_path() }
    }
}


impl Config {
    /// Load from `LATTES_CONFIG` or `lattes.toml`. A missing file means
    /// defaults; a file that exists but does not parse is an error.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults. Copy lattes.example.toml to lattes.toml to customise."
            );
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Load a file the user named. Unlike [`Config::load_from`], a missing
    /// file is an error.
    pub fn load_explicit(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        Self::load_from(path)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.matching.min_score) {
            anyhow::bail!("matching.min_score must be within [0, 1], got {}", self.matching.min_score);
        }
        if self.analytics.recent_window_years < 0 {
            anyhow::bail!(
                "analytics.recent_window_years must not be negative, got {}",
                self.analytics.recent_window_years
            );
        }
        if self.analytics.author_delimiters.iter().all(|d| d.is_empty()) {
            anyhow::bail!("analytics.author_delimiters needs at least one non-empty delimiter");
        }
        Ok(())
    }
}
