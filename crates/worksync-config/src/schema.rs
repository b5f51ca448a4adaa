//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    #[serde(default)]
    pub storage: RawStorageConfig,

    #[serde(default)]
    pub seed: RawSeedConfig,

    #[serde(default)]
    pub insight: RawInsightConfig,

    /// The roster. Empty means "use the built-in roster".
    #[serde(default)]
    pub employees: Vec<RawEmployee>,
}

/// Where persisted slots live
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStorageConfig {
    /// Data directory for the key-value database
    pub data_dir: Option<PathBuf>,
}

/// Synthetic history generated on first load
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSeedConfig {
    /// Seed an empty store (default: true)
    pub enabled: Option<bool>,

    /// Days of history before today (default: 365)
    pub days: Option<u32>,

    /// Chance that a weekend day gets worked (default: 0.1)
    pub weekend_work_probability: Option<f64>,

    /// Earliest check-in (HH:MM, default: 08:00)
    pub check_in_start: Option<String>,

    /// Check-in window end, exclusive (HH:MM, default: 10:00)
    pub check_in_end: Option<String>,

    /// Shortest generated day in minutes (default: 450)
    pub min_duration_minutes: Option<u32>,

    /// Generated days are shorter than this (default: 600)
    pub max_duration_minutes: Option<u32>,

    /// Role that gets extra minutes (default: "CEO")
    pub executive_role: Option<String>,

    /// Extra minutes for the executive role (default: 60)
    pub executive_bias_minutes: Option<u32>,
}

/// External insight service
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawInsightConfig {
    pub enabled: Option<bool>,

    /// Base URL of the generative language API
    pub endpoint: Option<String>,

    pub model: Option<String>,

    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,

    pub timeout_seconds: Option<u64>,

    /// Trailing records sent for analysis
    pub max_records: Option<usize>,
}

/// Roster entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawEmployee {
    pub id: String,
    pub name: String,
    pub role: String,
    pub team: String,
}
