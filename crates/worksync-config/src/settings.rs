//! Validated settings structures

use crate::schema::{RawConfig, RawEmployee, RawInsightConfig, RawSeedConfig, RawStorageConfig};
use crate::validation::parse_time;
use std::path::PathBuf;
use std::time::Duration;
use worksync_api::{Employee, Roster};
use worksync_util::{EmployeeId, WallClock, default_data_dir};

/// Validated settings ready for use by the store, core and insight crates
#[derive(Debug, Clone)]
pub struct Settings {
    pub storage: StorageConfig,
    pub seed: SeedSettings,
    pub insight: InsightSettings,
    pub roster: Roster,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        let roster = if raw.employees.is_empty() {
            default_roster()
        } else {
            Roster::new(raw.employees.into_iter().map(convert_employee).collect())
        };

        Self {
            storage: StorageConfig::from_raw(raw.storage),
            seed: SeedSettings::from_raw(raw.seed),
            insight: InsightSettings::from_raw(raw.insight),
            roster,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            seed: SeedSettings::default(),
            insight: InsightSettings::default(),
            roster: default_roster(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    fn from_raw(raw: RawStorageConfig) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(default_data_dir),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// How the record slot is populated when it is found empty
#[derive(Debug, Clone)]
pub struct SeedSettings {
    pub enabled: bool,
    pub days: u32,
    pub weekend_work_probability: f64,
    pub check_in_start: WallClock,
    /// Exclusive
    pub check_in_end: WallClock,
    pub min_duration_minutes: u32,
    /// Exclusive
    pub max_duration_minutes: u32,
    pub executive_role: String,
    pub executive_bias_minutes: u32,
}

impl SeedSettings {
    fn from_raw(raw: RawSeedConfig) -> Self {
        let defaults = Self::default();
        Self {
            enabled: raw.enabled.unwrap_or(defaults.enabled),
            days: raw.days.unwrap_or(defaults.days),
            weekend_work_probability: raw
                .weekend_work_probability
                .unwrap_or(defaults.weekend_work_probability),
            check_in_start: raw
                .check_in_start
                .as_deref()
                .and_then(convert_wall_clock)
                .unwrap_or(defaults.check_in_start),
            check_in_end: raw
                .check_in_end
                .as_deref()
                .and_then(convert_wall_clock)
                .unwrap_or(defaults.check_in_end),
            min_duration_minutes: raw
                .min_duration_minutes
                .unwrap_or(defaults.min_duration_minutes),
            max_duration_minutes: raw
                .max_duration_minutes
                .unwrap_or(defaults.max_duration_minutes),
            executive_role: raw.executive_role.unwrap_or(defaults.executive_role),
            executive_bias_minutes: raw
                .executive_bias_minutes
                .unwrap_or(defaults.executive_bias_minutes),
        }
    }

    /// Settings that leave an empty store empty
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            days: 365,
            weekend_work_probability: 0.1,
            check_in_start: WallClock::from_minutes_from_midnight(8 * 60),
            check_in_end: WallClock::from_minutes_from_midnight(10 * 60),
            min_duration_minutes: 450,
            max_duration_minutes: 600,
            executive_role: "CEO".into(),
            executive_bias_minutes: 60,
        }
    }
}

/// External insight service settings
#[derive(Debug, Clone)]
pub struct InsightSettings {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    pub timeout: Duration,
    pub max_records: usize,
}

impl InsightSettings {
    fn from_raw(raw: RawInsightConfig) -> Self {
        let defaults = Self::default();
        Self {
            enabled: raw.enabled.unwrap_or(defaults.enabled),
            endpoint: raw.endpoint.unwrap_or(defaults.endpoint),
            model: raw.model.unwrap_or(defaults.model),
            api_key_env: raw.api_key_env.unwrap_or(defaults.api_key_env),
            timeout: raw
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_records: raw.max_records.unwrap_or(defaults.max_records),
        }
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-3-flash-preview".into(),
            api_key_env: "API_KEY".into(),
            timeout: Duration::from_secs(30),
            max_records: 50,
        }
    }
}

/// Built-in roster used when the config lists no employees
pub fn default_roster() -> Roster {
    let employee = |id: &str, name: &str, role: &str, team: &str| Employee {
        id: EmployeeId::new(id),
        name: name.into(),
        role: role.into(),
        team: team.into(),
    };

    Roster::new(vec![
        employee("1001", "Kim Dae-pyo", "CEO", "Management"),
        employee("2001", "Lee Su-min", "Frontend Engineer", "Engineering"),
        employee("2002", "Park Jun-ho", "Backend Engineer", "Engineering"),
        employee("3001", "Choi Ji-woo", "Product Designer", "Design"),
        employee("4001", "Jung Hyun-woo", "Operations Manager", "Operations"),
    ])
}

// Conversion helpers

fn convert_employee(raw: RawEmployee) -> Employee {
    Employee {
        id: EmployeeId::new(raw.id.trim()),
        name: raw.name,
        role: raw.role,
        team: raw.team,
    }
}

fn convert_wall_clock(s: &str) -> Option<WallClock> {
    let (hour, minute) = parse_time(s).ok()?;
    WallClock::new(hour, minute)
}
