use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::core::MatchTables;
use crate::models::{AssemblyLimits, MatchingPolicy, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Hosted profile store (PostgREST-style API)
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_profiles_table")]
    pub profiles_table: String,
    #[serde(default = "default_interests_table")]
    pub interests_table: String,
    #[serde(default = "default_preferences_table")]
    pub preferences_table: String,
    pub timeout_secs: Option<u64>,
}

fn default_profiles_table() -> String { "profiles".to_string() }
fn default_interests_table() -> String { "profile_interests".to_string() }
fn default_preferences_table() -> String { "matching_preferences".to_string() }

/// Suggestion persistence; disabled when `url` is unset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

/// Result cache; Redis is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_group_size")]
    pub default_group_size: u8,
    #[serde(default = "default_min_compatibility")]
    pub default_min_compatibility: u8,
    #[serde(default = "default_max_group_size")]
    pub max_group_size: u8,
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
    #[serde(default = "default_admit_average")]
    pub admit_average: u8,
    #[serde(default = "default_admit_minimum")]
    pub admit_minimum: u8,
    #[serde(default = "default_max_groups_built")]
    pub max_groups_built: usize,
    #[serde(default = "default_max_groups_returned")]
    pub max_groups_returned: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_group_size: default_group_size(),
            default_min_compatibility: default_min_compatibility(),
            max_group_size: default_max_group_size(),
            candidate_limit: default_candidate_limit(),
            admit_average: default_admit_average(),
            admit_minimum: default_admit_minimum(),
            max_groups_built: default_max_groups_built(),
            max_groups_returned: default_max_groups_returned(),
        }
    }
}

fn default_group_size() -> u8 { 3 }
fn default_min_compatibility() -> u8 { 50 }
fn default_max_group_size() -> u8 { 4 }
fn default_candidate_limit() -> usize { 50 }
fn default_admit_average() -> u8 { 60 }
fn default_admit_minimum() -> u8 { 50 }
fn default_max_groups_built() -> usize { 8 }
fn default_max_groups_returned() -> usize { 6 }

impl MatchingSettings {
    /// Policy used when neither the request nor the profile specifies one
    pub fn default_policy(&self) -> MatchingPolicy {
        MatchingPolicy {
            group_size: self.default_group_size,
            min_compatibility: self.default_min_compatibility,
        }
    }

    pub fn limits(&self) -> AssemblyLimits {
        AssemblyLimits {
            admit_average: self.admit_average,
            admit_minimum: self.admit_minimum,
            max_groups_built: self.max_groups_built,
            max_groups_returned: self.max_groups_returned,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    /// Extra related specialties, merged into the built-in table
    #[serde(default)]
    pub related_specialties: HashMap<String, Vec<String>>,
    /// Extra or overriding interest-to-group-name entries
    #[serde(default)]
    pub group_names: HashMap<String, String>,
}

impl ScoringSettings {
    /// Built-in tables extended with the configured entries
    pub fn tables(&self) -> MatchTables {
        let tables = self
            .related_specialties
            .iter()
            .fold(MatchTables::default(), |tables, (specialty, related)| {
                tables.with_related(specialty, related)
            });

        self.group_names
            .iter()
            .fold(tables, |tables, (interest, name)| tables.with_group_name(interest, name))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_specialty_weight")]
    pub specialty: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_age_weight")]
    pub age: f64,
    #[serde(default = "default_interests_weight")]
    pub interests: f64,
    #[serde(default = "default_career_weight")]
    pub career: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            specialty: default_specialty_weight(),
            location: default_location_weight(),
            age: default_age_weight(),
            interests: default_interests_weight(),
            career: default_career_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            specialty: config.specialty,
            location: config.location,
            age: config.age,
            interests: config.interests,
            career: config.career,
        }
    }
}

fn default_specialty_weight() -> f64 { 25.0 }
fn default_location_weight() -> f64 { 20.0 }
fn default_age_weight() -> f64 { 15.0 }
fn default_interests_weight() -> f64 { 25.0 }
fn default_career_weight() -> f64 { 15.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MEDMATCH__)
    /// 5. DATABASE_URL and REDIS_URL
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MEDMATCH__SERVER__PORT -> server.port
            .add_source(environment());

        with_url_overrides(builder)?.build()?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment());

        with_url_overrides(builder)?.build()?.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("MEDMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the conventional DATABASE_URL / REDIS_URL variables on top
fn with_url_overrides(
    mut builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Ok(url) = std::env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", url)?;
    }
    Ok(builder)
}
