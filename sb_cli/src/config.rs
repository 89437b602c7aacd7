//! CLI configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.
//! Command-line values take precedence over the environment.

use sports_bracket::tournament::TournamentConfig;

/// Command-line values that override the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub name: Option<String>,
    pub group_count: Option<usize>,
    pub qualifiers_per_group: Option<usize>,
    pub bronze_match: Option<bool>,
    pub rng_seed: Option<u64>,
}

/// Complete CLI configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Event name used in logs and output
    pub name: String,
    /// Round-robin groups for `season` and season simulations
    pub group_count: usize,
    /// Playoff qualifiers per group
    pub qualifiers_per_group: usize,
    /// Whether elimination brackets get a third-place match
    pub bronze_match: bool,
    /// Fixed RNG seed for reproducible draws; random when absent
    pub rng_seed: Option<u64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            name: "Tournament".to_string(),
            group_count: 2,
            qualifiers_per_group: 2,
            bronze_match: true,
            rng_seed: None,
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env(overrides: CliOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F, overrides: CliOverrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let name = overrides
            .name
            .or_else(|| lookup("SB_NAME"))
            .unwrap_or(defaults.name);

        let group_count = match overrides.group_count {
            Some(groups) => groups,
            None => parse_var_or(&lookup, "SB_GROUPS", defaults.group_count)?,
        };

        let qualifiers_per_group = match overrides.qualifiers_per_group {
            Some(qualifiers) => qualifiers,
            None => parse_var_or(&lookup, "SB_QUALIFIERS", defaults.qualifiers_per_group)?,
        };

        let bronze_match = match overrides.bronze_match {
            Some(bronze) => bronze,
            None => parse_var_or(&lookup, "SB_BRONZE", defaults.bronze_match)?,
        };

        let rng_seed = match overrides.rng_seed {
            Some(seed) => Some(seed),
            None => parse_var(&lookup, "SB_RNG_SEED")?,
        };

        Ok(Self {
            name,
            group_count,
            qualifiers_per_group,
            bronze_match,
            rng_seed,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "SB_NAME".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.group_count == 0 {
            return Err(ConfigError::Invalid {
                var: "SB_GROUPS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if self.qualifiers_per_group == 0 {
            return Err(ConfigError::Invalid {
                var: "SB_QUALIFIERS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Knockout tournament configuration for the library
    pub fn knockout(&self) -> TournamentConfig {
        TournamentConfig::knockout(self.name.clone(), self.bronze_match)
    }

    /// Groups-then-playoffs tournament configuration for the library
    pub fn season(&self) -> TournamentConfig {
        TournamentConfig {
            bracket_has_bronze_match: self.bronze_match,
            ..TournamentConfig::season(
                self.name.clone(),
                self.group_count,
                self.qualifiers_per_group,
            )
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot parse environment variable {var}={value:?}")]
    Unparsable { var: String, value: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse an optional variable, rejecting values that are set but malformed
fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Unparsable {
                var: key.to_string(),
                value,
            }),
        None => Ok(None),
    }
}

/// Helper to parse a variable with default fallback
fn parse_var_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    Ok(parse_var(lookup, key)?.unwrap_or(default))
}
