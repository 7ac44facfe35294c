use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_PROXIMITY_CUTOFF: f64 = 6.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Engine-wide settings of a [`crate::workflows::fingerprint::Fingerprint`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
pub struct FingerprintConfig {
    /// Distance (Angstroms) within which a target residue counts as a neighbor of the
    /// ligand under the automatic residue scope.
    pub proximity_cutoff: f64,
    /// Worker count used when a run does not specify one. `None` uses the host's
    /// available parallelism.
    pub default_n_jobs: Option<usize>,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            proximity_cutoff: DEFAULT_PROXIMITY_CUTOFF,
            default_n_jobs: None,
        }
    }
}

impl FingerprintConfig {
    pub fn builder() -> FingerprintConfigBuilder {
        FingerprintConfigBuilder::new()
    }

    /// Loads and validates a configuration from a TOML file.
    ///
    /// Missing keys take their default values; unknown keys are rejected.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_cutoff(self.proximity_cutoff)?;
        validate_n_jobs(self.default_n_jobs)
    }
}

pub(crate) fn validate_cutoff(cutoff: f64) -> Result<(), ConfigError> {
    if cutoff.is_finite() && cutoff > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name: "proximity_cutoff",
            reason: format!("must be a positive finite distance, got {cutoff}"),
        })
    }
}

pub(crate) fn validate_n_jobs(n_jobs: Option<usize>) -> Result<(), ConfigError> {
    match n_jobs {
        Some(0) => Err(ConfigError::InvalidParameter {
            name: "n_jobs",
            reason: "must be at least 1".to_string(),
        }),
        _ => Ok(()),
    }
}

#[derive(Default)]
pub struct FingerprintConfigBuilder {
    proximity_cutoff: Option<f64>,
    default_n_jobs: Option<usize>,
}

impl FingerprintConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn proximity_cutoff(mut self, cutoff: f64) -> Self {
        self.proximity_cutoff = Some(cutoff);
        self
    }
    pub fn default_n_jobs(mut self, n_jobs: usize) -> Self {
        self.default_n_jobs = Some(n_jobs);
        self
    }

    pub fn build(self) -> Result<FingerprintConfig, ConfigError> {
        let config = FingerprintConfig {
            proximity_cutoff: self.proximity_cutoff.unwrap_or(DEFAULT_PROXIMITY_CUTOFF),
            default_n_jobs: self.default_n_jobs,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn builder_uses_documented_defaults() {
        let config = FingerprintConfig::builder().build().unwrap();
        assert_eq!(config, FingerprintConfig::default());
        assert_eq!(config.proximity_cutoff, 6.0);
        assert_eq!(config.default_n_jobs, None);
    }

    #[test]
    fn builder_rejects_non_positive_cutoff() {
        let result = FingerprintConfig::builder().proximity_cutoff(0.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "proximity_cutoff",
                ..
            })
        ));
        assert!(
            FingerprintConfig::builder()
                .proximity_cutoff(f64::INFINITY)
                .build()
                .is_err()
        );
    }

    #[test]
    fn builder_rejects_zero_workers() {
        let result = FingerprintConfig::builder().default_n_jobs(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "n_jobs", .. })
        ));
    }

    #[test]
    fn load_reads_kebab_case_keys() {
        let file = write_config("proximity-cutoff = 4.5\ndefault-n-jobs = 2\n");
        let config = FingerprintConfig::load(file.path()).unwrap();
        assert_eq!(config.proximity_cutoff, 4.5);
        assert_eq!(config.default_n_jobs, Some(2));
    }

    #[test]
    fn load_fills_missing_keys_with_defaults() {
        let file = write_config("default-n-jobs = 1\n");
        let config = FingerprintConfig::load(file.path()).unwrap();
        assert_eq!(config.proximity_cutoff, DEFAULT_PROXIMITY_CUTOFF);
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let file = write_config("cutoff = 4.5\n");
        let result = FingerprintConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::Toml { .. })));
    }

    #[test]
    fn load_validates_values() {
        let file = write_config("proximity-cutoff = -1.0\n");
        let result = FingerprintConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidParameter { .. })));
    }

    #[test]
    fn load_fails_for_missing_file() {
        let result = FingerprintConfig::load(Path::new("does/not/exist.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
