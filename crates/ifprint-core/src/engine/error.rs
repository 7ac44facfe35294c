use thiserror::Error;

use super::config::ConfigError;
use crate::core::interactions::DetectionError;
use crate::core::io::ConversionError;
use crate::core::models::ids::ResidueId;

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("Unknown interaction(s): {}", names.join(", "))]
    UnknownInteraction { names: Vec<String> },

    #[error("Converter options must be a list of 2 tables (ligand, target), got {found}")]
    ConverterOptionsShape { found: usize },

    #[error("No interaction fingerprint has been generated yet; use the `run` method first")]
    NoFingerprint,

    #[error("Residue not found in target structure: {id}")]
    ResidueNotFound { id: ResidueId },

    #[error("Interaction '{interaction}' failed: {source}")]
    Detection {
        interaction: String,
        source: DetectionError,
    },

    #[error("Structure conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to serialize fingerprint: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to deserialize fingerprint: {0}")]
    Deserialize(#[from] toml::de::Error),

    #[error("Persisted fingerprint is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_interaction_names_every_offender() {
        let err = FingerprintError::UnknownInteraction {
            names: vec!["Foo".to_string(), "Bar".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("Foo"));
        assert!(message.contains("Bar"));
    }

    #[test]
    fn no_fingerprint_advises_running_first() {
        assert!(
            FingerprintError::NoFingerprint
                .to_string()
                .contains("use the `run` method")
        );
    }
}
