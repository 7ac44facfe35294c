use super::config::FingerprintConfig;
use super::error::FingerprintError;
use super::frame::FrameFingerprint;
use crate::core::interactions::InteractionData;
use crate::core::models::ids::ResidueId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PersistedFingerprint {
    interactions: Vec<String>,
    proximity_cutoff: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_n_jobs: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frames: Option<Vec<PersistedFrame>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PersistedFrame {
    frame: usize,
    #[serde(default)]
    pairs: Vec<PersistedPair>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PersistedPair {
    ligand: ResidueId,
    protein: ResidueId,
    interactions: InteractionData,
}

/// Contents of a persisted fingerprint, with interactions still unresolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub interactions: Vec<String>,
    pub config: FingerprintConfig,
    pub ifp: Option<Vec<FrameFingerprint>>,
}

/// Renders a snapshot as a TOML document. Detectors are referenced by name only.
pub fn encode(snapshot: &Snapshot) -> Result<String, FingerprintError> {
    let document = PersistedFingerprint {
        interactions: snapshot.interactions.clone(),
        proximity_cutoff: snapshot.config.proximity_cutoff,
        default_n_jobs: snapshot.config.default_n_jobs,
        frames: snapshot.ifp.as_ref().map(|ifp| {
            ifp.iter()
                .map(|frame| PersistedFrame {
                    frame: frame.frame(),
                    pairs: frame
                        .iter()
                        .map(|((ligand, protein), data)| PersistedPair {
                            ligand: ligand.clone(),
                            protein: protein.clone(),
                            interactions: data.clone(),
                        })
                        .collect(),
                })
                .collect()
        }),
    };
    Ok(toml::to_string(&document)?)
}

/// Parses a document written by [`encode`] and validates its configuration.
pub fn decode(text: &str) -> Result<Snapshot, FingerprintError> {
    let document: PersistedFingerprint = toml::from_str(text)?;
    let config = FingerprintConfig {
        proximity_cutoff: document.proximity_cutoff,
        default_n_jobs: document.default_n_jobs,
    };
    config.validate()?;

    let ifp: Option<Vec<FrameFingerprint>> = document.frames.map(|frames| {
        frames
            .into_iter()
            .map(|persisted| {
                let mut frame = FrameFingerprint::new(persisted.frame);
                for pair in persisted.pairs {
                    frame.insert((pair.ligand, pair.protein), pair.interactions);
                }
                frame
            })
            .collect()
    });

    Ok(Snapshot {
        interactions: document.interactions,
        config,
        ifp,
    })
}
