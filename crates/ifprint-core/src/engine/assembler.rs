use super::error::FingerprintError;
use crate::core::interactions::{Evidence, Interaction, InteractionData};
use crate::core::models::residue::Residue;
use std::sync::Arc;

/// A detector selected under a registry name.
#[derive(Debug, Clone)]
pub struct SelectedInteraction {
    pub name: String,
    pub detector: Arc<dyn Interaction>,
}

/// Runs an ordered set of detectors over single residue pairs.
///
/// The assembler is a pure function of the pair and the detector set, so one instance
/// is shared by every worker of a run.
#[derive(Debug, Clone, Default)]
pub struct EvidenceAssembler {
    selected: Vec<SelectedInteraction>,
}

impl EvidenceAssembler {
    pub fn new(selected: Vec<SelectedInteraction>) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> &[SelectedInteraction] {
        &self.selected
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// One slot per selected interaction, in selection order; a slot is `true` iff
    /// that detector matched the pair.
    pub fn bitvector(
        &self,
        ligand: &Residue,
        target: &Residue,
    ) -> Result<Vec<bool>, FingerprintError> {
        self.selected
            .iter()
            .map(|s| Ok(detect(s, ligand, target)?.is_some()))
            .collect()
    }

    /// Evidence of every selected interaction that matched the pair, keyed by name.
    pub fn metadata(
        &self,
        ligand: &Residue,
        target: &Residue,
    ) -> Result<InteractionData, FingerprintError> {
        let mut data = InteractionData::new();
        for s in &self.selected {
            if let Some(evidence) = detect(s, ligand, target)? {
                data.insert(s.name.clone(), evidence);
            }
        }
        Ok(data)
    }
}

fn detect(
    selected: &SelectedInteraction,
    ligand: &Residue,
    target: &Residue,
) -> Result<Option<Evidence>, FingerprintError> {
    selected
        .detector
        .detect(ligand, target)
        .map_err(|source| FingerprintError::Detection {
            interaction: selected.name.clone(),
            source,
        })
}
