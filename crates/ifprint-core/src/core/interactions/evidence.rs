use crate::core::models::residue::Residue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Atom indices involved in an interaction, one tuple per entity role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleIndices {
    pub ligand: Vec<usize>,
    pub protein: Vec<usize>,
}

/// Geometric evidence supporting one detected interaction between two entities.
///
/// `indices` are local to each residue; `parent_indices` are the same atoms
/// translated through each residue's parent-index side-channel. Detector-specific
/// measurements (`distance`, `angle`, ...) live in `metrics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub indices: RoleIndices,
    pub parent_indices: RoleIndices,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl Evidence {
    /// Builds an evidence record, resolving parent indices from both residues.
    ///
    /// # Arguments
    ///
    /// * `ligand` - The ligand residue the `ligand_indices` refer to.
    /// * `protein` - The target residue the `protein_indices` refer to.
    /// * `ligand_indices` - Local atom indices within `ligand`.
    /// * `protein_indices` - Local atom indices within `protein`.
    pub fn new(
        ligand: &Residue,
        protein: &Residue,
        ligand_indices: &[usize],
        protein_indices: &[usize],
    ) -> Self {
        let indices = RoleIndices {
            ligand: ligand_indices.to_vec(),
            protein: protein_indices.to_vec(),
        };
        let parent_indices = RoleIndices {
            ligand: ligand_indices.iter().map(|&i| ligand.parent_index(i)).collect(),
            protein: protein_indices.iter().map(|&i| protein.parent_index(i)).collect(),
        };
        Self {
            indices,
            parent_indices,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_string(), value);
        self
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    pub fn distance(&self) -> Option<f64> {
        self.metric("distance")
    }
}

/// Detected interactions of one entity pair, keyed by interaction name.
pub type InteractionData = BTreeMap<String, Evidence>;
