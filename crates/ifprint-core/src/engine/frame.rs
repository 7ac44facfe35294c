use super::assembler::EvidenceAssembler;
use super::error::FingerprintError;
use crate::core::interactions::InteractionData;
use crate::core::models::ids::{ResidueId, ResiduePair};
use crate::core::models::molecule::Molecule;
use crate::core::models::residue::Residue;
use itertools::Itertools;
use kiddo::{ImmutableKdTree, SquaredEuclidean};
use std::collections::HashMap;
use tracing::trace;

/// Which target residues are evaluated against the ligand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResidueScope {
    /// Target residues with any atom within the proximity cutoff of any ligand atom.
    #[default]
    Auto,
    /// Every target residue.
    All,
    /// Exactly these target residues, in this order.
    List(Vec<ResidueId>),
}

/// Sparse interaction map of one frame.
///
/// Pairs keep the order they were evaluated in. A pair is only present if at least
/// one interaction was detected for it. `frame` is the source frame number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameFingerprint {
    frame: usize,
    entries: Vec<(ResiduePair, InteractionData)>,
    index: HashMap<ResiduePair, usize>,
}

impl FrameFingerprint {
    pub fn new(frame: usize) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Appends the interactions of a pair; empty maps are not stored.
    pub fn insert(&mut self, pair: ResiduePair, data: InteractionData) {
        if data.is_empty() {
            return;
        }
        match self.index.get(&pair).copied() {
            Some(slot) => self.entries[slot].1 = data,
            None => {
                self.index.insert(pair.clone(), self.entries.len());
                self.entries.push((pair, data));
            }
        }
    }

    pub fn get(&self, ligand: &ResidueId, target: &ResidueId) -> Option<&InteractionData> {
        // Tuple keys cannot be borrowed from two separate references.
        self.index
            .get(&(ligand.clone(), target.clone()))
            .map(|&slot| &self.entries[slot].1)
    }

    pub fn get_pair(&self, pair: &ResiduePair) -> Option<&InteractionData> {
        self.index.get(pair).map(|&slot| &self.entries[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResiduePair, &InteractionData)> {
        self.entries.iter().map(|(pair, data)| (pair, data))
    }

    pub fn pairs(&self) -> impl Iterator<Item = &ResiduePair> {
        self.entries.iter().map(|(pair, _)| pair)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Target residues with at least one atom within `cutoff` of any ligand atom, in
/// target order.
pub fn residues_near<'a>(ligand: &Molecule, target: &'a Molecule, cutoff: f64) -> Vec<&'a Residue> {
    let ligand_positions: Vec<[f64; 3]> = ligand.positions().map(|p| [p.x, p.y, p.z]).collect();
    if ligand_positions.is_empty() {
        return Vec::new();
    }

    // The mutable tree rejects more than one bucket of equal coordinates on an axis,
    // which planar ligands hit.
    let kdtree: ImmutableKdTree<f64, 3> = ImmutableKdTree::new_from_slice(&ligand_positions);
    let cutoff_sq = cutoff * cutoff;

    target
        .residues()
        .iter()
        .filter(|residue| {
            residue.positions().any(|p| {
                kdtree
                    .nearest_one::<SquaredEuclidean>(&[p.x, p.y, p.z])
                    .distance
                    <= cutoff_sq
            })
        })
        .collect()
}

fn select_targets<'a>(
    ligand: &Molecule,
    target: &'a Molecule,
    scope: &ResidueScope,
    cutoff: f64,
) -> Result<Vec<&'a Residue>, FingerprintError> {
    match scope {
        ResidueScope::Auto => Ok(residues_near(ligand, target, cutoff)),
        ResidueScope::All => Ok(target.residues().iter().collect()),
        ResidueScope::List(ids) => ids
            .iter()
            .map(|id| {
                target
                    .residue(id)
                    .ok_or_else(|| FingerprintError::ResidueNotFound { id: id.clone() })
            })
            .collect(),
    }
}

/// Computes the fingerprint of a single frame.
///
/// Every ligand residue is paired with every selected target residue, ligand-major.
///
/// # Arguments
///
/// * `frame` - Source frame number recorded on the result.
/// * `assembler` - The selected detectors.
/// * `ligand` - The ligand structure.
/// * `target` - The target structure.
/// * `scope` - Which target residues to evaluate.
/// * `cutoff` - Proximity cutoff used by [`ResidueScope::Auto`].
///
/// # Errors
///
/// Returns [`FingerprintError::ResidueNotFound`] if a listed residue is absent from
/// `target`, or the first detection error.
pub fn generate_frame(
    frame: usize,
    assembler: &EvidenceAssembler,
    ligand: &Molecule,
    target: &Molecule,
    scope: &ResidueScope,
    cutoff: f64,
) -> Result<FrameFingerprint, FingerprintError> {
    let targets = select_targets(ligand, target, scope, cutoff)?;
    trace!(
        frame,
        n_ligand = ligand.len(),
        n_target = targets.len(),
        "Evaluating residue pairs."
    );

    let mut fingerprint = FrameFingerprint::new(frame);
    for (lig_res, tgt_res) in ligand.residues().iter().cartesian_product(targets) {
        let data = assembler.metadata(lig_res, tgt_res)?;
        fingerprint.insert((lig_res.id.clone(), tgt_res.id.clone()), data);
    }
    Ok(fingerprint)
}
