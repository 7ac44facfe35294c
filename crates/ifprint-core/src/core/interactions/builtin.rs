//! Distance-based reference detectors.
//!
//! These detectors only read the annotations carried by [`Atom`]s (element, formal
//! charge, hydrogen-bond role); they do not perceive chemistry. When several atom
//! pairs satisfy a detector, the closest pair is reported.

use super::registry::InteractionRegistry;
use super::{DetectionError, Evidence, Interaction};
use crate::core::models::atom::Atom;
use crate::core::models::residue::Residue;
use nalgebra::distance;
use phf::{Map, Set, phf_map, phf_set};

static HYDROPHOBIC_ELEMENTS: Set<&'static str> = phf_set! {
    "C", "S", "F", "Cl", "Br", "I",
};

// Bondi radii, in Angstroms.
static VDW_RADII: Map<&'static str, f64> = phf_map! {
    "H" => 1.20, "D" => 1.20,
    "C" => 1.70, "N" => 1.55, "O" => 1.52, "F" => 1.47,
    "P" => 1.80, "S" => 1.80, "Cl" => 1.75, "Br" => 1.85, "I" => 1.98,
    "Na" => 2.27, "Mg" => 1.73, "K" => 2.75, "Zn" => 1.39, "Fe" => 1.94,
};

const FALLBACK_VDW_RADIUS: f64 = 2.0;

pub const HYDROPHOBIC_DISTANCE: f64 = 4.5;
pub const IONIC_DISTANCE: f64 = 4.5;
pub const HBOND_DISTANCE: f64 = 3.5;

/// Which atoms of an entity a distance detector considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomFilter {
    Any,
    Hydrophobic,
    Cation,
    Anion,
    Donor,
    Acceptor,
}

impl AtomFilter {
    pub fn matches(self, atom: &Atom) -> bool {
        match self {
            AtomFilter::Any => true,
            AtomFilter::Hydrophobic => is_hydrophobic(atom),
            AtomFilter::Cation => atom.formal_charge > 0,
            AtomFilter::Anion => atom.formal_charge < 0,
            AtomFilter::Donor => atom.hbond_role.is_donor(),
            AtomFilter::Acceptor => atom.hbond_role.is_acceptor(),
        }
    }
}

pub fn is_hydrophobic(atom: &Atom) -> bool {
    HYDROPHOBIC_ELEMENTS.contains(atom.element.trim())
        && atom.formal_charge == 0
        && !atom.hbond_role.is_donor()
        && !atom.hbond_role.is_acceptor()
}

pub fn vdw_radius(element: &str) -> f64 {
    VDW_RADII
        .get(element.trim())
        .copied()
        .unwrap_or(FALLBACK_VDW_RADIUS)
}

/// Finds the closest (ligand atom, target atom) pair within its cutoff.
///
/// `cutoff` gives the maximum distance allowed for a candidate pair.
fn closest_pair<C>(
    ligand: &Residue,
    target: &Residue,
    ligand_filter: AtomFilter,
    target_filter: AtomFilter,
    cutoff: C,
) -> Option<(usize, usize, f64)>
where
    C: Fn(&Atom, &Atom) -> f64,
{
    let mut best: Option<(usize, usize, f64)> = None;
    for (i, lig_atom) in ligand.atoms_where(move |a| ligand_filter.matches(a)) {
        for (j, tgt_atom) in target.atoms_where(move |a| target_filter.matches(a)) {
            let d = distance(&lig_atom.position, &tgt_atom.position);
            if d <= cutoff(lig_atom, tgt_atom) && best.is_none_or(|(_, _, b)| d < b) {
                best = Some((i, j, d));
            }
        }
    }
    best
}

/// Generic base detector: any ligand atom matching one filter within a fixed
/// distance of any target atom matching the other.
#[derive(Debug, Clone, PartialEq)]
pub struct Distance {
    pub ligand_filter: AtomFilter,
    pub target_filter: AtomFilter,
    pub distance: f64,
}

impl Distance {
    pub fn new(ligand_filter: AtomFilter, target_filter: AtomFilter, distance: f64) -> Self {
        Self {
            ligand_filter,
            target_filter,
            distance,
        }
    }
}

impl Interaction for Distance {
    fn detect(
        &self,
        ligand: &Residue,
        target: &Residue,
    ) -> Result<Option<Evidence>, DetectionError> {
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(DetectionError::new(format!(
                "invalid distance threshold {}",
                self.distance
            )));
        }
        Ok(closest_pair(
            ligand,
            target,
            self.ligand_filter,
            self.target_filter,
            |_, _| self.distance,
        )
        .map(|(i, j, d)| Evidence::new(ligand, target, &[i], &[j]).with_metric("distance", d)))
    }
}

/// Which side of the pair provides the hydrogen-bond donor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonorSide {
    Ligand,
    Target,
}

/// Base hydrogen-bond detector working on heavy-atom donor/acceptor annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseHBond {
    pub donor_side: DonorSide,
    pub distance: f64,
}

impl BaseHBond {
    pub fn new(donor_side: DonorSide, distance: f64) -> Self {
        Self {
            donor_side,
            distance,
        }
    }
}

impl Interaction for BaseHBond {
    fn detect(
        &self,
        ligand: &Residue,
        target: &Residue,
    ) -> Result<Option<Evidence>, DetectionError> {
        let (ligand_filter, target_filter) = match self.donor_side {
            DonorSide::Ligand => (AtomFilter::Donor, AtomFilter::Acceptor),
            DonorSide::Target => (AtomFilter::Acceptor, AtomFilter::Donor),
        };
        Distance::new(ligand_filter, target_filter, self.distance).detect(ligand, target)
    }
}

/// Contact closer than the sum of both atoms' van der Waals radii plus a tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct VdWContact {
    pub tolerance: f64,
}

impl Default for VdWContact {
    fn default() -> Self {
        Self { tolerance: 0.0 }
    }
}

impl Interaction for VdWContact {
    fn detect(
        &self,
        ligand: &Residue,
        target: &Residue,
    ) -> Result<Option<Evidence>, DetectionError> {
        Ok(closest_pair(
            ligand,
            target,
            AtomFilter::Any,
            AtomFilter::Any,
            |a, b| vdw_radius(&a.element) + vdw_radius(&b.element) + self.tolerance,
        )
        .map(|(i, j, d)| Evidence::new(ligand, target, &[i], &[j]).with_metric("distance", d)))
    }
}

pub(crate) fn register_defaults(registry: &mut InteractionRegistry) {
    registry.register_hidden("_Distance", || {
        Distance::new(AtomFilter::Any, AtomFilter::Any, HYDROPHOBIC_DISTANCE)
    });
    registry.register_hidden("_BaseHBond", || {
        BaseHBond::new(DonorSide::Ligand, HBOND_DISTANCE)
    });

    registry.register("Hydrophobic", || {
        Distance::new(
            AtomFilter::Hydrophobic,
            AtomFilter::Hydrophobic,
            HYDROPHOBIC_DISTANCE,
        )
    });
    registry.register("Cationic", || {
        Distance::new(AtomFilter::Cation, AtomFilter::Anion, IONIC_DISTANCE)
    });
    registry.register("Anionic", || {
        Distance::new(AtomFilter::Anion, AtomFilter::Cation, IONIC_DISTANCE)
    });
    registry.register("HBDonor", || BaseHBond::new(DonorSide::Ligand, HBOND_DISTANCE));
    registry.register("HBAcceptor", || {
        BaseHBond::new(DonorSide::Target, HBOND_DISTANCE)
    });
    registry.register("VdWContact", VdWContact::default);
}
