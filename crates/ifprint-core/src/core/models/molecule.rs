use super::atom::Atom;
use super::ids::ResidueId;
use super::residue::Residue;
use nalgebra::Point3;
use std::collections::HashMap;

/// A structure made of ordered residues, as handed to the fingerprint engine.
///
/// Residue order is the order in which residues were added and is the order in
/// which the engine enumerates them. Lookup by [`ResidueId`] is constant time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    residues: Vec<Residue>,
    residue_index: HashMap<ResidueId, usize>,
}

impl Molecule {
    /// Creates a new, empty molecule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a molecule from already prepared residues.
    ///
    /// Residues sharing an identifier are merged into the first occurrence; the
    /// parent-index side-channel is kept only if every merged part carries one.
    pub fn from_residues(residues: impl IntoIterator<Item = Residue>) -> Self {
        let mut molecule = Self::new();
        for residue in residues {
            molecule.push_residue(residue);
        }
        molecule
    }

    pub(crate) fn push_residue(&mut self, residue: Residue) {
        match self.residue_index.get(&residue.id) {
            Some(&idx) => {
                let existing = &mut self.residues[idx];
                existing.parent_indices = match (existing.parent_indices.take(), residue.parent_indices) {
                    (Some(mut a), Some(b)) => {
                        a.extend(b);
                        Some(a)
                    }
                    _ => None,
                };
                existing.atoms.extend(residue.atoms);
            }
            None => {
                self.residue_index
                    .insert(residue.id.clone(), self.residues.len());
                self.residues.push(residue);
            }
        }
    }

    pub fn residue(&self, id: &ResidueId) -> Option<&Residue> {
        self.residue_index.get(id).map(|&idx| &self.residues[idx])
    }

    pub fn contains(&self, id: &ResidueId) -> bool {
        self.residue_index.contains_key(id)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue_ids(&self) -> impl Iterator<Item = &ResidueId> {
        self.residues.iter().map(|r| &r.id)
    }

    /// Number of residues.
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn n_atoms(&self) -> usize {
        self.residues.iter().map(Residue::len).sum()
    }

    /// Iterates over all atoms, residue by residue.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.residues.iter().flat_map(|r| r.atoms.iter())
    }

    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.atoms().map(|atom| &atom.position)
    }
}

/// Incrementally assembles a [`Molecule`], numbering atoms as they are added.
///
/// Every residue produced by the builder carries a parent-index side-channel that
/// points at the atom's position in the whole molecule.
#[derive(Debug, Default)]
pub struct MoleculeBuilder {
    molecule: Molecule,
    next_atom_index: usize,
}

impl MoleculeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds atoms to the residue `id`, creating the residue on first use.
    pub fn residue(&mut self, id: ResidueId, atoms: Vec<Atom>) -> &mut Self {
        let start = self.next_atom_index;
        self.next_atom_index += atoms.len();
        let residue = Residue {
            id,
            atoms,
            parent_indices: Some((start..self.next_atom_index).collect()),
        };
        self.molecule.push_residue(residue);
        self
    }

    pub fn build(self) -> Molecule {
        self.molecule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carbon(name: &str, x: f64) -> Atom {
        Atom::new(name, "C", Point3::new(x, 0.0, 0.0))
    }

    #[test]
    fn builder_assigns_running_parent_indices() {
        let mut builder = MoleculeBuilder::new();
        builder
            .residue(ResidueId::new("ALA", 1, Some("A")), vec![carbon("CA", 0.0), carbon("CB", 1.0)])
            .residue(ResidueId::new("GLY", 2, Some("A")), vec![carbon("CA", 3.0)]);
        let molecule = builder.build();

        assert_eq!(molecule.len(), 2);
        assert_eq!(molecule.n_atoms(), 3);
        let gly = molecule.residue(&"GLY2.A".parse().unwrap()).unwrap();
        assert_eq!(gly.parent_indices(), Some(&[2][..]));
    }

    #[test]
    fn builder_merges_atoms_of_repeated_residue() {
        let mut builder = MoleculeBuilder::new();
        let id = ResidueId::new("LIG", 1, Some("G"));
        builder
            .residue(id.clone(), vec![carbon("C1", 0.0)])
            .residue(ResidueId::new("HOH", 5, None), vec![Atom::new("O", "O", Point3::origin())])
            .residue(id.clone(), vec![carbon("C2", 1.0)]);
        let molecule = builder.build();

        assert_eq!(molecule.len(), 2);
        let lig = molecule.residue(&id).unwrap();
        assert_eq!(lig.len(), 2);
        assert_eq!(lig.parent_indices(), Some(&[0, 2][..]));
    }

    #[test]
    fn residues_keep_insertion_order() {
        let molecule = Molecule::from_residues(vec![
            Residue::new(ResidueId::new("TYR", 109, Some("A")), vec![carbon("CZ", 0.0)]),
            Residue::new(ResidueId::new("ASP", 3, Some("A")), vec![carbon("CG", 1.0)]),
        ]);
        let ids: Vec<String> = molecule.residue_ids().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["TYR109.A", "ASP3.A"]);
    }

    #[test]
    fn merging_drops_partial_side_channel() {
        let id = ResidueId::new("LIG", 1, None);
        let with_map = Residue::new(id.clone(), vec![carbon("C1", 0.0)])
            .with_parent_indices(vec![7])
            .unwrap();
        let without_map = Residue::new(id.clone(), vec![carbon("C2", 0.0)]);
        let molecule = Molecule::from_residues(vec![with_map, without_map]);
        assert!(molecule.residue(&id).unwrap().parent_indices().is_none());
    }

    #[test]
    fn unknown_residue_lookup_returns_none() {
        let molecule = Molecule::new();
        assert!(molecule.residue(&"ALA1.A".parse().unwrap()).is_none());
        assert!(molecule.is_empty());
        assert_eq!(molecule.positions().count(), 0);
    }
}
