use super::atom::Atom;
use super::ids::ResidueId;
use nalgebra::Point3;

/// An addressable chemical entity (usually a residue) and its atoms.
///
/// A residue prepared from a larger parent structure keeps an index-translation
/// side-channel, `parent_indices`, mapping each local atom index to the index of the
/// same atom in the parent. Evidence records use it to report indices that survive
/// any renumbering done while preparing the structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub id: ResidueId,
    pub(crate) atoms: Vec<Atom>,
    pub(crate) parent_indices: Option<Vec<usize>>,
}

impl Residue {
    pub fn new(id: ResidueId, atoms: Vec<Atom>) -> Self {
        Self {
            id,
            atoms,
            parent_indices: None,
        }
    }

    /// Attaches the parent index of every atom.
    ///
    /// Returns `None` if `parent_indices` does not have one entry per atom.
    pub fn with_parent_indices(mut self, parent_indices: Vec<usize>) -> Option<Self> {
        if parent_indices.len() != self.atoms.len() {
            return None;
        }
        self.parent_indices = Some(parent_indices);
        Some(self)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn parent_indices(&self) -> Option<&[usize]> {
        self.parent_indices.as_deref()
    }

    /// Translates a local atom index to its index in the parent structure.
    ///
    /// Without a side-channel, or for an index it does not cover, the local index is
    /// returned unchanged.
    pub fn parent_index(&self, local: usize) -> usize {
        self.parent_indices
            .as_ref()
            .and_then(|map| map.get(local).copied())
            .unwrap_or(local)
    }

    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.atoms.iter().map(|atom| &atom.position)
    }

    /// Iterates over `(local index, atom)` pairs of atoms matching `predicate`.
    pub fn atoms_where<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = (usize, &'a Atom)>
    where
        P: Fn(&Atom) -> bool + 'a,
    {
        self.atoms
            .iter()
            .enumerate()
            .filter(move |(_, atom)| predicate(*atom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residue_with_two_atoms() -> Residue {
        Residue::new(
            ResidueId::new("SER", 7, Some("A")),
            vec![
                Atom::new("CB", "C", Point3::new(0.0, 0.0, 0.0)),
                Atom::new("OG", "O", Point3::new(1.4, 0.0, 0.0)),
            ],
        )
    }

    #[test]
    fn parent_index_falls_back_to_local_index() {
        let residue = residue_with_two_atoms();
        assert!(residue.parent_indices().is_none());
        assert_eq!(residue.parent_index(1), 1);
    }

    #[test]
    fn parent_index_uses_side_channel() {
        let residue = residue_with_two_atoms()
            .with_parent_indices(vec![40, 43])
            .unwrap();
        assert_eq!(residue.parent_index(0), 40);
        assert_eq!(residue.parent_index(1), 43);
    }

    #[test]
    fn with_parent_indices_rejects_length_mismatch() {
        assert!(residue_with_two_atoms().with_parent_indices(vec![1]).is_none());
    }

    #[test]
    fn atoms_where_yields_local_indices() {
        let residue = residue_with_two_atoms();
        let oxygens: Vec<usize> = residue
            .atoms_where(|atom| atom.element == "O")
            .map(|(i, _)| i)
            .collect();
        assert_eq!(oxygens, vec![1]);
    }
}
