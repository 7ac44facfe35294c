use super::traits::{ConversionError, ConverterOptions, Frame, StructureConverter};
use crate::core::models::molecule::Molecule;
use crate::core::models::residue::Residue;
use serde::Deserialize;

/// A selection of atoms described by a template structure.
///
/// Every residue of the template must carry parent indices; they are the indices of
/// its atoms in the frames the group is applied to. A [`Molecule`] built with
/// [`crate::core::models::molecule::MoleculeBuilder`] over the whole system satisfies
/// this, so groups are usually carved out of such a topology with [`AtomGroup::select`].
#[derive(Debug, Clone, PartialEq)]
pub struct AtomGroup {
    template: Molecule,
}

impl AtomGroup {
    pub fn new(template: Molecule) -> Self {
        Self { template }
    }

    /// Selects the residues of `topology` matching `predicate`.
    pub fn select<P>(topology: &Molecule, predicate: P) -> Self
    where
        P: Fn(&Residue) -> bool,
    {
        Self::new(Molecule::from_residues(
            topology.residues().iter().filter(|r| predicate(r)).cloned(),
        ))
    }

    pub fn template(&self) -> &Molecule {
        &self.template
    }

    pub fn n_atoms(&self) -> usize {
        self.template.n_atoms()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct TemplateSettings {
    #[serde(default)]
    strip_hydrogens: bool,
}

impl TemplateSettings {
    fn from_options(options: &ConverterOptions) -> Result<Self, ConversionError> {
        toml::Value::Table(options.clone())
            .try_into()
            .map_err(|e: toml::de::Error| ConversionError::InvalidOptions(e.to_string()))
    }
}

/// Converts an [`AtomGroup`] by copying its template and taking positions from the frame.
///
/// Recognized options:
///
/// * `strip-hydrogens` (bool) - drop hydrogens; the remaining atoms are renumbered
///   locally while their parent indices keep pointing at the frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateConverter;

impl StructureConverter for TemplateConverter {
    type Selection = AtomGroup;

    fn convert(
        &self,
        frame: &Frame,
        selection: &AtomGroup,
        options: &ConverterOptions,
    ) -> Result<Molecule, ConversionError> {
        let settings = TemplateSettings::from_options(options)?;

        let mut residues = Vec::with_capacity(selection.template.len());
        for template_residue in selection.template.residues() {
            let mut atoms = Vec::with_capacity(template_residue.len());
            let mut parent_indices = Vec::with_capacity(template_residue.len());

            for (local, template_atom) in template_residue.atoms().iter().enumerate() {
                if settings.strip_hydrogens && template_atom.is_hydrogen() {
                    continue;
                }
                let frame_index = template_residue.parent_index(local);
                let position =
                    frame
                        .position(frame_index)
                        .ok_or(ConversionError::AtomOutOfRange {
                            index: frame_index,
                            n_atoms: frame.n_atoms(),
                        })?;

                let mut atom = template_atom.clone();
                atom.position = *position;
                atoms.push(atom);
                parent_indices.push(frame_index);
            }

            let residue = Residue::new(template_residue.id.clone(), atoms)
                .with_parent_indices(parent_indices)
                .ok_or_else(|| {
                    ConversionError::Other(format!(
                        "inconsistent atom bookkeeping for residue {}",
                        template_residue.id
                    ))
                })?;
            residues.push(residue);
        }

        Ok(Molecule::from_residues(residues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::molecule::MoleculeBuilder;
    use nalgebra::Point3;

    fn topology() -> Molecule {
        let mut builder = MoleculeBuilder::new();
        builder
            .residue(
                "ALA1.A".parse().unwrap(),
                vec![
                    Atom::new("CA", "C", Point3::origin()),
                    Atom::new("HA", "H", Point3::origin()),
                ],
            )
            .residue(
                "LIG1.G".parse().unwrap(),
                vec![
                    Atom::new("C1", "C", Point3::origin()),
                    Atom::new("H1", "H", Point3::origin()),
                    Atom::new("O1", "O", Point3::origin()),
                ],
            );
        builder.build()
    }

    fn frame(n: usize, offset: f64) -> Frame {
        Frame::new(
            0,
            (0..n)
                .map(|i| Point3::new(i as f64 + offset, 0.0, 0.0))
                .collect(),
        )
    }

    #[test]
    fn select_keeps_matching_residues() {
        let group = AtomGroup::select(&topology(), |r| r.id.name == "LIG");
        assert_eq!(group.template().len(), 1);
        assert_eq!(group.n_atoms(), 3);
    }

    #[test]
    fn convert_takes_positions_from_frame() {
        let group = AtomGroup::select(&topology(), |r| r.id.name == "LIG");
        let molecule = TemplateConverter
            .convert(&frame(5, 10.0), &group, &ConverterOptions::new())
            .unwrap();
        let lig = molecule.residue(&"LIG1.G".parse().unwrap()).unwrap();
        assert_eq!(lig.atoms()[0].position, Point3::new(12.0, 0.0, 0.0));
        assert_eq!(lig.parent_indices(), Some(&[2, 3, 4][..]));
    }

    #[test]
    fn strip_hydrogens_renumbers_locally_and_keeps_parent_indices() {
        let group = AtomGroup::select(&topology(), |r| r.id.name == "LIG");
        let mut options = ConverterOptions::new();
        options.insert("strip-hydrogens".to_string(), toml::Value::Boolean(true));
        let molecule = TemplateConverter
            .convert(&frame(5, 0.0), &group, &options)
            .unwrap();
        let lig = molecule.residue(&"LIG1.G".parse().unwrap()).unwrap();
        assert_eq!(lig.len(), 2);
        assert_eq!(lig.atoms()[1].name, "O1");
        assert_eq!(lig.parent_index(1), 4);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let group = AtomGroup::new(topology());
        let mut options = ConverterOptions::new();
        options.insert("force".to_string(), toml::Value::Boolean(true));
        let err = TemplateConverter
            .convert(&frame(5, 0.0), &group, &options)
            .unwrap_err();
        assert!(matches!(err, ConversionError::InvalidOptions(_)));
    }

    #[test]
    fn short_frame_is_an_error() {
        let group = AtomGroup::new(topology());
        let err = TemplateConverter
            .convert(&frame(2, 0.0), &group, &ConverterOptions::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ConversionError::AtomOutOfRange {
                index: 2,
                n_atoms: 2
            }
        ));
    }
}
