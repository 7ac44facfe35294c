use nalgebra::Point3;
use std::str::FromStr;

/// The hydrogen-bonding role assigned to an atom by the structure provider.
///
/// The fingerprint engine does not perceive chemistry; donors and acceptors are
/// annotations supplied together with the structure and consumed by detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum HBondRole {
    /// The atom takes no part in hydrogen bonding.
    #[default]
    None,
    /// Heavy atom carrying a polar hydrogen.
    Donor,
    /// Heavy atom with a lone pair available for hydrogen bonding.
    Acceptor,
    /// Atom that can act as both (e.g. a hydroxyl oxygen).
    Both,
}

impl HBondRole {
    pub fn is_donor(self) -> bool {
        matches!(self, HBondRole::Donor | HBondRole::Both)
    }

    pub fn is_acceptor(self) -> bool {
        matches!(self, HBondRole::Acceptor | HBondRole::Both)
    }
}

impl FromStr for HBondRole {
    type Err = ();

    /// Parses a string into an `HBondRole`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `()` if the input string does not match any known role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "" => Ok(HBondRole::None),
            "donor" => Ok(HBondRole::Donor),
            "acceptor" => Ok(HBondRole::Acceptor),
            "both" | "donor-acceptor" | "donor_acceptor" => Ok(HBondRole::Both),
            _ => Err(()),
        }
    }
}

/// An atom of an entity, with the annotations detectors rely on.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "OD1").
    pub name: String,
    /// The element symbol (e.g., "C", "Cl").
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Hydrogen-bonding annotation.
    pub hbond_role: HBondRole,
}

impl Atom {
    /// Creates a neutral atom with no hydrogen-bonding role.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `element` - The element symbol.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, element: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element: element.to_string(),
            position,
            formal_charge: 0,
            hbond_role: HBondRole::default(),
        }
    }

    pub fn with_charge(mut self, formal_charge: i8) -> Self {
        self.formal_charge = formal_charge;
        self
    }

    pub fn with_hbond_role(mut self, role: HBondRole) -> Self {
        self.hbond_role = role;
        self
    }

    /// Whether the atom is a hydrogen (or deuterium) by element symbol.
    pub fn is_hydrogen(&self) -> bool {
        matches!(self.element.trim(), "H" | "D")
    }
}
