//! # ifprint
//!
//! Protein-ligand interaction fingerprints.
//!
//! For every frame of a trajectory (or every independently supplied ligand structure)
//! the library records which named interactions hold between each ligand residue and
//! each nearby target residue, together with the atoms and distances supporting them.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Structure models, the interaction detector contract
//!   and registry, and the frame and structure-converter interfaces.
//!
//! - **[`engine`]: The Machinery.** Per-pair evidence assembly, per-frame generation,
//!   ordered parallel execution, exports and persistence.
//!
//! - **[`workflows`]: The Public API.** The [`workflows::fingerprint::Fingerprint`]
//!   orchestrator.
//!
//! ## Usage
//!
//! ```
//! use ifprint::core::interactions::InteractionRegistry;
//! use ifprint::core::models::atom::Atom;
//! use ifprint::core::models::molecule::MoleculeBuilder;
//! use ifprint::engine::frame::ResidueScope;
//! use ifprint::workflows::fingerprint::{Fingerprint, InteractionSelection};
//! use nalgebra::Point3;
//!
//! let registry = InteractionRegistry::with_defaults();
//! let mut fp = Fingerprint::new(&registry, InteractionSelection::names(["Hydrophobic"])).unwrap();
//!
//! let mut ligand = MoleculeBuilder::new();
//! ligand.residue("LIG1.G".parse().unwrap(), vec![Atom::new("C1", "C", Point3::origin())]);
//! let mut target = MoleculeBuilder::new();
//! target.residue(
//!     "VAL201.A".parse().unwrap(),
//!     vec![Atom::new("CG1", "C", Point3::new(3.8, 0.0, 0.0))],
//! );
//!
//! let frame = fp.generate(&ligand.build(), &target.build(), &ResidueScope::Auto).unwrap();
//! assert_eq!(frame.len(), 1);
//! assert_eq!(fp.to_bitvectors().unwrap()[0].to_string(), "1");
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
