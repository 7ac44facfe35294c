//! # Core Models Module
//!
//! Data structures describing the structures handed to the fingerprint engine.
//!
//! ## Overview
//!
//! The engine never parses files or perceives chemistry. Structure providers build
//! these models (usually through a [`crate::core::io::StructureConverter`]) with the
//! annotations detectors need: element symbols, formal charges and hydrogen-bond
//! roles.
//!
//! ## Key Components
//!
//! - [`ids`] - [`ids::ResidueId`], the hashable entity identifier with a canonical string form
//! - [`atom`] - Atoms with coordinates and chemical annotations
//! - [`residue`] - Entities and their parent-index side-channel
//! - [`molecule`] - Ordered residue collections and the [`molecule::MoleculeBuilder`]
//!
//! ## Usage
//!
//! ```
//! use ifprint::core::models::atom::Atom;
//! use ifprint::core::models::molecule::MoleculeBuilder;
//! use nalgebra::Point3;
//!
//! let mut builder = MoleculeBuilder::new();
//! builder.residue(
//!     "LIG1.G".parse().unwrap(),
//!     vec![Atom::new("C1", "C", Point3::new(0.0, 0.0, 0.0))],
//! );
//! let ligand = builder.build();
//! assert_eq!(ligand.n_atoms(), 1);
//! ```

pub mod atom;
pub mod ids;
pub mod molecule;
pub mod residue;
