//! # Workflows Module
//!
//! The public entry point of the library.
//!
//! [`fingerprint::Fingerprint`] ties the registry, the engine and the structure
//! collaborators together: it resolves the selected interactions once, drives frame
//! generation over a trajectory or a collection of ligand structures, and exposes the
//! stored result through tables, bit vectors and a persisted form.

pub mod fingerprint;
