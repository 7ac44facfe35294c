//! # Core Module
//!
//! Stateless building blocks of the fingerprint engine.
//!
//! ## Overview
//!
//! Everything in this module is a plain value or a pure function: the structure
//! representation the detectors look at, the detector contract with its registry,
//! and the interfaces through which frames and structures enter the engine.
//!
//! - **Structure Representation** ([`models`]) - Residue identifiers, atoms, residues and molecules
//! - **Interaction Detection** ([`interactions`]) - The [`interactions::Interaction`] trait, evidence records and the registry
//! - **Input Collaborators** ([`io`]) - Frames, trajectories and structure converters

pub mod interactions;
pub mod io;
pub mod models;
