//! # Interactions Module
//!
//! The detector contract, the registry detectors are selected from, and a set of
//! reference detectors.
//!
//! ## Overview
//!
//! An interaction is a named, pluggable predicate over two entities. Every detector
//! implements [`Interaction`]: given a ligand residue and a target residue it reports
//! either no match or one [`Evidence`] record. Detectors are stateless and
//! independent of each other, so a single shared instance can be used from many
//! worker threads at once.
//!
//! Detectors become selectable by name once registered in an
//! [`InteractionRegistry`]. Registration is always explicit; defining a type never
//! registers it.
//!
//! ## Key Components
//!
//! - [`evidence`] - [`Evidence`] records and the per-pair [`InteractionData`] map
//! - [`registry`] - [`InteractionRegistry`], an upsert catalog of detector factories
//! - [`builtin`] - Distance-based reference detectors (`Hydrophobic`, `HBDonor`, ...)

pub mod builtin;
pub mod evidence;
pub mod registry;

pub use evidence::{Evidence, InteractionData, RoleIndices};
pub use registry::{InteractionRegistry, RegistryEntry};

use crate::core::models::residue::Residue;
use std::fmt;
use thiserror::Error;

/// Error raised by a detector that cannot evaluate a pair.
///
/// Detection errors are never swallowed: the engine aborts the whole run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DetectionError(pub String);

impl DetectionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The capability every interaction type implements.
pub trait Interaction: fmt::Debug + Send + Sync {
    /// Evaluates the interaction between a ligand entity and a target entity.
    ///
    /// # Return
    ///
    /// `Ok(None)` when the interaction does not hold, `Ok(Some(evidence))` when it
    /// does.
    ///
    /// # Errors
    ///
    /// Returns a [`DetectionError`] if the pair cannot be evaluated at all.
    fn detect(
        &self,
        ligand: &Residue,
        target: &Residue,
    ) -> Result<Option<Evidence>, DetectionError>;
}
