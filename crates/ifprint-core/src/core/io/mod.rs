//! Interfaces to the collaborators that supply structures.
//!
//! The engine never parses files. It reads [`Frame`]s from a [`Trajectory`] and turns
//! them into [`crate::core::models::molecule::Molecule`]s through a
//! [`StructureConverter`]. [`TemplateConverter`] is a minimal converter that maps
//! frame positions onto a pre-built template.

pub mod template;
pub mod traits;

pub use template::{AtomGroup, TemplateConverter};
pub use traits::{
    ConversionError, ConverterOptions, Frame, Strided, StructureConverter, Trajectory,
};
