//! # Engine Module
//!
//! The fingerprinting machinery: per-pair evidence assembly, per-frame generation,
//! chunked parallel execution, and the views and persisted form of a result.
//!
//! ## Overview
//!
//! Control flows from the orchestrator in [`crate::workflows::fingerprint`] through
//! [`parallel`] workers, each of which runs [`frame::generate_frame`], which in turn
//! asks the [`assembler::EvidenceAssembler`] to evaluate every selected detector on
//! one residue pair. Workers share only immutable state.
//!
//! - **Configuration** ([`config`]) - Proximity cutoff and default worker count
//! - **Error Handling** ([`error`]) - [`error::FingerprintError`] and its sources
//! - **Evidence Assembly** ([`assembler`]) - Bit vectors and evidence maps for one pair
//! - **Frame Generation** ([`frame`]) - Residue scopes and single-frame fingerprints
//! - **Parallel Execution** ([`parallel`]) - Partition, dispatch, ordered collect
//! - **Export** ([`export`]) - Tables, CSV and bit vectors
//! - **Persistence** ([`persist`]) - The TOML document a fingerprint is saved as

pub mod assembler;
pub mod config;
pub mod error;
pub mod export;
pub mod frame;
pub mod parallel;
pub mod persist;
