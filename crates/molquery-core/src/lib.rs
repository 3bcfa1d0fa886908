//! # molquery Core Library
//!
//! A compositional query engine for hierarchical, unit-partitioned molecular structures.
//! Queries select atoms by residue membership, spatial proximity, set algebra and
//! property-based grouping, and always produce immutable derived substructures.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Immutable structure models (`Model`, `Unit`, `Structure`),
//!   residue segmentation, element-wise set operations, subset builders and the spatial
//!   index used for neighbor searches.
//!
//! - **[`engine`]: The Logic Core.** The evaluation context (input stack, element cursor,
//!   deadline), selections, the `StructureQuery` abstraction, and the query generators and
//!   combinators built on top of it.
//!
//! - **[`workflows`]: The Public API.** Entry points that evaluate a complete query against a
//!   structure with configuration, logging and progress reporting.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
pub(crate) mod testing;
