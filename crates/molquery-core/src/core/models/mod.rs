//! # Core Models Module
//!
//! Data structures describing a hierarchical, unit-partitioned molecular structure.
//!
//! ## Key Components
//!
//! - [`model`] - Shared atomic hierarchy and coordinates a unit refers to
//! - [`builder`] - Incremental construction of atomic models (chains, residues, atoms)
//! - [`segmentation`] - Residue segmentation of a model's element space
//! - [`unit`] - A subset of one model's elements, optionally transformed
//! - [`structure`] - Immutable collection of units, the value queries operate on
//! - [`set_ops`] - Element-wise union, intersection and subtraction of structures
//! - [`subset`] - Builders assembling deduplicated substructures of a source structure
//! - [`interactions`] - Interaction and feature type enumerations
//! - [`ids`] - Identifier types for units and elements
//!
//! ## Usage
//!
//! ```ignore
//! use molquery::core::models::{builder::ModelBuilder, structure::Structure, unit::{Unit, UnitKind}};
//! use nalgebra::Point3;
//! use std::sync::Arc;
//!
//! let mut builder = ModelBuilder::new("1abc");
//! builder
//!     .start_chain('A')
//!     .start_residue(1, "GLY")
//!     .add_atom("N", "N", Point3::new(0.0, 0.0, 0.0))
//!     .add_atom("CA", "C", Point3::new(1.4, 0.0, 0.0));
//! let model = Arc::new(builder.build()?);
//!
//! let unit = Unit::whole(1, UnitKind::Atomic, model)?;
//! let structure = Structure::new(vec![unit])?;
//! ```

pub mod builder;
pub mod error;
pub mod ids;
pub mod interactions;
pub mod model;
pub mod segmentation;
pub mod set_ops;
pub mod structure;
pub mod subset;
pub mod unit;
