//! # Core Module
//!
//! Stateless building blocks of the query engine.
//!
//! - **Structure Models** ([`models`]) - Models, units, structures, residue segmentation,
//!   set operations and subset builders
//! - **Spatial Search** ([`spatial`]) - Radius queries over the 3D coordinates of a structure
//!
//! Everything in this module is immutable once built. Derived structures share models and
//! coordinates with the structure they were built from and differ only in which units and
//! elements they include.

pub mod models;
pub mod spatial;
