//! # Engine Module
//!
//! This module implements query evaluation over immutable structures: the evaluation
//! context, selections, the [`query::StructureQuery`] abstraction, and the generators and
//! combinators queries are composed from.
//!
//! ## Overview
//!
//! A query is evaluated against a [`context::QueryContext`], which carries the current
//! input structure, an element cursor for property functions and an optional deadline.
//! Every query produces a [`selection::StructureSelection`] of structures derived from
//! its input. Combinators own their sub-queries and transform their selections.
//!
//! ## Architecture
//!
//! - **Context** ([`context`]) - Input stack, element cursor and deadline, with scope guards
//! - **Selections** ([`selection`]) - Singleton and sequence results, deduplicating builder
//! - **Queries** ([`query`]) - The query trait, boxed queries and closure-backed queries
//! - **Generators** ([`generators`]) - Leaf queries selecting elements from the input
//! - **Properties** ([`props`]) - Element property functions for tests and grouping
//! - **Combinators** ([`combinators`]) - Residue, surroundings, nesting, set algebra,
//!   property expansion and filtering
//! - **Configuration** ([`config`]) - Evaluation settings and their TOML form
//! - **Progress Monitoring** ([`progress`]) - Progress reporting callbacks
//! - **Error Handling** ([`error`]) - Engine-specific error types and error propagation

pub mod combinators;
pub mod config;
pub mod context;
pub mod error;
pub mod generators;
pub mod progress;
pub mod props;
pub mod query;
pub mod selection;
