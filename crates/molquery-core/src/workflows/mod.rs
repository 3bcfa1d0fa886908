//! # Workflows Module
//!
//! High-level entry points that evaluate a complete query against a structure.
//!
//! ## Architecture
//!
//! - **Evaluation Workflow** ([`evaluate`]) - Creates the evaluation context from
//!   configuration, runs the query, reports progress and checks that the context was left
//!   balanced.

pub mod evaluate;
