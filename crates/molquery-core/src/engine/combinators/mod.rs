//! Query combinators: modifiers that wrap queries and transform their selections.
//!
//! - [`residues`] - expand selections to whole residues
//! - [`surroundings`] - add every element within a radius of the selection
//! - [`nested`] - re-run a query with each selected structure as the input
//! - [`algebra`] - intersection, difference and union of selections
//! - [`properties`] - partition the input by a property claimed by selected elements
//! - [`filter`] - keep structures satisfying a predicate

pub mod algebra;
pub mod filter;
pub mod nested;
pub mod properties;
pub mod residues;
pub mod surroundings;
