use super::ids::{ElementIndex, UnitId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Residue offsets must start at 0 and increase strictly (violated at offset {position})")]
    InvalidSegmentation { position: usize },

    #[error("Residue {seq_id} '{name}' has no atoms")]
    EmptyResidue { seq_id: isize, name: String },

    #[error("Atomic hierarchy covers {hierarchy} elements but the model has {positions} positions")]
    HierarchyMismatch { hierarchy: usize, positions: usize },

    #[error("Atomic unit {unit_id} requires a model with an atomic hierarchy")]
    MissingHierarchy { unit_id: UnitId },

    #[error("Element {element} is out of range for unit {unit_id} (model has {count} elements)")]
    ElementOutOfRange {
        unit_id: UnitId,
        element: ElementIndex,
        count: usize,
    },

    #[error("Duplicate unit id {0} in structure")]
    DuplicateUnit(UnitId),
}
