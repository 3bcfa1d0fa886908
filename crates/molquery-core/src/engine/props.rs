//! Element property functions evaluated against the context's element cursor.
//!
//! Each returns `None` when the cursor does not point at an element carrying the
//! property (no unit set, or a coarse unit for atom/residue annotations), so they can be
//! used directly as grouping keys.

use super::context::ElementCursor;
use crate::core::models::ids::UnitId;
use crate::core::models::unit::UnitKind;

pub fn unit_id(cursor: &ElementCursor) -> Option<UnitId> {
    cursor.unit().map(|unit| unit.id())
}

pub fn unit_kind(cursor: &ElementCursor) -> Option<UnitKind> {
    cursor.unit().map(|unit| unit.kind())
}

pub fn residue_index(cursor: &ElementCursor) -> Option<usize> {
    cursor.residue_index()
}

/// Identifies a residue across units: the same residue of two symmetry copies differs.
pub fn residue_key(cursor: &ElementCursor) -> Option<(UnitId, usize)> {
    Some((unit_id(cursor)?, cursor.residue_index()?))
}

pub fn residue_name(cursor: &ElementCursor) -> Option<String> {
    cursor.residue().map(|residue| residue.name.clone())
}

pub fn residue_seq_id(cursor: &ElementCursor) -> Option<isize> {
    cursor.residue().map(|residue| residue.seq_id)
}

pub fn chain_label(cursor: &ElementCursor) -> Option<char> {
    cursor.residue().map(|residue| residue.chain)
}

pub fn atom_name(cursor: &ElementCursor) -> Option<String> {
    cursor.atom().map(|atom| atom.name.clone())
}

pub fn element_symbol(cursor: &ElementCursor) -> Option<String> {
    cursor.atom().map(|atom| atom.element.clone())
}
