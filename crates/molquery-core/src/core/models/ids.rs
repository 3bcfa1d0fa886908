/// Stable identifier of a unit within a structure.
pub type UnitId = u32;

/// Index of an element (an atom or coarse site) in its unit's model numbering.
pub type ElementIndex = usize;
