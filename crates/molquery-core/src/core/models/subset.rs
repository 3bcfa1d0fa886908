use super::ids::{ElementIndex, UnitId};
use super::structure::Structure;
use super::unit::Unit;
use std::collections::{BTreeMap, BTreeSet};

/// Assembles a substructure of a source structure unit by unit.
///
/// Elements are collected between [`begin_unit`](Self::begin_unit) and
/// [`commit_unit`](Self::commit_unit). An element added more than once to the same unit
/// is kept once, and every unit is emitted with ascending elements. Finalizing consumes
/// the builder, so it cannot be finalized twice or modified afterwards.
///
/// # Panics
///
/// Misuse is an invariant violation and panics: adding an element with no open unit,
/// opening a unit while another is open, or finalizing with a unit id the source does
/// not contain or an element outside that unit's model.
pub struct SubsetBuilder<'a> {
    source: &'a Structure,
    committed: BTreeMap<UnitId, Vec<ElementIndex>>,
    current: Option<(UnitId, Vec<ElementIndex>)>,
}

impl<'a> SubsetBuilder<'a> {
    pub fn new(source: &'a Structure) -> Self {
        Self {
            source,
            committed: BTreeMap::new(),
            current: None,
        }
    }

    pub fn begin_unit(&mut self, unit_id: UnitId) {
        assert!(
            self.current.is_none(),
            "begin_unit called while unit {} is still open",
            self.current.as_ref().map_or(0, |(id, _)| *id)
        );
        self.current = Some((unit_id, Vec::new()));
    }

    pub fn add_element(&mut self, element: ElementIndex) {
        self.current
            .as_mut()
            .expect("add_element called without an open unit")
            .1
            .push(element);
    }

    pub fn commit_unit(&mut self) {
        let (unit_id, elements) = self
            .current
            .take()
            .expect("commit_unit called without an open unit");
        if !elements.is_empty() {
            self.committed.entry(unit_id).or_default().extend(elements);
        }
    }

    /// Copies a whole element sequence for one unit, bypassing begin/commit.
    pub fn set_unit(&mut self, unit_id: UnitId, elements: &[ElementIndex]) {
        assert!(
            self.current.is_none(),
            "set_unit called while a unit is still open"
        );
        if !elements.is_empty() {
            self.committed
                .entry(unit_id)
                .or_default()
                .extend_from_slice(elements);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Finalizes the builder into a structure over the source's units.
    pub fn into_structure(self) -> Structure {
        assert!(
            self.current.is_none(),
            "into_structure called while a unit is still open"
        );
        let source = self.source;
        let units = self
            .committed
            .into_iter()
            .map(|(unit_id, mut elements)| {
                elements.sort_unstable();
                elements.dedup();
                source_unit(source, unit_id).with_elements(elements)
            })
            .collect();
        Structure::from_sorted_units(units)
    }
}

/// Assembles a substructure from individual `(unit, element)` hits.
///
/// Hits may arrive in any order and any number of times; each element is kept once
/// across the whole lifetime of the builder. This is the builder the spatial index
/// feeds neighbor hits into.
///
/// # Panics
///
/// Finalizing panics if a hit references a unit id the source does not contain or an
/// element outside that unit's model.
pub struct UniqueSubsetBuilder<'a> {
    source: &'a Structure,
    units: BTreeMap<UnitId, BTreeSet<ElementIndex>>,
}

impl<'a> UniqueSubsetBuilder<'a> {
    pub fn new(source: &'a Structure) -> Self {
        Self {
            source,
            units: BTreeMap::new(),
        }
    }

    pub fn source(&self) -> &'a Structure {
        self.source
    }

    /// Records `element` for `unit_id`. Returns `true` if it was not recorded before.
    pub fn add_to_unit(&mut self, unit_id: UnitId, element: ElementIndex) -> bool {
        self.units.entry(unit_id).or_default().insert(element)
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn element_count(&self) -> usize {
        self.units.values().map(BTreeSet::len).sum()
    }

    pub fn into_structure(self) -> Structure {
        let source = self.source;
        let units = self
            .units
            .into_iter()
            .map(|(unit_id, elements)| {
                source_unit(source, unit_id).with_elements(elements.into_iter().collect())
            })
            .collect();
        Structure::from_sorted_units(units)
    }
}

fn source_unit(source: &Structure, unit_id: UnitId) -> &Unit {
    source
        .unit(unit_id)
        .unwrap_or_else(|| panic!("unit {unit_id} is not part of the source structure"))
}
