use super::error::ModelError;
use super::ids::{ElementIndex, UnitId};
use super::subset::{SubsetBuilder, UniqueSubsetBuilder};
use super::unit::Unit;
use crate::core::spatial::lookup::StructureLookup3d;
use std::collections::HashMap;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// An immutable, ordered collection of units.
///
/// Cloning a structure is cheap and yields the same snapshot. Units are kept sorted by
/// id and never empty. The spatial index and the content hash are computed on first use
/// and cached for the lifetime of the snapshot.
#[derive(Clone)]
pub struct Structure {
    inner: Arc<StructureData>,
}

struct StructureData {
    units: Vec<Unit>,
    unit_index: HashMap<UnitId, usize>,
    element_count: usize,
    hash_code: OnceLock<u64>,
    lookup: OnceLock<StructureLookup3d>,
}

impl Structure {
    /// Creates a structure from units with distinct ids. Empty units are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateUnit`] if two units share an id.
    pub fn new(mut units: Vec<Unit>) -> Result<Self, ModelError> {
        units.sort_by_key(Unit::id);
        if let Some(pair) = units.windows(2).find(|w| w[0].id() == w[1].id()) {
            return Err(ModelError::DuplicateUnit(pair[0].id()));
        }
        Ok(Self::from_sorted_units(units))
    }

    pub fn empty() -> Self {
        Self::from_sorted_units(Vec::new())
    }

    /// Builds a structure from units already sorted by unique id.
    pub(crate) fn from_sorted_units(mut units: Vec<Unit>) -> Self {
        units.retain(|unit| unit.element_count() > 0);
        debug_assert!(units.windows(2).all(|w| w[0].id() < w[1].id()));

        let unit_index = units
            .iter()
            .enumerate()
            .map(|(index, unit)| (unit.id(), index))
            .collect();
        let element_count = units.iter().map(Unit::element_count).sum();

        Self {
            inner: Arc::new(StructureData {
                units,
                unit_index,
                element_count,
                hash_code: OnceLock::new(),
                lookup: OnceLock::new(),
            }),
        }
    }

    pub fn units(&self) -> &[Unit] {
        &self.inner.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.inner
            .unit_index
            .get(&id)
            .map(|&index| &self.inner.units[index])
    }

    pub fn unit_count(&self) -> usize {
        self.inner.units.len()
    }

    pub fn element_count(&self) -> usize {
        self.inner.element_count
    }

    pub fn is_empty(&self) -> bool {
        self.inner.element_count == 0
    }

    pub fn contains(&self, unit_id: UnitId, element: ElementIndex) -> bool {
        self.unit(unit_id)
            .is_some_and(|unit| unit.contains(element))
    }

    /// Iterates every `(unit, element)` pair in unit order, elements ascending.
    pub fn elements(&self) -> impl Iterator<Item = (&Unit, ElementIndex)> {
        self.units()
            .iter()
            .flat_map(|unit| unit.elements().iter().map(move |&element| (unit, element)))
    }

    /// Returns `true` if both handles point to the same snapshot.
    pub fn same_as(&self, other: &Structure) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Content hash over unit ids and element sequences.
    pub fn hash_code(&self) -> u64 {
        *self.inner.hash_code.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            for unit in self.units() {
                unit.id().hash(&mut hasher);
                unit.elements().hash(&mut hasher);
            }
            hasher.finish()
        })
    }

    /// Spatial index over every element of this structure, built on first use.
    pub fn lookup3d(&self) -> &StructureLookup3d {
        self.inner
            .lookup
            .get_or_init(|| StructureLookup3d::new(self))
    }

    /// Begins a scoped subset of this structure (see [`SubsetBuilder`]).
    pub fn subset_builder(&self) -> SubsetBuilder<'_> {
        SubsetBuilder::new(self)
    }

    /// Begins a direct-insertion subset of this structure (see [`UniqueSubsetBuilder`]).
    pub fn unique_subset_builder(&self) -> UniqueSubsetBuilder<'_> {
        UniqueSubsetBuilder::new(self)
    }
}

impl PartialEq for Structure {
    fn eq(&self, other: &Self) -> bool {
        if self.same_as(other) {
            return true;
        }
        self.element_count() == other.element_count()
            && self.unit_count() == other.unit_count()
            && self.hash_code() == other.hash_code()
            && self.units() == other.units()
    }
}

impl Eq for Structure {}

impl Hash for Structure {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl Default for Structure {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Structure")
            .field("units", &self.unit_count())
            .field("elements", &self.element_count())
            .finish()
    }
}
