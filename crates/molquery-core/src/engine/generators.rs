//! Leaf queries that select elements directly from the input structure.

use super::context::{ElementCursor, QueryContext};
use super::error::EngineError;
use super::props;
use super::query::StructureQuery;
use super::selection::StructureSelection;
use crate::core::models::error::ModelError;
use crate::core::models::ids::{ElementIndex, UnitId};
use crate::core::models::subset::UniqueSubsetBuilder;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{debug, instrument};

/// Selects the whole input structure as a singleton.
#[derive(Debug, Clone, Copy, Default)]
pub struct All;

pub fn all() -> All {
    All
}

impl StructureQuery for All {
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        let input = ctx.input_structure().clone();
        Ok(StructureSelection::singleton(input.clone(), input))
    }
}

/// Selects nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nothing;

pub fn none() -> Nothing {
    Nothing
}

impl StructureQuery for Nothing {
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        Ok(StructureSelection::empty(ctx.input_structure().clone()))
    }
}

/// Selects, as one singleton structure, every element whose cursor satisfies `test`.
pub struct Atoms<T> {
    test: T,
}

pub fn atoms<T>(test: T) -> Atoms<T>
where
    T: Fn(&ElementCursor) -> bool,
{
    Atoms { test }
}

impl<T> StructureQuery for Atoms<T>
where
    T: Fn(&ElementCursor) -> bool,
{
    #[instrument(skip_all, name = "atoms")]
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        let input = ctx.input_structure().clone();
        let mut scope = ctx.push_current_element();
        scope.element_mut().set_structure(&input);

        let mut builder = input.subset_builder();
        for unit in input.units() {
            scope.check_timeout()?;
            scope.element_mut().set_unit(unit);
            builder.begin_unit(unit.id());
            for &element in unit.elements() {
                scope.element_mut().set_element(element);
                if (self.test)(scope.element()) {
                    builder.add_element(element);
                }
            }
            builder.commit_unit();
        }

        let structure = builder.into_structure();
        debug!(elements = structure.element_count(), "Atom test applied.");
        Ok(StructureSelection::singleton(input, structure))
    }
}

/// Selects elements satisfying `test`, one structure per distinct `group_by` key.
///
/// Groups are emitted in the order their first element is met.
pub struct AtomGroups<T, G> {
    test: T,
    group_by: G,
}

pub fn atom_groups<T, G, K>(test: T, group_by: G) -> AtomGroups<T, G>
where
    T: Fn(&ElementCursor) -> bool,
    G: Fn(&ElementCursor) -> K,
    K: Hash + Eq,
{
    AtomGroups { test, group_by }
}

/// Groups elements satisfying `test` by residue.
pub fn residues<T>(
    test: T,
) -> AtomGroups<T, fn(&ElementCursor) -> Option<(UnitId, usize)>>
where
    T: Fn(&ElementCursor) -> bool,
{
    AtomGroups {
        test,
        group_by: props::residue_key,
    }
}

impl<T, G, K> StructureQuery for AtomGroups<T, G>
where
    T: Fn(&ElementCursor) -> bool,
    G: Fn(&ElementCursor) -> K,
    K: Hash + Eq,
{
    #[instrument(skip_all, name = "atom_groups")]
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        let input = ctx.input_structure().clone();
        let mut scope = ctx.push_current_element();
        scope.element_mut().set_structure(&input);

        let mut group_index: HashMap<K, usize> = HashMap::new();
        let mut groups: Vec<UniqueSubsetBuilder<'_>> = Vec::new();
        for unit in input.units() {
            scope.check_timeout()?;
            scope.element_mut().set_unit(unit);
            for &element in unit.elements() {
                scope.element_mut().set_element(element);
                if !(self.test)(scope.element()) {
                    continue;
                }
                let key = (self.group_by)(scope.element());
                let index = *group_index.entry(key).or_insert_with(|| {
                    groups.push(input.unique_subset_builder());
                    groups.len() - 1
                });
                groups[index].add_to_unit(unit.id(), element);
            }
        }

        let structures: Vec<_> = groups
            .into_iter()
            .map(UniqueSubsetBuilder::into_structure)
            .collect();
        debug!(groups = structures.len(), "Atoms grouped.");
        Ok(StructureSelection::sequence(input.clone(), structures))
    }
}

/// Selects the given elements of one unit, restricted to what the input contains.
///
/// An index that does not exist in the unit's model fails with
/// [`ModelError::ElementOutOfRange`].
#[derive(Debug, Clone)]
pub struct Elements {
    unit_id: UnitId,
    elements: Vec<ElementIndex>,
}

pub fn elements(unit_id: UnitId, elements: Vec<ElementIndex>) -> Elements {
    Elements { unit_id, elements }
}

impl StructureQuery for Elements {
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        let input = ctx.input_structure().clone();
        let mut builder = input.unique_subset_builder();
        if let Some(unit) = input.unit(self.unit_id) {
            let count = unit.model().element_count();
            for &element in &self.elements {
                if element >= count {
                    return Err(ModelError::ElementOutOfRange {
                        unit_id: self.unit_id,
                        element,
                        count,
                    }
                    .into());
                }
                if unit.contains(element) {
                    builder.add_to_unit(self.unit_id, element);
                }
            }
        }
        let structure = builder.into_structure();
        Ok(StructureSelection::singleton(input, structure))
    }
}
