use crate::core::models::subset::UniqueSubsetBuilder;
use crate::engine::context::{ElementCursor, QueryContext};
use crate::engine::error::EngineError;
use crate::engine::query::StructureQuery;
use crate::engine::selection::{StructureSelection, UniqueStructuresBuilder};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{debug, instrument};

const TIMEOUT_STRIDE: usize = 10;

/// Expands every selected structure to all input elements sharing a property value with
/// one of its elements.
///
/// The first pass records, for each property value, which selected structures claim it.
/// The second pass walks the input once and hands every element whose value is claimed
/// to each claiming structure's result.
pub struct ExpandProperty<Q, P> {
    query: Q,
    property: P,
}

pub fn expand_property<Q, P, K>(query: Q, property: P) -> ExpandProperty<Q, P>
where
    Q: StructureQuery,
    P: Fn(&ElementCursor) -> K,
    K: Hash + Eq,
{
    ExpandProperty { query, property }
}

impl<Q, P, K> StructureQuery for ExpandProperty<Q, P>
where
    Q: StructureQuery,
    P: Fn(&ElementCursor) -> K,
    K: Hash + Eq,
{
    #[instrument(skip_all, name = "expand_property")]
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        let selection = self.query.evaluate(ctx)?;
        let input = ctx.input_structure().clone();
        if selection.is_empty() {
            return Ok(StructureSelection::empty(input));
        }

        let mut scope = ctx.push_current_element();

        let mut claims: HashMap<K, Vec<usize>> = HashMap::new();
        for (index, structure) in selection.iter().enumerate() {
            if index % TIMEOUT_STRIDE == 0 {
                scope.check_timeout()?;
            }
            scope.element_mut().set_structure(structure);
            for unit in structure.units() {
                scope.element_mut().set_unit(unit);
                for &element in unit.elements() {
                    scope.element_mut().set_element(element);
                    let claimants = claims.entry((self.property)(scope.element())).or_default();
                    if claimants.last() != Some(&index) {
                        claimants.push(index);
                    }
                }
            }
        }

        let mut builders: Vec<UniqueSubsetBuilder<'_>> = (0..selection.structure_count())
            .map(|_| input.unique_subset_builder())
            .collect();
        scope.element_mut().set_structure(&input);
        for unit in input.units() {
            scope.check_timeout()?;
            scope.element_mut().set_unit(unit);
            for &element in unit.elements() {
                scope.element_mut().set_element(element);
                if let Some(claimants) = claims.get(&(self.property)(scope.element())) {
                    for &index in claimants {
                        builders[index].add_to_unit(unit.id(), element);
                    }
                }
            }
        }

        let mut result = UniqueStructuresBuilder::new(input.clone());
        for builder in builders {
            result.add(builder.into_structure());
        }
        debug!(
            values = claims.len(),
            structures = result.len(),
            "Property expanded."
        );
        Ok(result.into_selection())
    }
}
