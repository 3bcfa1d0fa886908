use crate::core::models::structure::Structure;
use crate::engine::context::QueryContext;
use crate::engine::error::EngineError;
use crate::engine::query::StructureQuery;
use crate::engine::selection::{StructureSelection, UniqueStructuresBuilder};
use tracing::{debug, instrument};

const TIMEOUT_STRIDE: usize = 50;

/// Restricts every structure selected by `query` to the elements selected by `by`.
pub struct IntersectBy<Q, B> {
    query: Q,
    by: B,
}

pub fn intersect_by<Q, B>(query: Q, by: B) -> IntersectBy<Q, B>
where
    Q: StructureQuery,
    B: StructureQuery,
{
    IntersectBy { query, by }
}

impl<Q, B> StructureQuery for IntersectBy<Q, B>
where
    Q: StructureQuery,
    B: StructureQuery,
{
    #[instrument(skip_all, name = "intersect_by")]
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        let selection = self.query.evaluate(ctx)?;
        if selection.is_empty() {
            return Ok(selection);
        }
        let by = self.by.evaluate(ctx)?;
        if by.is_empty() {
            return Ok(StructureSelection::empty(ctx.input_structure().clone()));
        }

        let mask = by.union_structure();
        let result = combine(ctx, &selection, |structure| structure.intersect(&mask))?;
        debug!(
            input = selection.structure_count(),
            output = result.structure_count(),
            "Intersection computed."
        );
        Ok(result)
    }
}

/// Removes the elements selected by `by` from every structure selected by `query`.
pub struct ExceptBy<Q, B> {
    query: Q,
    by: B,
}

pub fn except_by<Q, B>(query: Q, by: B) -> ExceptBy<Q, B>
where
    Q: StructureQuery,
    B: StructureQuery,
{
    ExceptBy { query, by }
}

impl<Q, B> StructureQuery for ExceptBy<Q, B>
where
    Q: StructureQuery,
    B: StructureQuery,
{
    #[instrument(skip_all, name = "except_by")]
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        let selection = self.query.evaluate(ctx)?;
        if selection.is_empty() {
            return Ok(selection);
        }
        let by = self.by.evaluate(ctx)?;
        if by.is_empty() {
            return Ok(selection);
        }

        let mask = by.union_structure();
        let result = combine(ctx, &selection, |structure| structure.subtract(&mask))?;
        debug!(
            input = selection.structure_count(),
            output = result.structure_count(),
            "Difference computed."
        );
        Ok(result)
    }
}

fn combine(
    ctx: &QueryContext,
    selection: &StructureSelection,
    op: impl Fn(&Structure) -> Structure,
) -> Result<StructureSelection, EngineError> {
    let mut builder = UniqueStructuresBuilder::new(ctx.input_structure().clone());
    for (index, structure) in selection.iter().enumerate() {
        if index % TIMEOUT_STRIDE == 0 {
            ctx.check_timeout()?;
        }
        builder.add(op(structure));
    }
    Ok(builder.into_selection())
}

/// Merges every structure selected by `query` into one.
pub struct Union<Q> {
    query: Q,
}

pub fn union<Q: StructureQuery>(query: Q) -> Union<Q> {
    Union { query }
}

impl<Q: StructureQuery> StructureQuery for Union<Q> {
    #[instrument(skip_all, name = "union")]
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        let selection = self.query.evaluate(ctx)?;
        let source = selection.source().clone();
        if selection.is_empty() {
            return Ok(StructureSelection::empty(source));
        }
        let merged = selection.union_structure();
        debug!(
            structures = selection.structure_count(),
            elements = merged.element_count(),
            "Selection merged."
        );
        Ok(StructureSelection::sequence(source, vec![merged]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::generators::{all, none};
    use crate::testing;
    use std::cell::Cell;
    use std::rc::Rc;

    fn fixtures() -> (Structure, Vec<Structure>, Vec<Structure>) {
        let structure = testing::mixed_structure();
        let a = vec![
            testing::subset(&structure, &[(1, &[0, 1, 2, 3]), (3, &[0, 1])]),
            testing::subset(&structure, &[(1, &[10, 11]), (2, &[4, 5, 6])]),
            testing::subset(&structure, &[(2, &[15, 16])]),
        ];
        let b = vec![
            testing::subset(&structure, &[(1, &[2, 3, 4, 5]), (2, &[5])]),
            testing::subset(&structure, &[(3, &[1, 2]), (2, &[15, 16])]),
        ];
        (structure, a, b)
    }

    #[test]
    fn intersection_is_contained_in_both_operands() {
        let (structure, a, b) = fixtures();
        let mut ctx = QueryContext::new(structure.clone());
        let selection = intersect_by(testing::select(a.clone()), testing::select(b.clone()))
            .evaluate(&mut ctx)
            .unwrap();

        let a_all = Structure::union_all(&a);
        let b_all = Structure::union_all(&b);
        assert_eq!(selection.structure_count(), 3);
        for result in &selection {
            assert!(result.is_subset_of(&a_all));
            assert!(result.is_subset_of(&b_all));
        }
        assert_eq!(
            selection.structures()[0],
            testing::subset(&structure, &[(1, &[2, 3]), (3, &[1])])
        );
    }

    #[test]
    fn difference_is_disjoint_from_by() {
        let (structure, a, b) = fixtures();
        let mut ctx = QueryContext::new(structure.clone());
        let selection = except_by(testing::select(a), testing::select(b.clone()))
            .evaluate(&mut ctx)
            .unwrap();

        let b_all = Structure::union_all(&b);
        assert_eq!(selection.structure_count(), 2);
        for result in &selection {
            assert!(result.is_disjoint_from(&b_all));
        }
        assert_eq!(
            selection.structures()[1],
            testing::subset(&structure, &[(1, &[10, 11]), (2, &[4, 6])])
        );
    }

    #[test]
    fn difference_and_intersection_partition_the_union() {
        let (structure, a, b) = fixtures();
        let mut ctx = QueryContext::new(structure);

        let except = union(except_by(testing::select(a.clone()), testing::select(b.clone())))
            .evaluate(&mut ctx)
            .unwrap();
        let intersect = union(intersect_by(testing::select(a.clone()), testing::select(b)))
            .evaluate(&mut ctx)
            .unwrap();
        let whole = union(testing::select(a)).evaluate(&mut ctx).unwrap();

        assert_eq!(
            except.union_structure().union(&intersect.union_structure()),
            whole.union_structure()
        );
    }

    #[test]
    fn empty_query_short_circuits_without_evaluating_by() {
        let structure = testing::two_chain_structure();
        let calls = Rc::new(Cell::new(0));
        let mut ctx = QueryContext::new(structure.clone());

        let selection = intersect_by(none(), testing::counted(all(), Rc::clone(&calls)))
            .evaluate(&mut ctx)
            .unwrap();
        assert!(selection.is_empty());
        assert!(selection.source().same_as(&structure));

        let selection = except_by(none(), testing::counted(all(), Rc::clone(&calls)))
            .evaluate(&mut ctx)
            .unwrap();
        assert!(selection.is_empty());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn empty_by_selection() {
        let (structure, a, _) = fixtures();
        let mut ctx = QueryContext::new(structure);

        let intersected = intersect_by(testing::select(a.clone()), none())
            .evaluate(&mut ctx)
            .unwrap();
        assert!(intersected.is_empty());

        let excepted = except_by(testing::select(a.clone()), none())
            .evaluate(&mut ctx)
            .unwrap();
        assert_eq!(excepted.structures(), a.as_slice());
    }

    #[test]
    fn union_reduces_to_one_structure() {
        let (structure, a, _) = fixtures();
        let mut ctx = QueryContext::new(structure.clone());
        let selection = union(testing::select(a.clone())).evaluate(&mut ctx).unwrap();
        assert!(!selection.is_singleton());
        assert_eq!(selection.structure_count(), 1);
        assert_eq!(selection.structures()[0], Structure::union_all(&a));

        let empty = union(none()).evaluate(&mut ctx).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn timeout_propagates_from_set_operations() {
        let structure = testing::many_unit_structure(50);
        let parts: Vec<_> = structure
            .units()
            .iter()
            .map(|unit| testing::subset(&structure, &[(unit.id(), &[0])]))
            .collect();
        let mut ctx = QueryContext::with_deadline(structure, std::time::Instant::now());
        let result = intersect_by(testing::select(parts), all()).evaluate(&mut ctx);
        assert!(matches!(result, Err(EngineError::Timeout { .. })));
    }
}
