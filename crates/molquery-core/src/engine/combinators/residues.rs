use crate::core::models::structure::Structure;
use crate::engine::context::QueryContext;
use crate::engine::error::EngineError;
use crate::engine::query::StructureQuery;
use crate::engine::selection::{StructureSelection, UniqueStructuresBuilder};
use tracing::{debug, instrument};

/// Expands every selected structure so that each residue it touches is fully included.
pub struct WholeResidues<Q> {
    query: Q,
}

pub fn whole_residues<Q: StructureQuery>(query: Q) -> WholeResidues<Q> {
    WholeResidues { query }
}

impl<Q: StructureQuery> StructureQuery for WholeResidues<Q> {
    #[instrument(skip_all, name = "whole_residues")]
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        let selection = self.query.evaluate(ctx)?;
        let expanded = expand_selection(ctx, selection)?;
        debug!(
            structures = expanded.structure_count(),
            "Expanded to whole residues."
        );
        Ok(expanded)
    }
}

pub(crate) fn expand_selection(
    ctx: &QueryContext,
    selection: StructureSelection,
) -> Result<StructureSelection, EngineError> {
    match selection {
        StructureSelection::Singleton { source, structure } => {
            let expanded = expand_structure(ctx, &structure)?;
            Ok(StructureSelection::singleton(source, expanded))
        }
        StructureSelection::Sequence { source, structures } => {
            let mut builder = UniqueStructuresBuilder::new(source);
            for structure in &structures {
                builder.add(expand_structure(ctx, structure)?);
            }
            Ok(builder.into_selection())
        }
    }
}

/// Whole-residue closure of one structure. Non-atomic units are copied unchanged.
pub(crate) fn expand_structure(
    ctx: &QueryContext,
    structure: &Structure,
) -> Result<Structure, EngineError> {
    let mut builder = structure.subset_builder();
    for unit in structure.units() {
        ctx.check_timeout()?;

        let Some(residues) = unit.residue_segments() else {
            builder.set_unit(unit.id(), unit.elements());
            continue;
        };

        builder.begin_unit(unit.id());
        for segment in residues.transient_segments(unit.elements()) {
            for element in residues.range(segment.index) {
                builder.add_element(element);
            }
        }
        builder.commit_unit();
    }
    Ok(builder.into_structure())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::generators::all;
    use crate::testing;

    #[test]
    fn two_atoms_expand_to_their_residues() {
        let structure = testing::two_chain_structure();
        let picked = testing::subset(&structure, &[(1, &[3, 7])]);
        let mut ctx = QueryContext::new(structure.clone());

        let selection = whole_residues(testing::select_one(picked))
            .evaluate(&mut ctx)
            .unwrap();

        assert!(selection.is_singleton());
        assert_eq!(
            selection.structures()[0],
            testing::subset(&structure, &[(1, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9])])
        );
    }

    #[test]
    fn expansion_is_idempotent() {
        let structure = testing::mixed_structure();
        let picked = testing::subset(&structure, &[(1, &[4, 13]), (2, &[19]), (3, &[2])]);
        let ctx = QueryContext::new(structure);

        let once = expand_structure(&ctx, &picked).unwrap();
        let twice = expand_structure(&ctx, &once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.unit(1).unwrap().elements().len(), 10);
        assert_eq!(once.unit(2).unwrap().elements(), &[15, 16, 17, 18, 19]);
    }

    #[test]
    fn non_atomic_units_are_copied_unchanged() {
        let structure = testing::coarse_structure();
        let picked = testing::subset(&structure, &[(3, &[1, 4])]);
        let ctx = QueryContext::new(structure);
        let expanded = expand_structure(&ctx, &picked).unwrap();
        assert_eq!(expanded, picked);
    }

    #[test]
    fn sequence_input_is_deduplicated() {
        let structure = testing::two_chain_structure();
        let a = testing::subset(&structure, &[(1, &[0])]);
        let b = testing::subset(&structure, &[(1, &[4])]);
        let c = testing::subset(&structure, &[(2, &[5])]);
        let mut ctx = QueryContext::new(structure.clone());

        let selection = whole_residues(testing::select(vec![a, b, c]))
            .evaluate(&mut ctx)
            .unwrap();

        assert!(!selection.is_singleton());
        assert_eq!(selection.structure_count(), 2);
        assert_eq!(
            selection.structures()[1],
            testing::subset(&structure, &[(2, &[5, 6, 7, 8, 9])])
        );
    }

    #[test]
    fn whole_input_is_a_fixed_point() {
        let structure = testing::mixed_structure();
        let mut ctx = QueryContext::new(structure.clone());
        let selection = whole_residues(all()).evaluate(&mut ctx).unwrap();
        assert_eq!(selection.structures()[0], structure);
    }

    #[test]
    fn times_out_over_many_units() {
        let structure = testing::many_unit_structure(3000);
        let mut ctx = QueryContext::with_deadline(structure, std::time::Instant::now());
        let result = whole_residues(all()).evaluate(&mut ctx);
        assert!(matches!(result, Err(EngineError::Timeout { .. })));
    }
}
