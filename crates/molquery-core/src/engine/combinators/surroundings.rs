use super::residues;
use crate::core::models::structure::Structure;
use crate::engine::context::QueryContext;
use crate::engine::error::EngineError;
use crate::engine::query::StructureQuery;
use crate::engine::selection::{StructureSelection, UniqueStructuresBuilder};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurroundingsParams {
    /// Neighbor radius in Å. Must be finite and not negative.
    pub radius: f64,
    /// Expand the surroundings to whole residues afterwards.
    pub whole_residues: bool,
}

impl SurroundingsParams {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            whole_residues: false,
        }
    }

    pub fn with_whole_residues(mut self, whole_residues: bool) -> Self {
        self.whole_residues = whole_residues;
        self
    }

    fn validate(&self) -> Result<(), EngineError> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(EngineError::InvalidParameter {
                name: "radius",
                reason: format!("expected a finite, non-negative distance, got {}", self.radius),
            });
        }
        Ok(())
    }
}

/// Adds every element of the input structure lying within `radius` of a selected element.
pub struct IncludeSurroundings<Q> {
    query: Q,
    params: SurroundingsParams,
}

pub fn include_surroundings<Q: StructureQuery>(
    query: Q,
    params: SurroundingsParams,
) -> IncludeSurroundings<Q> {
    IncludeSurroundings { query, params }
}

impl<Q: StructureQuery> StructureQuery for IncludeSurroundings<Q> {
    #[instrument(skip_all, name = "include_surroundings", fields(radius = self.params.radius))]
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        self.params.validate()?;
        let selection = self.query.evaluate(ctx)?;
        let input = ctx.input_structure().clone();

        let result = match selection {
            StructureSelection::Singleton { source, structure } => {
                let expanded = self.surroundings_of(ctx, &input, &structure)?;
                StructureSelection::singleton(source, expanded)
            }
            StructureSelection::Sequence { source, structures } => {
                let mut builder = UniqueStructuresBuilder::new(source);
                for structure in &structures {
                    builder.add(self.surroundings_of(ctx, &input, structure)?);
                }
                builder.into_selection()
            }
        };
        debug!(
            structures = result.structure_count(),
            "Surroundings included."
        );
        Ok(result)
    }
}

impl<Q> IncludeSurroundings<Q> {
    fn surroundings_of(
        &self,
        ctx: &QueryContext,
        input: &Structure,
        structure: &Structure,
    ) -> Result<Structure, EngineError> {
        ctx.check_timeout()?;
        let lookup = input.lookup3d();
        let mut builder = input.unique_subset_builder();
        for unit in structure.units() {
            ctx.check_timeout()?;
            for &element in unit.elements() {
                if let Some(p) = unit.position(element) {
                    lookup.find_into_builder(p.x, p.y, p.z, self.params.radius, &mut builder);
                }
            }
        }

        // The selected elements are part of their own surroundings, even when they are
        // not in the input.
        let surroundings = builder.into_structure().union(structure);
        if self.params.whole_residues {
            residues::expand_structure(ctx, &surroundings)
        } else {
            Ok(surroundings)
        }
    }
}
