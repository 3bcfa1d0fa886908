use crate::core::models::structure::Structure;
use crate::engine::context::QueryContext;
use crate::engine::error::EngineError;
use crate::engine::query::StructureQuery;
use crate::engine::selection::StructureSelection;
use tracing::{debug, instrument};

/// Keeps the selected structures that satisfy `predicate`.
pub struct Filter<Q, P> {
    query: Q,
    predicate: P,
}

pub fn filter<Q, P>(query: Q, predicate: P) -> Filter<Q, P>
where
    Q: StructureQuery,
    P: Fn(&Structure) -> bool,
{
    Filter { query, predicate }
}

impl<Q, P> StructureQuery for Filter<Q, P>
where
    Q: StructureQuery,
    P: Fn(&Structure) -> bool,
{
    #[instrument(skip_all, name = "filter")]
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        let selection = self.query.evaluate(ctx)?;
        let result = match selection {
            StructureSelection::Singleton { source, structure } => {
                if !structure.is_empty() && (self.predicate)(&structure) {
                    StructureSelection::singleton(source, structure)
                } else {
                    StructureSelection::empty(source)
                }
            }
            StructureSelection::Sequence { source, structures } => {
                let kept = structures
                    .into_iter()
                    .filter(|structure| (self.predicate)(structure))
                    .collect();
                StructureSelection::sequence(source, kept)
            }
        };
        debug!(structures = result.structure_count(), "Selection filtered.");
        Ok(result)
    }
}
