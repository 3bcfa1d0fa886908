use crate::engine::context::QueryContext;
use crate::engine::error::EngineError;
use crate::engine::query::StructureQuery;
use crate::engine::selection::{StructureSelection, UniqueStructuresBuilder};
use tracing::{debug, instrument};

const TIMEOUT_STRIDE: usize = 10;

/// Evaluates `query` once per structure selected by `selection`, with that structure as
/// the input, and merges every result into one deduplicated sequence.
pub struct QuerySelection<S, Q> {
    selection: S,
    query: Q,
    in_complement: bool,
}

pub fn query_selection<S, Q>(selection: S, query: Q) -> QuerySelection<S, Q>
where
    S: StructureQuery,
    Q: StructureQuery,
{
    QuerySelection {
        selection,
        query,
        in_complement: false,
    }
}

impl<S, Q> QuerySelection<S, Q> {
    /// Runs the inner query against the input minus each selected structure instead.
    pub fn in_complement(mut self, in_complement: bool) -> Self {
        self.in_complement = in_complement;
        self
    }
}

impl<S, Q> StructureQuery for QuerySelection<S, Q>
where
    S: StructureQuery,
    Q: StructureQuery,
{
    #[instrument(skip_all, name = "query_selection", fields(in_complement = self.in_complement))]
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        let outer = self.selection.evaluate(ctx)?;
        if outer.is_empty() {
            return Ok(outer);
        }

        let input = ctx.input_structure().clone();
        let mut builder = UniqueStructuresBuilder::new(input.clone());
        for (index, structure) in outer.iter().enumerate() {
            if index % TIMEOUT_STRIDE == 0 {
                ctx.check_timeout()?;
            }
            let target = if self.in_complement {
                input.subtract(structure)
            } else {
                structure.clone()
            };

            let inner = {
                let mut scope = ctx.push_input_structure(target);
                self.query.evaluate(&mut *scope)?
            };
            for result in &inner {
                builder.add(result.clone());
            }
        }

        debug!(
            outer = outer.structure_count(),
            structures = builder.len(),
            "Nested queries evaluated."
        );
        Ok(builder.into_selection())
    }
}
