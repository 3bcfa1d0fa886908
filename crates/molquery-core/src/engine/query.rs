use super::context::QueryContext;
use super::error::EngineError;
use super::selection::StructureSelection;
use std::fmt;
use std::sync::Arc;

/// A composable query over the context's current input structure.
///
/// Combinators own their sub-queries and evaluate them in place against the same
/// context. Evaluation must leave the context's input stack and element cursor as it
/// found them, whether it succeeds or fails.
pub trait StructureQuery {
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError>;

    fn boxed(self) -> BoxedQuery
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

pub type BoxedQuery = Box<dyn StructureQuery>;

impl<Q: StructureQuery + ?Sized> StructureQuery for &Q {
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        (**self).evaluate(ctx)
    }
}

impl<Q: StructureQuery + ?Sized> StructureQuery for Box<Q> {
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        (**self).evaluate(ctx)
    }
}

impl<Q: StructureQuery + ?Sized> StructureQuery for Arc<Q> {
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        (**self).evaluate(ctx)
    }
}

/// Query backed by a closure; see [`from_fn`].
#[derive(Clone)]
pub struct FnQuery<F> {
    f: F,
}

/// Turns a closure over the context into a query.
pub fn from_fn<F>(f: F) -> FnQuery<F>
where
    F: Fn(&mut QueryContext) -> Result<StructureSelection, EngineError>,
{
    FnQuery { f }
}

impl<F> StructureQuery for FnQuery<F>
where
    F: Fn(&mut QueryContext) -> Result<StructureSelection, EngineError>,
{
    fn evaluate(&self, ctx: &mut QueryContext) -> Result<StructureSelection, EngineError> {
        (self.f)(ctx)
    }
}

impl<F> fmt::Debug for FnQuery<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnQuery")
    }
}
