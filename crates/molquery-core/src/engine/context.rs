use super::config::EvaluationConfig;
use super::error::EngineError;
use crate::core::models::ids::ElementIndex;
use crate::core::models::model::{AtomRecord, ResidueRecord};
use crate::core::models::structure::Structure;
use crate::core::models::unit::Unit;
use nalgebra::Point3;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

/// The element property functions read from: one atom of one unit of a structure.
#[derive(Debug, Clone)]
pub struct ElementCursor {
    structure: Structure,
    unit: Option<Unit>,
    element: ElementIndex,
}

impl ElementCursor {
    pub fn new(structure: Structure) -> Self {
        Self {
            structure,
            unit: None,
            element: 0,
        }
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn unit(&self) -> Option<&Unit> {
        self.unit.as_ref()
    }

    pub fn element(&self) -> ElementIndex {
        self.element
    }

    pub fn set_structure(&mut self, structure: &Structure) {
        if !self.structure.same_as(structure) {
            self.structure = structure.clone();
        }
        self.unit = None;
        self.element = 0;
    }

    pub fn set_unit(&mut self, unit: &Unit) {
        self.unit = Some(unit.clone());
    }

    pub fn set_element(&mut self, element: ElementIndex) {
        self.element = element;
    }

    pub fn position(&self) -> Option<Point3<f64>> {
        self.unit.as_ref()?.position(self.element)
    }

    /// Atom annotation of the current element. `None` for coarse units.
    pub fn atom(&self) -> Option<&AtomRecord> {
        let unit = self.unit.as_ref().filter(|unit| unit.is_atomic())?;
        unit.model().hierarchy()?.atom(self.element)
    }

    pub fn residue_index(&self) -> Option<usize> {
        self.unit.as_ref()?.residue_segments()?.segment_of(self.element)
    }

    pub fn residue(&self) -> Option<&ResidueRecord> {
        let unit = self.unit.as_ref().filter(|unit| unit.is_atomic())?;
        unit.model().hierarchy()?.residue_of(self.element)
    }
}

/// Evaluation state shared by every query of one evaluation.
///
/// Holds the stack of input structures (the bottom entry is the structure the evaluation
/// was started with), the element cursor and the deadline. Pushes return guards that undo
/// themselves when dropped, so the stack stays balanced when an error propagates.
#[derive(Debug)]
pub struct QueryContext {
    root: Structure,
    inputs: Vec<Structure>,
    element: ElementCursor,
    started: Instant,
    deadline: Option<Instant>,
}

impl QueryContext {
    pub fn new(structure: Structure) -> Self {
        Self {
            element: ElementCursor::new(structure.clone()),
            root: structure,
            inputs: Vec::new(),
            started: Instant::now(),
            deadline: None,
        }
    }

    pub fn with_timeout(structure: Structure, timeout: Duration) -> Self {
        let mut ctx = Self::new(structure);
        ctx.deadline = ctx.started.checked_add(timeout);
        ctx
    }

    pub fn with_deadline(structure: Structure, deadline: Instant) -> Self {
        let mut ctx = Self::new(structure);
        ctx.deadline = Some(deadline);
        ctx
    }

    pub fn from_config(structure: Structure, config: &EvaluationConfig) -> Self {
        match config.timeout {
            Some(timeout) => Self::with_timeout(structure, timeout),
            None => Self::new(structure),
        }
    }

    /// The structure queries currently evaluate against.
    pub fn input_structure(&self) -> &Structure {
        self.inputs.last().unwrap_or(&self.root)
    }

    pub fn input_depth(&self) -> usize {
        self.inputs.len() + 1
    }

    /// Makes `structure` the input until the returned guard is dropped.
    pub fn push_input_structure(&mut self, structure: Structure) -> InputScope<'_> {
        self.inputs.push(structure);
        InputScope { ctx: self }
    }

    pub fn element(&self) -> &ElementCursor {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut ElementCursor {
        &mut self.element
    }

    /// Saves the element cursor; the guard restores it when dropped.
    pub fn push_current_element(&mut self) -> ElementScope<'_> {
        let saved = Some(self.element.clone());
        ElementScope { ctx: self, saved }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fails with [`EngineError::Timeout`] once the deadline has passed.
    pub fn check_timeout(&self) -> Result<(), EngineError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(EngineError::Timeout {
                elapsed_ms: self.elapsed().as_millis(),
            }),
            _ => Ok(()),
        }
    }
}

/// Guard returned by [`QueryContext::push_input_structure`]. Pops the input on drop.
pub struct InputScope<'c> {
    ctx: &'c mut QueryContext,
}

impl Deref for InputScope<'_> {
    type Target = QueryContext;
    fn deref(&self) -> &QueryContext {
        self.ctx
    }
}

impl DerefMut for InputScope<'_> {
    fn deref_mut(&mut self) -> &mut QueryContext {
        self.ctx
    }
}

impl Drop for InputScope<'_> {
    fn drop(&mut self) {
        self.ctx.inputs.pop();
    }
}

/// Guard returned by [`QueryContext::push_current_element`]. Restores the cursor on drop.
pub struct ElementScope<'c> {
    ctx: &'c mut QueryContext,
    saved: Option<ElementCursor>,
}

impl Deref for ElementScope<'_> {
    type Target = QueryContext;
    fn deref(&self) -> &QueryContext {
        self.ctx
    }
}

impl DerefMut for ElementScope<'_> {
    fn deref_mut(&mut self) -> &mut QueryContext {
        self.ctx
    }
}

impl Drop for ElementScope<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.ctx.element = saved;
        }
    }
}
