use crate::core::models::structure::Structure;
use crate::engine::config::EvaluationConfig;
use crate::engine::context::QueryContext;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::query::StructureQuery;
use crate::engine::selection::StructureSelection;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub selection: StructureSelection,
    pub elapsed: Duration,
}

#[instrument(skip_all, name = "evaluation_workflow")]
pub fn run<Q: StructureQuery + ?Sized>(
    structure: &Structure,
    query: &Q,
    config: &EvaluationConfig,
    reporter: &ProgressReporter,
) -> Result<EvaluationResult, EngineError> {
    reporter.report(Progress::PhaseStart { name: "Evaluation" });
    info!(
        units = structure.unit_count(),
        elements = structure.element_count(),
        timeout_ms = config.timeout.map(|t| t.as_millis() as u64),
        "Starting query evaluation."
    );

    let mut ctx = QueryContext::from_config(structure.clone(), config);
    let selection = match query.evaluate(&mut ctx) {
        Ok(selection) => selection,
        Err(EngineError::Timeout { elapsed_ms }) => {
            warn!(elapsed_ms, "Query evaluation timed out.");
            return Err(EngineError::Timeout { elapsed_ms });
        }
        Err(e) => return Err(e),
    };

    if ctx.input_depth() != 1 {
        return Err(EngineError::Internal(format!(
            "input stack left at depth {} after evaluation",
            ctx.input_depth()
        )));
    }

    let elapsed = ctx.elapsed();
    reporter.report(Progress::Selected {
        structures: selection.structure_count(),
        elements: selection.iter().map(Structure::element_count).sum(),
    });
    reporter.report(Progress::PhaseFinish);

    info!(
        structures = selection.structure_count(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Query evaluation complete."
    );
    Ok(EvaluationResult { selection, elapsed })
}

/// Loads evaluation settings from a TOML file, then evaluates `query` as [`run`] does.
pub fn run_with_config_file<Q: StructureQuery + ?Sized>(
    structure: &Structure,
    query: &Q,
    config_path: &Path,
    reporter: &ProgressReporter,
) -> Result<EvaluationResult, EngineError> {
    let config = EvaluationConfig::load(config_path)?;
    run(structure, query, &config, reporter)
}
