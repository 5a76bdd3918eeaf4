//! End-to-end driver: snapshot in, three CSV tables out.

use std::path::Path;

use tracing::info;

use crate::context::ContextPathExtractor;
use crate::dataset::Dataset;
use crate::error::MoveGenError;
use crate::graph::LabeledGraph;
use crate::model::Project;
use crate::serialize;

/// Run the full extraction pipeline over a populated snapshot and write
/// the tables under `target_dir`.
///
/// Stages run strictly in sequence: candidate generation, graph assembly,
/// per-method context extraction, file writes. The first failure aborts
/// the run; tables written before the failure are left on disk.
pub fn run(
    project: &Project,
    extractor: &dyn ContextPathExtractor,
    target_dir: &Path,
) -> Result<(), MoveGenError> {
    info!(
        classes = project.class_count(),
        methods = project.method_count(),
        "starting dataset extraction"
    );

    let dataset = Dataset::build(project);
    let graph = LabeledGraph::from_dataset(project, &dataset)?;
    serialize::serialize(&graph, extractor, target_dir)?;

    info!(
        points = graph.points().len(),
        target = %target_dir.display(),
        "dataset extraction finished"
    );
    Ok(())
}
