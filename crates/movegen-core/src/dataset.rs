//! Candidate generation: walk the snapshot, keep eligible classes and
//! methods, and record each method's move-target search space.
//!
//! Dataset class IDs are dense, 0-based, and assigned in discovery order
//! over the surviving classes; they are the ID domain used by
//! [`crate::graph::LabeledGraph`] and the serialized tables.

use tracing::debug;

use crate::filter::{class_pipeline, method_pipeline};
use crate::model::{ClassId, MethodId, Project};

/// One retained method: its handle, containing class, and candidate move
/// targets, the latter two in dataset class IDs.
#[derive(Debug, Clone)]
pub struct CandidateMethod {
    /// Method handle in the project arena.
    pub method: MethodId,
    /// Dataset ID of the containing class.
    pub containing_class: u32,
    /// Dataset IDs of candidate target classes, ascending. Never contains
    /// `containing_class`.
    pub target_classes: Vec<u32>,
}

/// Pre-filter corpus: candidate classes and retained methods with their
/// move-target search space. Built once, read-only afterwards.
#[derive(Debug)]
pub struct Dataset {
    classes: Vec<ClassId>,
    methods: Vec<CandidateMethod>,
}

impl Dataset {
    /// Build a dataset from a project snapshot.
    ///
    /// Classes pass [`crate::filter::class_pipeline`], methods pass
    /// [`crate::filter::method_pipeline`]; each retained method's targets
    /// are all candidate classes except its own. An empty snapshot yields
    /// an empty dataset.
    pub fn build(project: &Project) -> Dataset {
        let classes = class_pipeline().retain(project, project.class_ids());

        let method_filters = method_pipeline();
        let mut methods = Vec::new();

        for (dataset_id, &class) in classes.iter().enumerate() {
            let containing_class = dataset_id as u32;
            for &method in project.methods_of(class) {
                if !method_filters.accepts(project, method) {
                    continue;
                }

                let target_classes = (0..classes.len() as u32)
                    .filter(|&id| id != containing_class)
                    .collect();

                methods.push(CandidateMethod {
                    method,
                    containing_class,
                    target_classes,
                });
            }
        }

        debug!(
            classes = classes.len(),
            methods = methods.len(),
            "built candidate dataset"
        );

        Dataset { classes, methods }
    }

    /// Assemble a dataset from raw parts, bypassing the filter pipelines.
    #[cfg(test)]
    pub(crate) fn from_parts(classes: Vec<ClassId>, methods: Vec<CandidateMethod>) -> Dataset {
        Dataset { classes, methods }
    }

    /// Candidate classes in discovery order; the slice index is the dataset
    /// class ID.
    pub fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    /// Retained methods with their candidate targets.
    pub fn methods(&self) -> &[CandidateMethod] {
        &self.methods
    }
}
