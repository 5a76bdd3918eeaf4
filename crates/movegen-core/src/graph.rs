//! Labeled bipartite graph: (method, class) training points with 0/1
//! labels.
//!
//! [`LabeledGraph`] is the final shape handed to serialization. Class IDs
//! coincide with the source dataset's class IDs (the class list is copied
//! verbatim); method IDs are assigned in first-encounter order over classes
//! then members, so two builds over the same snapshot produce identical
//! tables.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::dataset::Dataset;
use crate::filter::method_pipeline;
use crate::model::{ClassId, MethodId, Project};

/// Graph construction and lookup errors. These are consistency violations,
/// not recoverable conditions.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A dataset record references a method that did not survive the
    /// graph's own filtering pass.
    #[error("dataset method '{method}' was dropped by method filtering")]
    DroppedMethod { method: String },

    /// Lookup for a method the graph does not contain.
    #[error("unknown method '{method}'")]
    UnknownMethod { method: String },

    /// Lookup for a class the graph does not contain.
    #[error("unknown class '{class}'")]
    UnknownClass { class: String },
}

/// One labeled training example. Label 1 marks the method's true containing
/// class, label 0 a candidate move target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub method_id: u32,
    pub class_id: u32,
    pub label: u8,
}

/// Immutable labeled graph over a project snapshot.
#[derive(Debug)]
pub struct LabeledGraph<'p> {
    project: &'p Project,
    classes: Vec<ClassId>,
    methods: Vec<MethodId>,
    points: Vec<Point>,
    id_of_class: HashMap<ClassId, u32>,
    id_of_method: HashMap<MethodId, u32>,
    targets_of: HashMap<MethodId, Vec<u32>>,
}

impl<'p> LabeledGraph<'p> {
    /// Build the graph from a dataset.
    ///
    /// Re-applies method filtering to every member of every dataset class,
    /// independent of the filtering that produced the dataset's method
    /// list. Every dataset record must reference a method that survives
    /// this pass; a record that does not fails construction with
    /// [`GraphError::DroppedMethod`].
    pub fn from_dataset(project: &'p Project, dataset: &Dataset) -> Result<Self, GraphError> {
        let classes: Vec<ClassId> = dataset.classes().to_vec();
        let id_of_class: HashMap<ClassId, u32> = classes
            .iter()
            .enumerate()
            .map(|(id, &class)| (class, id as u32))
            .collect();

        let filters = method_pipeline();
        let mut methods = Vec::new();
        let mut id_of_method = HashMap::new();
        let mut seen = HashSet::new();
        for &class in &classes {
            for &method in project.methods_of(class) {
                if !filters.accepts(project, method) {
                    continue;
                }
                if !seen.insert(method) {
                    continue;
                }

                id_of_method.insert(method, methods.len() as u32);
                methods.push(method);
            }
        }

        let mut points = Vec::new();
        let mut targets_of = HashMap::new();
        for record in dataset.methods() {
            let method_id =
                *id_of_method
                    .get(&record.method)
                    .ok_or_else(|| GraphError::DroppedMethod {
                        method: describe_method(project, record.method),
                    })?;

            points.push(Point {
                method_id,
                class_id: record.containing_class,
                label: 1,
            });
            for &target in &record.target_classes {
                points.push(Point {
                    method_id,
                    class_id: target,
                    label: 0,
                });
            }

            targets_of.insert(record.method, record.target_classes.clone());
        }

        debug!(
            classes = classes.len(),
            methods = methods.len(),
            points = points.len(),
            "assembled labeled graph"
        );

        Ok(LabeledGraph {
            project,
            classes,
            methods,
            points,
            id_of_class,
            id_of_method,
            targets_of,
        })
    }

    /// The underlying project snapshot.
    pub fn project(&self) -> &'p Project {
        self.project
    }

    /// Graph classes; the slice index is the class ID.
    pub fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    /// Graph methods; the slice index is the method ID.
    pub fn methods(&self) -> &[MethodId] {
        &self.methods
    }

    /// All labeled points, positives first per record.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// IDs of the class's surviving methods, in declaration order.
    /// Filtered-out members are omitted; an unknown class yields nothing.
    pub fn method_ids_in(&self, class: ClassId) -> Vec<u32> {
        self.project
            .methods_of(class)
            .iter()
            .filter_map(|method| self.id_of_method.get(method).copied())
            .collect()
    }

    /// Graph class ID of the method's containing class.
    pub fn containing_class_id(&self, method: MethodId) -> Result<u32, GraphError> {
        if !self.id_of_method.contains_key(&method) {
            return Err(GraphError::UnknownMethod {
                method: describe_method(self.project, method),
            });
        }

        self.project
            .containing_class(method)
            .and_then(|class| self.id_of_class.get(&class).copied())
            .ok_or_else(|| GraphError::UnknownMethod {
                method: describe_method(self.project, method),
            })
    }

    /// Candidate target class IDs recorded for the method; empty when the
    /// dataset recorded none.
    pub fn target_class_ids(&self, method: MethodId) -> &[u32] {
        self.targets_of
            .get(&method)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn describe_method(project: &Project, method: MethodId) -> String {
    project
        .qualified_method_name(method)
        .unwrap_or_else(|| method.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CodeClass, CodeMethod, Expr, Statement};

    fn eligible_method(name: &str, class: ClassId, offset: u32) -> CodeMethod {
        CodeMethod::new(name, class, "Test.java", offset).with_body(vec![
            Statement::Other,
            Statement::Return(Some(Expr::Name("x".into()))),
        ])
    }

    /// Three candidate classes; one eligible method on the first.
    fn three_class_project() -> (Project, MethodId) {
        let mut project = Project::new();
        let a = project.insert_class(CodeClass::new("p.A", "A.java", 0));
        project.insert_class(CodeClass::new("p.B", "B.java", 0));
        project.insert_class(CodeClass::new("p.C", "C.java", 0));
        let method = project.insert_method(eligible_method("work", a, 10));
        (project, method)
    }

    mod construction {
        use super::*;

        #[test]
        fn one_positive_point_per_record_plus_one_negative_per_target() {
            let (project, method) = three_class_project();
            let dataset = Dataset::build(&project);
            let graph = LabeledGraph::from_dataset(&project, &dataset).unwrap();

            let id = graph
                .methods()
                .iter()
                .position(|&m| m == method)
                .unwrap() as u32;

            assert_eq!(
                graph.points(),
                &[
                    Point { method_id: id, class_id: 0, label: 1 },
                    Point { method_id: id, class_id: 1, label: 0 },
                    Point { method_id: id, class_id: 2, label: 0 },
                ]
            );
        }

        #[test]
        fn positive_count_equals_dataset_record_count() {
            let mut project = Project::new();
            let a = project.insert_class(CodeClass::new("p.A", "A.java", 0));
            let b = project.insert_class(CodeClass::new("p.B", "B.java", 0));
            project.insert_method(eligible_method("one", a, 10));
            project.insert_method(eligible_method("two", a, 60));
            project.insert_method(eligible_method("three", b, 10));

            let dataset = Dataset::build(&project);
            let graph = LabeledGraph::from_dataset(&project, &dataset).unwrap();

            let positives = graph.points().iter().filter(|p| p.label == 1).count();
            assert_eq!(positives, dataset.methods().len());
        }

        #[test]
        fn point_ids_index_into_the_tables() {
            let (project, _) = three_class_project();
            let dataset = Dataset::build(&project);
            let graph = LabeledGraph::from_dataset(&project, &dataset).unwrap();

            for point in graph.points() {
                assert!((point.method_id as usize) < graph.methods().len());
                assert!((point.class_id as usize) < graph.classes().len());
            }
        }

        #[test]
        fn method_ids_are_deterministic_across_builds() {
            let (project, _) = three_class_project();
            let dataset = Dataset::build(&project);

            let first = LabeledGraph::from_dataset(&project, &dataset).unwrap();
            let second = LabeledGraph::from_dataset(&project, &dataset).unwrap();

            assert_eq!(first.methods(), second.methods());
            assert_eq!(first.points(), second.points());
        }

        #[test]
        fn graph_keeps_eligible_methods_the_dataset_never_tracked() {
            // The second filtering pass runs over all class members, so an
            // eligible method appears in `methods` even without a dataset
            // record; it just contributes no points.
            let (project, method) = three_class_project();
            let untracked = Dataset::from_parts(Dataset::build(&project).classes().to_vec(), vec![]);
            let graph = LabeledGraph::from_dataset(&project, &untracked).unwrap();

            assert_eq!(graph.methods(), &[method]);
            assert!(graph.points().is_empty());
            assert!(graph.target_class_ids(method).is_empty());
        }
    }

    mod consistency {
        use super::*;
        use crate::dataset::CandidateMethod;

        #[test]
        fn record_for_a_filtered_method_fails_construction() {
            let mut project = Project::new();
            let class = project.insert_class(CodeClass::new("p.Foo", "Foo.java", 0));
            let ctor = project.insert_method(
                CodeMethod::new("Foo", class, "Foo.java", 5)
                    .constructor()
                    .with_body(vec![Statement::Other]),
            );

            let dataset = Dataset::from_parts(
                vec![class],
                vec![CandidateMethod {
                    method: ctor,
                    containing_class: 0,
                    target_classes: vec![],
                }],
            );

            let err = LabeledGraph::from_dataset(&project, &dataset).unwrap_err();
            assert!(matches!(err, GraphError::DroppedMethod { .. }));
            assert!(err.to_string().contains("p.Foo.Foo"));
        }

        #[test]
        fn points_follow_the_record_ids_exactly() {
            let mut project = Project::new();
            let classes: Vec<ClassId> = (0..8)
                .map(|i| {
                    project.insert_class(CodeClass::new(
                        format!("p.C{i}"),
                        format!("C{i}.java"),
                        0,
                    ))
                })
                .collect();
            let method = project.insert_method(eligible_method("work", classes[2], 10));

            let dataset = Dataset::from_parts(
                classes,
                vec![CandidateMethod {
                    method,
                    containing_class: 2,
                    target_classes: vec![5, 7],
                }],
            );
            let graph = LabeledGraph::from_dataset(&project, &dataset).unwrap();

            let id = graph.methods().iter().position(|&m| m == method).unwrap() as u32;
            assert_eq!(
                graph.points(),
                &[
                    Point { method_id: id, class_id: 2, label: 1 },
                    Point { method_id: id, class_id: 5, label: 0 },
                    Point { method_id: id, class_id: 7, label: 0 },
                ]
            );
        }
    }

    mod lookups {
        use super::*;

        #[test]
        fn containing_class_id_resolves_through_the_dataset_ids() {
            let mut project = Project::new();
            project.insert_class(CodeClass::new("p.Skipped", "Skipped.java", 0).interface());
            let kept = project.insert_class(CodeClass::new("p.Kept", "Kept.java", 0));
            let method = project.insert_method(eligible_method("work", kept, 10));

            let dataset = Dataset::build(&project);
            let graph = LabeledGraph::from_dataset(&project, &dataset).unwrap();

            assert_eq!(graph.containing_class_id(method).unwrap(), 0);
        }

        #[test]
        fn containing_class_id_fails_for_unknown_methods() {
            let (project, _) = three_class_project();
            let dataset = Dataset::build(&project);
            let graph = LabeledGraph::from_dataset(&project, &dataset).unwrap();

            let err = graph.containing_class_id(MethodId::new(42)).unwrap_err();
            assert!(matches!(err, GraphError::UnknownMethod { .. }));
        }

        #[test]
        fn method_ids_in_preserves_declaration_order_and_skips_filtered() {
            let mut project = Project::new();
            let class = project.insert_class(CodeClass::new("p.Foo", "Foo.java", 0));
            let first = project.insert_method(eligible_method("first", class, 10));
            project.insert_method(
                CodeMethod::new("Foo", class, "Foo.java", 40)
                    .constructor()
                    .with_body(vec![Statement::Other]),
            );
            let last = project.insert_method(eligible_method("last", class, 80));

            let dataset = Dataset::build(&project);
            let graph = LabeledGraph::from_dataset(&project, &dataset).unwrap();

            let ids = graph.method_ids_in(class);
            assert_eq!(ids.len(), 2);
            assert_eq!(graph.methods()[ids[0] as usize], first);
            assert_eq!(graph.methods()[ids[1] as usize], last);
        }

        #[test]
        fn method_ids_in_unknown_class_is_empty() {
            let (project, _) = three_class_project();
            let dataset = Dataset::build(&project);
            let graph = LabeledGraph::from_dataset(&project, &dataset).unwrap();

            assert!(graph.method_ids_in(ClassId::new(77)).is_empty());
        }

        #[test]
        fn targets_default_to_empty() {
            let mut project = Project::new();
            let only = project.insert_class(CodeClass::new("p.Only", "Only.java", 0));
            let method = project.insert_method(eligible_method("work", only, 10));

            let dataset = Dataset::build(&project);
            let graph = LabeledGraph::from_dataset(&project, &dataset).unwrap();

            assert!(graph.target_class_ids(method).is_empty());
            // The method still appears, with a lone positive point.
            assert_eq!(graph.methods(), &[method]);
            assert_eq!(graph.points().len(), 1);
        }
    }
}
