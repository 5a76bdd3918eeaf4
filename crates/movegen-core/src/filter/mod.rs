//! Eligibility filter pipelines over snapshot entities.
//!
//! A filter is a pure predicate over an entity handle: `true` keeps the
//! entity, `false` drops it. A [`Pipeline`] applies its filters in order and
//! retains an entity only if every filter passes (conjunction). Filters
//! never fail: an entity missing a required attribute (absent body, unknown
//! handle) simply fails the filter.
//!
//! ## Concrete filters
//!
//! - `classes::not_interface` - drop interface definitions
//! - `classes::not_builder` - drop classes named `*Builder`
//! - `methods::not_constructor` - drop constructors
//! - `methods::has_nontrivial_body` - drop bodiless and trivial methods

pub mod classes;
pub mod methods;

use crate::model::{ClassId, MethodId, Project};

/// Ordered conjunction of pure predicates over entity handles.
pub struct Pipeline<T> {
    filters: Vec<Box<dyn Fn(&Project, T) -> bool>>,
}

impl<T: Copy> Pipeline<T> {
    /// Empty pipeline; accepts everything.
    pub fn new() -> Self {
        Pipeline {
            filters: Vec::new(),
        }
    }

    /// Append a filter to the pipeline.
    pub fn with(mut self, filter: impl Fn(&Project, T) -> bool + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// True iff every filter accepts the entity. Short-circuits on the
    /// first rejection.
    pub fn accepts(&self, project: &Project, entity: T) -> bool {
        self.filters.iter().all(|filter| filter(project, entity))
    }

    /// Retain the entities accepted by every filter, preserving input order.
    pub fn retain(&self, project: &Project, entities: impl IntoIterator<Item = T>) -> Vec<T> {
        entities
            .into_iter()
            .filter(|&entity| self.accepts(project, entity))
            .collect()
    }
}

impl<T: Copy> Default for Pipeline<T> {
    fn default() -> Self {
        Pipeline::new()
    }
}

/// Class eligibility for candidate generation: concrete, non-builder
/// classes only.
pub fn class_pipeline() -> Pipeline<ClassId> {
    Pipeline::new()
        .with(classes::not_interface)
        .with(classes::not_builder)
}

/// Method eligibility: a non-trivial body and not a constructor.
pub fn method_pipeline() -> Pipeline<MethodId> {
    Pipeline::new()
        .with(methods::has_nontrivial_body)
        .with(methods::not_constructor)
}
