//! Class-level eligibility filters.

use crate::model::{ClassId, Project};

/// Simple-name suffix identifying builder classes.
const BUILDER_SUFFIX: &str = "Builder";

/// Rejects interface definitions.
pub fn not_interface(project: &Project, class: ClassId) -> bool {
    project.class(class).map(|c| !c.is_interface).unwrap_or(false)
}

/// Rejects classes whose simple name ends with `Builder`.
pub fn not_builder(project: &Project, class: ClassId) -> bool {
    project
        .class(class)
        .map(|c| !c.simple_name().ends_with(BUILDER_SUFFIX))
        .unwrap_or(false)
}
