//! Method-level eligibility filters.

use crate::model::{MethodId, Project, Statement};

/// Rejects constructors.
pub fn not_constructor(project: &Project, method: MethodId) -> bool {
    project
        .method(method)
        .map(|m| !m.is_constructor)
        .unwrap_or(false)
}

/// Rejects trivial methods.
///
/// A method fails when it has no body, an empty body, a sole bare `return`,
/// or a sole `return` of a constant expression. A sole `return` of a
/// non-constant expression passes: an accessor that reads real state is
/// kept while constant stubs are not. Bodies with more than one statement
/// always pass.
pub fn has_nontrivial_body(project: &Project, method: MethodId) -> bool {
    let Some(method) = project.method(method) else {
        return false;
    };
    let Some(body) = method.body.as_ref() else {
        return false;
    };

    if body.is_empty() {
        return false;
    }
    if body.len() > 1 {
        return true;
    }

    match &body[0] {
        Statement::Return(Some(value)) => !value.is_constant(),
        Statement::Return(None) => false,
        Statement::Other => true,
    }
}
