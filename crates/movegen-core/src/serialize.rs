//! CSV serialization of a labeled graph into three joinable tables.
//!
//! Layout, all under the caller's target directory:
//! - `methods.csv` - `id,name,context,file,offset,containing_class_id,target_ids`
//! - `classes.csv` - `id,name,methods,file,offset`
//! - `points.csv` - `method_id,class_id,label`, no header
//!
//! Tables are written in that order with create-new semantics; a
//! pre-existing file fails the run before later tables are touched, and a
//! failed run may leave earlier tables on disk. Quoting is RFC4180 with
//! CRLF record terminators.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use csv::{Terminator, WriterBuilder};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::context::{split_to_subtokens, ContextPathExtractor};
use crate::graph::{GraphError, LabeledGraph};

/// Maximum syntactic path length passed to the context extractor.
pub const MAX_PATH_LENGTH: u32 = 8;

/// Maximum syntactic path width passed to the context extractor.
pub const MAX_PATH_WIDTH: u32 = 2;

const METHODS_FILE: &str = "methods.csv";
const CLASSES_FILE: &str = "classes.csv";
const POINTS_FILE: &str = "points.csv";

/// A `//` comment that runs to end of input with no trailing newline.
static DANGLING_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"//[^\n]*\z").unwrap()
});

/// Serialization errors.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The extractor produced no feature record matching a method. This is
    /// deterministic for a given input; re-running without fixing the
    /// source reproduces it.
    #[error("context extraction produced no features for '{method}'")]
    UnexpectedEmptyContext { method: String },

    /// An output table already exists; nothing is overwritten.
    #[error("output file already exists: {path}")]
    OutputExists { path: PathBuf },

    /// Graph lookup failed while assembling a row.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// CSV encoding or write failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Serialize)]
struct MethodRow {
    id: u32,
    name: String,
    context: String,
    file: String,
    offset: u32,
    containing_class_id: u32,
    target_ids: String,
}

#[derive(Debug, Serialize)]
struct ClassRow {
    id: u32,
    name: String,
    methods: String,
    file: String,
    offset: u32,
}

/// Write the three tables for a labeled graph.
///
/// The target directory is created if absent. Each method's source text is
/// stripped of a dangling trailing comment and handed to `extractor` with
/// the fixed [`MAX_PATH_LENGTH`]/[`MAX_PATH_WIDTH`] bounds; the single
/// record whose name matches the method's subtokenized name becomes the
/// `context` column. A method with no matching record aborts the run.
pub fn serialize(
    graph: &LabeledGraph<'_>,
    extractor: &dyn ContextPathExtractor,
    target_dir: &Path,
) -> Result<(), SerializeError> {
    fs::create_dir_all(target_dir)?;

    write_methods(graph, extractor, target_dir)?;
    write_classes(graph, target_dir)?;
    write_points(graph, target_dir)?;

    Ok(())
}

fn write_methods(
    graph: &LabeledGraph<'_>,
    extractor: &dyn ContextPathExtractor,
    target_dir: &Path,
) -> Result<(), SerializeError> {
    let project = graph.project();
    let mut writer = table_writer(target_dir.join(METHODS_FILE), true)?;

    for (id, &method) in graph.methods().iter().enumerate() {
        let name = project
            .qualified_method_name(method)
            .ok_or_else(|| GraphError::UnknownMethod {
                method: method.to_string(),
            })?;

        let entity = project.method(method).ok_or_else(|| GraphError::UnknownMethod {
            method: method.to_string(),
        })?;

        let context = method_context(&name, &entity.name, &entity.source, extractor)?;

        let target_ids = graph
            .target_class_ids(method)
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(" ");

        writer.serialize(MethodRow {
            id: id as u32,
            name,
            context,
            file: entity.file.display().to_string(),
            offset: entity.offset,
            containing_class_id: graph.containing_class_id(method)?,
            target_ids,
        })?;
    }

    writer.flush()?;
    info!(methods = graph.methods().len(), file = METHODS_FILE, "wrote table");
    Ok(())
}

fn write_classes(graph: &LabeledGraph<'_>, target_dir: &Path) -> Result<(), SerializeError> {
    let project = graph.project();
    let mut writer = table_writer(target_dir.join(CLASSES_FILE), true)?;

    for (id, &class) in graph.classes().iter().enumerate() {
        let entity = project.class(class).ok_or_else(|| GraphError::UnknownClass {
            class: class.to_string(),
        })?;

        let methods = graph
            .method_ids_in(class)
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(" ");

        writer.serialize(ClassRow {
            id: id as u32,
            name: entity.qualified_name.clone(),
            methods,
            file: entity.file.display().to_string(),
            offset: entity.offset,
        })?;
    }

    writer.flush()?;
    info!(classes = graph.classes().len(), file = CLASSES_FILE, "wrote table");
    Ok(())
}

fn write_points(graph: &LabeledGraph<'_>, target_dir: &Path) -> Result<(), SerializeError> {
    let mut writer = table_writer(target_dir.join(POINTS_FILE), false)?;

    for point in graph.points() {
        writer.serialize(point)?;
    }

    writer.flush()?;
    info!(points = graph.points().len(), file = POINTS_FILE, "wrote table");
    Ok(())
}

/// Compute the `context` column for one method, or fail the run.
fn method_context(
    qualified_name: &str,
    simple_name: &str,
    source: &str,
    extractor: &dyn ContextPathExtractor,
) -> Result<String, SerializeError> {
    let stripped = strip_dangling_comment(source);
    let records = extractor.extract(stripped, MAX_PATH_LENGTH, MAX_PATH_WIDTH);

    let wanted = split_to_subtokens(simple_name).join(extractor.internal_separator());
    let context = records
        .into_iter()
        .find(|record| record.name == wanted)
        .map(|record| record.features)
        .unwrap_or_default();

    if context.is_empty() {
        return Err(SerializeError::UnexpectedEmptyContext {
            method: qualified_name.to_string(),
        });
    }

    Ok(context)
}

/// Strip a dangling line comment: `//...` at end of input with no trailing
/// newline. Comments followed by a line terminator are untouched.
fn strip_dangling_comment(source: &str) -> &str {
    match DANGLING_COMMENT.find(source) {
        Some(found) => &source[..found.start()],
        None => source,
    }
}

/// Open a table for writing with create-new semantics.
fn table_writer(path: PathBuf, headers: bool) -> Result<csv::Writer<File>, SerializeError> {
    let file = File::options()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|err| {
            if err.kind() == io::ErrorKind::AlreadyExists {
                SerializeError::OutputExists { path }
            } else {
                SerializeError::Io(err)
            }
        })?;

    Ok(WriterBuilder::new()
        .has_headers(headers)
        .terminator(Terminator::CRLF)
        .from_writer(file))
}
