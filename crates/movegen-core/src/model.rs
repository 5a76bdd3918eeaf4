//! Entity arena for a Java project snapshot.
//!
//! Classes and methods live in append-only tables owned by [`Project`];
//! [`ClassId`] and [`MethodId`] are dense handles assigned at insert time in
//! discovery order. Handles are the identity of an entity: two inserts are
//! two entities, and all downstream maps key on handles, never on contents.
//!
//! A `Project` is populated once by whatever indexed the codebase and is
//! read-only afterwards.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ============================================================================
// Entity Handles
// ============================================================================

/// Stable handle for a class within a project snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl ClassId {
    /// Create a new class handle.
    pub fn new(id: u32) -> Self {
        ClassId(id)
    }
}

impl std::fmt::Display for ClassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "class_{}", self.0)
    }
}

/// Stable handle for a method within a project snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct MethodId(pub u32);

impl MethodId {
    /// Create a new method handle.
    pub fn new(id: u32) -> Self {
        MethodId(id)
    }
}

impl std::fmt::Display for MethodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "method_{}", self.0)
    }
}

// ============================================================================
// Body Skeleton
// ============================================================================

/// Expression skeleton, just deep enough to judge constantness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Literal constant (`1`, `"s"`, `true`, `null`).
    Literal(String),
    /// Unary prefix over another expression (`-1`, `!flag`).
    Unary(Box<Expr>),
    /// Name reference (field or local).
    Name(String),
    /// Call expression, recorded by callee name.
    Call(String),
}

impl Expr {
    /// True for literals and unary prefixes over constant operands.
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Literal(_) => true,
            Expr::Unary(operand) => operand.is_constant(),
            Expr::Name(_) | Expr::Call(_) => false,
        }
    }
}

/// One statement of a method body.
///
/// Only return shapes matter to eligibility filtering; everything else is
/// collapsed into [`Statement::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `return;` or `return <expr>;`
    Return(Option<Expr>),
    /// Any other statement.
    Other,
}

// ============================================================================
// Entities
// ============================================================================

/// A class definition discovered in the snapshot.
#[derive(Debug, Clone)]
pub struct CodeClass {
    /// Fully qualified name (`com.example.Foo`).
    pub qualified_name: String,
    /// Whether the definition is an interface.
    pub is_interface: bool,
    /// Source file, relative to the project root.
    pub file: PathBuf,
    /// Byte offset of the definition within the file.
    pub offset: u32,
    /// Member methods in declaration order; maintained by
    /// [`Project::insert_method`].
    pub methods: Vec<MethodId>,
}

impl CodeClass {
    /// Create a concrete (non-interface) class.
    pub fn new(qualified_name: impl Into<String>, file: impl Into<PathBuf>, offset: u32) -> Self {
        CodeClass {
            qualified_name: qualified_name.into(),
            is_interface: false,
            file: file.into(),
            offset,
            methods: Vec::new(),
        }
    }

    /// Mark this class as an interface.
    pub fn interface(mut self) -> Self {
        self.is_interface = true;
        self
    }

    /// Simple (unqualified) name: the segment after the last `.`.
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }
}

/// A method definition discovered in the snapshot.
#[derive(Debug, Clone)]
pub struct CodeMethod {
    /// Simple name (`toCsvString`); constructors carry the class name.
    pub name: String,
    /// Containing class.
    pub class: ClassId,
    /// Whether this is a constructor.
    pub is_constructor: bool,
    /// Body statements; `None` when the method has no body (abstract,
    /// native, or unparsable).
    pub body: Option<Vec<Statement>>,
    /// Verbatim source text of the whole method.
    pub source: String,
    /// Source file, relative to the project root.
    pub file: PathBuf,
    /// Byte offset of the definition within the file.
    pub offset: u32,
}

impl CodeMethod {
    /// Create a bodiless method; use the `with_` builders to fill it in.
    pub fn new(
        name: impl Into<String>,
        class: ClassId,
        file: impl Into<PathBuf>,
        offset: u32,
    ) -> Self {
        CodeMethod {
            name: name.into(),
            class,
            is_constructor: false,
            body: None,
            source: String::new(),
            file: file.into(),
            offset,
        }
    }

    /// Mark this method as a constructor.
    pub fn constructor(mut self) -> Self {
        self.is_constructor = true;
        self
    }

    /// Attach the parsed body statements.
    pub fn with_body(mut self, body: Vec<Statement>) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach the method's source text.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

// ============================================================================
// Project Snapshot
// ============================================================================

/// Immutable-after-population snapshot of a Java project.
///
/// Entities are stored in insert order; handles are indexes into the
/// backing tables, so lookup is O(1) and iteration order is deterministic.
#[derive(Debug, Default)]
pub struct Project {
    classes: Vec<CodeClass>,
    methods: Vec<CodeMethod>,
}

impl Project {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Project::default()
    }

    /// Insert a class; the returned handle is dense and reflects discovery
    /// order.
    pub fn insert_class(&mut self, class: CodeClass) -> ClassId {
        let id = ClassId::new(self.classes.len() as u32);
        self.classes.push(class);
        id
    }

    /// Insert a method and append it to its class's member list.
    pub fn insert_method(&mut self, method: CodeMethod) -> MethodId {
        let id = MethodId::new(self.methods.len() as u32);
        let class = method.class;
        self.methods.push(method);
        if let Some(class) = self.classes.get_mut(class.0 as usize) {
            class.methods.push(id);
        }
        id
    }

    /// Look up a class by handle.
    pub fn class(&self, id: ClassId) -> Option<&CodeClass> {
        self.classes.get(id.0 as usize)
    }

    /// Look up a method by handle.
    pub fn method(&self, id: MethodId) -> Option<&CodeMethod> {
        self.methods.get(id.0 as usize)
    }

    /// All class handles, in discovery order.
    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.classes.len() as u32).map(ClassId::new)
    }

    /// Member methods of a class in declaration order; empty for unknown
    /// handles.
    pub fn methods_of(&self, id: ClassId) -> &[MethodId] {
        self.class(id).map(|c| c.methods.as_slice()).unwrap_or(&[])
    }

    /// Containing class of a method.
    pub fn containing_class(&self, id: MethodId) -> Option<ClassId> {
        self.method(id).map(|m| m.class)
    }

    /// Fully qualified method name: `<class qualified name>.<method name>`.
    pub fn qualified_method_name(&self, id: MethodId) -> Option<String> {
        let method = self.method(id)?;
        let class = self.class(method.class)?;
        Some(format!("{}.{}", class.qualified_name, method.name))
    }

    /// Number of classes in the snapshot.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of methods in the snapshot.
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
