//! Packages, parsed files and the symbols they export.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use qilang_syntax::ast::{Ast, Decl, Literal, Location, Node, NodeId, Stmt};

// ============================================================================
// Files
// ============================================================================

/// A successfully parsed `.qi` file.
#[derive(Debug)]
pub struct ParsedFile {
    /// Canonical path, also the file's identity.
    pub path: PathBuf,
    /// Name recorded in node locations.
    pub filename: String,
    /// Declared package name.
    pub package: String,
    pub source: String,
    pub ast: Ast,
}

impl ParsedFile {
    /// File stem, used for include paths and guards (`robot` for `a/b/robot.qi`).
    pub fn stem(&self) -> &str {
        self.path.file_stem().and_then(|s| s.to_str()).unwrap_or("")
    }
}

/// Shared handle to a parsed file. Parsing the same canonical path twice returns the same handle.
pub type FileRef = Arc<ParsedFile>;

// ============================================================================
// Exports and imports
// ============================================================================

/// A top-level symbol made visible by a package.
#[derive(Debug, Clone)]
pub struct Export {
    pub name: String,
    pub file: FileRef,
    pub node: NodeId,
}

impl Export {
    pub fn location(&self) -> &Location {
        self.file.ast.location(self.node)
    }

    pub fn decl(&self) -> Option<&Decl> {
        self.file.ast.decl(self.node)
    }
}

/// An import statement, as seen from the importing package.
#[derive(Debug, Clone)]
pub struct ImportRef {
    pub file: PathBuf,
    pub node: NodeId,
    pub location: Location,
}

/// Name under which a top-level node is exported, if it is exported at all.
pub fn exported_name(ast: &Ast, id: NodeId) -> Option<String> {
    match ast.node(id) {
        Node::Decl(decl) => match decl {
            Decl::Interface(_)
            | Decl::Struct(_)
            | Decl::Fn(_)
            | Decl::Const(_)
            | Decl::TypeDef(_)
            | Decl::Enum(_) => Some(decl.name().to_string()),
            Decl::Emit(_) | Decl::Prop(_) | Decl::StructField(_) | Decl::EnumField(_) => None,
        },
        Node::Stmt(Stmt::ObjectDef(def)) => match ast.literal(def.name) {
            Some(Literal::String(name)) => Some(name.clone()),
            _ => None,
        },
        _ => None,
    }
}

// ============================================================================
// Packages
// ============================================================================

/// One logical package, possibly spread over several include roots.
#[derive(Debug, Default)]
pub struct Package {
    pub name: String,
    files: BTreeMap<PathBuf, FileRef>,
    /// Files whose exports and imports have been registered.
    registered: BTreeSet<PathBuf>,
    exports: BTreeMap<String, Export>,
    imports: BTreeMap<String, Vec<ImportRef>>,
    /// Duplicate exports found while registering; the package stays failed once this is non-zero.
    duplicates: usize,
    /// Number of include directories the last time the package was located.
    located_with: Option<usize>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_file(&mut self, file: FileRef) {
        self.files.entry(file.path.clone()).or_insert(file);
    }

    /// Files of the package, ordered by path.
    pub fn files(&self) -> impl Iterator<Item = &FileRef> {
        self.files.values()
    }

    pub fn file(&self, path: &Path) -> Option<&FileRef> {
        self.files.get(path)
    }

    pub fn exports(&self) -> &BTreeMap<String, Export> {
        &self.exports
    }

    pub fn export(&self, name: &str) -> Option<&Export> {
        self.exports.get(name)
    }

    /// Imports keyed by imported package name.
    pub fn imports(&self) -> &BTreeMap<String, Vec<ImportRef>> {
        &self.imports
    }

    pub(crate) fn is_registered(&self, path: &Path) -> bool {
        self.registered.contains(path)
    }

    pub(crate) fn mark_registered(&mut self, path: &Path) {
        self.registered.insert(path.to_path_buf());
    }

    /// Whether every file is registered and the package was located with `includes` include directories.
    pub(crate) fn is_loaded(&self, includes: usize) -> bool {
        self.located_with == Some(includes) && self.files.keys().all(|path| self.registered.contains(path))
    }

    pub(crate) fn mark_located(&mut self, includes: usize) {
        self.located_with = Some(includes);
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub(crate) fn add_duplicates(&mut self, count: usize) {
        self.duplicates += count;
    }

    /// Add an export; on a name clash the first definition is kept and returned as `Err`.
    pub(crate) fn add_export(&mut self, export: Export) -> Result<(), Export> {
        match self.exports.get(&export.name) {
            Some(previous) => Err(previous.clone()),
            None => {
                self.exports.insert(export.name.clone(), export);
                Ok(())
            }
        }
    }

    pub(crate) fn add_import(&mut self, package: &str, import: ImportRef) {
        self.imports.entry(package.to_string()).or_default().push(import);
    }
}

// ============================================================================
// Resolution results
// ============================================================================

/// What a custom type reference resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolKind {
    Interface,
    Struct,
    Enum,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Interface => write!(f, "interface"),
            SymbolKind::Struct => write!(f, "struct"),
            SymbolKind::Enum => write!(f, "enum"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub package: String,
    pub name: String,
    pub kind: SymbolKind,
}

impl ResolutionResult {
    pub fn new(package: impl Into<String>, name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            kind,
        }
    }
}
