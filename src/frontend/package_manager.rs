//! Package discovery, loading and type resolution for multi-file qilang projects
//!
//! A package `a.b.c` is every `*.qi` file found under a directory `.../a/b/c` of any include root. Files are parsed
//! once (keyed by canonical path), checked for exactly one `package` statement matching their directory, and their
//! top-level declarations are registered as the package's exports.
//!
//! Resolution is two-phase: the exports of a package and of every package it imports are aggregated first, then each
//! custom type reference is resolved and the result stored in a side table keyed by `(file, node)`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qilang::frontend::package_manager::PackageManager;
//!
//! let mut pm = PackageManager::new();
//! pm.add_include("idl/");
//! pm.anal(Some("robot.motion"))?;
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use qilang_syntax::ast::{Ast, Decl, ImportKind, Location, NodeId, NodeType, Position, Stmt, TypeExpr};
use qilang_syntax::diagnostics::{CompileError, format_error};
use qilang_syntax::visitor::{NodeFilter, find_nodes};
use thiserror::Error;

use super::diagnostics::{Diagnostic, DiagnosticManager, errors};
use super::package::{Export, FileRef, ImportRef, Package, ParsedFile, ResolutionResult, SymbolKind, exported_name};

/// Extension of qilang source files.
pub const SOURCE_EXTENSION: &str = "qi";

/// Typedef chains longer than this are reported as not being types.
const MAX_TYPEDEF_DEPTH: usize = 32;

// ============================================================================
// Errors
// ============================================================================

/// Error during package loading or resolution
///
/// Everything except `Io` and `Syntax` has also been recorded in the manager's [`DiagnosticManager`].
#[derive(Debug, Error)]
pub enum PackageError {
    /// File could not be read
    #[error("Error reading '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Lexer or parser errors
    #[error("{}", render_syntax_errors(.file, .text, .errors))]
    Syntax {
        file: String,
        text: String,
        errors: Vec<CompileError>,
    },
    /// Missing/extra package declaration, directory mismatch, duplicate export
    #[error("{location}: {message}")]
    Structure { message: String, location: Location },
    #[error("Can't find package '{0}'")]
    PackageNotFound(String),
    /// A type reference that could not be resolved
    #[error("{location}: {message}")]
    Resolution { message: String, location: Location },
    /// Several errors were reported while processing a package
    #[error("{count} error(s) in package '{package}'")]
    Failed { package: String, count: usize },
}

fn render_syntax_errors(file: &str, text: &str, errors: &[CompileError]) -> String {
    let mut msg = String::new();
    for err in errors {
        msg.push_str(&format_error(file, text, err));
        msg.push('\n');
    }
    msg.trim_end().to_string()
}

// ============================================================================
// Package manager
// ============================================================================

/// Loads packages from include directories and resolves the type references between them.
///
/// One instance per compilation job; packages are never removed.
#[derive(Debug, Default)]
pub struct PackageManager {
    packages: BTreeMap<String, Package>,
    /// Canonical path -> parsed file
    files: BTreeMap<PathBuf, FileRef>,
    /// Searched front to back
    includes: Vec<PathBuf>,
    resolutions: BTreeMap<(PathBuf, NodeId), ResolutionResult>,
    /// Package name -> (include count when located, files found)
    located: BTreeMap<String, (usize, Vec<PathBuf>)>,
    diagnostics: DiagnosticManager,
    reads: usize,
}

impl PackageManager {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Add an include directory in front of the search list. Known directories are ignored.
    pub fn add_include(&mut self, dir: impl AsRef<Path>) {
        let dir = dir.as_ref();
        let dir = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        if !self.includes.contains(&dir) {
            tracing::debug!(include = %dir.display(), "adding include directory");
            self.includes.insert(0, dir);
        }
    }

    pub fn includes(&self) -> &[PathBuf] {
        &self.includes
    }

    pub fn packages(&self) -> &BTreeMap<String, Package> {
        &self.packages
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Files of a package, ordered by path.
    pub fn package_files(&self, name: &str) -> Vec<FileRef> {
        self.packages
            .get(name)
            .map(|p| p.files().cloned().collect())
            .unwrap_or_default()
    }

    pub fn file(&self, path: &Path) -> Option<&FileRef> {
        self.files.get(path)
    }

    pub fn diagnostics(&self) -> &DiagnosticManager {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticManager {
        &mut self.diagnostics
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }

    /// Result stored by [`PackageManager::resolve_import`] for a custom type node.
    pub fn resolution(&self, file: &Path, node: NodeId) -> Option<&ResolutionResult> {
        self.resolutions.get(&(file.to_path_buf(), node))
    }

    /// Number of files actually read from disk.
    pub fn files_read(&self) -> usize {
        self.reads
    }

    /// Export `name` of `package`, if the package is loaded and exports it.
    pub fn find_export(&self, package: &str, name: &str) -> Option<Export> {
        self.packages.get(package).and_then(|p| p.export(name)).cloned()
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Parse `path` (a file, a directory, or otherwise a package name).
    pub fn parse(&mut self, target: &str) -> Result<Vec<FileRef>, PackageError> {
        let path = Path::new(target);
        if path.is_file() {
            Ok(vec![self.parse_file(path)?])
        } else if path.is_dir() {
            self.parse_dir(path)
        } else {
            self.parse_package(target)?;
            Ok(self.package_files(target))
        }
    }

    /// Parse every `*.qi` file under `dir`, recursively.
    pub fn parse_dir(&mut self, dir: &Path) -> Result<Vec<FileRef>, PackageError> {
        let mut paths = BTreeSet::new();
        collect_sources(dir, &mut paths);
        paths.iter().map(|path| self.parse_file(path)).collect()
    }

    /// Parse one file and register it under its package.
    ///
    /// A file that was already parsed is returned from the cache without touching the disk.
    ///
    /// # Errors
    ///
    /// I/O and syntax errors, a missing or repeated `package` statement, or a package name that does not match the
    /// file's directories.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn parse_file(&mut self, path: &Path) -> Result<FileRef, PackageError> {
        let canonical = fs::canonicalize(path).map_err(|source| PackageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(file) = self.files.get(&canonical) {
            tracing::debug!("file already parsed");
            return Ok(Arc::clone(file));
        }

        let text = fs::read_to_string(&canonical).map_err(|source| PackageError::Io {
            path: canonical.clone(),
            source,
        })?;
        self.reads += 1;

        let filename = canonical.display().to_string();
        let ast = match qilang_syntax::parse_source(&text, &filename) {
            Ok(ast) => ast,
            Err(errors) => {
                return Err(PackageError::Syntax {
                    file: filename,
                    text,
                    errors,
                });
            }
        };

        let package = self.declared_package(&ast, &filename)?;
        self.check_directories(&canonical, &package, &ast)?;

        let file = Arc::new(ParsedFile {
            path: canonical.clone(),
            filename,
            package: package.clone(),
            source: text,
            ast,
        });
        self.files.insert(canonical, Arc::clone(&file));
        self.packages
            .entry(package.clone())
            .or_insert_with(|| Package::new(package))
            .add_file(Arc::clone(&file));
        Ok(file)
    }

    /// The single `package` statement of a file.
    fn declared_package(&mut self, ast: &Ast, filename: &str) -> Result<String, PackageError> {
        let mut declared: Option<(String, NodeId)> = None;
        for &root in ast.roots() {
            let Some(Stmt::Package(name)) = ast.stmt(root) else {
                continue;
            };
            match &declared {
                Some((_, previous)) => {
                    let diagnostic =
                        errors::extra_package(ast.location(root).clone(), ast.location(*previous).clone());
                    return Err(self.structural(diagnostic));
                }
                None => declared = Some((name.clone(), root)),
            }
        }
        match declared {
            Some((name, _)) => Ok(name),
            None => {
                let start = Position::new(1, 1);
                let location = Location::new(Arc::from(filename), start, start);
                Err(self.structural(errors::missing_package(location)))
            }
        }
    }

    /// Check that the directories containing `path` spell the package name, then add the package root as an include.
    fn check_directories(&mut self, path: &Path, package: &str, ast: &Ast) -> Result<(), PackageError> {
        let mut dir = path.parent();
        for segment in package.rsplit('.') {
            let dir_name = dir
                .and_then(|d| d.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or("");
            if dir_name != segment {
                let location = package_location(ast);
                return Err(self.structural(errors::package_directory_mismatch(location, package, dir_name)));
            }
            dir = dir.and_then(Path::parent);
        }
        if let Some(root) = dir {
            self.add_include(root);
        }
        Ok(())
    }

    /// Every `*.qi` file of `name` reachable from the include directories, sorted and deduplicated.
    pub fn locate_package(&self, name: &str) -> Vec<PathBuf> {
        let suffix: PathBuf = name.split('.').collect();
        let mut found = BTreeSet::new();
        for root in &self.includes {
            let mut dirs = Vec::new();
            find_package_dirs(root, root, &suffix, &mut dirs);
            for dir in dirs {
                collect_sources(&dir, &mut found);
            }
        }
        tracing::debug!(package = name, count = found.len(), "located package files");
        found.into_iter().collect()
    }

    /// Locate, parse and register the exports and imports of a package.
    ///
    /// Idempotent: files are parsed once and registered once.
    #[tracing::instrument(skip(self))]
    pub fn parse_package(&mut self, name: &str) -> Result<(), PackageError> {
        self.load_package(name, &Location::none())
    }

    fn load_package(&mut self, name: &str, requested_at: &Location) -> Result<(), PackageError> {
        let includes = self.includes.len();
        let loaded = self.packages.get(name).is_some_and(|p| p.is_loaded(includes));
        if !loaded {
            for path in self.located_files(name) {
                self.parse_file(&path)?;
            }

            let files = self.package_files(name);
            if files.is_empty() {
                self.diagnostics
                    .report(errors::package_not_found(requested_at.clone(), name));
                return Err(PackageError::PackageNotFound(name.to_string()));
            }
            for file in files {
                self.register_file(name, &file);
            }
            if let Some(package) = self.packages.get_mut(name) {
                package.mark_located(includes);
            }
        }

        match self.packages.get(name).map(Package::duplicates) {
            Some(count) if count > 0 => Err(PackageError::Failed {
                package: name.to_string(),
                count,
            }),
            _ => Ok(()),
        }
    }

    /// [`Self::locate_package`], cached until an include directory is added.
    fn located_files(&mut self, name: &str) -> Vec<PathBuf> {
        let includes = self.includes.len();
        if let Some((located_with, files)) = self.located.get(name) {
            if *located_with == includes {
                return files.clone();
            }
        }
        let files = self.locate_package(name);
        self.located.insert(name.to_string(), (includes, files.clone()));
        files
    }

    /// Register the top-level exports and imports of `file`, reporting duplicate exports.
    fn register_file(&mut self, name: &str, file: &FileRef) {
        let Some(package) = self.packages.get_mut(name) else {
            return;
        };
        if package.is_registered(&file.path) {
            return;
        }

        let ast = &file.ast;
        let mut duplicates = Vec::new();
        for &root in ast.roots() {
            if let Some(Stmt::Import(import)) = ast.stmt(root) {
                let import_ref = ImportRef {
                    file: file.path.clone(),
                    node: root,
                    location: ast.location(root).clone(),
                };
                package.add_import(&import.package, import_ref);
                continue;
            }
            let Some(export_name) = exported_name(ast, root) else {
                continue;
            };
            let export = Export {
                name: export_name.clone(),
                file: Arc::clone(file),
                node: root,
            };
            if let Err(previous) = package.add_export(export) {
                duplicates.push(errors::already_exported(
                    ast.location(root).clone(),
                    &export_name,
                    previous.location().clone(),
                ));
            }
        }
        package.mark_registered(&file.path);
        package.add_duplicates(duplicates.len());

        for diagnostic in duplicates {
            self.diagnostics.report(diagnostic);
        }
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve every custom type reference of every file of `name`.
    ///
    /// Imported packages are loaded first so that all exports are known before any reference is resolved.
    #[tracing::instrument(skip(self))]
    pub fn resolve_package(&mut self, name: &str) -> Result<(), PackageError> {
        self.parse_package(name)?;

        let imported: Vec<(String, Location)> = self
            .packages
            .get(name)
            .map(|p| {
                p.imports()
                    .iter()
                    .filter_map(|(pkg, refs)| refs.first().map(|r| (pkg.clone(), r.location.clone())))
                    .collect()
            })
            .unwrap_or_default();
        for (package, location) in imported {
            self.load_package(&package, &location)?;
        }

        let mut failed = 0;
        for file in self.package_files(name) {
            let custom_types = find_nodes(&file.ast, file.ast.roots(), NodeFilter::Type(NodeType::CustomType));
            for (_, node) in custom_types {
                if self.resolve_import(&file, name, node).is_err() {
                    failed += 1;
                }
            }
        }
        if failed > 0 {
            return Err(PackageError::Failed {
                package: name.to_string(),
                count: failed,
            });
        }
        Ok(())
    }

    /// Resolve the custom type at `node` of `file` (which belongs to `package`) and record the result.
    ///
    /// Lookup order: explicit `pkg.Type`, the package's own exports, then the file's imports in order.
    pub fn resolve_import(
        &mut self,
        file: &FileRef,
        package: &str,
        node: NodeId,
    ) -> Result<ResolutionResult, PackageError> {
        let result = self.resolve_type(file, package, node, 0)?;
        tracing::debug!(
            package = %result.package,
            name = %result.name,
            kind = %result.kind,
            "resolved type"
        );
        self.resolutions.insert((file.path.clone(), node), result.clone());
        Ok(result)
    }

    fn resolve_type(
        &mut self,
        file: &FileRef,
        package: &str,
        node: NodeId,
        depth: usize,
    ) -> Result<ResolutionResult, PackageError> {
        let location = file.ast.location(node).clone();
        let name = match file.ast.type_expr(node) {
            Some(TypeExpr::Custom(name)) => name.clone(),
            _ => {
                let diagnostic = Diagnostic::error(location, format!("node {} is not a custom type reference", node));
                return Err(self.unresolved(diagnostic));
            }
        };

        if let Some((pkg, ty)) = name.rsplit_once('.') {
            self.load_package(pkg, &location)?;
            return match self.find_export(pkg, ty) {
                Some(export) => self.classify(pkg, &export, &location, depth),
                None => Err(self.unresolved(errors::symbol_not_found(location, ty, pkg))),
            };
        }

        if let Some(export) = self.find_export(package, &name) {
            return self.classify(package, &export, &location, depth);
        }

        for &root in file.ast.roots() {
            let Some(Stmt::Import(import)) = file.ast.stmt(root) else {
                continue;
            };
            let listed = match &import.kind {
                ImportKind::Package | ImportKind::All => false,
                ImportKind::List(names) if names.contains(&name) => true,
                ImportKind::List(_) => continue,
            };
            self.load_package(&import.package, file.ast.location(root))?;
            match self.find_export(&import.package, &name) {
                Some(export) => return self.classify(&import.package, &export, &location, depth),
                None if listed => {
                    return Err(self.unresolved(errors::symbol_not_found(location, &name, &import.package)));
                }
                None => {}
            }
        }

        Err(self.unresolved(errors::unresolved(location, &name)))
    }

    /// Map an export to the kind of type it declares.
    fn classify(
        &mut self,
        package: &str,
        export: &Export,
        location: &Location,
        depth: usize,
    ) -> Result<ResolutionResult, PackageError> {
        let kind = match export.decl() {
            Some(Decl::Interface(_)) => SymbolKind::Interface,
            Some(Decl::Struct(_)) => SymbolKind::Struct,
            Some(Decl::Enum(_)) => SymbolKind::Enum,
            Some(Decl::TypeDef(def))
                if depth < MAX_TYPEDEF_DEPTH
                    && matches!(export.file.ast.type_expr(def.ty), Some(TypeExpr::Custom(_))) =>
            {
                let target_package = export.file.package.clone();
                self.resolve_type(&export.file, &target_package, def.ty, depth + 1)?.kind
            }
            _ => {
                return Err(self.unresolved(errors::not_a_type(location.clone(), &export.name, package)));
            }
        };
        Ok(ResolutionResult::new(package, &export.name, kind))
    }

    /// Analyse one package, or every known package when `package` is `None`.
    ///
    /// Every package is processed even if an earlier one failed; the first error is returned.
    #[tracing::instrument(skip(self))]
    pub fn anal(&mut self, package: Option<&str>) -> Result<(), PackageError> {
        match package {
            Some(name) => self.resolve_package(name),
            None => {
                let names: Vec<String> = self.packages.keys().cloned().collect();
                let mut first_error = None;
                for name in names {
                    if let Err(e) = self.resolve_package(&name) {
                        first_error.get_or_insert(e);
                    }
                }
                first_error.map_or(Ok(()), Err)
            }
        }
    }

    // ========================================================================
    // Diagnostics helpers
    // ========================================================================

    fn structural(&mut self, diagnostic: Diagnostic) -> PackageError {
        let err = PackageError::Structure {
            message: diagnostic.message.clone(),
            location: diagnostic.location.clone(),
        };
        self.diagnostics.report(diagnostic);
        err
    }

    fn unresolved(&mut self, diagnostic: Diagnostic) -> PackageError {
        let err = PackageError::Resolution {
            message: diagnostic.message.clone(),
            location: diagnostic.location.clone(),
        };
        self.diagnostics.report(diagnostic);
        err
    }
}

// ============================================================================
// Filesystem helpers
// ============================================================================

/// Location of the `package` statement of a parsed file.
fn package_location(ast: &Ast) -> Location {
    ast.roots()
        .iter()
        .find(|id| matches!(ast.stmt(**id), Some(Stmt::Package(_))))
        .map(|id| ast.location(*id).clone())
        .unwrap_or_else(Location::none)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.') || n == "target")
}

/// Directories under `root` whose path relative to `root` ends with `suffix`.
fn find_package_dirs(root: &Path, dir: &Path, suffix: &Path, out: &mut Vec<PathBuf>) {
    if let Ok(relative) = dir.strip_prefix(root) {
        if relative.ends_with(suffix) {
            out.push(dir.to_path_buf());
        }
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if entry.file_type().is_ok_and(|t| t.is_dir()) && !is_hidden(&path) {
            find_package_dirs(root, &path, suffix, out);
        }
    }
}

/// Every `*.qi` file under `dir`, recursively, as canonical paths.
fn collect_sources(dir: &Path, out: &mut BTreeSet<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if !is_hidden(&path) {
                collect_sources(&path, out);
            }
        } else if path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            out.insert(fs::canonicalize(&path).unwrap_or(path));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    fn unique_temp_dir() -> PathBuf {
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let pid = std::process::id();
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("qilang_pm_test_{}_{pid}_{id}", ts))
    }

    fn write(root: &Path, relative: &str, text: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_add_include_front_inserts_and_dedups() {
        let tmp = unique_temp_dir();
        fs::create_dir_all(tmp.join("one")).unwrap();
        fs::create_dir_all(tmp.join("two")).unwrap();

        let mut pm = PackageManager::new();
        pm.add_include(tmp.join("one"));
        pm.add_include(tmp.join("two"));
        pm.add_include(tmp.join("one"));
        let names: Vec<String> = pm
            .includes()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["two", "one"]);

        fs::remove_dir_all(&tmp).unwrap();
    }

    #[test]
    fn test_locate_package_spans_include_roots() {
        let tmp = unique_temp_dir();
        write(&tmp, "r1/a/b/one.qi", "package a.b\n");
        write(&tmp, "r2/a/b/two.qi", "package a.b\n");
        write(&tmp, "r2/a/b/nested/three.qi", "package a.b.nested\n");
        write(&tmp, "r2/a/other.qi", "package a\n");

        let mut pm = PackageManager::new();
        pm.add_include(tmp.join("r1"));
        pm.add_include(tmp.join("r2"));
        let found: Vec<String> = pm
            .locate_package("a.b")
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(found.len(), 3);
        assert!(found.contains(&"one.qi".to_string()));
        assert!(found.contains(&"two.qi".to_string()));
        assert!(found.contains(&"three.qi".to_string()));

        // Both roots contribute to one logical package
        pm.parse_package("a.b").unwrap();
        assert_eq!(pm.package_files("a.b").len(), 2);

        fs::remove_dir_all(&tmp).unwrap();
    }

    #[test]
    fn test_parse_file_adds_package_root_as_include() {
        let tmp = unique_temp_dir();
        let file = write(&tmp, "a/b/x.qi", "package a.b\n");

        let mut pm = PackageManager::new();
        pm.parse_file(&file).unwrap();
        assert_eq!(pm.includes(), &[fs::canonicalize(&tmp).unwrap()]);

        fs::remove_dir_all(&tmp).unwrap();
    }

    #[test]
    fn test_extra_package_declaration() {
        let tmp = unique_temp_dir();
        let file = write(&tmp, "a/x.qi", "package a\npackage a\n");

        let mut pm = PackageManager::new();
        let err = pm.parse_file(&file).unwrap_err();
        assert!(matches!(err, PackageError::Structure { .. }));
        let diag = &pm.diagnostics().diagnostics()[0];
        assert_eq!(diag.message, "extra package declaration");
        assert_eq!(diag.location.begin.line, 2);
        assert_eq!(diag.notes[0].message, "previous declared here");
        assert_eq!(diag.notes[0].location.begin.line, 1);

        fs::remove_dir_all(&tmp).unwrap();
    }

    #[test]
    fn test_missing_package_declaration() {
        let tmp = unique_temp_dir();
        let file = write(&tmp, "a/x.qi", "interface Foo\nend\n");

        let mut pm = PackageManager::new();
        assert!(pm.parse_file(&file).is_err());
        assert_eq!(pm.diagnostics().diagnostics()[0].message, "missing package declaration");

        fs::remove_dir_all(&tmp).unwrap();
    }

    #[test]
    fn test_syntax_errors_are_returned_not_recorded() {
        let tmp = unique_temp_dir();
        let file = write(&tmp, "a/x.qi", "package a\ninterface\n");

        let mut pm = PackageManager::new();
        let err = pm.parse_file(&file).unwrap_err();
        let PackageError::Syntax { errors, .. } = &err else {
            panic!("expected syntax error, got {err}");
        };
        assert_eq!(errors.len(), 1);
        assert!(err.to_string().contains("Expected interface name"));
        assert!(!pm.has_error());

        fs::remove_dir_all(&tmp).unwrap();
    }

    #[test]
    fn test_typedef_takes_kind_of_aliased_type() {
        let tmp = unique_temp_dir();
        write(&tmp, "a/x.qi", "package a\nstruct Point\nend\ntypedef Point Alias\ntypedef int32 Number\n");
        write(&tmp, "b/y.qi", "package b\nfrom a import *\nstruct Use\n  p Alias\n  n Number\nend\n");

        let mut pm = PackageManager::new();
        pm.add_include(&tmp);
        let err = pm.resolve_package("b").unwrap_err();
        assert!(matches!(err, PackageError::Failed { count: 1, .. }));

        let file = pm.package_files("b")[0].clone();
        let custom = find_nodes(&file.ast, file.ast.roots(), NodeFilter::Type(NodeType::CustomType));
        let alias = pm.resolution(&file.path, custom[0].1).unwrap();
        assert_eq!(alias, &ResolutionResult::new("a", "Alias", SymbolKind::Struct));
        assert!(pm.resolution(&file.path, custom[1].1).is_none());
        assert!(
            pm.diagnostics()
                .diagnostics()
                .iter()
                .any(|d| d.message == "'Number' in package 'a' is not a type")
        );

        fs::remove_dir_all(&tmp).unwrap();
    }
}
