//! The compile pipeline behind `qic`: load inputs, resolve packages, generate, write.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::backend::{self, Backend, CodegenOptions};
use crate::frontend::diagnostics::DiagnosticManager;
use crate::frontend::package::FileRef;
use crate::frontend::package_manager::{PackageError, PackageManager};

use super::{CliError, CliResult};

/// Parse `inputs`, analyse their packages when `backend` needs resolved types, and generate one output buffer.
///
/// Outputs of several files are concatenated in input order. Nothing is returned unless every file succeeded.
pub fn compile(backend: Backend, includes: &[PathBuf], inputs: &[String]) -> CliResult<String> {
    let mut pm = PackageManager::new();
    for dir in includes {
        pm.add_include(dir);
    }

    let files = parse_inputs(&mut pm, inputs)?;

    if backend.needs_resolution() {
        let packages: BTreeSet<String> = files.iter().map(|file| file.package.clone()).collect();
        for package in &packages {
            if let Err(err) = pm.anal(Some(package)) {
                return Err(package_failure(&pm, err));
            }
        }
    }

    let mut diagnostics = DiagnosticManager::new();
    let mut output = String::new();
    for file in &files {
        tracing::info!(backend = %backend, file = %file.filename, "generating");
        let generated = backend::generate(backend, &pm, file, &mut diagnostics, CodegenOptions::default())
            .map_err(|e| CliError::compile(format!("Code generation error: {}", e)))?;
        output.push_str(&generated);
    }

    if !diagnostics.is_empty() {
        eprint!("{}", diagnostics.render());
    }
    if diagnostics.has_error() {
        return Err(CliError::compile(format!("{} error(s) generating code", diagnostics.error_count())));
    }
    Ok(output)
}

/// Every file named by `inputs`, in input order, each at most once.
fn parse_inputs(pm: &mut PackageManager, inputs: &[String]) -> CliResult<Vec<FileRef>> {
    let mut files: Vec<FileRef> = Vec::new();
    for input in inputs {
        let parsed = pm.parse(input).map_err(|err| package_failure(pm, err))?;
        if parsed.is_empty() {
            return Err(CliError::compile(format!("No qilang source found for '{}'", input)));
        }
        for file in parsed {
            if !files.iter().any(|f| f.path == file.path) {
                files.push(file);
            }
        }
    }
    Ok(files)
}

/// Turn a package error into a CLI error, printing its details to stderr.
///
/// Syntax errors are rendered with source context; everything else was recorded by the package manager.
fn package_failure(pm: &PackageManager, err: PackageError) -> CliError {
    match err {
        PackageError::Syntax { file, text, errors } => {
            for error in &errors {
                let report = miette::Report::new(error.to_report(&file, &text));
                eprintln!("{:?}", report);
            }
            CliError::compile(format!("{} syntax error(s) in {}", errors.len(), file))
        }
        other => {
            if !pm.diagnostics().is_empty() {
                eprint!("{}", pm.diagnostics().render());
            }
            CliError::compile(other.to_string())
        }
    }
}

/// Write `output` to `path`, or to stdout without one.
pub fn write_output(path: Option<&Path>, output: &str) -> CliResult<()> {
    match path {
        Some(path) => fs::write(path, output)
            .map_err(|e| CliError::output(format!("Error writing '{}': {}", path.display(), e))),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| CliError::output(format!("Error writing output: {}", e)))
        }
    }
}
