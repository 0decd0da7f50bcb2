//! qilang Compiler Backend
//!
//! Every backend turns one parsed file into text. The textual dumps (`qilang`, `sexpr`, `doc`) only need the AST;
//! the C++ backends also need the package manager's resolution table, so the package must have been analysed first.
//!
//! ## Module Organization
//!
//! - `writer.rs` - indentation-aware output buffer and format attributes
//! - `qilang.rs` - canonical, round-trippable qilang form
//! - `sexpr.rs` - fully parenthesized dump
//! - `doc.rs` - JSON documentation map
//! - `cpp/` - C++ generators (interface, local, remote, bind, gmock) and include extraction

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod cpp;
pub mod doc;
pub mod qilang;
pub mod sexpr;
pub mod writer;

use std::fmt;

use qilang_syntax::ast::{Location, Param};
use thiserror::Error;

use crate::frontend::diagnostics::DiagnosticManager;
use crate::frontend::package::ParsedFile;
use crate::frontend::package_manager::PackageManager;

pub use writer::{CodeWriter, CodegenOptions};

/// Output format selected with `qic -c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Backend {
    #[value(name = "cpp_interface", alias = "cppi")]
    CppInterface,
    #[value(name = "cpp_local", alias = "cppl")]
    CppLocal,
    #[value(name = "cpp_remote", alias = "cppr")]
    CppRemote,
    #[value(name = "cpp_bind", alias = "cppb")]
    CppBind,
    #[value(name = "cpp_gmock", alias = "cppg")]
    CppGmock,
    Qilang,
    Sexpr,
    Doc,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::CppInterface => "cpp_interface",
            Backend::CppLocal => "cpp_local",
            Backend::CppRemote => "cpp_remote",
            Backend::CppBind => "cpp_bind",
            Backend::CppGmock => "cpp_gmock",
            Backend::Qilang => "qilang",
            Backend::Sexpr => "sexpr",
            Backend::Doc => "doc",
        }
    }

    /// Whether custom type references must be resolved before generating.
    pub fn needs_resolution(self) -> bool {
        !matches!(self, Backend::Qilang | Backend::Sexpr | Backend::Doc)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised while generating code
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenError {
    /// The backend cannot express this construct
    #[error("{location}: {construct} is not supported by the {backend} backend")]
    Unsupported {
        backend: Backend,
        construct: String,
        location: Location,
    },
    /// A custom type with no entry in the resolution table
    #[error("{location}: type '{name}' was not resolved")]
    Unresolved { name: String, location: Location },
}

/// Generate `backend` output for `file`.
///
/// Warnings (skipped constructs, documentation problems) are reported to `diagnostics`; anything the backend cannot
/// render is an error and no partial output is returned.
#[tracing::instrument(skip_all, fields(backend = %backend, file = %file.filename))]
pub fn generate(
    backend: Backend,
    pm: &PackageManager,
    file: &ParsedFile,
    diagnostics: &mut DiagnosticManager,
    options: CodegenOptions,
) -> Result<String, GenError> {
    let output = match backend {
        Backend::Qilang => qilang::format_qilang(&file.ast, options),
        Backend::Sexpr => sexpr::format_sexpr(&file.ast, options),
        Backend::Doc => doc::generate_doc(&file.ast, diagnostics),
        Backend::CppInterface => cpp::interface::generate(pm, file, options)?,
        Backend::CppLocal => cpp::local::generate(pm, file, diagnostics, options)?,
        Backend::CppRemote => cpp::remote::generate(pm, file, options)?,
        Backend::CppBind => cpp::bind::generate(pm, file, diagnostics, options)?,
        Backend::CppGmock => cpp::gmock::generate(pm, file, options)?,
    };
    tracing::debug!(bytes = output.len(), "generated output");
    Ok(output)
}

/// Name of the `index`-th parameter: the declared name, or `p<index>` for anonymous parameters.
pub fn param_name(param: &Param, index: usize) -> String {
    match &param.name {
        Some(name) => name.clone(),
        None => format!("p{}", index),
    }
}

/// Quote `text` as a double-quoted literal with `\n \t \r \\ \"` escapes (valid in qilang, C++ and JSON).
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
