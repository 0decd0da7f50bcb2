//! `qic`, the qilang interface compiler
//!
//! ```text
//! qic [-c BACKEND] [-I DIR]... [-o FILE] INPUT...
//! ```
//!
//! An input is a `.qi` file, a directory of them, or a package name searched in the `-I` directories. All inputs are
//! compiled with one backend into a single buffer, which reaches stdout or `-o` only when every file succeeded.
//! Diagnostics and logs go to stderr.
//!
//! Exit status: 0 on success, 1 when a file fails to parse, resolve or generate, 2 when the output cannot be written.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::backend::Backend;

/// Process exit status of `qic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// Parse, resolution or generation failed for some input
    pub const COMPILE_ERROR: ExitCode = ExitCode(1);
    /// The generated code could not be written
    pub const OUTPUT_ERROR: ExitCode = ExitCode(2);
}

/// A failed `qic` run: the summary printed last on stderr and the exit status.
///
/// Detailed diagnostics are printed by the command before it returns this.
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    pub fn compile(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::COMPILE_ERROR)
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::OUTPUT_ERROR)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

pub type CliResult<T> = Result<T, CliError>;

const BACKENDS_HELP: &str = "\
Backends:
  cpp_interface, cppi   C++ interface header (sync and async classes, data types)
  cpp_local, cppl       C++ adapters for local implementations and REGISTER_<NAME>
  cpp_remote, cppr      C++ proxies calling a remote object by method name
  cpp_bind, cppb        C++ type registration
  cpp_gmock, cppg       gmock mocks of the async contract
  qilang                canonical qilang source
  sexpr                 s-expression dump of the syntax tree
  doc                   JSON documentation map";

#[derive(Parser, Debug)]
#[command(name = "qic", version)]
#[command(about = "Compile qilang interface definitions to C++ bindings, canonical qilang or documentation")]
#[command(after_help = BACKENDS_HELP)]
pub struct Cli {
    /// Backend generating the output
    #[arg(short = 'c', long = "codegen", value_enum, value_name = "BACKEND", default_value = "qilang")]
    pub backend: Backend,

    /// Directory whose subdirectories hold packages (`a.b` lives in DIR/a/b); repeatable
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    pub includes: Vec<PathBuf>,

    /// File receiving the generated code (stdout when omitted)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// `.qi` files, directories or package names
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,
}

/// Run `qic` with the process arguments and exit with its status.
pub fn run() {
    let cli = Cli::parse();
    if let Err(err) = compile_to_output(&cli) {
        if !err.message.is_empty() {
            eprintln!("qic: {}", err.message);
        }
        process::exit(err.exit_code.0);
    }
}

/// Compile every input, then persist the buffer.
fn compile_to_output(cli: &Cli) -> CliResult<()> {
    let output = commands::compile(cli.backend, &cli.includes, &cli.inputs)?;
    commands::write_output(cli.output.as_deref(), &output)
}

// ============================================================================
// Tests
// ============================================================================
