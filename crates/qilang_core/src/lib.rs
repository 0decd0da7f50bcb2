//! Provide the canonical language vocabulary of the qilang interface definition language.
//!
//! This crate is intentionally small and dependency-free. Both the syntax frontend and the code generators look up
//! spellings here instead of matching on string literals.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, and no AST types.
//! - Current scope: reserved keywords, expression operators and builtin type names.

pub mod lang;
