//! Define the reserved keyword vocabulary for the qilang language.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) that records canonical spellings, aliases and categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - `out` is accepted as an alias of `emit` (older schema files use it for signals).
//!
//! ## Examples
//! ```rust
//! use qilang_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("emit"), Some(KeywordId::Emit));
//! assert_eq!(keywords::from_str("out"), Some(KeywordId::Emit)); // alias
//! assert_eq!(keywords::as_str(KeywordId::Emit), "emit");
//! ```

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Packages / imports
    Package,
    Import,
    From,

    // Declarations
    Interface,
    Fn,
    Emit,
    Prop,
    Struct,
    Const,
    Typedef,
    Enum,
    End,

    // Object statements
    Object,
    At,
    Var,

    // Literals
    True,
    False,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Package,
    Declaration,
    Statement,
    Literal,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub category: KeywordCategory,
}

/// Registry of all keywords.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(KeywordId::Package, "package", &[], KeywordCategory::Package),
    info(KeywordId::Import, "import", &[], KeywordCategory::Package),
    info(KeywordId::From, "from", &[], KeywordCategory::Package),
    info(KeywordId::Interface, "interface", &[], KeywordCategory::Declaration),
    info(KeywordId::Fn, "fn", &[], KeywordCategory::Declaration),
    info(KeywordId::Emit, "emit", &["out"], KeywordCategory::Declaration),
    info(KeywordId::Prop, "prop", &[], KeywordCategory::Declaration),
    info(KeywordId::Struct, "struct", &[], KeywordCategory::Declaration),
    info(KeywordId::Const, "const", &[], KeywordCategory::Declaration),
    info(KeywordId::Typedef, "typedef", &[], KeywordCategory::Declaration),
    info(KeywordId::Enum, "enum", &[], KeywordCategory::Declaration),
    info(KeywordId::End, "end", &[], KeywordCategory::Declaration),
    info(KeywordId::Object, "object", &[], KeywordCategory::Statement),
    info(KeywordId::At, "at", &[], KeywordCategory::Statement),
    info(KeywordId::Var, "var", &[], KeywordCategory::Statement),
    info(KeywordId::True, "true", &[], KeywordCategory::Literal),
    info(KeywordId::False, "false", &[], KeywordCategory::Literal),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Accepted alias spellings.
pub fn aliases(id: KeywordId) -> &'static [&'static str] {
    info_for(id).aliases
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling (canonical or alias).
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling matches this registry.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    if let Some(k) = KEYWORDS.iter().find(|k| k.canonical == s) {
        return Some(k.id);
    }
    KEYWORDS
        .iter()
        .find(|k| {
            let aliases: &[&str] = k.aliases;
            aliases.contains(&s)
        })
        .map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(
    id: KeywordId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    category: KeywordCategory,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        aliases,
        category,
    }
}
