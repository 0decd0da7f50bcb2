//! Builtin type vocabulary.
//!
//! Every builtin type name that a schema may use without importing anything: integers, floats, strings, the opaque
//! value/object types, raw buffers, durations and time points.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - `nothing` is the "no value" type; `void` is accepted as an alias.
//! - The canonical spelling is what the canonical formatter prints, so `from_str(as_str(id)) == Some(id)` holds for
//!   every id.
//!
//! ## Examples
//! ```rust
//! use qilang_core::lang::types::{self, BuiltinTypeId, BuiltinCategory};
//!
//! assert_eq!(types::from_str("uint16"), Some(BuiltinTypeId::UInt16));
//! assert_eq!(types::as_str(BuiltinTypeId::Value), "any");
//! assert_eq!(types::category(BuiltinTypeId::Hours), BuiltinCategory::Duration);
//! ```

/// Stable identifier for builtin types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinTypeId {
    Nothing,
    Bool,
    Char,
    Int,
    UInt,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Float32,
    Float64,
    String,
    Value,
    Object,
    Raw,
    NanoSeconds,
    MicroSeconds,
    MilliSeconds,
    Seconds,
    Minutes,
    Hours,
    QiTimePoint,
    SteadyTimePoint,
    SystemTimePoint,
}

/// Broad grouping of builtin types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCategory {
    Void,
    Bool,
    Char,
    Integer,
    Float,
    String,
    Value,
    Object,
    Buffer,
    Duration,
    TimePoint,
}

/// Metadata for a builtin type.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinTypeInfo {
    pub id: BuiltinTypeId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub category: BuiltinCategory,
}

/// Registry of builtin types, in declaration order.
pub const BUILTIN_TYPES: &[BuiltinTypeInfo] = &[
    info(BuiltinTypeId::Nothing, "nothing", &["void"], BuiltinCategory::Void),
    info(BuiltinTypeId::Bool, "bool", &[], BuiltinCategory::Bool),
    info(BuiltinTypeId::Char, "char", &[], BuiltinCategory::Char),
    info(BuiltinTypeId::Int, "int", &[], BuiltinCategory::Integer),
    info(BuiltinTypeId::UInt, "uint", &[], BuiltinCategory::Integer),
    info(BuiltinTypeId::Int8, "int8", &[], BuiltinCategory::Integer),
    info(BuiltinTypeId::UInt8, "uint8", &[], BuiltinCategory::Integer),
    info(BuiltinTypeId::Int16, "int16", &[], BuiltinCategory::Integer),
    info(BuiltinTypeId::UInt16, "uint16", &[], BuiltinCategory::Integer),
    info(BuiltinTypeId::Int32, "int32", &[], BuiltinCategory::Integer),
    info(BuiltinTypeId::UInt32, "uint32", &[], BuiltinCategory::Integer),
    info(BuiltinTypeId::Int64, "int64", &[], BuiltinCategory::Integer),
    info(BuiltinTypeId::UInt64, "uint64", &[], BuiltinCategory::Integer),
    info(BuiltinTypeId::Float, "float", &[], BuiltinCategory::Float),
    info(BuiltinTypeId::Float32, "float32", &[], BuiltinCategory::Float),
    info(BuiltinTypeId::Float64, "float64", &[], BuiltinCategory::Float),
    info(BuiltinTypeId::String, "str", &[], BuiltinCategory::String),
    info(BuiltinTypeId::Value, "any", &[], BuiltinCategory::Value),
    info(BuiltinTypeId::Object, "obj", &[], BuiltinCategory::Object),
    info(BuiltinTypeId::Raw, "raw", &[], BuiltinCategory::Buffer),
    info(BuiltinTypeId::NanoSeconds, "nsec", &[], BuiltinCategory::Duration),
    info(BuiltinTypeId::MicroSeconds, "usec", &[], BuiltinCategory::Duration),
    info(BuiltinTypeId::MilliSeconds, "msec", &[], BuiltinCategory::Duration),
    info(BuiltinTypeId::Seconds, "sec", &[], BuiltinCategory::Duration),
    info(BuiltinTypeId::Minutes, "min", &[], BuiltinCategory::Duration),
    info(BuiltinTypeId::Hours, "hour", &[], BuiltinCategory::Duration),
    info(BuiltinTypeId::QiTimePoint, "qitimepoint", &[], BuiltinCategory::TimePoint),
    info(BuiltinTypeId::SteadyTimePoint, "steadytimepoint", &[], BuiltinCategory::TimePoint),
    info(BuiltinTypeId::SystemTimePoint, "systemtimepoint", &[], BuiltinCategory::TimePoint),
];

/// Canonical spelling.
pub fn as_str(id: BuiltinTypeId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: BuiltinTypeId) -> BuiltinCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: BuiltinTypeId) -> &'static BuiltinTypeInfo {
    BUILTIN_TYPES.iter().find(|t| t.id == id).expect("builtin type info missing")
}

/// Resolve a type name (canonical or alias) to a [`BuiltinTypeId`].
pub fn from_str(name: &str) -> Option<BuiltinTypeId> {
    if let Some(t) = BUILTIN_TYPES.iter().find(|t| t.canonical == name) {
        return Some(t.id);
    }
    BUILTIN_TYPES
        .iter()
        .find(|t| {
            let aliases: &[&str] = t.aliases;
            aliases.contains(&name)
        })
        .map(|t| t.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(
    id: BuiltinTypeId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    category: BuiltinCategory,
) -> BuiltinTypeInfo {
    BuiltinTypeInfo {
        id,
        canonical,
        aliases,
        category,
    }
}
