//! Operator vocabulary for qilang value expressions.
//!
//! Expressions only appear in object definitions and constant initializers, so the operator set is small and C-like.
//! Each operator has a stable [`OperatorId`], its spelling, a binding power and the positions it may appear in.
//!
//! ## Notes
//! - `precedence` is a relative ordering where higher binds tighter.
//! - `-` is both a binary and a prefix operator; `[]` (array fetch) is postfix only.
//!
//! ## Examples
//! ```rust
//! use qilang_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("&&"), Some(OperatorId::BoolAnd));
//! assert_eq!(operators::as_str(OperatorId::Modulus), "%");
//! assert!(operators::precedence(OperatorId::Multiply) > operators::precedence(OperatorId::Plus));
//! ```

/// Define where an operator may appear relative to its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
    Postfix,
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Logical
    BoolOr,
    BoolAnd,

    // Bitwise
    And,
    Or,
    Xor,

    // Comparison
    EqEq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,

    // Arithmetic
    Plus,
    Minus,
    Divide,
    Multiply,
    Modulus,

    // Access
    FetchArray,

    // Prefix only
    Negate,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub precedence: u8,
    pub fixity: &'static [Fixity],
}

const INFIX: &[Fixity] = &[Fixity::Infix];
const PREFIX: &[Fixity] = &[Fixity::Prefix];
const BOTH: &[Fixity] = &[Fixity::Infix, Fixity::Prefix];
const POSTFIX: &[Fixity] = &[Fixity::Postfix];

/// Binding power of prefix operators.
pub const PREFIX_PRECEDENCE: u8 = 90;

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    op(OperatorId::BoolOr, "||", 10, INFIX),
    op(OperatorId::BoolAnd, "&&", 20, INFIX),
    op(OperatorId::Or, "|", 30, INFIX),
    op(OperatorId::Xor, "^", 35, INFIX),
    op(OperatorId::And, "&", 40, INFIX),
    op(OperatorId::EqEq, "==", 50, INFIX),
    op(OperatorId::Ne, "!=", 50, INFIX),
    op(OperatorId::Gt, ">", 60, INFIX),
    op(OperatorId::Lt, "<", 60, INFIX),
    op(OperatorId::Ge, ">=", 60, INFIX),
    op(OperatorId::Le, "<=", 60, INFIX),
    op(OperatorId::Plus, "+", 70, INFIX),
    op(OperatorId::Minus, "-", 70, BOTH),
    op(OperatorId::Divide, "/", 80, INFIX),
    op(OperatorId::Multiply, "*", 80, INFIX),
    op(OperatorId::Modulus, "%", 80, INFIX),
    op(OperatorId::FetchArray, "[]", 100, POSTFIX),
    op(OperatorId::Negate, "!", PREFIX_PRECEDENCE, PREFIX),
];

/// Canonical spelling.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Binding power when used as an infix/postfix operator.
pub fn precedence(id: OperatorId) -> u8 {
    info_for(id).precedence
}

/// Return `true` if `id` may be used in `fixity` position.
pub fn allows(id: OperatorId, fixity: Fixity) -> bool {
    info_for(id).fixity.contains(&fixity)
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Resolve an operator spelling to its identifier.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

// --- helpers -----------------------------------------------------------------

const fn op(id: OperatorId, spelling: &'static str, precedence: u8, fixity: &'static [Fixity]) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        fixity,
    }
}
