use thiserror::Error;

use self::symbol::Symbol;

pub mod canonical;
pub mod enumerate;
pub mod symbol;
pub mod wff;

/// Errors raised while building or reading a formula.
/// These reject a single construction attempt and are never recovered from silently.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FormulaError {
    #[error("invalid formula: {0}")]
    InvalidFormula(String),

    #[error("cannot parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("{0} is not closed")]
    NotClosed(String),

    #[error("cannot instantiate {formula} with {symbol}")]
    InvalidInstantiation { formula: String, symbol: Symbol },
}
