use thiserror::Error;

use crate::kernel::FormulaError;

use self::rule::{Purpose, Rule};

pub mod domain;
pub mod fitch;
pub mod minimize;
pub mod rule;
pub mod tree;

/// Errors raised while building a proof.
///
/// A justification mismatch means a rule function broke its contract, and is fatal.
/// The fresh-constant errors only mean that an opportunity has to be skipped.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProofError {
    #[error("{rule} cites {expected} lines, but was given {found}")]
    InvalidJustification {
        rule: Rule,
        expected: usize,
        found: usize,
    },

    #[error("no fresh constant is left for {0}")]
    MissingFreshConstant(String),

    #[error("a fresh constant for {0} could be of either sort")]
    AmbiguousFreshConstant(String),

    #[error("a {purpose} subproof cannot be opened for {formula}")]
    UnexpectedFormula { purpose: Purpose, formula: String },

    #[error(transparent)]
    Formula(#[from] FormulaError),
}

impl ProofError {
    /// Whether the error only means the rule found nothing to do.
    pub fn is_no_progress(&self) -> bool {
        matches!(
            self,
            ProofError::MissingFreshConstant(_) | ProofError::AmbiguousFreshConstant(_)
        )
    }
}
