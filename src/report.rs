use serde::Serialize;

use crate::deriver::Derivation;
use crate::kernel::wff::WffTree;
use crate::proof::fitch::FitchLine;
use crate::strength::Strength;

/// A summary of a derivation, in a form that serializes to JSON.
#[derive(Debug, Serialize)]
pub struct DerivationReport {
    pub goal: String,
    pub premises: Vec<String>,
    pub proved: bool,
    pub strength: Strength,
    pub escalations: usize,
    pub outcome: String,

    // Empty unless the goal was proved.
    pub lines: Vec<FitchLine>,
}

impl DerivationReport {
    pub fn new(goal: &WffTree, premises: &[WffTree], derivation: &Derivation) -> DerivationReport {
        let lines = if derivation.proved {
            derivation.fitch()
        } else {
            vec![]
        };
        DerivationReport {
            goal: goal.to_string(),
            premises: premises.iter().map(|p| p.to_string()).collect(),
            proved: derivation.proved,
            strength: derivation.strength,
            escalations: derivation.escalations,
            outcome: derivation.outcome().to_string(),
            lines,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
