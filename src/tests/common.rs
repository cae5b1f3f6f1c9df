use crate::config::DeriverConfig;
use crate::deriver::{Derivation, Deriver};
use crate::kernel::wff::WffTree;
use crate::syntax::parse_closed_wff;

pub fn wff(s: &str) -> WffTree {
    match parse_closed_wff(s) {
        Ok(wff) => wff,
        Err(e) => panic!("cannot parse {}: {}", s, e),
    }
}

/// Runs a derivation with the given settings.
pub fn derive_with(config: DeriverConfig, goal: &str, premises: &[&str]) -> Derivation {
    let premises: Vec<WffTree> = premises.iter().map(|p| wff(p)).collect();
    let deriver = Deriver::new(config);
    match deriver.derive(&wff(goal), &premises) {
        Ok(derivation) => derivation,
        Err(e) => panic!("derivation of {} failed: {}", goal, e),
    }
}

/// Expects the goal to be proved with the default settings.
pub fn prove(goal: &str, premises: &[&str]) -> Derivation {
    let derivation = derive_with(DeriverConfig::default(), goal, premises);
    assert!(
        derivation.proved,
        "{} was not proved, up to {}",
        goal, derivation.strength
    );
    derivation
}
