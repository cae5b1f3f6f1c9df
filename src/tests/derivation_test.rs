use crate::config::{DeriverConfig, SearchLimits};
use crate::deriver::{Deriver, Outcome};
use crate::kernel::FormulaError;
use crate::proof::ProofError;
use crate::strength::{Inferential, Modal, Strength};
use crate::syntax::parse_wff;
use crate::tests::common::{derive_with, prove};

#[test]
fn test_identity() {
    let derivation = prove("A→A", &[]);
    assert_eq!(derivation.strength, Strength::WEAKEST);
    assert_eq!(derivation.escalations, 0);
    assert_eq!(derivation.outcome(), Outcome::Success);
}

#[test]
fn test_modus_ponens() {
    let derivation = prove("B", &["A→B", "A"]);
    assert_eq!(derivation.strength, Strength::WEAKEST);
    let formulas: Vec<String> = derivation.fitch().into_iter().map(|l| l.formula).collect();
    assert_eq!(formulas, vec!["A→B", "A", "B"]);
}

#[test]
fn test_contradiction_needs_minimal_logic() {
    let derivation = prove("⊥", &["A", "¬A"]);
    assert_eq!(
        derivation.strength,
        Strength::new(Inferential::Minimal, Modal::K)
    );
    assert_eq!(derivation.escalations, 22);
}

#[test]
fn test_stop_bounds_the_search() {
    let config = DeriverConfig {
        stop: Strength::new(Inferential::Positive, Modal::KD4B),
        ..DeriverConfig::default()
    };
    let derivation = derive_with(config, "⊥", &["A", "¬A"]);
    assert!(!derivation.proved);
    assert_eq!(derivation.outcome(), Outcome::Exhausted);
    assert_eq!(derivation.strength, config.stop);
    assert_eq!(derivation.escalations, 21);
}

#[test]
fn test_start_skips_weaker_strengths() {
    let config = DeriverConfig {
        start: Strength::new(Inferential::Classical, Modal::K),
        ..DeriverConfig::default()
    };
    let derivation = derive_with(config, "A→A", &[]);
    assert!(derivation.proved);
    assert_eq!(derivation.strength, config.start);
    assert_eq!(derivation.escalations, 0);
}

#[test]
fn test_universal_to_existential() {
    let derivation = prove("∀xFx→∃xFx", &[]);
    assert_eq!(derivation.strength, Strength::WEAKEST);

    // The universal is instantiated at a fresh constant, then generalized existentially.
    let listing = derivation.fitch();
    let instance = listing.iter().find(|l| l.formula == "Fa");
    assert_eq!(instance.map(|l| l.justification.as_str()), Some("∀E (1)"));
}

#[test]
fn test_universal_distributes_over_conjunction() {
    let derivation = prove("∀x(Fx∧Gx)→∀xFx", &[]);
    assert_eq!(
        derivation.strength,
        Strength::new(Inferential::Positive, Modal::K)
    );
    assert_eq!(derivation.escalations, 11);
}

#[test]
fn test_existential_elimination() {
    let derivation = prove("∃x(Fx∧Gx)→∃xFx", &[]);
    assert_eq!(
        derivation.strength,
        Strength::new(Inferential::Positive, Modal::K)
    );
}

#[test]
fn test_substitution_of_equals() {
    let derivation = prove("Gb", &["a=b", "Ga"]);
    assert_eq!(derivation.strength, Strength::WEAKEST);
}

#[test]
fn test_seriality() {
    let derivation = prove("□A→◇A", &[]);
    assert_eq!(
        derivation.strength,
        Strength::new(Inferential::Implicational, Modal::KD)
    );
    assert_eq!(derivation.escalations, 1);
}

#[test]
fn test_reflexivity() {
    let derivation = prove("□A→A", &[]);
    assert_eq!(
        derivation.strength,
        Strength::new(Inferential::Implicational, Modal::KM)
    );
    assert_eq!(derivation.escalations, 4);
}

#[test]
fn test_excluded_middle_is_classical() {
    let derivation = prove("A∨¬A", &[]);
    assert_eq!(derivation.strength.inferential, Inferential::Classical);
}

#[test]
fn test_unprovable_goal_exhausts_the_lattice() {
    let derivation = derive_with(DeriverConfig::default(), "A", &[]);
    assert!(!derivation.proved);
    assert_eq!(derivation.outcome(), Outcome::Exhausted);
    assert_eq!(derivation.strength, Strength::STRONGEST);
    assert_eq!(derivation.escalations, 54);
}

#[test]
fn test_tight_limits_still_terminate() {
    let config = DeriverConfig {
        limits: SearchLimits {
            max_subproof_depth: 1,
            max_lines: 20,
            max_subproofs: 4,
            max_subgoals: 4,
        },
        ..DeriverConfig::default()
    };
    let derivation = derive_with(config, "A∨¬A", &[]);
    assert!(!derivation.proved);
    assert!(derivation.tree.listed_line_count() <= 20);
}

#[test]
fn test_open_goal_is_rejected() {
    let deriver = Deriver::new(DeriverConfig::default());
    let goal = parse_wff("Fx").unwrap();
    assert!(matches!(
        deriver.derive(&goal, &[]),
        Err(ProofError::Formula(FormulaError::NotClosed(_)))
    ));
}

#[test]
fn test_unminimized_derivation_keeps_everything() {
    let config = DeriverConfig {
        minimize: false,
        ..DeriverConfig::default()
    };
    let derivation = derive_with(config, "A→A", &[]);
    assert!(derivation.proved);
    let formulas: Vec<String> = derivation.fitch().into_iter().map(|l| l.formula).collect();
    assert_eq!(formulas, vec!["⊤", "A", "A→A"]);
}

fn assert_unprovable(goal: &str, premises: &[&str]) {
    let derivation = derive_with(DeriverConfig::default(), goal, premises);
    assert!(!derivation.proved, "{} was proved at {}", goal, derivation.strength);
    assert_eq!(derivation.strength, Strength::STRONGEST);
}

#[test]
fn test_constant_of_a_premise_cannot_be_generalized() {
    assert_unprovable("∀xFx", &["Fa"]);
}

#[test]
fn test_existential_does_not_give_universal() {
    assert_unprovable("∃xFx→∀xFx", &[]);
}

#[test]
fn test_separate_witnesses_do_not_merge() {
    assert_unprovable("∃x(Fx∧Gx)", &["∃xFx", "∃xGx"]);
}

#[test]
fn test_possibility_does_not_give_necessity() {
    assert_unprovable("◇A→□A", &[]);
}
