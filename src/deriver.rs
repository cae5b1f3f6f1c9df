use std::fmt;

use tracing::{debug, info};

use crate::config::DeriverConfig;
use crate::kernel::wff::WffTree;
use crate::kernel::FormulaError;
use crate::proof::fitch::{fitch_lines, FitchLine};
use crate::proof::rule::Rule;
use crate::proof::tree::ProofTree;
use crate::proof::ProofError;
use crate::rules;
use crate::rules::seed::seed_inner_proofs;
use crate::strength::Strength;

/// The outcome of a derivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,

    // Every strength up to the configured stop was tried without meeting the goal.
    Exhausted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success"),
            Outcome::Exhausted => write!(f, "Exhausted"),
        }
    }
}

/// The result of a derivation attempt, proved or not.
#[derive(Clone, Debug)]
pub struct Derivation {
    pub tree: ProofTree,

    // The strength the goal was met at, or the strongest one tried.
    pub strength: Strength,

    pub proved: bool,

    // How many times the strength was raised.
    pub escalations: usize,
}

impl Derivation {
    pub fn outcome(&self) -> Outcome {
        if self.proved {
            Outcome::Success
        } else {
            Outcome::Exhausted
        }
    }

    /// Prunes the parts of the tree the final line does not depend on.
    pub fn minimize(&mut self) {
        if self.proved {
            self.tree.minimize();
        }
    }

    pub fn fitch(&self) -> Vec<FitchLine> {
        fitch_lines(&self.tree)
    }
}

/// Searches for derivations, raising the strength until the goal is met.
pub struct Deriver {
    config: DeriverConfig,
}

impl Deriver {
    pub fn new(config: DeriverConfig) -> Deriver {
        Deriver { config }
    }

    /// Derives the goal from the premises.
    ///
    /// Each strength runs to a fixpoint on the same proof tree, so work done at weaker
    /// strengths carries over. Running out of strengths is not an error.
    pub fn derive(&self, goal: &WffTree, premises: &[WffTree]) -> Result<Derivation, ProofError> {
        for wff in std::iter::once(goal).chain(premises) {
            if !wff.is_closed() {
                return Err(FormulaError::NotClosed(wff.to_string()).into());
            }
        }

        let mut tree = ProofTree::new_base(goal, premises, self.config.limits);
        let mut strength = self.config.start;
        let mut escalations = 0;
        loop {
            info!(goal = %goal, strength = %strength, "searching");
            if self.saturate(&mut tree, strength)? {
                info!(goal = %goal, strength = %strength, escalations, "proved");
                let mut derivation = Derivation {
                    tree,
                    strength,
                    proved: true,
                    escalations,
                };
                if self.config.minimize {
                    derivation.minimize();
                }
                return Ok(derivation);
            }
            match strength.next() {
                Some(next) if next <= self.config.stop => {
                    strength = next;
                    escalations += 1;
                }
                _ => {
                    info!(goal = %goal, strength = %strength, "exhausted");
                    return Ok(Derivation {
                        tree,
                        strength,
                        proved: false,
                        escalations,
                    });
                }
            }
        }
    }

    /// Runs introduction rules, then elimination rules, then seeding, restarting from the
    /// introduction rules whenever anything changes. Returns whether the root goal was met.
    fn saturate(&self, tree: &mut ProofTree, strength: Strength) -> Result<bool, ProofError> {
        let intro_rules = strength.intro_rules();
        let elim_rules = strength.elim_rules();
        let root = tree.root();
        let mut round = 0;
        loop {
            if tree.head_goal_met(root).is_some() {
                return Ok(true);
            }
            round += 1;

            let added = apply_everywhere(tree, &intro_rules)?;
            tree.pop_all_met_subgoals();
            if added > 0 {
                debug!(round, added, phase = "intro", lines = tree.listed_line_count());
                continue;
            }

            let added = apply_everywhere(tree, &elim_rules)?;
            tree.pop_all_met_subgoals();
            if added > 0 {
                debug!(round, added, phase = "elim", lines = tree.listed_line_count());
                continue;
            }

            let mut seeded = 0;
            for proof in tree.proof_ids() {
                seeded += seed_inner_proofs(tree, proof, strength)?;
            }
            if seeded > 0 {
                debug!(round, added = seeded, phase = "seed", lines = tree.listed_line_count());
                continue;
            }

            debug!(round, strength = %strength, "saturated");
            return Ok(tree.head_goal_met(root).is_some());
        }
    }
}

/// Applies each rule to every proof, parents first.
fn apply_everywhere(tree: &mut ProofTree, rules: &[Rule]) -> Result<usize, ProofError> {
    let mut added = 0;
    for proof in tree.proof_ids() {
        for rule in rules {
            added += rules::apply(*rule, tree, proof)?;
        }
    }
    Ok(added)
}
