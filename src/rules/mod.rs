// The inference rules.
// Each rule function works on a single proof of the tree. It may add lines, subgoals and
// subproofs to that proof only, and returns how many of those it added.

use crate::kernel::wff::WffTree;
use crate::proof::rule::{Purpose, Rule};
use crate::proof::tree::{LineId, ProofId, ProofTree};
use crate::proof::ProofError;

pub mod elim;
pub mod intro;
pub mod modal;
pub mod seed;

/// Runs one rule on one proof.
pub fn apply(rule: Rule, tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let result = match rule {
        // These only appear when lines are created, never by inference.
        Rule::Assumption | Rule::Premise => Ok(0),

        Rule::TopIntro => intro::top_intro(tree, proof),
        Rule::Reit => intro::reit(tree, proof),
        Rule::ToIntro => intro::to_intro(tree, proof),
        Rule::ToElim => elim::to_elim(tree, proof),
        Rule::WedgeIntro => intro::wedge_intro(tree, proof),
        Rule::WedgeElim => elim::wedge_elim(tree, proof),
        Rule::VeeIntro => intro::vee_intro(tree, proof),
        Rule::VeeElim => elim::vee_elim(tree, proof),
        Rule::IffIntro => intro::iff_intro(tree, proof),
        Rule::IffElim => elim::iff_elim(tree, proof),
        Rule::BotIntro => intro::bot_intro(tree, proof),
        Rule::BotElim => elim::bot_elim(tree, proof),
        Rule::NegIntro => intro::neg_intro(tree, proof),
        Rule::NegElim => elim::neg_elim(tree, proof),
        Rule::ForAllIntro => intro::for_all_intro(tree, proof),
        Rule::ForAllElim => elim::for_all_elim(tree, proof),
        Rule::ExistsIntro => intro::exists_intro(tree, proof),
        Rule::ExistsElim => elim::exists_elim(tree, proof),
        Rule::EqualsIntro => intro::equals_intro(tree, proof),
        Rule::EqualsElim => elim::equals_elim(tree, proof),
        Rule::BoxIntro => intro::box_intro(tree, proof),
        Rule::BoxElim => modal::box_elim(tree, proof),
        Rule::DiamondIntro => modal::diamond_intro(tree, proof),
        Rule::DiamondElim => modal::diamond_elim(tree, proof),
        Rule::IntroD => modal::intro_d(tree, proof),
        Rule::IntroM => modal::intro_m(tree, proof),
        Rule::ElimM => modal::elim_m(tree, proof),
        Rule::Intro4 => modal::intro_4(tree, proof),
        Rule::Elim4 => modal::elim_4(tree, proof),
        Rule::IntroB => modal::intro_b(tree, proof),
        Rule::ElimB => modal::elim_b(tree, proof),
    };
    Ok(absorb(result)?.unwrap_or(0))
}

/// Turns a fresh-constant failure into "nothing to do".
fn absorb<T>(result: Result<T, ProofError>) -> Result<Option<T>, ProofError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_no_progress() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Adds each candidate that does not already hold at the proof's world.
fn add_new(
    tree: &mut ProofTree,
    proof: ProofId,
    rule: Rule,
    candidates: Vec<(WffTree, Vec<LineId>)>,
) -> Result<usize, ProofError> {
    let mut added = 0;
    for (wff, justification) in candidates {
        if tree.holds(proof, &wff).is_some() {
            continue;
        }
        if tree.add_unique_line(proof, wff, rule, &justification)? {
            added += 1;
        }
    }
    Ok(added)
}

/// The children opened for a purpose whose head goal is met,
/// with their opening line and the line meeting the goal.
fn met_children(
    tree: &ProofTree,
    proof: ProofId,
    purpose: Purpose,
) -> Vec<(ProofId, LineId, LineId)> {
    let mut answer = vec![];
    for child in &tree.proof(proof).children {
        let p = tree.proof(*child);
        if p.opening.as_ref().map(|o| o.purpose) != Some(purpose) {
            continue;
        }
        if let (Some(first), Some(met)) = (p.lines.first(), tree.head_goal_met(*child)) {
            answer.push((*child, *first, met));
        }
    }
    answer
}
