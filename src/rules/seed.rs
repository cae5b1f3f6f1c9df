use crate::kernel::symbol::{BinaryOp, Predicate, Quantifier, UnaryOp};
use crate::kernel::wff::{WffKind, WffTree};
use crate::proof::rule::{Purpose, Rule};
use crate::proof::tree::{LineId, ProofId, ProofTree};
use crate::proof::ProofError;
use crate::strength::{Inferential, Strength};

use super::absorb;

/// Opens a subproof. Returns 1 if one was opened.
fn open(
    tree: &mut ProofTree,
    proof: ProofId,
    assumption: WffTree,
    goal: WffTree,
    purpose: Purpose,
    justification: &[LineId],
) -> Result<usize, ProofError> {
    let opened = tree.add_unique_inner_proof(proof, assumption, goal, purpose, justification);
    Ok(match absorb(opened)? {
        Some(Some(_)) => 1,
        _ => 0,
    })
}

/// Expands the open goals of a proof, and its existential and possibility lines,
/// into subgoals and subproofs.
/// Nothing is opened that no rule licensed at this strength could discharge.
/// Returns how many subgoals and subproofs were added.
pub fn seed_inner_proofs(
    tree: &mut ProofTree,
    proof: ProofId,
    strength: Strength,
) -> Result<usize, ProofError> {
    let mut added = 0;
    for goal in tree.open_goals(proof) {
        added += seed_goal(tree, proof, &goal, strength)?;
    }
    added += seed_lines(tree, proof, strength)?;
    Ok(added)
}

fn seed_goal(
    tree: &mut ProofTree,
    proof: ProofId,
    goal: &WffTree,
    strength: Strength,
) -> Result<usize, ProofError> {
    let licensed = |rule| strength.licenses(rule);
    let classical = strength.inferential == Inferential::Classical;
    match goal.kind() {
        WffKind::Atomic {
            predicate: Predicate::Bottom,
            ..
        } => {
            if !licensed(Rule::BotIntro) {
                return Ok(0);
            }
            let positives: Vec<WffTree> = tree
                .same_world_lines(proof)
                .into_iter()
                .filter_map(|id| tree.wff(id).negated().cloned())
                .collect();
            Ok(tree.extend_subgoals(proof, positives))
        }

        // Indirect proof of an atom, finished by double negation elimination.
        WffKind::Atomic {
            predicate: Predicate::Letter(_),
            ..
        } => {
            if !classical || !licensed(Rule::NegIntro) {
                return Ok(0);
            }
            let negation = WffTree::not(goal.clone());
            if tree.holds(proof, &negation).is_some() {
                return Ok(0);
            }
            open(tree, proof, negation, WffTree::bottom(), Purpose::NegationIntro, &[])
        }

        WffKind::Atomic { .. } => Ok(0),

        WffKind::Unary {
            op: UnaryOp::Not,
            operand,
        } => {
            if !licensed(Rule::NegIntro) || tree.holds(proof, operand).is_some() {
                return Ok(0);
            }
            open(
                tree,
                proof,
                operand.clone(),
                WffTree::bottom(),
                Purpose::NegationIntro,
                &[],
            )
        }

        WffKind::Unary {
            op: UnaryOp::Necessarily,
            operand,
        } => {
            let mut added = open(
                tree,
                proof,
                WffTree::top(),
                operand.clone(),
                Purpose::NecessityIntro,
                &[],
            )?;
            let mut wanted = vec![];
            if licensed(Rule::Intro4) && operand.unary_operand(UnaryOp::Necessarily).is_some() {
                wanted.push(operand.clone());
            }
            if licensed(Rule::IntroB) {
                if let Some(inner) = operand.unary_operand(UnaryOp::Possibly) {
                    wanted.push(inner.clone());
                }
            }
            added += tree.extend_subgoals(proof, wanted);
            Ok(added)
        }

        WffKind::Unary {
            op: UnaryOp::Possibly,
            operand,
        } => {
            let mut wanted = vec![];
            if licensed(Rule::DiamondIntro) {
                wanted.push(WffTree::not(WffTree::necessarily(WffTree::not(
                    operand.clone(),
                ))));
            }
            if licensed(Rule::IntroD) {
                wanted.push(WffTree::necessarily(operand.clone()));
            }
            if licensed(Rule::IntroM) {
                wanted.push(operand.clone());
            }
            Ok(tree.extend_subgoals(proof, wanted))
        }

        WffKind::Binary { op, left, right } => match op {
            BinaryOp::Implies => {
                if !licensed(Rule::ToIntro) {
                    return Ok(0);
                }
                open(
                    tree,
                    proof,
                    left.clone(),
                    right.clone(),
                    Purpose::ConditionalIntro,
                    &[],
                )
            }
            BinaryOp::And => {
                if !licensed(Rule::WedgeIntro) {
                    return Ok(0);
                }
                Ok(tree.extend_subgoals(proof, [left.clone(), right.clone()]))
            }
            BinaryOp::Or => {
                if !licensed(Rule::VeeIntro) {
                    return Ok(0);
                }
                let mut wanted = vec![left.clone(), right.clone()];
                if classical {
                    wanted.push(WffTree::not(WffTree::not(goal.clone())));
                }
                Ok(tree.extend_subgoals(proof, wanted))
            }
            BinaryOp::Iff => {
                if !licensed(Rule::IffIntro) {
                    return Ok(0);
                }
                Ok(tree.extend_subgoals(
                    proof,
                    [
                        WffTree::implies(left.clone(), right.clone()),
                        WffTree::implies(right.clone(), left.clone()),
                    ],
                ))
            }
        },

        WffKind::Quantified {
            quantifier: Quantifier::ForAll,
            ..
        } => {
            if !licensed(Rule::ForAllIntro) {
                return Ok(0);
            }
            open(
                tree,
                proof,
                WffTree::top(),
                goal.clone(),
                Purpose::UniversalIntro,
                &[],
            )
        }

        // Existential goals are expanded into instances by the introduction rule itself.
        WffKind::Quantified {
            quantifier: Quantifier::Exists,
            ..
        } => Ok(0),
    }
}

/// Opens existential eliminations toward the head goal,
/// and possibility eliminations toward each open goal of the form ◇χ.
fn seed_lines(
    tree: &mut ProofTree,
    proof: ProofId,
    strength: Strength,
) -> Result<usize, ProofError> {
    let open_goals = tree.open_goals(proof);
    let head = tree.proof(proof).goal.clone();
    if !open_goals.contains(&head) {
        return Ok(0);
    }
    let possible_goals: Vec<WffTree> = open_goals
        .iter()
        .filter_map(|g| g.unary_operand(UnaryOp::Possibly).cloned())
        .collect();

    let mut added = 0;
    for id in tree.same_world_lines(proof) {
        let wff = tree.wff(id).clone();
        if strength.licenses(Rule::ExistsElim)
            && wff.quantified_parts(Quantifier::Exists).is_some()
            && !tree.is_opened_on(proof, id)
        {
            added += open(
                tree,
                proof,
                wff.clone(),
                head.clone(),
                Purpose::ExistentialElim,
                &[id],
            )?;
        }
        if strength.licenses(Rule::DiamondElim) {
            if let Some(inner) = wff.unary_operand(UnaryOp::Possibly) {
                for target in &possible_goals {
                    added += open(
                        tree,
                        proof,
                        inner.clone(),
                        target.clone(),
                        Purpose::PossibilityElim,
                        &[id],
                    )?;
                }
            }
        }
    }
    Ok(added)
}
