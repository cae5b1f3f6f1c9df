use crate::kernel::symbol::{BinaryOp, Quantifier, Symbol};
use crate::kernel::wff::WffTree;
use crate::proof::rule::{Purpose, Rule};
use crate::proof::tree::{ProofId, ProofTree};
use crate::proof::ProofError;

use super::{absorb, add_new};

/// Modus ponens. When the antecedent is missing but the consequent is wanted,
/// the antecedent becomes a subgoal.
pub fn to_elim(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let index = tree.same_world_index(proof);
    let open = tree.open_goals(proof);
    let mut candidates = vec![];
    let mut wanted = vec![];
    for id in tree.same_world_lines(proof) {
        let Some((antecedent, consequent)) = tree.wff(id).binary_operands(BinaryOp::Implies)
        else {
            continue;
        };
        match index.get(antecedent) {
            Some(line) => candidates.push((consequent.clone(), vec![id, *line])),
            None if open.contains(consequent) => wanted.push(antecedent.clone()),
            None => {}
        }
    }
    let added = add_new(tree, proof, Rule::ToElim, candidates)?;
    Ok(added + tree.extend_subgoals(proof, wanted))
}

pub fn wedge_elim(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let mut candidates = vec![];
    for id in tree.same_world_lines(proof) {
        if let Some((left, right)) = tree.wff(id).binary_operands(BinaryOp::And) {
            candidates.push((left.clone(), vec![id]));
            candidates.push((right.clone(), vec![id]));
        }
    }
    add_new(tree, proof, Rule::WedgeElim, candidates)
}

/// Proof by cases, from φ∨ψ, φ→χ and ψ→χ.
/// Without the conditionals, asks for them with the head goal as χ.
/// Cases over an inherited disjunction are only asked for when this proof has a goal of its own.
pub fn vee_elim(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let index = tree.same_world_index(proof);
    let lines = tree.same_world_lines(proof);
    let goal = tree.proof(proof).goal.clone();
    let goal_open = !index.contains_key(&goal);
    let own_goal = match tree.proof(proof).parent {
        Some(parent) => tree.proof(parent).goal != goal,
        None => true,
    };
    let mut candidates = vec![];
    let mut wanted = vec![];
    for &d in &lines {
        let Some((left, right)) = tree.wff(d).binary_operands(BinaryOp::Or) else {
            continue;
        };
        for &c in &lines {
            let Some((antecedent, consequent)) = tree.wff(c).binary_operands(BinaryOp::Implies)
            else {
                continue;
            };
            if antecedent != left {
                continue;
            }
            let other = WffTree::implies(right.clone(), consequent.clone());
            if let Some(&o) = index.get(&other) {
                candidates.push((consequent.clone(), vec![d, c, o]));
            }
        }
        if goal_open && (tree.is_local(proof, d) || own_goal) {
            wanted.push(WffTree::implies(left.clone(), goal.clone()));
            wanted.push(WffTree::implies(right.clone(), goal.clone()));
        }
    }
    let added = add_new(tree, proof, Rule::VeeElim, candidates)?;
    Ok(added + tree.extend_subgoals(proof, wanted))
}

/// From φ↔ψ and either side, the other side.
/// When one side is an open goal, the other side becomes a subgoal.
pub fn iff_elim(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let index = tree.same_world_index(proof);
    let open = tree.open_goals(proof);
    let mut candidates = vec![];
    let mut wanted = vec![];
    for id in tree.same_world_lines(proof) {
        let Some((left, right)) = tree.wff(id).binary_operands(BinaryOp::Iff) else {
            continue;
        };
        for (given, derived) in [(left, right), (right, left)] {
            match index.get(given) {
                Some(line) => candidates.push((derived.clone(), vec![id, *line])),
                None if open.contains(derived) => wanted.push(given.clone()),
                None => {}
            }
        }
    }
    let added = add_new(tree, proof, Rule::IffElim, candidates)?;
    Ok(added + tree.extend_subgoals(proof, wanted))
}

/// Ex falso: ⊥ gives the head goal.
pub fn bot_elim(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let Some(bottom) = tree.holds(proof, &WffTree::bottom()) else {
        return Ok(0);
    };
    let goal = tree.proof(proof).goal.clone();
    add_new(tree, proof, Rule::BotElim, vec![(goal, vec![bottom])])
}

pub fn neg_elim(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let mut candidates = vec![];
    for id in tree.same_world_lines(proof) {
        if let Some(inner) = tree.wff(id).negated().and_then(|w| w.negated()) {
            candidates.push((inner.clone(), vec![id]));
        }
    }
    add_new(tree, proof, Rule::NegElim, candidates)
}

/// Instantiates universals at every seen constant of the binder's sort,
/// or at a fresh constant when none is seen.
pub fn for_all_elim(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let domain = tree.visible_domain(proof);
    let mut candidates = vec![];
    for id in tree.same_world_lines(proof) {
        let wff = tree.wff(id);
        let Some((binder, _)) = wff.quantified_parts(Quantifier::ForAll) else {
            continue;
        };
        let mut constants = domain.seen_constants(binder.sort());
        if constants.is_empty() {
            let fresh = domain
                .find_arbitrary_constants(wff)
                .and_then(|f| f.select(Some(binder.sort())));
            constants.extend(absorb(fresh)?);
        }
        for constant in constants {
            candidates.push((wff.instantiate(constant)?, vec![id]));
        }
    }
    add_new(tree, proof, Rule::ForAllElim, candidates)
}

/// Discharges existential subproofs.
/// A goal of this proof reached inside the subproof follows, as long as the frozen constant
/// occurs neither in it nor in a hypothesis still in scope.
pub fn exists_elim(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let goals = tree.goals(proof);
    let hypotheses = tree.open_hypotheses(proof);
    let mut candidates = vec![];
    for child in &tree.proof(proof).children {
        let p = tree.proof(*child);
        let Some(opening) = &p.opening else {
            continue;
        };
        if opening.purpose != Purpose::ExistentialElim {
            continue;
        }
        let (Some(constant), Some(&existential), Some(&first)) = (
            opening.arbitrary,
            opening.justification.first(),
            p.lines.first(),
        ) else {
            continue;
        };
        if hypotheses.iter().any(|h| h.mentions(constant)) {
            continue;
        }
        for goal in &goals {
            if goal.mentions(constant) {
                continue;
            }
            if let Some(met) = tree.holds_locally(*child, goal) {
                candidates.push((goal.clone(), vec![existential, first, met]));
            }
        }
    }
    add_new(tree, proof, Rule::ExistsElim, candidates)
}

/// Substitution of equals.
///
/// Forward, a=b rewrites every a in a line to b, and every b to a.
/// One of the two cited lines has to be local.
/// Backward, a goal follows from a line differing from it in one occurrence of a or b.
/// A missing pre-image of the form c=c becomes a subgoal.
pub fn equals_elim(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let index = tree.same_world_index(proof);
    let lines = tree.same_world_lines(proof);
    let open = tree.open_goals(proof);
    let mut candidates = vec![];
    let mut wanted = vec![];
    for &e in &lines {
        let Some((a, b)) = tree.wff(e).equality() else {
            continue;
        };
        if a == b {
            continue;
        }
        let directions = [(a, b), (b, a)];

        for &l in &lines {
            if l == e || !(tree.is_local(proof, e) || tree.is_local(proof, l)) {
                continue;
            }
            let wff = tree.wff(l);
            for (from, to) in directions {
                if wff.count_argument(from) > 0 {
                    let rewritten = wff.substitute(Symbol::Argument(from), Symbol::Argument(to));
                    candidates.push((rewritten, vec![e, l]));
                }
            }
        }

        for goal in &open {
            for (from, to) in directions {
                for i in 0..goal.count_argument(to) {
                    let pre_image = goal.rewrite_argument_at(to, from, i);
                    match index.get(&pre_image) {
                        Some(&l) => candidates.push((goal.clone(), vec![e, l])),
                        None => {
                            if matches!(pre_image.equality(), Some((x, y)) if x == y) {
                                wanted.push(pre_image);
                            }
                        }
                    }
                }
            }
        }
    }
    let added = add_new(tree, proof, Rule::EqualsElim, candidates)?;
    Ok(added + tree.extend_subgoals(proof, wanted))
}
