use crate::kernel::symbol::{BinaryOp, Quantifier, UnaryOp};
use crate::kernel::wff::WffTree;
use crate::proof::rule::{Purpose, Rule};
use crate::proof::tree::{ProofId, ProofTree};
use crate::proof::ProofError;

use super::{absorb, add_new, met_children};

pub fn top_intro(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    if !tree.open_goals(proof).iter().any(|g| g.is_top()) {
        return Ok(0);
    }
    add_new(tree, proof, Rule::TopIntro, vec![(WffTree::top(), vec![])])
}

/// Copies a goal that an ancestor already holds at the same world.
pub fn reit(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let mut added = 0;
    for goal in tree.goals(proof) {
        if tree.holds_locally(proof, &goal).is_some() {
            continue;
        }
        if let Some(line) = tree.holds(proof, &goal) {
            if tree.add_unique_line(proof, goal, Rule::Reit, &[line])? {
                added += 1;
            }
        }
    }
    Ok(added)
}

pub fn to_intro(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let candidates: Vec<_> = met_children(tree, proof, Purpose::ConditionalIntro)
        .into_iter()
        .map(|(child, first, met)| {
            let conclusion =
                WffTree::implies(tree.wff(first).clone(), tree.proof(child).goal.clone());
            (conclusion, vec![first, met])
        })
        .collect();
    add_new(tree, proof, Rule::ToIntro, candidates)
}

/// Concludes a conjunction goal, or asks for the missing conjuncts.
pub fn wedge_intro(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let index = tree.same_world_index(proof);
    let mut candidates = vec![];
    let mut wanted = vec![];
    for goal in tree.open_goals(proof) {
        let Some((left, right)) = goal.binary_operands(BinaryOp::And) else {
            continue;
        };
        match (index.get(left), index.get(right)) {
            (Some(l), Some(r)) => candidates.push((goal.clone(), vec![*l, *r])),
            (l, r) => {
                if l.is_none() {
                    wanted.push(left.clone());
                }
                if r.is_none() {
                    wanted.push(right.clone());
                }
            }
        }
    }
    let added = add_new(tree, proof, Rule::WedgeIntro, candidates)?;
    Ok(added + tree.extend_subgoals(proof, wanted))
}

/// Concludes a disjunction goal from either disjunct.
/// Otherwise asks for both disjuncts and for the double negation of the goal.
pub fn vee_intro(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let index = tree.same_world_index(proof);
    let mut candidates = vec![];
    let mut wanted = vec![];
    for goal in tree.open_goals(proof) {
        let Some((left, right)) = goal.binary_operands(BinaryOp::Or) else {
            continue;
        };
        match index.get(left).or_else(|| index.get(right)) {
            Some(line) => candidates.push((goal.clone(), vec![*line])),
            None => {
                wanted.push(left.clone());
                wanted.push(right.clone());
                wanted.push(WffTree::not(WffTree::not(goal.clone())));
            }
        }
    }
    let added = add_new(tree, proof, Rule::VeeIntro, candidates)?;
    Ok(added + tree.extend_subgoals(proof, wanted))
}

pub fn iff_intro(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let index = tree.same_world_index(proof);
    let mut candidates = vec![];
    let mut wanted = vec![];
    for goal in tree.open_goals(proof) {
        let Some((left, right)) = goal.binary_operands(BinaryOp::Iff) else {
            continue;
        };
        let forward = WffTree::implies(left.clone(), right.clone());
        let backward = WffTree::implies(right.clone(), left.clone());
        match (index.get(&forward), index.get(&backward)) {
            (Some(f), Some(b)) => candidates.push((goal.clone(), vec![*f, *b])),
            (f, b) => {
                if f.is_none() {
                    wanted.push(forward);
                }
                if b.is_none() {
                    wanted.push(backward);
                }
            }
        }
    }
    let added = add_new(tree, proof, Rule::IffIntro, candidates)?;
    Ok(added + tree.extend_subgoals(proof, wanted))
}

/// Derives ⊥ from the first contradictory pair of lines.
pub fn bot_intro(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let index = tree.same_world_index(proof);
    let found = tree.same_world_lines(proof).into_iter().find_map(|id| {
        let positive = tree.wff(id).negated().and_then(|p| index.get(p))?;
        Some((WffTree::bottom(), vec![*positive, id]))
    });
    match found {
        Some(candidate) => add_new(tree, proof, Rule::BotIntro, vec![candidate]),
        None => Ok(0),
    }
}

pub fn neg_intro(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let candidates: Vec<_> = met_children(tree, proof, Purpose::NegationIntro)
        .into_iter()
        .map(|(_, first, met)| (WffTree::not(tree.wff(first).clone()), vec![first, met]))
        .collect();
    add_new(tree, proof, Rule::NegIntro, candidates)
}

/// Generalizes over the constant frozen by a universal subproof.
/// The constant may not occur in the conclusion or in any hypothesis still in scope.
pub fn for_all_intro(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let hypotheses = tree.open_hypotheses(proof);
    let mut candidates = vec![];
    for (child, first, met) in met_children(tree, proof, Purpose::UniversalIntro) {
        let Some(opening) = &tree.proof(child).opening else {
            continue;
        };
        let Some(constant) = opening.arbitrary else {
            continue;
        };
        if opening.goal.mentions(constant) || hypotheses.iter().any(|h| h.mentions(constant)) {
            continue;
        }
        candidates.push((opening.goal.clone(), vec![first, met]));
    }
    add_new(tree, proof, Rule::ForAllIntro, candidates)
}

/// Concludes an existential goal from an instance at a seen constant.
/// Otherwise asks for those instances, or for an instance at a fresh constant if none is seen.
pub fn exists_intro(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let domain = tree.visible_domain(proof);
    let index = tree.same_world_index(proof);
    let mut candidates = vec![];
    let mut wanted = vec![];
    for goal in tree.open_goals(proof) {
        let Some((binder, _)) = goal.quantified_parts(Quantifier::Exists) else {
            continue;
        };
        let mut instances = vec![];
        let mut found = None;
        for constant in domain.seen_constants(binder.sort()) {
            let instance = goal.instantiate(constant)?;
            if let Some(line) = index.get(&instance) {
                found = Some(*line);
                break;
            }
            instances.push(instance);
        }
        if let Some(line) = found {
            candidates.push((goal.clone(), vec![line]));
            continue;
        }
        if instances.is_empty() {
            let fresh = domain
                .find_arbitrary_constants(&goal)
                .and_then(|f| f.select(Some(binder.sort())));
            if let Some(constant) = absorb(fresh)? {
                instances.push(goal.instantiate(constant)?);
            }
        }
        wanted.extend(instances);
    }
    let added = add_new(tree, proof, Rule::ExistsIntro, candidates)?;
    Ok(added + tree.extend_subgoals(proof, wanted))
}

pub fn equals_intro(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let candidates = tree
        .open_goals(proof)
        .into_iter()
        .filter(|g| matches!(g.equality(), Some((a, b)) if a == b))
        .map(|g| (g, vec![]))
        .collect();
    add_new(tree, proof, Rule::EqualsIntro, candidates)
}

pub fn box_intro(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let candidates: Vec<_> = met_children(tree, proof, Purpose::NecessityIntro)
        .into_iter()
        .map(|(child, first, met)| {
            let conclusion = WffTree::unary(UnaryOp::Necessarily, tree.proof(child).goal.clone());
            (conclusion, vec![first, met])
        })
        .collect();
    add_new(tree, proof, Rule::BoxIntro, candidates)
}
