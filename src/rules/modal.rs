// Box and diamond rules, and the rules of the modal extensions D, M, 4 and B.

use crate::kernel::symbol::UnaryOp;
use crate::kernel::wff::WffTree;
use crate::proof::rule::{Purpose, Rule};
use crate::proof::tree::{LineId, ProofId, ProofTree};
use crate::proof::ProofError;

use super::{add_new, met_children};

/// Same-world lines of the shape `outer inner φ`, with φ.
fn nested_lines(
    tree: &ProofTree,
    proof: ProofId,
    outer: UnaryOp,
    inner: Option<UnaryOp>,
) -> Vec<(LineId, WffTree)> {
    let mut answer = vec![];
    for id in tree.same_world_lines(proof) {
        let Some(operand) = tree.wff(id).unary_operand(outer) else {
            continue;
        };
        let operand = match inner {
            Some(op) => operand.unary_operand(op),
            None => Some(operand),
        };
        if let Some(operand) = operand {
            answer.push((id, operand.clone()));
        }
    }
    answer
}

/// Concludes each open goal `◇φ` for which `premise(φ)` holds, citing that line.
fn conclude_possible_goals(
    tree: &mut ProofTree,
    proof: ProofId,
    rule: Rule,
    premise: impl Fn(&WffTree) -> WffTree,
) -> Result<usize, ProofError> {
    let index = tree.same_world_index(proof);
    let candidates = tree
        .open_goals(proof)
        .into_iter()
        .filter_map(|goal| {
            let inner = goal.unary_operand(UnaryOp::Possibly)?;
            let line = *index.get(&premise(inner))?;
            Some((goal.clone(), vec![line]))
        })
        .collect();
    add_new(tree, proof, rule, candidates)
}

/// Imports □φ from the previous world as φ.
pub fn box_elim(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let world = tree.proof(proof).world;
    if world == 0 {
        return Ok(0);
    }
    let mut candidates = vec![];
    for id in tree.legal_lines(proof) {
        let line = tree.line(id);
        if line.world + 1 != world {
            continue;
        }
        if let Some(operand) = line.wff.unary_operand(UnaryOp::Necessarily) {
            candidates.push((operand.clone(), vec![id]));
        }
    }
    add_new(tree, proof, Rule::BoxElim, candidates)
}

/// ◇φ as ¬□¬φ. When the dual is missing it becomes a subgoal.
pub fn diamond_intro(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let dual = |inner: &WffTree| WffTree::not(WffTree::necessarily(WffTree::not(inner.clone())));
    let added = conclude_possible_goals(tree, proof, Rule::DiamondIntro, dual)?;
    let wanted: Vec<WffTree> = tree
        .open_goals(proof)
        .iter()
        .filter_map(|goal| goal.unary_operand(UnaryOp::Possibly).map(dual))
        .collect();
    Ok(added + tree.extend_subgoals(proof, wanted))
}

/// Discharges possibility subproofs: from ◇φ and a derivation of χ from φ in the next world, ◇χ.
pub fn diamond_elim(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let mut candidates = vec![];
    for (child, first, met) in met_children(tree, proof, Purpose::PossibilityElim) {
        let p = tree.proof(child);
        let Some(&possible) = p.opening.as_ref().and_then(|o| o.justification.first()) else {
            continue;
        };
        candidates.push((
            WffTree::possibly(p.goal.clone()),
            vec![possible, first, met],
        ));
    }
    add_new(tree, proof, Rule::DiamondElim, candidates)
}

pub fn intro_d(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    conclude_possible_goals(tree, proof, Rule::IntroD, |inner| {
        WffTree::necessarily(inner.clone())
    })
}

pub fn intro_m(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    conclude_possible_goals(tree, proof, Rule::IntroM, |inner| inner.clone())
}

pub fn elim_m(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let candidates = nested_lines(tree, proof, UnaryOp::Necessarily, None)
        .into_iter()
        .map(|(id, operand)| (operand, vec![id]))
        .collect();
    add_new(tree, proof, Rule::ElimM, candidates)
}

/// □□φ from □φ.
pub fn intro_4(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let index = tree.same_world_index(proof);
    let candidates = tree
        .open_goals(proof)
        .into_iter()
        .filter_map(|goal| {
            let inner = goal.unary_operand(UnaryOp::Necessarily)?;
            inner.unary_operand(UnaryOp::Necessarily)?;
            let line = *index.get(inner)?;
            Some((goal.clone(), vec![line]))
        })
        .collect();
    add_new(tree, proof, Rule::Intro4, candidates)
}

/// ◇φ from ◇◇φ.
pub fn elim_4(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let candidates = nested_lines(tree, proof, UnaryOp::Possibly, Some(UnaryOp::Possibly))
        .into_iter()
        .map(|(id, operand)| (WffTree::possibly(operand), vec![id]))
        .collect();
    add_new(tree, proof, Rule::Elim4, candidates)
}

/// □◇φ from φ.
pub fn intro_b(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let index = tree.same_world_index(proof);
    let candidates = tree
        .open_goals(proof)
        .into_iter()
        .filter_map(|goal| {
            let inner = goal
                .unary_operand(UnaryOp::Necessarily)?
                .unary_operand(UnaryOp::Possibly)?;
            let line = *index.get(inner)?;
            Some((goal.clone(), vec![line]))
        })
        .collect();
    add_new(tree, proof, Rule::IntroB, candidates)
}

/// φ from ◇□φ.
pub fn elim_b(tree: &mut ProofTree, proof: ProofId) -> Result<usize, ProofError> {
    let candidates = nested_lines(tree, proof, UnaryOp::Possibly, Some(UnaryOp::Necessarily))
        .into_iter()
        .map(|(id, operand)| (operand, vec![id]))
        .collect();
    add_new(tree, proof, Rule::ElimB, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchLimits;
    use crate::syntax::parse_wff;

    fn wff(s: &str) -> WffTree {
        parse_wff(s).unwrap()
    }

    fn tree(goal: &str, premises: &[&str]) -> ProofTree {
        let premises: Vec<WffTree> = premises.iter().map(|p| wff(p)).collect();
        ProofTree::new_base(&wff(goal), &premises, SearchLimits::default())
    }

    #[test]
    fn test_box_elim_imports_from_previous_world() {
        let mut t = tree("□A", &["□A", "B"]);
        let root = t.root();
        assert_eq!(box_elim(&mut t, root).unwrap(), 0);
        let child = t
            .add_unique_inner_proof(root, WffTree::top(), wff("A"), Purpose::NecessityIntro, &[])
            .unwrap()
            .unwrap();
        assert_eq!(box_elim(&mut t, child).unwrap(), 1);
        assert!(t.head_goal_met(child).is_some());
        assert_eq!(crate::rules::intro::box_intro(&mut t, root).unwrap(), 0);
    }

    #[test]
    fn test_intro_d() {
        let mut t = tree("◇A", &["□A"]);
        let root = t.root();
        assert_eq!(intro_m(&mut t, root).unwrap(), 0);
        assert_eq!(intro_d(&mut t, root).unwrap(), 1);
        assert!(t.head_goal_met(root).is_some());
    }

    #[test]
    fn test_diamond_intro_asks_for_dual() {
        let mut t = tree("◇A", &[]);
        let root = t.root();
        assert_eq!(diamond_intro(&mut t, root).unwrap(), 1);
        assert_eq!(t.proof(root).subgoals, vec![wff("¬□¬A")]);
    }

    #[test]
    fn test_dual_elims() {
        let mut t = tree("C", &["◇◇A", "◇□B", "□C"]);
        let root = t.root();
        assert_eq!(elim_4(&mut t, root).unwrap(), 1);
        assert_eq!(elim_b(&mut t, root).unwrap(), 1);
        assert_eq!(elim_m(&mut t, root).unwrap(), 1);
        assert!(t.holds(root, &wff("◇A")).is_some());
        assert!(t.holds(root, &wff("B")).is_some());
        assert!(t.head_goal_met(root).is_some());
    }

    #[test]
    fn test_intro_4_and_b() {
        let mut t = tree("□□A", &["□A"]);
        let root = t.root();
        assert_eq!(intro_4(&mut t, root).unwrap(), 1);
        assert!(t.head_goal_met(root).is_some());

        let mut t = tree("□◇A", &["A"]);
        let root = t.root();
        assert_eq!(intro_b(&mut t, root).unwrap(), 1);
        assert!(t.head_goal_met(root).is_some());
    }

    #[test]
    fn test_diamond_elim() {
        let mut t = tree("◇A", &["◇(A∧B)"]);
        let root = t.root();
        let child = t
            .add_unique_inner_proof(
                root,
                wff("A∧B"),
                wff("A"),
                Purpose::PossibilityElim,
                &[LineId(1)],
            )
            .unwrap()
            .unwrap();
        assert_eq!(t.proof(child).world, 1);
        crate::rules::elim::wedge_elim(&mut t, child).unwrap();
        assert_eq!(diamond_elim(&mut t, root).unwrap(), 1);
        assert!(t.head_goal_met(root).is_some());
    }
}
