use std::collections::HashMap;

use tracing::trace;

use crate::config::SearchLimits;
use crate::kernel::symbol::{Quantifier, Symbol, UnaryOp};
use crate::kernel::wff::WffTree;

use super::domain::Domain;
use super::rule::{Purpose, Rule};
use super::ProofError;

/// Index of a proof in the tree's arena. The root is always 0.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ProofId(pub usize);

/// Index of a line in the tree's arena.
/// Lines are never removed from the arena, so the index is also the creation order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LineId(pub usize);

#[derive(Clone, Debug)]
pub struct Line {
    pub wff: WffTree,

    // The world the formula holds at. Always the world of the owning proof.
    pub world: u32,

    pub rule: Rule,
    pub justification: Vec<LineId>,
    pub proof: ProofId,
}

/// How a subproof was opened.
#[derive(Clone, Debug)]
pub struct Opening {
    pub purpose: Purpose,

    // The assumption and goal as requested by the caller.
    // For universal introduction the goal is the quantified formula,
    // and for existential elimination the assumption is.
    pub assumption: WffTree,
    pub goal: WffTree,

    // The constant frozen for universal introduction or existential elimination.
    pub arbitrary: Option<Symbol>,

    // The line an existential or possibility elimination works on.
    pub justification: Vec<LineId>,
}

#[derive(Clone, Debug)]
pub struct Proof {
    // The head goal.
    pub goal: WffTree,

    pub subgoals: Vec<WffTree>,

    // The first line is ⊤ in the root and the opening assumption in a subproof.
    pub lines: Vec<LineId>,

    pub children: Vec<ProofId>,
    pub parent: Option<ProofId>,
    pub world: u32,

    // The root has depth 0.
    pub depth: usize,

    pub domain: Domain,

    // None for the root.
    pub opening: Option<Opening>,
}

/// An arena holding a root proof and all of its subproofs.
/// Proofs refer to each other and to lines only by index.
#[derive(Clone, Debug)]
pub struct ProofTree {
    pub(super) proofs: Vec<Proof>,
    pub(super) lines: Vec<Line>,
    pub(super) limits: SearchLimits,
}

impl ProofTree {
    /// The root proof of a derivation: world 0, a vacuous ⊤ line, then the premises.
    pub fn new_base(goal: &WffTree, premises: &[WffTree], limits: SearchLimits) -> ProofTree {
        let domain = Domain::seeded(std::iter::once(goal).chain(premises));
        let root = Proof {
            goal: goal.clone(),
            subgoals: vec![],
            lines: vec![],
            children: vec![],
            parent: None,
            world: 0,
            depth: 0,
            domain,
            opening: None,
        };
        let mut tree = ProofTree {
            proofs: vec![root],
            lines: vec![],
            limits,
        };
        let root = tree.root();
        tree.push_line(root, WffTree::top(), Rule::TopIntro, vec![]);
        for premise in premises {
            if tree.holds_locally(root, premise).is_none() {
                tree.push_line(root, premise.clone(), Rule::Premise, vec![]);
            }
        }
        tree
    }

    pub fn root(&self) -> ProofId {
        ProofId(0)
    }

    pub fn proof(&self, id: ProofId) -> &Proof {
        &self.proofs[id.0]
    }

    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.0]
    }

    pub fn wff(&self, id: LineId) -> &WffTree {
        &self.lines[id.0].wff
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Every proof reachable from the root, parents before children.
    pub fn proof_ids(&self) -> Vec<ProofId> {
        let mut answer = vec![];
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            answer.push(id);
            stack.extend(self.proof(id).children.iter().rev());
        }
        answer
    }

    /// The number of lines still listed by some reachable proof.
    pub fn listed_line_count(&self) -> usize {
        self.proof_ids()
            .iter()
            .map(|id| self.proof(*id).lines.len())
            .sum()
    }

    fn push_line(
        &mut self,
        proof: ProofId,
        wff: WffTree,
        rule: Rule,
        justification: Vec<LineId>,
    ) -> LineId {
        let id = LineId(self.lines.len());
        let world = self.proofs[proof.0].world;
        self.proofs[proof.0].domain.mark(&wff);
        trace!(
            line = id.0,
            proof = proof.0,
            world,
            rule = %rule,
            formula = %wff,
            "adding line"
        );
        self.lines.push(Line {
            wff,
            world,
            rule,
            justification,
            proof,
        });
        self.proofs[proof.0].lines.push(id);
        id
    }

    /// Adds a line unless it is redundant. Returns whether a line was added.
    ///
    /// A line is redundant when the proof already holds the formula locally,
    /// or when a legal line has the same formula, world, rule and cited lines.
    pub fn add_unique_line(
        &mut self,
        proof: ProofId,
        wff: WffTree,
        rule: Rule,
        justification: &[LineId],
    ) -> Result<bool, ProofError> {
        let expected = rule.justification_count();
        if justification.len() != expected {
            return Err(ProofError::InvalidJustification {
                rule,
                expected,
                found: justification.len(),
            });
        }
        if self.holds_locally(proof, &wff).is_some() {
            return Ok(false);
        }
        let world = self.proof(proof).world;
        let mut cited = justification.to_vec();
        cited.sort();
        let duplicate = self.legal_lines(proof).into_iter().any(|id| {
            let line = self.line(id);
            if line.rule != rule || line.world != world || line.wff != wff {
                return false;
            }
            let mut other = line.justification.clone();
            other.sort();
            other == cited
        });
        if duplicate || self.lines.len() >= self.limits.max_lines {
            return Ok(false);
        }
        self.push_line(proof, wff, rule, justification.to_vec());
        Ok(true)
    }

    /// Opens a subproof unless an identical one is already open. Returns the new proof.
    ///
    /// Universal introduction needs a ∀ goal and existential elimination an ∃ assumption.
    /// Both freeze a constant the parent has not seen and instantiate with it.
    /// Exceeding a search limit opens nothing.
    pub fn add_unique_inner_proof(
        &mut self,
        parent: ProofId,
        assumption: WffTree,
        goal: WffTree,
        purpose: Purpose,
        justification: &[LineId],
    ) -> Result<Option<ProofId>, ProofError> {
        let expected = purpose.assumption_justification_count();
        if justification.len() != expected {
            return Err(ProofError::InvalidJustification {
                rule: Rule::Assumption,
                expected,
                found: justification.len(),
            });
        }

        let duplicate = self.proof(parent).children.iter().any(|child| {
            match &self.proof(*child).opening {
                Some(opening) => {
                    opening.purpose == purpose
                        && opening.assumption == assumption
                        && opening.goal == goal
                        && opening.justification == justification
                }
                None => false,
            }
        });
        if duplicate {
            return Ok(None);
        }

        let depth = self.proof(parent).depth + 1;
        if depth > self.limits.max_subproof_depth
            || self.proofs.len() > self.limits.max_subproofs
            || self.lines.len() >= self.limits.max_lines
        {
            return Ok(None);
        }

        let world = self.proof(parent).world + u32::from(purpose.shifts_world());
        let mut domain = self
            .visible_domain(parent)
            .update(&assumption)
            .update(&goal);
        let unexpected = |formula: &WffTree| ProofError::UnexpectedFormula {
            purpose,
            formula: formula.to_string(),
        };
        let (first, child_goal, arbitrary) = match purpose {
            Purpose::UniversalIntro => {
                let (binder, _) = goal
                    .quantified_parts(Quantifier::ForAll)
                    .ok_or_else(|| unexpected(&goal))?;
                let constant = domain
                    .find_arbitrary_constants(&goal)?
                    .select(Some(binder.sort()))?;
                (assumption.clone(), goal.instantiate(constant)?, Some(constant))
            }
            Purpose::ExistentialElim => {
                let (binder, _) = assumption
                    .quantified_parts(Quantifier::Exists)
                    .ok_or_else(|| unexpected(&assumption))?;
                let constant = domain
                    .find_arbitrary_constants(&assumption)?
                    .select(Some(binder.sort()))?;
                (assumption.instantiate(constant)?, goal.clone(), Some(constant))
            }
            Purpose::ConditionalIntro
            | Purpose::NegationIntro
            | Purpose::NecessityIntro
            | Purpose::PossibilityElim => (assumption.clone(), goal.clone(), None),
        };
        if let Some(constant) = arbitrary {
            domain.mark_symbol(constant);
        }
        domain.mark(&child_goal);

        let id = ProofId(self.proofs.len());
        trace!(
            proof = id.0,
            parent = parent.0,
            world,
            purpose = %purpose,
            assumption = %first,
            goal = %child_goal,
            "opening subproof"
        );
        self.proofs.push(Proof {
            goal: child_goal,
            subgoals: vec![],
            lines: vec![],
            children: vec![],
            parent: Some(parent),
            world,
            depth,
            domain,
            opening: Some(Opening {
                purpose,
                assumption,
                goal,
                arbitrary,
                justification: justification.to_vec(),
            }),
        });
        self.proofs[parent.0].children.push(id);
        self.push_line(id, first, Rule::Assumption, justification.to_vec());
        Ok(Some(id))
    }

    /// The lines a proof may cite, in creation order.
    /// These are its own lines, the lines of its ancestors at the same world,
    /// and the boxed lines of its ancestors one world back.
    pub fn legal_lines(&self, proof: ProofId) -> Vec<LineId> {
        let world = self.proof(proof).world;
        let mut answer = self.proof(proof).lines.clone();
        let mut current = self.proof(proof).parent;
        while let Some(ancestor) = current {
            for id in &self.proof(ancestor).lines {
                let line = self.line(*id);
                let boxed = line.wff.unary_operand(UnaryOp::Necessarily).is_some();
                if line.world == world || (boxed && line.world + 1 == world) {
                    answer.push(*id);
                }
            }
            current = self.proof(ancestor).parent;
        }
        answer.sort();
        answer
    }

    /// The legal lines holding at the proof's own world.
    pub fn same_world_lines(&self, proof: ProofId) -> Vec<LineId> {
        let world = self.proof(proof).world;
        self.legal_lines(proof)
            .into_iter()
            .filter(|id| self.line(*id).world == world)
            .collect()
    }

    /// The earliest same-world legal line for each formula.
    pub fn same_world_index(&self, proof: ProofId) -> HashMap<WffTree, LineId> {
        let mut index = HashMap::new();
        for id in self.same_world_lines(proof) {
            index.entry(self.wff(id).clone()).or_insert(id);
        }
        index
    }

    pub fn is_local(&self, proof: ProofId, line: LineId) -> bool {
        self.line(line).proof == proof
    }

    /// A same-world legal line with this formula.
    pub fn holds(&self, proof: ProofId, wff: &WffTree) -> Option<LineId> {
        self.same_world_lines(proof)
            .into_iter()
            .find(|id| self.wff(*id) == wff)
    }

    /// A line of the proof itself with this formula.
    pub fn holds_locally(&self, proof: ProofId, wff: &WffTree) -> Option<LineId> {
        self.proof(proof)
            .lines
            .iter()
            .copied()
            .find(|id| self.wff(*id) == wff)
    }

    /// The head goal followed by the subgoals.
    pub fn goals(&self, proof: ProofId) -> Vec<WffTree> {
        let p = self.proof(proof);
        std::iter::once(p.goal.clone())
            .chain(p.subgoals.iter().cloned())
            .collect()
    }

    /// The goals no legal line holds yet.
    pub fn open_goals(&self, proof: ProofId) -> Vec<WffTree> {
        let index = self.same_world_index(proof);
        self.goals(proof)
            .into_iter()
            .filter(|g| !index.contains_key(g))
            .collect()
    }

    /// Adds subgoals, skipping the head goal, existing subgoals and formulas that already hold.
    /// The constants of each added subgoal count as seen. Returns how many were added.
    pub fn extend_subgoals(
        &mut self,
        proof: ProofId,
        wffs: impl IntoIterator<Item = WffTree>,
    ) -> usize {
        let index = self.same_world_index(proof);
        let max_subgoals = self.limits.max_subgoals;
        let p = &mut self.proofs[proof.0];
        let mut added = 0;
        for wff in wffs {
            if p.subgoals.len() >= max_subgoals {
                break;
            }
            if wff == p.goal || p.subgoals.contains(&wff) || index.contains_key(&wff) {
                continue;
            }
            trace!(proof = proof.0, subgoal = %wff, "adding subgoal");
            p.domain.mark(&wff);
            p.subgoals.push(wff);
            added += 1;
        }
        added
    }

    /// Drops the subgoals the proof holds locally. Returns how many were dropped.
    pub fn pop_met_subgoals(&mut self, proof: ProofId) -> usize {
        let subgoals = &self.proof(proof).subgoals;
        let remaining: Vec<WffTree> = subgoals
            .iter()
            .filter(|g| self.holds_locally(proof, g).is_none())
            .cloned()
            .collect();
        let popped = subgoals.len() - remaining.len();
        self.proofs[proof.0].subgoals = remaining;
        popped
    }

    pub fn pop_all_met_subgoals(&mut self) -> usize {
        self.proof_ids()
            .into_iter()
            .map(|id| self.pop_met_subgoals(id))
            .sum()
    }

    /// The local line meeting the head goal, if there is one.
    pub fn head_goal_met(&self, proof: ProofId) -> Option<LineId> {
        self.holds_locally(proof, &self.proof(proof).goal)
    }

    /// Everything seen by the proof or any of its ancestors.
    pub fn visible_domain(&self, proof: ProofId) -> Domain {
        let mut domain = self.proof(proof).domain.clone();
        let mut current = self.proof(proof).parent;
        while let Some(ancestor) = current {
            domain = domain.union(&self.proof(ancestor).domain);
            current = self.proof(ancestor).parent;
        }
        domain
    }

    /// The assumptions and premises in scope, at any world.
    pub fn open_hypotheses(&self, proof: ProofId) -> Vec<WffTree> {
        let mut answer = vec![];
        let mut current = Some(proof);
        while let Some(id) = current {
            for line in &self.proof(id).lines {
                let line = self.line(*line);
                if matches!(line.rule, Rule::Assumption | Rule::Premise) {
                    answer.push(line.wff.clone());
                }
            }
            current = self.proof(id).parent;
        }
        answer
    }

    /// Whether the proof or one of its ancestors was opened on this line.
    pub fn is_opened_on(&self, proof: ProofId, line: LineId) -> bool {
        let mut current = Some(proof);
        while let Some(id) = current {
            if let Some(opening) = &self.proof(id).opening {
                if opening.justification.contains(&line) {
                    return true;
                }
            }
            current = self.proof(id).parent;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_wff;

    fn wff(s: &str) -> WffTree {
        parse_wff(s).unwrap()
    }

    fn tree(goal: &str, premises: &[&str]) -> ProofTree {
        let premises: Vec<WffTree> = premises.iter().map(|p| wff(p)).collect();
        ProofTree::new_base(&wff(goal), &premises, SearchLimits::default())
    }

    #[test]
    fn test_base_proof() {
        let t = tree("B", &["A", "A→B", "A"]);
        let root = t.proof(t.root());
        assert_eq!(root.world, 0);
        assert_eq!(root.lines.len(), 3);
        assert!(t.wff(root.lines[0]).is_top());
        assert_eq!(t.line(root.lines[1]).rule, Rule::Premise);
        assert!(root.domain.is_seen(Symbol::from_char('B').unwrap()));
    }

    #[test]
    fn test_add_unique_line_dedupes() {
        let mut t = tree("B", &["A", "A→B"]);
        let root = t.root();
        let cited = [LineId(2), LineId(1)];
        assert!(t.add_unique_line(root, wff("B"), Rule::ToElim, &cited).unwrap());
        assert!(!t.add_unique_line(root, wff("B"), Rule::ToElim, &cited).unwrap());
        assert_eq!(t.proof(root).lines.len(), 4);
        assert!(t.head_goal_met(root).is_some());
    }

    #[test]
    fn test_justification_count_is_checked() {
        let mut t = tree("B", &["A"]);
        let root = t.root();
        assert_eq!(
            t.add_unique_line(root, wff("B"), Rule::ToElim, &[LineId(1)]),
            Err(ProofError::InvalidJustification {
                rule: Rule::ToElim,
                expected: 2,
                found: 1
            })
        );
        assert!(t
            .add_unique_inner_proof(root, wff("A"), wff("B"), Purpose::ExistentialElim, &[])
            .is_err());
    }

    #[test]
    fn test_box_subproof_visibility() {
        let mut t = tree("□B", &["□A", "C"]);
        let root = t.root();
        let child = t
            .add_unique_inner_proof(root, WffTree::top(), wff("B"), Purpose::NecessityIntro, &[])
            .unwrap()
            .unwrap();
        assert_eq!(t.proof(child).world, 1);

        // The boxed premise is visible one world down, the plain one is not.
        let legal: Vec<String> = t
            .legal_lines(child)
            .into_iter()
            .map(|id| t.wff(id).to_string())
            .collect();
        assert_eq!(legal, vec!["□A", "⊤"]);
        assert!(t.holds(child, &wff("□A")).is_none());

        // Nothing derived inside the subproof is visible from the root.
        assert!(t
            .add_unique_line(child, wff("A"), Rule::BoxElim, &[LineId(1)])
            .unwrap());
        assert!(t.legal_lines(root).iter().all(|id| t.line(*id).proof == root));
        assert!(t.holds(root, &wff("A")).is_none());
    }

    #[test]
    fn test_inner_proof_dedupes() {
        let mut t = tree("A→B", &[]);
        let root = t.root();
        let open = |t: &mut ProofTree| {
            t.add_unique_inner_proof(root, wff("A"), wff("B"), Purpose::ConditionalIntro, &[])
                .unwrap()
        };
        assert!(open(&mut t).is_some());
        assert!(open(&mut t).is_none());
        assert_eq!(t.proof(root).children.len(), 1);
    }

    #[test]
    fn test_universal_subproof_freezes_fresh_constant() {
        let mut t = tree("∀xFxa", &["Gb"]);
        let root = t.root();
        let child = t
            .add_unique_inner_proof(
                root,
                WffTree::top(),
                wff("∀xFxa"),
                Purpose::UniversalIntro,
                &[],
            )
            .unwrap()
            .unwrap();
        let opening = t.proof(child).opening.clone().unwrap();
        assert_eq!(opening.arbitrary, Symbol::from_char('c'));
        assert_eq!(t.proof(child).goal.to_string(), "Fca");
        assert!(t.proof(child).domain.is_seen(Symbol::from_char('c').unwrap()));
        assert!(!t.proof(root).domain.is_seen(Symbol::from_char('c').unwrap()));
    }

    #[test]
    fn test_universal_subproof_needs_universal_goal() {
        let mut t = tree("Fa", &[]);
        let root = t.root();
        assert!(matches!(
            t.add_unique_inner_proof(root, WffTree::top(), wff("Fa"), Purpose::UniversalIntro, &[]),
            Err(ProofError::UnexpectedFormula { .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let limits = SearchLimits {
            max_subproof_depth: 1,
            ..SearchLimits::default()
        };
        let mut t = ProofTree::new_base(&wff("A→(A→A)"), &[], limits);
        let root = t.root();
        let child = t
            .add_unique_inner_proof(root, wff("A"), wff("A→A"), Purpose::ConditionalIntro, &[])
            .unwrap()
            .unwrap();
        assert!(t
            .add_unique_inner_proof(child, wff("A"), wff("A"), Purpose::ConditionalIntro, &[])
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_subgoals() {
        let mut t = tree("A∧B", &["A"]);
        let root = t.root();
        assert_eq!(t.extend_subgoals(root, [wff("A"), wff("B"), wff("A∧B"), wff("B")]), 1);
        assert_eq!(t.proof(root).subgoals, vec![wff("B")]);
        assert_eq!(t.open_goals(root), vec![wff("A∧B"), wff("B")]);
        t.add_unique_line(root, wff("B"), Rule::Reit, &[LineId(1)])
            .unwrap();
        assert_eq!(t.pop_met_subgoals(root), 1);
        assert!(t.proof(root).subgoals.is_empty());
    }

    #[test]
    fn test_subgoal_constants_are_not_fresh() {
        let mut t = tree("∃xFx", &[]);
        let root = t.root();
        let a = Symbol::from_char('a').unwrap();
        assert!(!t.visible_domain(root).is_seen(a));
        assert_eq!(t.extend_subgoals(root, [wff("Ga")]), 1);
        assert!(t.visible_domain(root).is_seen(a));

        let child = t
            .add_unique_inner_proof(
                root,
                WffTree::top(),
                wff("∀xHx"),
                Purpose::UniversalIntro,
                &[],
            )
            .unwrap()
            .unwrap();
        assert_eq!(t.proof(child).goal.to_string(), "Hb");
    }

    // The frozen constant of a subproof is chosen fresh, so only a hypothesis added behind its
    // back can mention it.
    fn add_premise(t: &mut ProofTree, premise: &str) {
        let root = t.root();
        t.push_line(root, wff(premise), Rule::Premise, vec![]);
    }

    fn met_universal_subproof() -> ProofTree {
        let mut t = tree("∀xFx", &["∀yFy"]);
        let root = t.root();
        let child = t
            .add_unique_inner_proof(
                root,
                WffTree::top(),
                wff("∀xFx"),
                Purpose::UniversalIntro,
                &[],
            )
            .unwrap()
            .unwrap();
        assert!(t
            .add_unique_line(child, wff("Fa"), Rule::ForAllElim, &[LineId(1)])
            .unwrap());
        t
    }

    #[test]
    fn test_generalization_needs_constant_absent_from_hypotheses() {
        let mut t = met_universal_subproof();
        let root = t.root();
        add_premise(&mut t, "Ga");
        assert_eq!(crate::rules::intro::for_all_intro(&mut t, root).unwrap(), 0);
        assert!(t.head_goal_met(root).is_none());

        let mut t = met_universal_subproof();
        let root = t.root();
        add_premise(&mut t, "Gb");
        assert_eq!(crate::rules::intro::for_all_intro(&mut t, root).unwrap(), 1);
    }

    fn met_existential_subproof() -> ProofTree {
        let mut t = tree("C", &["∃xFx", "∀x(Fx→C)"]);
        let root = t.root();
        let child = t
            .add_unique_inner_proof(
                root,
                wff("∃xFx"),
                wff("C"),
                Purpose::ExistentialElim,
                &[LineId(1)],
            )
            .unwrap()
            .unwrap();
        assert!(t
            .add_unique_line(child, wff("Fa→C"), Rule::ForAllElim, &[LineId(2)])
            .unwrap());
        let first = t.proof(child).lines[0];
        let conditional = t.proof(child).lines[1];
        assert!(t
            .add_unique_line(child, wff("C"), Rule::ToElim, &[conditional, first])
            .unwrap());
        t
    }

    #[test]
    fn test_existential_discharge_needs_constant_absent_from_hypotheses() {
        let mut t = met_existential_subproof();
        let root = t.root();
        add_premise(&mut t, "Ga");
        assert_eq!(crate::rules::elim::exists_elim(&mut t, root).unwrap(), 0);
        assert!(t.head_goal_met(root).is_none());

        let mut t = met_existential_subproof();
        let root = t.root();
        assert_eq!(crate::rules::elim::exists_elim(&mut t, root).unwrap(), 1);
        assert!(t.head_goal_met(root).is_some());
    }
}
