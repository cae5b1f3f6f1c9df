// Fitch-style listings of a proof tree.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::Serialize;

use super::rule::Rule;
use super::tree::{LineId, ProofId, ProofTree};

/// One numbered row of a listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FitchLine {
    pub number: usize,

    // The number of scope bars. Lines of the root proof have one.
    pub depth: usize,

    pub formula: String,
    pub justification: String,
}

#[derive(Clone, Copy)]
enum Item {
    Line(LineId),
    Block(ProofId),
}

/// All lines listed under a proof, its subproofs included.
fn subtree_lines(tree: &ProofTree, proof: ProofId) -> Vec<LineId> {
    let mut answer = tree.proof(proof).lines.clone();
    for child in &tree.proof(proof).children {
        answer.extend(subtree_lines(tree, *child));
    }
    answer
}

/// Orders a proof's own lines and subproof blocks so that nothing is cited before it appears.
/// Ties go to whichever item was created first.
/// A dependency cycle falls back to creation order for what is left.
fn order_items(tree: &ProofTree, proof: ProofId) -> Vec<Item> {
    let p = tree.proof(proof);
    let mut items: Vec<Item> = p.lines.iter().map(|id| Item::Line(*id)).collect();
    items.extend(p.children.iter().map(|id| Item::Block(*id)));

    let mut owner: HashMap<LineId, usize> = HashMap::new();
    let mut contents: Vec<Vec<LineId>> = vec![];
    let mut keys = vec![];
    for (i, item) in items.iter().enumerate() {
        let lines = match item {
            Item::Line(id) => vec![*id],
            Item::Block(child) => subtree_lines(tree, *child),
        };
        for id in &lines {
            owner.insert(*id, i);
        }
        keys.push(lines.iter().min().copied().unwrap_or(LineId(usize::MAX)));
        contents.push(lines);
    }

    let mut dependents: Vec<HashSet<usize>> = vec![HashSet::new(); items.len()];
    let mut blockers = vec![0usize; items.len()];
    for (i, lines) in contents.iter().enumerate() {
        let mut needs = HashSet::new();
        for id in lines {
            for cited in &tree.line(*id).justification {
                if let Some(&j) = owner.get(cited) {
                    if j != i {
                        needs.insert(j);
                    }
                }
            }
        }
        blockers[i] = needs.len();
        for j in needs {
            dependents[j].insert(i);
        }
    }

    let mut ready: BinaryHeap<Reverse<(LineId, usize)>> = (0..items.len())
        .filter(|i| blockers[*i] == 0)
        .map(|i| Reverse((keys[i], i)))
        .collect();
    let mut placed = vec![false; items.len()];
    let mut answer = vec![];
    while answer.len() < items.len() {
        let next = match ready.pop() {
            Some(Reverse((_, i))) => i,
            None => match (0..items.len()).filter(|i| !placed[*i]).min_by_key(|i| keys[*i]) {
                Some(i) => i,
                None => break,
            },
        };
        if placed[next] {
            continue;
        }
        placed[next] = true;
        answer.push(items[next]);
        for &k in &dependents[next] {
            blockers[k] = blockers[k].saturating_sub(1);
            if blockers[k] == 0 && !placed[k] {
                ready.push(Reverse((keys[k], k)));
            }
        }
    }
    answer
}

fn flatten(tree: &ProofTree, proof: ProofId, out: &mut Vec<(LineId, usize)>) {
    let depth = tree.proof(proof).depth + 1;
    for item in order_items(tree, proof) {
        match item {
            Item::Line(id) => out.push((id, depth)),
            Item::Block(child) => flatten(tree, child, out),
        }
    }
}

fn justification_text(tree: &ProofTree, id: LineId, numbers: &HashMap<LineId, usize>) -> String {
    let line = tree.line(id);
    let mut text = line.rule.name().to_string();
    if line.rule == Rule::Assumption {
        if let Some(opening) = &tree.proof(line.proof).opening {
            text.push_str(&format!("[{}]", opening.purpose));
        }
    }
    let cited: Vec<String> = line
        .justification
        .iter()
        .filter_map(|j| numbers.get(j))
        .map(|n| n.to_string())
        .collect();
    if !cited.is_empty() {
        text.push_str(&format!(" ({})", cited.join(", ")));
    }
    text
}

/// The listing of every line still in the tree, numbered from 1.
pub fn fitch_lines(tree: &ProofTree) -> Vec<FitchLine> {
    let mut order = vec![];
    flatten(tree, tree.root(), &mut order);
    let numbers: HashMap<LineId, usize> = order
        .iter()
        .enumerate()
        .map(|(i, (id, _))| (*id, i + 1))
        .collect();
    order
        .iter()
        .enumerate()
        .map(|(i, (id, depth))| FitchLine {
            number: i + 1,
            depth: *depth,
            formula: tree.wff(*id).to_string(),
            justification: justification_text(tree, *id, &numbers),
        })
        .collect()
}

/// Renders a listing as text, one row per line, with the justifications aligned.
pub fn render(lines: &[FitchLine]) -> String {
    let bodies: Vec<String> = lines
        .iter()
        .map(|line| format!("{} {}", "|".repeat(line.depth), line.formula))
        .collect();
    let width = bodies.iter().map(|b| b.chars().count()).max().unwrap_or(0);
    let mut answer = String::new();
    for (line, body) in lines.iter().zip(&bodies) {
        let padding = " ".repeat(width - body.chars().count());
        answer.push_str(&format!(
            "{:4}.{}{} by {}\n",
            line.number, body, padding, line.justification
        ));
    }
    answer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchLimits;
    use crate::kernel::wff::WffTree;
    use crate::proof::rule::Purpose;
    use crate::syntax::parse_wff;

    fn wff(s: &str) -> WffTree {
        parse_wff(s).unwrap()
    }

    #[test]
    fn test_render_aligns_justifications() {
        let lines = vec![
            FitchLine {
                number: 1,
                depth: 2,
                formula: "A".to_string(),
                justification: "SM[→I]".to_string(),
            },
            FitchLine {
                number: 2,
                depth: 1,
                formula: "A→A".to_string(),
                justification: "→I (1, 1)".to_string(),
            },
        ];
        assert_eq!(
            render(&lines),
            "   1.|| A  by SM[→I]\n   2.| A→A by →I (1, 1)\n"
        );
    }

    #[test]
    fn test_block_follows_the_lines_it_cites() {
        let mut tree = ProofTree::new_base(&wff("B→B"), &[], SearchLimits::default());
        let root = tree.root();
        let child = tree
            .add_unique_inner_proof(root, wff("B"), wff("B"), Purpose::ConditionalIntro, &[])
            .unwrap()
            .unwrap();

        // A root line created after the subproof opened, then cited from inside it.
        assert!(tree
            .add_unique_line(root, wff("C"), Rule::Reit, &[LineId(0)])
            .unwrap());
        let c = tree.proof(root).lines[1];
        assert!(tree
            .add_unique_line(child, wff("C"), Rule::Reit, &[c])
            .unwrap());

        let listing = fitch_lines(&tree);
        let formulas: Vec<&str> = listing.iter().map(|l| l.formula.as_str()).collect();
        assert_eq!(formulas, vec!["⊤", "C", "B", "C"]);
        assert_eq!(listing[2].justification, "SM[→I]");
        assert_eq!(listing[3].justification, "Re. (2)");
        assert_eq!(listing[3].depth, 2);
    }
}
