use std::collections::HashSet;

use super::tree::{LineId, ProofId, ProofTree};

impl ProofTree {
    /// Prunes everything the line meeting the root goal does not depend on.
    ///
    /// Lines stay in the arena, only the proofs' line and child lists shrink.
    /// A subproof survives only if its opening assumption is used.
    /// Returns false, leaving the tree alone, when the root goal is not met.
    pub fn minimize(&mut self) -> bool {
        let root = self.root();
        let Some(conclusion) = self.head_goal_met(root) else {
            return false;
        };

        let mut used: HashSet<LineId> = HashSet::new();
        let mut pending = vec![conclusion];
        while let Some(id) = pending.pop() {
            if used.insert(id) {
                pending.extend(self.line(id).justification.iter().copied());
            }
        }

        self.retain_used(root, &used);
        true
    }

    fn retain_used(&mut self, proof: ProofId, used: &HashSet<LineId>) {
        self.proofs[proof.0].lines.retain(|id| used.contains(id));
        let children = std::mem::take(&mut self.proofs[proof.0].children);
        let mut kept = vec![];
        for child in children {
            let opened = self.proofs[child.0]
                .lines
                .first()
                .is_some_and(|first| used.contains(first));
            if opened {
                self.retain_used(child, used);
                kept.push(child);
            }
        }
        self.proofs[proof.0].children = kept;
    }
}
