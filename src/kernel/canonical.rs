use std::collections::HashMap;

use super::symbol::Category;
use super::wff::WffTree;

/// Renames every constant and variable to the lowest free slot of its category,
/// in order of first occurrence.
/// Formulas that differ only by a consistent renaming canonicalize to identical trees.
pub fn canonicalize(wff: &WffTree) -> WffTree {
    let mut next: HashMap<Category, usize> = HashMap::new();
    let mut renaming = HashMap::new();
    for symbol in wff.symbols() {
        let Some(category) = symbol.category() else {
            continue;
        };
        let slot = next.entry(category).or_insert(0);
        if let Some(target) = category.nth(*slot) {
            renaming.insert(symbol, target);
        }
        *slot += 1;
    }
    if renaming.iter().all(|(from, to)| from == to) {
        return wff.clone();
    }
    wff.rename(&renaming)
}

/// Checks canonical form without building a renaming.
/// Walking the symbols in first-occurrence order, each category must use its slots in order.
pub fn is_canonical(wff: &WffTree) -> bool {
    let mut next: HashMap<Category, usize> = HashMap::new();
    for symbol in wff.symbols() {
        let Some(category) = symbol.category() else {
            continue;
        };
        let slot = next.entry(category).or_insert(0);
        if category.nth(*slot) != Some(symbol) {
            return false;
        }
        *slot += 1;
    }
    true
}
