use im::OrdMap;

use crate::kernel::symbol::{Category, Sort, Symbol};
use crate::kernel::wff::WffTree;

use super::ProofError;

/// Which constants a proof has seen so far.
/// Both maps start with every constant of their category marked unseen,
/// and a constant is never unmarked once seen.
/// The maps are persistent, so a subproof can copy its parent's domain cheaply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Domain {
    predicates: OrdMap<Symbol, bool>,
    arguments: OrdMap<Symbol, bool>,
}

/// The first unseen constant of each sort, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreshConstants {
    pub predicate: Option<Symbol>,
    pub argument: Option<Symbol>,

    // The formula the constants were chosen for, for error messages.
    formula: String,
}

impl Default for Domain {
    fn default() -> Self {
        Domain::new()
    }
}

impl Domain {
    pub fn new() -> Domain {
        Domain {
            predicates: Category::PredicateConstant
                .symbols()
                .map(|s| (s, false))
                .collect(),
            arguments: Category::ArgumentConstant
                .symbols()
                .map(|s| (s, false))
                .collect(),
        }
    }

    /// A domain with every constant of the given formulas marked.
    pub fn seeded<'a>(wffs: impl IntoIterator<Item = &'a WffTree>) -> Domain {
        let mut domain = Domain::new();
        for wff in wffs {
            domain.mark(wff);
        }
        domain
    }

    fn map_mut(&mut self, sort: Sort) -> &mut OrdMap<Symbol, bool> {
        match sort {
            Sort::Predicate => &mut self.predicates,
            Sort::Argument => &mut self.arguments,
        }
    }

    fn map(&self, sort: Sort) -> &OrdMap<Symbol, bool> {
        match sort {
            Sort::Predicate => &self.predicates,
            Sort::Argument => &self.arguments,
        }
    }

    pub fn mark_symbol(&mut self, symbol: Symbol) {
        if symbol.is_constant() {
            self.map_mut(symbol.sort()).insert(symbol, true);
        }
    }

    /// Marks every constant of the formula as seen.
    pub fn mark(&mut self, wff: &WffTree) {
        for constant in wff.constants() {
            self.mark_symbol(constant);
        }
    }

    /// A copy of this domain with every constant of the formula marked.
    pub fn update(&self, wff: &WffTree) -> Domain {
        let mut answer = self.clone();
        answer.mark(wff);
        answer
    }

    /// Everything seen in either domain.
    pub fn union(&self, other: &Domain) -> Domain {
        let mut answer = self.clone();
        for sort in [Sort::Predicate, Sort::Argument] {
            for (symbol, seen) in other.map(sort).iter() {
                if *seen {
                    answer.mark_symbol(*symbol);
                }
            }
        }
        answer
    }

    pub fn is_seen(&self, symbol: Symbol) -> bool {
        self.map(symbol.sort())
            .get(&symbol)
            .copied()
            .unwrap_or(false)
    }

    /// The seen constants of one sort, in canonical order.
    pub fn seen_constants(&self, sort: Sort) -> Vec<Symbol> {
        self.map(sort)
            .iter()
            .filter(|(_, seen)| **seen)
            .map(|(symbol, _)| *symbol)
            .collect()
    }

    /// Finds the first constant of each sort that neither this domain nor the formula uses.
    pub fn find_arbitrary_constants(&self, wff: &WffTree) -> Result<FreshConstants, ProofError> {
        let used = self.update(wff);
        let first_unseen = |sort: Sort| {
            used.map(sort)
                .iter()
                .find(|(_, seen)| !**seen)
                .map(|(symbol, _)| *symbol)
        };
        let fresh = FreshConstants {
            predicate: first_unseen(Sort::Predicate),
            argument: first_unseen(Sort::Argument),
            formula: wff.to_string(),
        };
        if fresh.predicate.is_none() && fresh.argument.is_none() {
            return Err(ProofError::MissingFreshConstant(wff.to_string()));
        }
        Ok(fresh)
    }
}

impl FreshConstants {
    /// The fresh constant of the requested sort.
    /// With no sort requested, exactly one sort must have a fresh constant.
    pub fn select(&self, sort: Option<Sort>) -> Result<Symbol, ProofError> {
        let describe = || self.formula.clone();
        match sort {
            Some(Sort::Predicate) => self
                .predicate
                .ok_or_else(|| ProofError::MissingFreshConstant(describe())),
            Some(Sort::Argument) => self
                .argument
                .ok_or_else(|| ProofError::MissingFreshConstant(describe())),
            None => match (self.predicate, self.argument) {
                (Some(_), Some(_)) => Err(ProofError::AmbiguousFreshConstant(describe())),
                (Some(symbol), None) | (None, Some(symbol)) => Ok(symbol),
                (None, None) => Err(ProofError::MissingFreshConstant(describe())),
            },
        }
    }
}
