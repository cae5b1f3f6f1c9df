// Brute-force generation of candidate formulas.
// Every generator is a plain lazy iterator, so the same space can be walked any number of times.

use serde::{Deserialize, Serialize};

use super::canonical::is_canonical;
use super::symbol::{Argument, BinaryOp, Category, Predicate, Quantifier, Sort, Symbol, UnaryOp};
use super::wff::WffTree;

pub type WffIter = Box<dyn Iterator<Item = WffTree>>;

/// The bounds of a formula space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaSpace {
    // How many layers of connectives and quantifiers to stack on the atomic formulas.
    pub nesting: u32,

    // How many predicate constants to draw from, starting at A.
    pub predicates: usize,

    // How many argument constants to draw from, starting at a.
    pub arguments: usize,

    // The largest predicate arity to generate.
    pub max_arity: usize,
}

impl Default for FormulaSpace {
    fn default() -> Self {
        FormulaSpace {
            nesting: 1,
            predicates: 2,
            arguments: 1,
            max_arity: 1,
        }
    }
}

fn argument_constants(count: usize) -> Vec<Argument> {
    Category::ArgumentConstant
        .symbols()
        .take(count)
        .filter_map(|s| match s {
            Symbol::Argument(a) => Some(a),
            Symbol::Predicate(_) => None,
        })
        .collect()
}

fn predicate_constants(count: usize) -> Vec<Predicate> {
    Category::PredicateConstant
        .symbols()
        .take(count)
        .filter_map(|s| match s {
            Symbol::Predicate(p) => Some(p),
            Symbol::Argument(_) => None,
        })
        .collect()
}

/// Every tuple of the given length over the first `arguments` argument constants.
fn argument_tuples(arguments: usize, arity: usize) -> Vec<Vec<Argument>> {
    if arguments == 0 || arity == 0 {
        return vec![];
    }
    let constants = argument_constants(arguments);
    let mut tuples: Vec<Vec<Argument>> = vec![vec![]];
    for _ in 0..arity {
        tuples = tuples
            .into_iter()
            .flat_map(|prefix| {
                constants.iter().map(move |a| {
                    let mut tuple = prefix.clone();
                    tuple.push(*a);
                    tuple
                })
            })
            .collect();
    }
    tuples
}

/// Atomic formulas of exactly one arity.
/// With no predicates this is just ⊤ and ⊥. Arity two also yields the identities.
pub fn atomic_wffs(predicates: usize, arguments: usize, arity: usize) -> WffIter {
    let predicates = predicates.min(Category::PredicateConstant.len());
    let arguments = arguments.min(Category::ArgumentConstant.len());
    if predicates == 0 {
        return Box::new([WffTree::top(), WffTree::bottom()].into_iter());
    }
    let tuples = argument_tuples(arguments, arity);
    let applied: WffIter = if tuples.is_empty() {
        Box::new(
            predicate_constants(predicates)
                .into_iter()
                .filter_map(|p| WffTree::atomic(p, vec![]).ok()),
        )
    } else {
        let tuples = tuples.clone();
        Box::new(
            predicate_constants(predicates)
                .into_iter()
                .flat_map(move |p| {
                    tuples
                        .clone()
                        .into_iter()
                        .filter_map(move |args| WffTree::atomic(p, args).ok())
                }),
        )
    };
    if arity == 2 {
        let identities = tuples.into_iter().map(|t| WffTree::equals(t[0], t[1]));
        Box::new(applied.chain(identities))
    } else {
        applied
    }
}

/// ⊤ and ⊥, then the 0-place predicates, then each arity from 1 up to `max_arity`.
pub fn mixed_atomic_wffs(predicates: usize, arguments: usize, max_arity: usize) -> WffIter {
    let mut answer = atomic_wffs(0, 0, 0);
    if predicates > 0 {
        answer = Box::new(answer.chain(atomic_wffs(predicates, 0, 0)));
        if arguments > 0 {
            for arity in 1..=max_arity {
                answer = Box::new(answer.chain(atomic_wffs(predicates, arguments, arity)));
            }
        }
    }
    answer
}

/// The quantifications of a body: a vacuous binding of each sort,
/// then one abstraction per constant of the body.
pub fn quantified_variants(body: &WffTree) -> Vec<WffTree> {
    let mut answer = vec![];
    for quantifier in Quantifier::ALL {
        for sort in [Sort::Predicate, Sort::Argument] {
            let unused = Category::variables(sort)
                .symbols()
                .rev()
                .find(|v| !body.mentions(*v));
            if let Some(variable) = unused {
                if let Ok(wff) = WffTree::quantified(quantifier, variable, body.clone()) {
                    answer.push(wff);
                }
            }
        }
        for constant in body.constants() {
            if let Ok(wff) = WffTree::abstract_constant(quantifier, body, constant) {
                answer.push(wff);
            }
        }
    }
    answer
}

/// Every formula built by stacking `nesting` layers on the mixed atomic formulas.
/// Each layer takes a left formula from the layer below and yields its unary forms,
/// its quantifications, and its binary combinations with every formula of the layer below.
pub fn composite_wffs(space: FormulaSpace) -> WffIter {
    if space.nesting == 0 {
        return mixed_atomic_wffs(space.predicates, space.arguments, space.max_arity);
    }
    let inner = FormulaSpace {
        nesting: space.nesting - 1,
        ..space
    };
    Box::new(composite_wffs(inner).flat_map(move |left| {
        let unary_left = left.clone();
        let unaries = UnaryOp::ALL
            .into_iter()
            .map(move |op| WffTree::unary(op, unary_left.clone()));
        let quantified = quantified_variants(&left).into_iter();
        let binaries = composite_wffs(inner).flat_map(move |right| {
            let left = left.clone();
            BinaryOp::ALL
                .into_iter()
                .map(move |op| WffTree::binary(op, left.clone(), right.clone()))
        });
        unaries.chain(quantified).chain(binaries)
    }))
}

/// The composite formulas that are already in canonical form.
pub fn canonical_wffs(space: FormulaSpace) -> WffIter {
    Box::new(composite_wffs(space).filter(is_canonical))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(iter: WffIter) -> Vec<String> {
        iter.map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_atomic_without_predicates() {
        assert_eq!(strings(atomic_wffs(0, 3, 2)), vec!["⊤", "⊥"]);
    }

    #[test]
    fn test_atomic_binary_includes_identities() {
        let atoms = strings(atomic_wffs(2, 2, 2));
        assert_eq!(atoms.len(), 12);
        assert_eq!(atoms[0], "Aaa");
        assert_eq!(atoms[7], "Bbb");
        assert_eq!(&atoms[8..], &["a=a", "a=b", "b=a", "b=b"]);
    }

    #[test]
    fn test_mixed_atomic() {
        assert_eq!(strings(mixed_atomic_wffs(1, 1, 1)), vec!["⊤", "⊥", "A", "Aa"]);
        assert_eq!(strings(mixed_atomic_wffs(1, 0, 3)), vec!["⊤", "⊥", "A"]);
    }

    #[test]
    fn test_quantified_variants() {
        let body = WffTree::atomic(
            Predicate::letter('F').unwrap(),
            vec![Argument::new('a').unwrap()],
        )
        .unwrap();
        let variants: Vec<String> = quantified_variants(&body)
            .iter()
            .map(|w| w.to_string())
            .collect();
        assert_eq!(
            variants,
            vec!["∃ZFa", "∃zFa", "∃ZZa", "∃zFz", "∀ZFa", "∀zFa", "∀ZZa", "∀zFz"]
        );
    }

    #[test]
    fn test_composite_count_and_closure() {
        let space = FormulaSpace {
            nesting: 1,
            predicates: 1,
            arguments: 0,
            max_arity: 0,
        };
        let wffs: Vec<WffTree> = composite_wffs(space).collect();
        assert_eq!(wffs.len(), 59);
        assert!(wffs.iter().all(|w| w.is_closed()));

        // Restarting walks the same sequence again.
        let again: Vec<WffTree> = composite_wffs(space).collect();
        assert_eq!(wffs, again);
    }

    #[test]
    fn test_canonical_wffs_are_canonical() {
        let wffs: Vec<WffTree> = canonical_wffs(FormulaSpace::default()).collect();
        assert!(!wffs.is_empty());
        assert!(wffs.iter().all(is_canonical));
    }
}
