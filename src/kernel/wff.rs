use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde::{Serialize, Serializer};

use super::symbol::{Argument, BinaryOp, Category, Predicate, Quantifier, Symbol, UnaryOp};
use super::FormulaError;

/// The four shapes a formula node can take.
#[derive(Clone, Debug)]
pub enum WffKind {
    // A predicate applied to a tuple of arguments.
    // Top and Bottom take no arguments, Equals takes exactly two.
    Atomic {
        predicate: Predicate,
        args: Vec<Argument>,
    },

    Unary {
        op: UnaryOp,
        operand: WffTree,
    },

    Binary {
        op: BinaryOp,
        left: WffTree,
        right: WffTree,
    },

    // The binder is always a predicate variable or an argument variable.
    Quantified {
        quantifier: Quantifier,
        binder: Symbol,
        body: WffTree,
    },
}

#[derive(Clone, Debug)]
struct WffNode {
    kind: WffKind,

    // Structural hash of the whole subtree, kept in sync on every mutation.
    hash: u64,
}

/// A well-formed formula.
///
/// Nodes are reference counted, so cloning a tree is cheap and clones share structure.
/// A node whose handle is held in more than one place is shared, and is never mutated.
/// Mutating operations go through `Rc::make_mut`, which copies a shared node first
/// and edits an exclusively owned node in place.
#[derive(Clone)]
pub struct WffTree(Rc<WffNode>);

fn hash_kind(kind: &WffKind) -> u64 {
    let mut hasher = DefaultHasher::new();
    match kind {
        WffKind::Atomic { predicate, args } => {
            0u8.hash(&mut hasher);
            predicate.hash(&mut hasher);
            args.hash(&mut hasher);
        }
        WffKind::Unary { op, operand } => {
            1u8.hash(&mut hasher);
            op.hash(&mut hasher);
            operand.structural_hash().hash(&mut hasher);
        }
        WffKind::Binary { op, left, right } => {
            2u8.hash(&mut hasher);
            op.hash(&mut hasher);
            left.structural_hash().hash(&mut hasher);
            right.structural_hash().hash(&mut hasher);
        }
        WffKind::Quantified {
            quantifier,
            binder,
            body,
        } => {
            3u8.hash(&mut hasher);
            quantifier.hash(&mut hasher);
            binder.hash(&mut hasher);
            body.structural_hash().hash(&mut hasher);
        }
    }
    hasher.finish()
}

impl WffTree {
    fn from_kind(kind: WffKind) -> WffTree {
        let hash = hash_kind(&kind);
        WffTree(Rc::new(WffNode { kind, hash }))
    }

    /// Builds an atomic formula, checking the arity of the primitive predicates.
    pub fn atomic(predicate: Predicate, args: Vec<Argument>) -> Result<WffTree, FormulaError> {
        if let Some(arity) = predicate.fixed_arity() {
            if args.len() != arity {
                return Err(FormulaError::InvalidFormula(format!(
                    "{} takes {} arguments but was given {}",
                    predicate,
                    arity,
                    args.len()
                )));
            }
        }
        Ok(WffTree::from_kind(WffKind::Atomic { predicate, args }))
    }

    pub fn top() -> WffTree {
        WffTree::from_kind(WffKind::Atomic {
            predicate: Predicate::Top,
            args: vec![],
        })
    }

    pub fn bottom() -> WffTree {
        WffTree::from_kind(WffKind::Atomic {
            predicate: Predicate::Bottom,
            args: vec![],
        })
    }

    pub fn equals(left: Argument, right: Argument) -> WffTree {
        WffTree::from_kind(WffKind::Atomic {
            predicate: Predicate::Equals,
            args: vec![left, right],
        })
    }

    pub fn unary(op: UnaryOp, operand: WffTree) -> WffTree {
        WffTree::from_kind(WffKind::Unary { op, operand })
    }

    pub fn not(operand: WffTree) -> WffTree {
        WffTree::unary(UnaryOp::Not, operand)
    }

    pub fn necessarily(operand: WffTree) -> WffTree {
        WffTree::unary(UnaryOp::Necessarily, operand)
    }

    pub fn possibly(operand: WffTree) -> WffTree {
        WffTree::unary(UnaryOp::Possibly, operand)
    }

    pub fn binary(op: BinaryOp, left: WffTree, right: WffTree) -> WffTree {
        WffTree::from_kind(WffKind::Binary { op, left, right })
    }

    pub fn and(left: WffTree, right: WffTree) -> WffTree {
        WffTree::binary(BinaryOp::And, left, right)
    }

    pub fn or(left: WffTree, right: WffTree) -> WffTree {
        WffTree::binary(BinaryOp::Or, left, right)
    }

    pub fn implies(left: WffTree, right: WffTree) -> WffTree {
        WffTree::binary(BinaryOp::Implies, left, right)
    }

    pub fn iff(left: WffTree, right: WffTree) -> WffTree {
        WffTree::binary(BinaryOp::Iff, left, right)
    }

    /// Builds a quantified formula. The binder must be a variable.
    pub fn quantified(
        quantifier: Quantifier,
        binder: Symbol,
        body: WffTree,
    ) -> Result<WffTree, FormulaError> {
        if !binder.is_variable() {
            return Err(FormulaError::InvalidFormula(format!(
                "{}{} does not bind a variable",
                quantifier.glyph(),
                binder
            )));
        }
        Ok(WffTree::from_kind(WffKind::Quantified {
            quantifier,
            binder,
            body,
        }))
    }

    /// Quantifies over a constant of the body.
    /// Every occurrence of the constant is replaced by the highest variable of the same sort
    /// that does not already occur in the body.
    pub fn abstract_constant(
        quantifier: Quantifier,
        body: &WffTree,
        constant: Symbol,
    ) -> Result<WffTree, FormulaError> {
        if !constant.is_constant() {
            return Err(FormulaError::InvalidFormula(format!(
                "cannot quantify over {}, it is not a constant",
                constant
            )));
        }
        let variable = Category::variables(constant.sort())
            .symbols()
            .rev()
            .find(|v| !body.mentions(*v))
            .ok_or_else(|| {
                FormulaError::InvalidFormula(format!("no unbound variables left in {}", body))
            })?;
        WffTree::quantified(quantifier, variable, body.substitute(constant, variable))
    }

    pub fn kind(&self) -> &WffKind {
        &self.0.kind
    }

    /// The memoized structural hash. Equal hashes do not imply identical trees.
    pub fn structural_hash(&self) -> u64 {
        self.0.hash
    }

    /// Whether this node is referenced from more than one place.
    pub fn is_shared(&self) -> bool {
        Rc::strong_count(&self.0) > 1
    }

    /// Structural identity. The hash is only used to rule trees out quickly.
    pub fn identical(&self, other: &WffTree) -> bool {
        if Rc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        if self.0.hash != other.0.hash {
            return false;
        }
        match (self.kind(), other.kind()) {
            (
                WffKind::Atomic {
                    predicate: p1,
                    args: a1,
                },
                WffKind::Atomic {
                    predicate: p2,
                    args: a2,
                },
            ) => p1 == p2 && a1 == a2,
            (
                WffKind::Unary {
                    op: o1,
                    operand: x1,
                },
                WffKind::Unary {
                    op: o2,
                    operand: x2,
                },
            ) => o1 == o2 && x1.identical(x2),
            (
                WffKind::Binary {
                    op: o1,
                    left: l1,
                    right: r1,
                },
                WffKind::Binary {
                    op: o2,
                    left: l2,
                    right: r2,
                },
            ) => o1 == o2 && l1.identical(l2) && r1.identical(r2),
            (
                WffKind::Quantified {
                    quantifier: q1,
                    binder: b1,
                    body: x1,
                },
                WffKind::Quantified {
                    quantifier: q2,
                    binder: b2,
                    body: x2,
                },
            ) => q1 == q2 && b1 == b2 && x1.identical(x2),
            _ => false,
        }
    }

    /// A copy that shares no nodes with the original.
    pub fn deep_copy(&self) -> WffTree {
        let kind = match self.kind() {
            WffKind::Atomic { predicate, args } => WffKind::Atomic {
                predicate: *predicate,
                args: args.clone(),
            },
            WffKind::Unary { op, operand } => WffKind::Unary {
                op: *op,
                operand: operand.deep_copy(),
            },
            WffKind::Binary { op, left, right } => WffKind::Binary {
                op: *op,
                left: left.deep_copy(),
                right: right.deep_copy(),
            },
            WffKind::Quantified {
                quantifier,
                binder,
                body,
            } => WffKind::Quantified {
                quantifier: *quantifier,
                binder: *binder,
                body: body.deep_copy(),
            },
        };
        WffTree(Rc::new(WffNode {
            kind,
            hash: self.0.hash,
        }))
    }

    /// Whether the symbol occurs anywhere, bound or free.
    pub fn mentions(&self, symbol: Symbol) -> bool {
        match self.kind() {
            WffKind::Atomic { predicate, args } => match symbol {
                Symbol::Predicate(p) => *predicate == p,
                Symbol::Argument(a) => args.contains(&a),
            },
            WffKind::Unary { operand, .. } => operand.mentions(symbol),
            WffKind::Binary { left, right, .. } => left.mentions(symbol) || right.mentions(symbol),
            WffKind::Quantified { binder, body, .. } => *binder == symbol || body.mentions(symbol),
        }
    }

    /// Whether the symbol has an occurrence that no quantifier binds.
    pub fn has_free(&self, symbol: Symbol) -> bool {
        match self.kind() {
            WffKind::Quantified { binder, body, .. } => *binder != symbol && body.has_free(symbol),
            WffKind::Unary { operand, .. } => operand.has_free(symbol),
            WffKind::Binary { left, right, .. } => left.has_free(symbol) || right.has_free(symbol),
            WffKind::Atomic { .. } => self.mentions(symbol),
        }
    }

    /// Replaces every free occurrence of `from` with `to`.
    /// Shared nodes along the way are copied, unshared ones are edited in place.
    pub fn substitute_in_place(&mut self, from: Symbol, to: Symbol) {
        if from.sort() != to.sort() || !self.has_free(from) {
            return;
        }
        let node = Rc::make_mut(&mut self.0);
        match &mut node.kind {
            WffKind::Atomic { predicate, args } => match (from, to) {
                (Symbol::Predicate(p), Symbol::Predicate(q)) => {
                    if *predicate == p {
                        *predicate = q;
                    }
                }
                (Symbol::Argument(a), Symbol::Argument(b)) => {
                    for arg in args.iter_mut() {
                        if *arg == a {
                            *arg = b;
                        }
                    }
                }
                _ => {}
            },
            WffKind::Unary { operand, .. } => operand.substitute_in_place(from, to),
            WffKind::Binary { left, right, .. } => {
                left.substitute_in_place(from, to);
                right.substitute_in_place(from, to);
            }
            WffKind::Quantified { body, .. } => body.substitute_in_place(from, to),
        }
        node.hash = hash_kind(&node.kind);
    }

    /// Returns a tree with every free occurrence of `from` replaced by `to`.
    /// Subtrees that do not mention `from` stay shared with the original.
    pub fn substitute(&self, from: Symbol, to: Symbol) -> WffTree {
        let mut answer = self.clone();
        answer.substitute_in_place(from, to);
        answer
    }

    /// Renames symbols everywhere, binders included, all at once.
    pub fn rename(&self, renaming: &HashMap<Symbol, Symbol>) -> WffTree {
        let lookup = |s: Symbol| renaming.get(&s).copied().unwrap_or(s);
        let kind = match self.kind() {
            WffKind::Atomic { predicate, args } => {
                let predicate = match lookup(Symbol::Predicate(*predicate)) {
                    Symbol::Predicate(p) => p,
                    Symbol::Argument(_) => *predicate,
                };
                let args = args
                    .iter()
                    .map(|a| match lookup(Symbol::Argument(*a)) {
                        Symbol::Argument(b) => b,
                        Symbol::Predicate(_) => *a,
                    })
                    .collect();
                WffKind::Atomic { predicate, args }
            }
            WffKind::Unary { op, operand } => WffKind::Unary {
                op: *op,
                operand: operand.rename(renaming),
            },
            WffKind::Binary { op, left, right } => WffKind::Binary {
                op: *op,
                left: left.rename(renaming),
                right: right.rename(renaming),
            },
            WffKind::Quantified {
                quantifier,
                binder,
                body,
            } => WffKind::Quantified {
                quantifier: *quantifier,
                binder: lookup(*binder),
                body: body.rename(renaming),
            },
        };
        WffTree::from_kind(kind)
    }

    /// How many times the argument occurs in atomic formulas.
    pub fn count_argument(&self, argument: Argument) -> usize {
        match self.kind() {
            WffKind::Atomic { args, .. } => args.iter().filter(|a| **a == argument).count(),
            WffKind::Unary { operand, .. } => operand.count_argument(argument),
            WffKind::Binary { left, right, .. } => {
                left.count_argument(argument) + right.count_argument(argument)
            }
            WffKind::Quantified { body, .. } => body.count_argument(argument),
        }
    }

    /// Replaces only the occurrence of `from` at position `index`, counting left to right.
    pub fn rewrite_argument_at(&self, from: Argument, to: Argument, index: usize) -> WffTree {
        let mut remaining = index;
        self.rewrite_nth(from, to, &mut remaining)
    }

    fn rewrite_nth(&self, from: Argument, to: Argument, remaining: &mut usize) -> WffTree {
        let count = self.count_argument(from);
        if *remaining >= count {
            *remaining -= count;
            return self.clone();
        }
        let kind = match self.kind() {
            WffKind::Atomic { predicate, args } => {
                let mut args = args.clone();
                for arg in args.iter_mut() {
                    if *arg == from {
                        if *remaining == 0 {
                            *arg = to;
                            // Nothing further along may be rewritten.
                            *remaining = usize::MAX;
                            break;
                        }
                        *remaining -= 1;
                    }
                }
                WffKind::Atomic {
                    predicate: *predicate,
                    args,
                }
            }
            WffKind::Unary { op, operand } => WffKind::Unary {
                op: *op,
                operand: operand.rewrite_nth(from, to, remaining),
            },
            WffKind::Binary { op, left, right } => {
                let left = left.rewrite_nth(from, to, remaining);
                let right = right.rewrite_nth(from, to, remaining);
                WffKind::Binary {
                    op: *op,
                    left,
                    right,
                }
            }
            WffKind::Quantified {
                quantifier,
                binder,
                body,
            } => WffKind::Quantified {
                quantifier: *quantifier,
                binder: *binder,
                body: body.rewrite_nth(from, to, remaining),
            },
        };
        WffTree::from_kind(kind)
    }

    /// For a quantified formula, the body with the binder replaced by the given constant.
    pub fn instantiate(&self, constant: Symbol) -> Result<WffTree, FormulaError> {
        match self.kind() {
            WffKind::Quantified { binder, body, .. }
                if constant.is_constant() && constant.sort() == binder.sort() =>
            {
                Ok(body.substitute(*binder, constant))
            }
            _ => Err(FormulaError::InvalidInstantiation {
                formula: self.to_string(),
                symbol: constant,
            }),
        }
    }

    fn collect_symbols(&self, symbols: &mut Vec<Symbol>) {
        fn push(symbols: &mut Vec<Symbol>, s: Symbol) {
            if s.category().is_some() && !symbols.contains(&s) {
                symbols.push(s);
            }
        }
        match self.kind() {
            WffKind::Atomic { predicate, args } => {
                push(symbols, Symbol::Predicate(*predicate));
                for arg in args {
                    push(symbols, Symbol::Argument(*arg));
                }
            }
            WffKind::Unary { operand, .. } => operand.collect_symbols(symbols),
            WffKind::Binary { left, right, .. } => {
                left.collect_symbols(symbols);
                right.collect_symbols(symbols);
            }
            WffKind::Quantified { binder, body, .. } => {
                push(symbols, *binder);
                body.collect_symbols(symbols);
            }
        }
    }

    /// Every non-primitive symbol, in depth-first first-occurrence order, without repeats.
    /// Binders come before their bodies and predicates before their arguments.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols = vec![];
        self.collect_symbols(&mut symbols);
        symbols
    }

    pub fn constants(&self) -> Vec<Symbol> {
        self.symbols().into_iter().filter(|s| s.is_constant()).collect()
    }

    pub fn variables(&self) -> Vec<Symbol> {
        self.symbols().into_iter().filter(|s| s.is_variable()).collect()
    }

    pub fn free_variables(&self) -> Vec<Symbol> {
        self.variables()
            .into_iter()
            .filter(|v| self.has_free(*v))
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.variables().iter().all(|v| !self.has_free(*v))
    }

    /// Every subtree, this one first, in preorder.
    pub fn subformulae(&self) -> Vec<WffTree> {
        let mut answer = vec![self.clone()];
        match self.kind() {
            WffKind::Atomic { .. } => {}
            WffKind::Unary { operand, .. } => answer.extend(operand.subformulae()),
            WffKind::Binary { left, right, .. } => {
                answer.extend(left.subformulae());
                answer.extend(right.subformulae());
            }
            WffKind::Quantified { body, .. } => answer.extend(body.subformulae()),
        }
        answer
    }

    /// The number of nodes.
    pub fn length(&self) -> usize {
        match self.kind() {
            WffKind::Atomic { .. } => 1,
            WffKind::Unary { operand, .. } => 1 + operand.length(),
            WffKind::Binary { left, right, .. } => 1 + left.length() + right.length(),
            WffKind::Quantified { body, .. } => 1 + body.length(),
        }
    }

    /// The height of the tree. Atomic formulas have depth zero.
    pub fn depth(&self) -> usize {
        match self.kind() {
            WffKind::Atomic { .. } => 0,
            WffKind::Unary { operand, .. } => 1 + operand.depth(),
            WffKind::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
            WffKind::Quantified { body, .. } => 1 + body.depth(),
        }
    }

    pub fn is_top(&self) -> bool {
        matches!(
            self.kind(),
            WffKind::Atomic {
                predicate: Predicate::Top,
                ..
            }
        )
    }

    pub fn is_bottom(&self) -> bool {
        matches!(
            self.kind(),
            WffKind::Atomic {
                predicate: Predicate::Bottom,
                ..
            }
        )
    }

    /// For a = b, the two sides.
    pub fn equality(&self) -> Option<(Argument, Argument)> {
        match self.kind() {
            WffKind::Atomic {
                predicate: Predicate::Equals,
                args,
            } => Some((args[0], args[1])),
            _ => None,
        }
    }

    pub fn unary_operand(&self, op: UnaryOp) -> Option<&WffTree> {
        match self.kind() {
            WffKind::Unary { op: o, operand } if *o == op => Some(operand),
            _ => None,
        }
    }

    pub fn negated(&self) -> Option<&WffTree> {
        self.unary_operand(UnaryOp::Not)
    }

    pub fn binary_operands(&self, op: BinaryOp) -> Option<(&WffTree, &WffTree)> {
        match self.kind() {
            WffKind::Binary { op: o, left, right } if *o == op => Some((left, right)),
            _ => None,
        }
    }

    pub fn quantified_parts(&self, quantifier: Quantifier) -> Option<(Symbol, &WffTree)> {
        match self.kind() {
            WffKind::Quantified {
                quantifier: q,
                binder,
                body,
            } if *q == quantifier => Some((*binder, body)),
            _ => None,
        }
    }

    fn is_binary(&self) -> bool {
        matches!(self.kind(), WffKind::Binary { .. })
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_binary() {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for WffTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            WffKind::Atomic {
                predicate: Predicate::Equals,
                args,
            } => write!(f, "{}={}", args[0], args[1]),
            WffKind::Atomic { predicate, args } => {
                write!(f, "{}", predicate)?;
                for arg in args {
                    write!(f, "{}", arg)?;
                }
                Ok(())
            }
            WffKind::Unary { op, operand } => {
                write!(f, "{}", op.glyph())?;
                operand.fmt_operand(f)
            }
            WffKind::Binary { op, left, right } => {
                left.fmt_operand(f)?;
                write!(f, "{}", op.glyph())?;
                right.fmt_operand(f)
            }
            WffKind::Quantified {
                quantifier,
                binder,
                body,
            } => {
                write!(f, "{}{}", quantifier.glyph(), binder)?;
                body.fmt_operand(f)
            }
        }
    }
}

impl fmt::Debug for WffTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "WffTree({})", self)
    }
}

impl PartialEq for WffTree {
    fn eq(&self, other: &WffTree) -> bool {
        self.identical(other)
    }
}

impl Eq for WffTree {}

impl Hash for WffTree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl Serialize for WffTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pred(c: char) -> Predicate {
        Predicate::letter(c).unwrap()
    }

    fn arg(c: char) -> Argument {
        Argument::new(c).unwrap()
    }

    fn sym(c: char) -> Symbol {
        Symbol::from_char(c).unwrap()
    }

    fn atom(p: char, args: &str) -> WffTree {
        WffTree::atomic(pred(p), args.chars().map(arg).collect()).unwrap()
    }

    #[test]
    fn test_primitive_arity() {
        assert!(WffTree::atomic(Predicate::Top, vec![arg('a')]).is_err());
        assert!(WffTree::atomic(Predicate::Equals, vec![arg('a')]).is_err());
        assert!(WffTree::atomic(Predicate::Equals, vec![arg('a'), arg('b')]).is_ok());
        assert!(WffTree::atomic(pred('F'), vec![arg('a'), arg('b'), arg('c')]).is_ok());
    }

    #[test]
    fn test_binder_must_be_variable() {
        let body = atom('F', "a");
        assert!(WffTree::quantified(Quantifier::ForAll, sym('a'), body.clone()).is_err());
        assert!(WffTree::quantified(Quantifier::ForAll, sym('x'), body.clone()).is_ok());
        assert!(WffTree::quantified(Quantifier::Exists, sym('X'), body).is_ok());
    }

    #[test]
    fn test_display_parenthesizes_binary_operands() {
        let a = atom('A', "");
        let b = atom('B', "");
        let f = WffTree::implies(
            WffTree::and(a.clone(), b.clone()),
            WffTree::not(WffTree::or(a.clone(), WffTree::not(b.clone()))),
        );
        assert_eq!(f.to_string(), "(A∧B)→¬(A∨¬B)");

        let q = WffTree::quantified(
            Quantifier::ForAll,
            sym('x'),
            WffTree::implies(atom('F', "x"), WffTree::equals(arg('x'), arg('a'))),
        )
        .unwrap();
        assert_eq!(q.to_string(), "∀x(Fx→x=a)");
        assert_eq!(WffTree::necessarily(q).to_string(), "□∀x(Fx→x=a)");
    }

    #[test]
    fn test_identical_is_structural() {
        let f = WffTree::and(atom('F', "ab"), atom('G', ""));
        let g = WffTree::and(atom('F', "ab"), atom('G', ""));
        let h = WffTree::and(atom('F', "ba"), atom('G', ""));
        assert!(f.identical(&g));
        assert!(!f.identical(&h));
        assert!(f.identical(&f.deep_copy()));
    }

    #[test]
    fn test_substitute_copies_shared_trees() {
        let original = WffTree::and(atom('F', "a"), atom('G', "b"));
        let keep = original.clone();
        assert!(original.is_shared());
        let replaced = original.substitute(sym('a'), sym('c'));
        assert_eq!(replaced.to_string(), "Fc∧Gb");
        assert_eq!(keep.to_string(), "Fa∧Gb");
        assert_eq!(original.to_string(), "Fa∧Gb");
    }

    #[test]
    fn test_substitute_in_place_updates_hash() {
        let mut f = WffTree::not(atom('F', "a"));
        assert!(!f.is_shared());
        f.substitute_in_place(sym('a'), sym('b'));
        let expected = WffTree::not(atom('F', "b"));
        assert_eq!(f.structural_hash(), expected.structural_hash());
        assert!(f.identical(&expected));
    }

    #[test]
    fn test_substitute_respects_binding() {
        let body = WffTree::and(atom('F', "x"), atom('G', "a"));
        let q = WffTree::quantified(Quantifier::Exists, sym('x'), body).unwrap();
        let f = WffTree::and(atom('H', "x"), q);
        assert_eq!(f.substitute(sym('x'), sym('u')).to_string(), "Hu∧∃x(Fx∧Ga)");
    }

    #[test]
    fn test_instantiate() {
        let q = WffTree::quantified(Quantifier::ForAll, sym('x'), atom('F', "xa")).unwrap();
        assert_eq!(q.instantiate(sym('b')).unwrap().to_string(), "Fba");
        assert!(q.instantiate(sym('B')).is_err());
        assert!(q.instantiate(sym('y')).is_err());
        assert!(atom('F', "a").instantiate(sym('b')).is_err());
    }

    #[test]
    fn test_abstract_constant_picks_highest_unused_variable() {
        let body = atom('F', "az");
        let q = WffTree::abstract_constant(Quantifier::ForAll, &body, sym('a')).unwrap();
        assert_eq!(q.to_string(), "∀yFyz");
        assert!(WffTree::abstract_constant(Quantifier::ForAll, &body, sym('x')).is_err());
    }

    #[test]
    fn test_constants_and_variables_in_first_occurrence_order() {
        let q = WffTree::quantified(
            Quantifier::ForAll,
            sym('x'),
            WffTree::implies(atom('G', "xb"), atom('F', "ax")),
        )
        .unwrap();
        let f = WffTree::and(q, atom('F', "y"));
        assert_eq!(f.constants(), vec![sym('G'), sym('b'), sym('F'), sym('a')]);
        assert_eq!(f.variables(), vec![sym('x'), sym('y')]);
        assert_eq!(f.free_variables(), vec![sym('y')]);
        assert!(!f.is_closed());
    }

    #[test]
    fn test_rewrite_single_occurrence() {
        let f = WffTree::and(atom('F', "aa"), WffTree::equals(arg('b'), arg('a')));
        assert_eq!(f.count_argument(arg('a')), 3);
        assert_eq!(f.rewrite_argument_at(arg('a'), arg('c'), 0).to_string(), "Fca∧b=a");
        assert_eq!(f.rewrite_argument_at(arg('a'), arg('c'), 1).to_string(), "Fac∧b=a");
        assert_eq!(f.rewrite_argument_at(arg('a'), arg('c'), 2).to_string(), "Faa∧b=c");
        assert!(f.rewrite_argument_at(arg('a'), arg('c'), 3).identical(&f));
    }

    #[test]
    fn test_length_and_depth() {
        let f = WffTree::implies(WffTree::not(atom('A', "")), atom('B', ""));
        assert_eq!(f.length(), 4);
        assert_eq!(f.depth(), 2);
        assert_eq!(f.subformulae().len(), 4);
    }
}
