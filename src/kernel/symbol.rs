use std::fmt;

use serde::{Deserialize, Serialize};

/// The predicate slot of an atomic formula.
/// Letters A through T are constants and U through Z are variables.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Predicate {
    // The verum. Takes no arguments.
    Top,

    // The falsum. Takes no arguments.
    Bottom,

    // Identity between two individuals. Takes exactly two arguments.
    Equals,

    // An uppercase letter.
    Letter(char),
}

/// An individual symbol, a lowercase letter.
/// Letters a through t are constants and u through z are variables.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Argument(char);

/// The two sorts a symbol can range over.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Sort {
    Predicate,
    Argument,
}

/// The four renameable symbol categories.
/// The declaration order is the order canonicalization visits categories in.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    PredicateConstant,
    PredicateVariable,
    ArgumentConstant,
    ArgumentVariable,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::PredicateConstant,
        Category::PredicateVariable,
        Category::ArgumentConstant,
        Category::ArgumentVariable,
    ];

    pub fn sort(self) -> Sort {
        match self {
            Category::PredicateConstant | Category::PredicateVariable => Sort::Predicate,
            Category::ArgumentConstant | Category::ArgumentVariable => Sort::Argument,
        }
    }

    pub fn is_variable(self) -> bool {
        matches!(
            self,
            Category::PredicateVariable | Category::ArgumentVariable
        )
    }

    fn letters(self) -> std::ops::RangeInclusive<char> {
        match self {
            Category::PredicateConstant => 'A'..='T',
            Category::PredicateVariable => 'U'..='Z',
            Category::ArgumentConstant => 'a'..='t',
            Category::ArgumentVariable => 'u'..='z',
        }
    }

    /// Every symbol of this category, in canonical order.
    pub fn symbols(self) -> impl DoubleEndedIterator<Item = Symbol> {
        let sort = self.sort();
        self.letters().map(move |c| match sort {
            Sort::Predicate => Symbol::Predicate(Predicate::Letter(c)),
            Sort::Argument => Symbol::Argument(Argument(c)),
        })
    }

    /// The category's symbol at the given canonical index, if there is one.
    pub fn nth(self, index: usize) -> Option<Symbol> {
        self.symbols().nth(index)
    }

    pub fn len(self) -> usize {
        self.letters().count()
    }

    /// The constant category of the given sort.
    pub fn constants(sort: Sort) -> Category {
        match sort {
            Sort::Predicate => Category::PredicateConstant,
            Sort::Argument => Category::ArgumentConstant,
        }
    }

    /// The variable category of the given sort.
    pub fn variables(sort: Sort) -> Category {
        match sort {
            Sort::Predicate => Category::PredicateVariable,
            Sort::Argument => Category::ArgumentVariable,
        }
    }
}

impl Predicate {
    /// Returns None unless c is an uppercase ASCII letter.
    pub fn letter(c: char) -> Option<Predicate> {
        if c.is_ascii_uppercase() {
            Some(Predicate::Letter(c))
        } else {
            None
        }
    }

    /// None for the primitives.
    pub fn category(self) -> Option<Category> {
        match self {
            Predicate::Letter(c) if c <= 'T' => Some(Category::PredicateConstant),
            Predicate::Letter(_) => Some(Category::PredicateVariable),
            _ => None,
        }
    }

    /// The exact number of arguments this predicate requires, if it is fixed.
    pub fn fixed_arity(self) -> Option<usize> {
        match self {
            Predicate::Top | Predicate::Bottom => Some(0),
            Predicate::Equals => Some(2),
            Predicate::Letter(_) => None,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Predicate::Top => write!(f, "⊤"),
            Predicate::Bottom => write!(f, "⊥"),
            Predicate::Equals => write!(f, "="),
            Predicate::Letter(c) => write!(f, "{}", c),
        }
    }
}

impl Argument {
    /// Returns None unless c is a lowercase ASCII letter.
    pub fn new(c: char) -> Option<Argument> {
        if c.is_ascii_lowercase() {
            Some(Argument(c))
        } else {
            None
        }
    }

    pub fn category(self) -> Category {
        if self.0 <= 't' {
            Category::ArgumentConstant
        } else {
            Category::ArgumentVariable
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything that can be substituted for, bound, or renamed.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Symbol {
    Predicate(Predicate),
    Argument(Argument),
}

impl Symbol {
    /// Parses a single letter. Uppercase letters are predicates, lowercase letters are arguments.
    pub fn from_char(c: char) -> Option<Symbol> {
        Predicate::letter(c)
            .map(Symbol::Predicate)
            .or_else(|| Argument::new(c).map(Symbol::Argument))
    }

    pub fn sort(self) -> Sort {
        match self {
            Symbol::Predicate(_) => Sort::Predicate,
            Symbol::Argument(_) => Sort::Argument,
        }
    }

    /// None for the primitives.
    pub fn category(self) -> Option<Category> {
        match self {
            Symbol::Predicate(p) => p.category(),
            Symbol::Argument(a) => Some(a.category()),
        }
    }

    pub fn is_constant(self) -> bool {
        matches!(
            self.category(),
            Some(Category::PredicateConstant) | Some(Category::ArgumentConstant)
        )
    }

    pub fn is_variable(self) -> bool {
        self.category().map_or(false, Category::is_variable)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::Predicate(p) => write!(f, "{}", p),
            Symbol::Argument(a) => write!(f, "{}", a),
        }
    }
}

/// Negation and the two modal operators.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Necessarily,
    Possibly,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 3] = [UnaryOp::Not, UnaryOp::Necessarily, UnaryOp::Possibly];

    pub fn glyph(self) -> char {
        match self {
            UnaryOp::Not => '¬',
            UnaryOp::Necessarily => '□',
            UnaryOp::Possibly => '◇',
        }
    }

    pub fn from_glyph(c: char) -> Option<UnaryOp> {
        UnaryOp::ALL.into_iter().find(|op| op.glyph() == c)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum BinaryOp {
    And,
    Or,
    Implies,
    Iff,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 4] = [BinaryOp::And, BinaryOp::Or, BinaryOp::Implies, BinaryOp::Iff];

    pub fn glyph(self) -> char {
        match self {
            BinaryOp::And => '∧',
            BinaryOp::Or => '∨',
            BinaryOp::Implies => '→',
            BinaryOp::Iff => '↔',
        }
    }

    pub fn from_glyph(c: char) -> Option<BinaryOp> {
        BinaryOp::ALL.into_iter().find(|op| op.glyph() == c)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Quantifier {
    Exists,
    ForAll,
}

impl Quantifier {
    pub const ALL: [Quantifier; 2] = [Quantifier::Exists, Quantifier::ForAll];

    pub fn glyph(self) -> char {
        match self {
            Quantifier::Exists => '∃',
            Quantifier::ForAll => '∀',
        }
    }

    pub fn from_glyph(c: char) -> Option<Quantifier> {
        Quantifier::ALL.into_iter().find(|q| q.glyph() == c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_categories() {
        assert_eq!(
            Symbol::from_char('T').and_then(Symbol::category),
            Some(Category::PredicateConstant)
        );
        assert_eq!(
            Symbol::from_char('U').and_then(Symbol::category),
            Some(Category::PredicateVariable)
        );
        assert_eq!(
            Symbol::from_char('t').and_then(Symbol::category),
            Some(Category::ArgumentConstant)
        );
        assert_eq!(
            Symbol::from_char('u').and_then(Symbol::category),
            Some(Category::ArgumentVariable)
        );
        assert_eq!(Symbol::Predicate(Predicate::Equals).category(), None);
        assert_eq!(Symbol::from_char('='), None);
    }

    #[test]
    fn test_category_sizes() {
        assert_eq!(Category::PredicateConstant.len(), 20);
        assert_eq!(Category::PredicateVariable.len(), 6);
        assert_eq!(Category::ArgumentConstant.len(), 20);
        assert_eq!(Category::ArgumentVariable.len(), 6);
        assert_eq!(
            Category::ArgumentVariable.symbols().next_back(),
            Symbol::from_char('z')
        );
        assert_eq!(Category::PredicateConstant.nth(2), Symbol::from_char('C'));
    }

    #[test]
    fn test_glyphs_round_trip() {
        for op in UnaryOp::ALL {
            assert_eq!(UnaryOp::from_glyph(op.glyph()), Some(op));
        }
        for op in BinaryOp::ALL {
            assert_eq!(BinaryOp::from_glyph(op.glyph()), Some(op));
        }
        for q in Quantifier::ALL {
            assert_eq!(Quantifier::from_glyph(q.glyph()), Some(q));
        }
    }
}
