use std::fmt;

use serde::{Deserialize, Serialize};

use crate::proof::rule::Rule;

/// How much of propositional logic is available, weakest first.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Inferential {
    Implicational,
    Positive,
    Minimal,
    Intuitionistic,
    Classical,
}

impl Inferential {
    pub const ALL: [Inferential; 5] = [
        Inferential::Implicational,
        Inferential::Positive,
        Inferential::Minimal,
        Inferential::Intuitionistic,
        Inferential::Classical,
    ];

    pub fn next(self) -> Option<Inferential> {
        Inferential::ALL.into_iter().find(|i| *i > self)
    }
}

impl fmt::Display for Inferential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The modal system, in the order the deriver tries them.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Modal {
    K,
    KD,
    K4,
    KB,
    KM,
    KD4,
    KDB,
    K4B,
    KM4,
    KMB,
    KD4B,
}

impl Modal {
    pub const ALL: [Modal; 11] = [
        Modal::K,
        Modal::KD,
        Modal::K4,
        Modal::KB,
        Modal::KM,
        Modal::KD4,
        Modal::KDB,
        Modal::K4B,
        Modal::KM4,
        Modal::KMB,
        Modal::KD4B,
    ];

    pub fn next(self) -> Option<Modal> {
        Modal::ALL.into_iter().find(|m| *m > self)
    }

    // Seriality. Every system containing M contains D.
    fn has_d(self) -> bool {
        matches!(
            self,
            Modal::KD | Modal::KM | Modal::KD4 | Modal::KDB | Modal::KM4 | Modal::KMB | Modal::KD4B
        )
    }

    // Reflexivity.
    fn has_m(self) -> bool {
        matches!(self, Modal::KM | Modal::KM4 | Modal::KMB)
    }

    // Transitivity.
    fn has_4(self) -> bool {
        matches!(
            self,
            Modal::K4 | Modal::KD4 | Modal::K4B | Modal::KM4 | Modal::KD4B
        )
    }

    // Symmetry.
    fn has_b(self) -> bool {
        matches!(
            self,
            Modal::KB | Modal::KDB | Modal::K4B | Modal::KMB | Modal::KD4B
        )
    }
}

impl fmt::Display for Modal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A point in the strength lattice.
/// The derived ordering is the escalation order: modal strength varies fastest.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Strength {
    pub inferential: Inferential,
    pub modal: Modal,
}

impl Strength {
    pub const WEAKEST: Strength = Strength {
        inferential: Inferential::Implicational,
        modal: Modal::K,
    };

    pub const STRONGEST: Strength = Strength {
        inferential: Inferential::Classical,
        modal: Modal::KD4B,
    };

    pub fn new(inferential: Inferential, modal: Modal) -> Strength {
        Strength { inferential, modal }
    }

    /// The next strength to try, or None at the top of the lattice.
    pub fn next(self) -> Option<Strength> {
        if let Some(modal) = self.modal.next() {
            return Some(Strength { modal, ..self });
        }
        self.inferential
            .next()
            .map(|inferential| Strength::new(inferential, Modal::K))
    }

    /// Introduction rules licensed at this strength, in the order they are tried.
    pub fn intro_rules(self) -> Vec<Rule> {
        let mut rules = vec![Rule::TopIntro, Rule::Reit, Rule::ToIntro];
        if self.inferential >= Inferential::Positive {
            rules.extend([Rule::WedgeIntro, Rule::VeeIntro, Rule::IffIntro]);
        }
        if self.inferential >= Inferential::Minimal {
            rules.extend([Rule::BotIntro, Rule::NegIntro]);
        }
        rules.extend([Rule::ForAllIntro, Rule::ExistsIntro, Rule::EqualsIntro]);
        rules.push(Rule::BoxIntro);
        if self.inferential == Inferential::Classical {
            rules.push(Rule::DiamondIntro);
        }
        if self.modal.has_d() {
            rules.push(Rule::IntroD);
        }
        if self.modal.has_m() {
            rules.push(Rule::IntroM);
        }
        if self.modal.has_4() {
            rules.push(Rule::Intro4);
        }
        if self.modal.has_b() {
            rules.push(Rule::IntroB);
        }
        rules
    }

    /// Elimination rules licensed at this strength, in the order they are tried.
    pub fn elim_rules(self) -> Vec<Rule> {
        let mut rules = vec![Rule::ToElim];
        if self.inferential >= Inferential::Positive {
            rules.extend([Rule::WedgeElim, Rule::VeeElim, Rule::IffElim]);
        }
        if self.inferential >= Inferential::Intuitionistic {
            rules.push(Rule::BotElim);
        }
        if self.inferential == Inferential::Classical {
            rules.push(Rule::NegElim);
        }
        rules.extend([Rule::ForAllElim, Rule::ExistsElim, Rule::EqualsElim]);
        rules.extend([Rule::BoxElim, Rule::DiamondElim]);
        if self.modal.has_m() {
            rules.push(Rule::ElimM);
        }
        if self.modal.has_4() {
            rules.push(Rule::Elim4);
        }
        if self.modal.has_b() {
            rules.push(Rule::ElimB);
        }
        rules
    }

    pub fn licenses(self, rule: Rule) -> bool {
        self.intro_rules().contains(&rule) || self.elim_rules().contains(&rule)
    }
}

impl Default for Strength {
    fn default() -> Self {
        Strength::WEAKEST
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.inferential, self.modal)
    }
}
