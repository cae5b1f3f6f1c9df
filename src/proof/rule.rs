use std::fmt;

use serde::{Deserialize, Serialize};

/// Every way a line can be justified.
/// The number of lines each rule cites is fixed, see `justification_count`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Rule {
    // Opens a subproof.
    Assumption,

    // Given to the root proof.
    Premise,

    TopIntro,
    Reit,
    ToIntro,
    ToElim,
    WedgeIntro,
    WedgeElim,
    VeeIntro,
    VeeElim,
    IffIntro,
    IffElim,
    BotIntro,
    BotElim,
    NegIntro,
    NegElim,
    ForAllIntro,
    ForAllElim,
    ExistsIntro,
    ExistsElim,
    EqualsIntro,
    EqualsElim,
    BoxIntro,
    BoxElim,
    DiamondIntro,
    DiamondElim,

    // □φ gives ◇φ.
    IntroD,

    // φ gives ◇φ.
    IntroM,

    // □φ gives φ.
    ElimM,

    // □φ gives □□φ.
    Intro4,

    // ◇◇φ gives ◇φ.
    Elim4,

    // φ gives □◇φ.
    IntroB,

    // ◇□φ gives φ.
    ElimB,
}

impl Rule {
    pub const ALL: [Rule; 33] = [
        Rule::Assumption,
        Rule::Premise,
        Rule::TopIntro,
        Rule::Reit,
        Rule::ToIntro,
        Rule::ToElim,
        Rule::WedgeIntro,
        Rule::WedgeElim,
        Rule::VeeIntro,
        Rule::VeeElim,
        Rule::IffIntro,
        Rule::IffElim,
        Rule::BotIntro,
        Rule::BotElim,
        Rule::NegIntro,
        Rule::NegElim,
        Rule::ForAllIntro,
        Rule::ForAllElim,
        Rule::ExistsIntro,
        Rule::ExistsElim,
        Rule::EqualsIntro,
        Rule::EqualsElim,
        Rule::BoxIntro,
        Rule::BoxElim,
        Rule::DiamondIntro,
        Rule::DiamondElim,
        Rule::IntroD,
        Rule::IntroM,
        Rule::ElimM,
        Rule::Intro4,
        Rule::Elim4,
        Rule::IntroB,
        Rule::ElimB,
    ];

    /// How many earlier lines a line justified by this rule cites.
    /// Assumptions opening existential or possibility eliminations cite one line,
    /// which is checked against the subproof's purpose instead.
    pub fn justification_count(self) -> usize {
        match self {
            Rule::Assumption | Rule::Premise | Rule::TopIntro | Rule::EqualsIntro => 0,
            Rule::Reit
            | Rule::WedgeElim
            | Rule::VeeIntro
            | Rule::BotElim
            | Rule::NegElim
            | Rule::ForAllElim
            | Rule::ExistsIntro
            | Rule::BoxElim
            | Rule::DiamondIntro
            | Rule::IntroD
            | Rule::IntroM
            | Rule::ElimM
            | Rule::Intro4
            | Rule::Elim4
            | Rule::IntroB
            | Rule::ElimB => 1,
            Rule::ToIntro
            | Rule::ToElim
            | Rule::WedgeIntro
            | Rule::IffIntro
            | Rule::IffElim
            | Rule::BotIntro
            | Rule::NegIntro
            | Rule::ForAllIntro
            | Rule::EqualsElim
            | Rule::BoxIntro => 2,
            Rule::VeeElim | Rule::ExistsElim | Rule::DiamondElim => 3,
        }
    }

    /// The short name used in Fitch listings.
    pub fn name(self) -> &'static str {
        match self {
            Rule::Assumption => "SM",
            Rule::Premise => "PR",
            Rule::TopIntro => "⊤I",
            Rule::Reit => "Re.",
            Rule::ToIntro => "→I",
            Rule::ToElim => "→E",
            Rule::WedgeIntro => "∧I",
            Rule::WedgeElim => "∧E",
            Rule::VeeIntro => "∨I",
            Rule::VeeElim => "∨E",
            Rule::IffIntro => "↔I",
            Rule::IffElim => "↔E",
            Rule::BotIntro => "⊥I",
            Rule::BotElim => "⊥E",
            Rule::NegIntro => "¬I",
            Rule::NegElim => "¬E",
            Rule::ForAllIntro => "∀I",
            Rule::ForAllElim => "∀E",
            Rule::ExistsIntro => "∃I",
            Rule::ExistsElim => "∃E",
            Rule::EqualsIntro => "=I",
            Rule::EqualsElim => "=E",
            Rule::BoxIntro => "□I",
            Rule::BoxElim => "□E",
            Rule::DiamondIntro => "◇I",
            Rule::DiamondElim => "◇E",
            Rule::IntroD => "DI",
            Rule::IntroM => "MI",
            Rule::ElimM => "ME",
            Rule::Intro4 => "4I",
            Rule::Elim4 => "4E",
            Rule::IntroB => "BI",
            Rule::ElimB => "BE",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Why a subproof was opened. Each purpose is discharged by exactly one rule.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Purpose {
    // Assume φ, derive ψ, conclude φ→ψ.
    ConditionalIntro,

    // Assume φ, derive ⊥, conclude ¬φ.
    NegationIntro,

    // Derive φ[v:=c] for an arbitrary c, conclude ∀vφ.
    UniversalIntro,

    // From ∃vφ, assume φ[v:=c] for an arbitrary c, derive ψ, conclude ψ.
    ExistentialElim,

    // In the next world, derive φ, conclude □φ.
    NecessityIntro,

    // From ◇φ, assume φ in the next world, derive ψ, conclude ◇ψ.
    PossibilityElim,
}

impl Purpose {
    pub const ALL: [Purpose; 6] = [
        Purpose::ConditionalIntro,
        Purpose::NegationIntro,
        Purpose::UniversalIntro,
        Purpose::ExistentialElim,
        Purpose::NecessityIntro,
        Purpose::PossibilityElim,
    ];

    /// The rule that discharges a subproof opened for this purpose.
    pub fn rule(self) -> Rule {
        match self {
            Purpose::ConditionalIntro => Rule::ToIntro,
            Purpose::NegationIntro => Rule::NegIntro,
            Purpose::UniversalIntro => Rule::ForAllIntro,
            Purpose::ExistentialElim => Rule::ExistsElim,
            Purpose::NecessityIntro => Rule::BoxIntro,
            Purpose::PossibilityElim => Rule::DiamondElim,
        }
    }

    /// Whether the subproof reasons about the next world rather than the current one.
    pub fn shifts_world(self) -> bool {
        matches!(self, Purpose::NecessityIntro | Purpose::PossibilityElim)
    }

    /// How many lines the opening assumption cites.
    pub fn assumption_justification_count(self) -> usize {
        match self {
            Purpose::ExistentialElim | Purpose::PossibilityElim => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.rule().name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_is_complete() {
        let mut rules = Rule::ALL.to_vec();
        rules.sort();
        rules.dedup();
        assert_eq!(rules.len(), Rule::ALL.len());
        assert!(Rule::ALL.iter().all(|r| r.justification_count() <= 3));
    }

    #[test]
    fn test_names_are_distinct() {
        let mut names: Vec<&str> = Rule::ALL.iter().map(|r| r.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Rule::ALL.len());
    }

    #[test]
    fn test_purposes_discharge_with_two_or_three_lines() {
        for purpose in Purpose::ALL {
            let count = purpose.rule().justification_count();
            assert_eq!(count, 2 + purpose.assumption_justification_count());
        }
    }
}
