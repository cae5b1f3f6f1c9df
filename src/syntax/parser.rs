use std::sync::LazyLock;

use regex::Regex;

use crate::kernel::symbol::{Argument, BinaryOp, Predicate, Quantifier, Symbol, UnaryOp};
use crate::kernel::wff::WffTree;
use crate::kernel::FormulaError;

use super::notation::convert_notation;

static PREDICATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][a-z]*$").unwrap());
static PRIMITIVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(⊤|⊥)$").unwrap());
static IDENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]=[a-z]$").unwrap());

/// Parses a formula, which may contain free variables.
pub fn parse_wff(input: &str) -> Result<WffTree, FormulaError> {
    let text = convert_notation(input)?;
    let chars: Vec<char> = text.chars().collect();
    parse_chars(&chars).map_err(|reason| match reason {
        ParseFailure::Invalid(e) => e,
        ParseFailure::Syntax(reason) => FormulaError::Parse {
            input: input.to_string(),
            reason,
        },
    })
}

/// Parses a formula that can serve as a goal or premise.
pub fn parse_closed_wff(input: &str) -> Result<WffTree, FormulaError> {
    let wff = parse_wff(input)?;
    if !wff.is_closed() {
        return Err(FormulaError::NotClosed(wff.to_string()));
    }
    Ok(wff)
}

enum ParseFailure {
    // The text is not in the grammar.
    Syntax(String),

    // The text is in the grammar but describes an invalid formula.
    Invalid(FormulaError),
}

impl From<FormulaError> for ParseFailure {
    fn from(e: FormulaError) -> Self {
        ParseFailure::Invalid(e)
    }
}

fn syntax<T>(reason: impl Into<String>) -> Result<T, ParseFailure> {
    Err(ParseFailure::Syntax(reason.into()))
}

/// Parenthesis depth before each character. Fails on unbalanced input.
fn depths(chars: &[char]) -> Result<Vec<usize>, ParseFailure> {
    let mut answer = Vec::with_capacity(chars.len());
    let mut depth = 0usize;
    for c in chars {
        if *c == ')' {
            if depth == 0 {
                return syntax("unbalanced parentheses");
            }
            depth -= 1;
        }
        answer.push(depth);
        if *c == '(' {
            depth += 1;
        }
    }
    if depth != 0 {
        return syntax("unbalanced parentheses");
    }
    Ok(answer)
}

/// Removes parentheses that wrap the entire formula.
fn strip_outer_parens(mut chars: &[char]) -> Result<&[char], ParseFailure> {
    loop {
        let d = depths(chars)?;
        let wrapped = chars.len() >= 2
            && chars[0] == '('
            && chars[chars.len() - 1] == ')'
            && d[1..chars.len() - 1].iter().all(|depth| *depth > 0);
        if !wrapped {
            return Ok(chars);
        }
        chars = &chars[1..chars.len() - 1];
    }
}

fn parse_chars(chars: &[char]) -> Result<WffTree, ParseFailure> {
    let chars = strip_outer_parens(chars)?;
    if chars.is_empty() {
        return syntax("empty formula");
    }
    let d = depths(chars)?;

    let mains: Vec<usize> = (0..chars.len())
        .filter(|i| d[*i] == 0 && BinaryOp::from_glyph(chars[*i]).is_some())
        .collect();
    if mains.len() > 1 {
        return syntax("more than one main connective");
    }
    if let Some(&i) = mains.first() {
        let op = BinaryOp::from_glyph(chars[i]).ok_or_else(|| {
            ParseFailure::Syntax("missing main connective".to_string())
        })?;
        let left = parse_chars(&chars[..i])?;
        let right = parse_chars(&chars[i + 1..])?;
        return Ok(WffTree::binary(op, left, right));
    }

    if let Some(op) = UnaryOp::from_glyph(chars[0]) {
        let operand = parse_chars(&chars[1..])?;
        return Ok(WffTree::unary(op, operand));
    }

    if let Some(quantifier) = Quantifier::from_glyph(chars[0]) {
        let Some(binder) = chars.get(1).copied().and_then(Symbol::from_char) else {
            return syntax(format!("{} must be followed by a variable", quantifier.glyph()));
        };
        let body = parse_chars(&chars[2..])?;
        return Ok(WffTree::quantified(quantifier, binder, body)?);
    }

    parse_atomic(chars)
}

fn parse_atomic(chars: &[char]) -> Result<WffTree, ParseFailure> {
    let text: String = chars.iter().collect();
    if PRIMITIVE.is_match(&text) {
        return Ok(if chars[0] == '⊤' {
            WffTree::top()
        } else {
            WffTree::bottom()
        });
    }
    if IDENTITY.is_match(&text) {
        match (Argument::new(chars[0]), Argument::new(chars[2])) {
            (Some(left), Some(right)) => return Ok(WffTree::equals(left, right)),
            _ => return syntax(format!("bad identity '{}'", text)),
        }
    }
    if PREDICATION.is_match(&text) {
        let Some(predicate) = Predicate::letter(chars[0]) else {
            return syntax(format!("bad predicate in '{}'", text));
        };
        let args = chars[1..].iter().filter_map(|c| Argument::new(*c)).collect();
        return Ok(WffTree::atomic(predicate, args)?);
    }
    syntax(format!("'{}' is not a well-formed formula", text))
}
