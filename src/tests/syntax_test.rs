use crate::kernel::canonical::{canonicalize, is_canonical};
use crate::kernel::enumerate::{composite_wffs, FormulaSpace};
use crate::syntax::parse_wff;

fn small_space() -> FormulaSpace {
    FormulaSpace {
        nesting: 1,
        predicates: 1,
        arguments: 1,
        max_arity: 1,
    }
}

#[test]
fn test_display_parses_back() {
    for wff in composite_wffs(small_space()) {
        let text = wff.to_string();
        let parsed = match parse_wff(&text) {
            Ok(parsed) => parsed,
            Err(e) => panic!("cannot parse {}: {}", text, e),
        };
        assert_eq!(parsed, wff, "{}", text);
    }
}

#[test]
fn test_canonicalize_is_stable_over_a_space() {
    for wff in composite_wffs(small_space()) {
        let canonical = canonicalize(&wff);
        assert!(is_canonical(&canonical), "{}", wff);
        assert_eq!(canonicalize(&canonical), canonical);
        assert_eq!(canonical.length(), wff.length());
    }
}

#[test]
fn test_ascii_input() {
    let ascii = parse_wff("@x (Fx -> $y Fy)").unwrap();
    let glyphs = parse_wff("∀x(Fx→∃yFy)").unwrap();
    assert_eq!(ascii, glyphs);
}
