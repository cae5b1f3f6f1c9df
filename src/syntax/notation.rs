use crate::kernel::FormulaError;

// The ASCII fallbacks, in the order they are applied.
// Longer spellings come first so "<->" is not read as "<" followed by "->".
const ASCII_FALLBACKS: [(&str, &str); 15] = [
    ("<->", "↔"),
    ("->", "→"),
    ("\\/", "∨"),
    ("/\\", "∧"),
    ("[]", "□"),
    ("<>", "◇"),
    ("~", "¬"),
    ("$", "∃"),
    ("@", "∀"),
    ("^", "⊤"),
    ("#", "⊥"),
    ("{", "("),
    ("}", ")"),
    ("[", "("),
    ("]", ")"),
];

const GLYPHS: &str = "¬□◇∧∨→↔∃∀⊤⊥=()";

/// Strips whitespace and rewrites ASCII fallbacks into glyphs.
/// Fails if anything other than letters, glyphs, and parentheses remains.
pub fn convert_notation(input: &str) -> Result<String, FormulaError> {
    let mut text: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    for (ascii, glyph) in ASCII_FALLBACKS {
        text = text.replace(ascii, glyph);
    }
    if let Some(bad) = text
        .chars()
        .find(|c| !c.is_ascii_alphabetic() && !GLYPHS.contains(*c))
    {
        return Err(FormulaError::Parse {
            input: input.to_string(),
            reason: format!("unexpected character '{}'", bad),
        });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_fallbacks() {
        assert_eq!(convert_notation("A -> B").unwrap(), "A→B");
        assert_eq!(convert_notation("A <-> ~B").unwrap(), "A↔¬B");
        assert_eq!(convert_notation("A /\\ B \\/ C").unwrap(), "A∧B∨C");
        assert_eq!(convert_notation("[]A -> <>A").unwrap(), "□A→◇A");
        assert_eq!(convert_notation("@x $y Fxy").unwrap(), "∀x∃yFxy");
        assert_eq!(convert_notation("{^ -> [#]}").unwrap(), "(⊤→(⊥))");
    }

    #[test]
    fn test_glyphs_pass_through() {
        assert_eq!(convert_notation("∀x(Fx→x=a)").unwrap(), "∀x(Fx→x=a)");
    }

    #[test]
    fn test_rejects_unknown_characters() {
        assert!(convert_notation("A + B").is_err());
        assert!(convert_notation("A1").is_err());
    }
}
