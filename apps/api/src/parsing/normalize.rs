/// Private-use bullet glyph emitted by some PDF exporters (Word's Symbol font).
pub const PDF_BULLET: char = '\u{f0b7}';

/// Collapses text into canonical single-line form: bullet glyphs removed,
/// newlines and whitespace runs folded into one space, ends trimmed.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let stripped: String = text.chars().filter(|&c| c != PDF_BULLET).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
    }

    #[test]
    fn test_newlines_become_single_spaces() {
        assert_eq!(normalize("Senior\nEngineer\r\n  at Acme"), "Senior Engineer at Acme");
    }

    #[test]
    fn test_bullet_glyph_removed() {
        assert_eq!(normalize("\u{f0b7} Python"), "Python");
        assert_eq!(normalize("Rust\u{f0b7}Go"), "RustGo");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "plain",
            "  lots   of\n\nspace \u{f0b7} here ",
            "tabs\tand\u{a0}nbsp",
            "Contact Information\nPhone: 090-123-4567\n",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_no_newlines_in_output() {
        let out = normalize("a\nb\n\nc");
        assert!(!out.contains('\n'));
        assert_eq!(out, "a b c");
    }
}
