use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    /// Normalize user input before it is submitted for translation.
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Unicode normalization (NFKC), unify line endings
        let text: String = text.nfkc().collect();
        text.replace("\r\n", "\n").trim().to_string()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_maps_to_empty() {
        assert_eq!(DefaultPreprocessor.process("   \n  "), "");
    }

    #[test]
    fn trims_and_unifies_line_endings() {
        assert_eq!(
            DefaultPreprocessor.process("  hello\r\nworld  "),
            "hello\nworld"
        );
    }

    #[test]
    fn applies_compatibility_normalization() {
        // full-width latin normalizes to ascii
        assert_eq!(DefaultPreprocessor.process("ＡＢＣ"), "ABC");
    }
}
