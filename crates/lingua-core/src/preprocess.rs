use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default: request text, trimmed, case and form untouched
    fn process(&self, text: &str) -> String {
        text.trim().to_string()
    }
}

/// Request text as it is matched against the word store (case-sensitive)
pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

/// Folded key for offline dictionary datasets
pub struct DictionaryKey;
impl Preprocessor for DictionaryKey {
    fn process(&self, text: &str) -> String {
        let text = text.trim();
        if text.is_empty() {
            return String::new();
        }

        // NFKC folds full-width latin, then case-fold
        text.nfkc().collect::<String>().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keeps_case() {
        assert_eq!(DefaultPreprocessor.process("  Hello \n"), "Hello");
    }

    #[test]
    fn dictionary_key_folds_case_and_width() {
        assert_eq!(DictionaryKey.process("Hello"), "hello");
        assert_eq!(DictionaryKey.process("ＨＥＬＬＯ"), "hello");
        assert_eq!(DictionaryKey.process("   "), "");
    }
}
