/// Which adapter chain an input goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    SingleWord,
    MultiWord,
}

/// Whitespace-only classification, total over all strings.
///
/// Exactly one whitespace-separated token is a single word; everything else,
/// including the empty string, goes down the sentence path.
pub fn classify(text: &str) -> InputKind {
    let mut tokens = text.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(_), None) => InputKind::SingleWord,
        _ => InputKind::MultiWord,
    }
}

/// Normalized target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLanguage {
    /// Lowercased tag as requested, e.g. "zh-cn"
    pub code: String,
    /// Name used when prompting providers, e.g. "Chinese"
    pub name: String,
}

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en", "English"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("fr", "French"),
    ("de", "German"),
    ("es", "Spanish"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("vi", "Vietnamese"),
    ("th", "Thai"),
    ("id", "Indonesian"),
    ("tr", "Turkish"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("uk", "Ukrainian"),
];

impl TargetLanguage {
    pub fn parse(tag: &str) -> Self {
        let code = tag.trim().to_lowercase();
        let code = if code.is_empty() { "zh".to_string() } else { code };

        let name = if is_chinese_tag(&code) {
            "Chinese".to_string()
        } else {
            let primary = code.split(['-', '_']).next().unwrap_or(&code);
            LANGUAGE_NAMES
                .iter()
                .find(|(c, _)| *c == primary)
                .map(|(_, n)| n.to_string())
                .unwrap_or_else(|| tag.trim().to_string())
        };

        Self { code, name }
    }

    /// zh, zh-CN, zh-TW, zh-Hans, ... all collapse to one family
    pub fn is_chinese(&self) -> bool {
        is_chinese_tag(&self.code)
    }

    pub fn is_english(&self) -> bool {
        self.code == "en" || self.code.starts_with("en-") || self.code.starts_with("en_")
    }
}

fn is_chinese_tag(code: &str) -> bool {
    code == "zh" || code.starts_with("zh-") || code.starts_with("zh_") || code == "chinese"
}
