use std::sync::LazyLock;

use regex::Regex;

static REASONING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json|JSON)?").expect("valid regex"));

/// Drop `<think>` sections some reasoning models prepend
pub fn strip_reasoning(text: &str) -> String {
    REASONING.replace_all(text, "").trim().to_string()
}

/// Drop markdown code fences around a payload
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// Model output reduced to the bare answer
pub fn clean_output(text: &str) -> String {
    strip_code_fences(&strip_reasoning(text))
}
