//! Prompt templates. `{target_lang}`, `{word}` and `{sentence}` are substituted.

pub const DICTIONARY_PROMPT_TEMPLATE: &str = r#"
You are a professional English-{target_lang} dictionary.

Return ONLY valid JSON in this exact format:

{
  "word": "",
  "phonetic": "",
  "meanings": [
    {
      "partOfSpeech": "",
      "definitions": [
        {
          "definition": "",
          "example": ""
        }
      ]
    }
  ]
}

Rules:
- Only include parts of speech that exist.
- Write every definition in {target_lang}.
- Keep meanings short and accurate.
- No explanations.
- No markdown.
- No comments.

Word: {word}
"#;

pub const TRANSLATE_PROMPT_TEMPLATE: &str = r#"
Translate the following English sentence into natural {target_lang}.
Return ONLY the {target_lang} translation.
No explanation.

Sentence:
{sentence}
"#;

pub fn dictionary_prompt(word: &str, target_lang: &str) -> String {
    DICTIONARY_PROMPT_TEMPLATE
        .replace("{target_lang}", target_lang)
        .replace("{word}", word)
}

pub fn translate_prompt(sentence: &str, target_lang: &str) -> String {
    TRANSLATE_PROMPT_TEMPLATE
        .replace("{target_lang}", target_lang)
        .replace("{sentence}", sentence)
}
