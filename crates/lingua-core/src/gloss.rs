//! Helpers shared by the adapters when shaping provider data.

use lingua_types::{DefinitionEntry, MeaningGroup};

const CLAUSE_SEPARATORS: [char; 4] = [';', '；', ',', '，'];

/// First clause of the first definition, the one-line gloss of a word
pub fn first_gloss(meanings: &[MeaningGroup]) -> Option<String> {
    let definition = meanings
        .iter()
        .flat_map(|group| group.definitions.iter())
        .map(|entry| entry.definition.trim())
        .find(|definition| !definition.is_empty())?;

    let clause = definition
        .split(CLAUSE_SEPARATORS)
        .map(str::trim)
        .find(|clause| !clause.is_empty())
        .unwrap_or(definition);

    Some(clause.to_string())
}

/// Drop empty definitions and the groups they leave empty
pub fn retain_non_empty(meanings: Vec<MeaningGroup>) -> Vec<MeaningGroup> {
    meanings
        .into_iter()
        .filter_map(|group| {
            let definitions: Vec<DefinitionEntry> = group
                .definitions
                .into_iter()
                .filter(|entry| !entry.definition.trim().is_empty())
                .collect();

            if definitions.is_empty() {
                return None;
            }

            let part_of_speech = if group.part_of_speech.trim().is_empty() {
                "general".to_string()
            } else {
                group.part_of_speech
            };

            Some(MeaningGroup {
                part_of_speech,
                definitions,
            })
        })
        .collect()
}
