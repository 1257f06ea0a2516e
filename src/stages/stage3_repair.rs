use tracing::{debug, info};

use crate::heuristics::{RepairConfig, apply_repairs};
use crate::models::{ConsolidatedSpeech, RepairedSpeech};
use crate::tokenizer::{TokenizerConfig, split_sentences};

/// Configuration for Stage 3
#[derive(Debug, Clone, Default)]
pub struct Stage3Config {
    pub tokenizer: TokenizerConfig,
    pub repair: RepairConfig,
}

/// Result of Stage 3 sentence repair
#[derive(Debug, Clone, Default)]
pub struct Stage3Result {
    pub speeches: Vec<RepairedSpeech>,
    /// Tokenizer boundaries removed over all speeches
    pub sentences_merged: usize,
    /// Citation boundaries added over all speeches
    pub sentences_split: usize,
}

impl Stage3Result {
    pub fn sentence_count(&self) -> usize {
        self.speeches.iter().map(|s| s.sentences.len()).sum()
    }
}

/// Execute Stage 3: split every speech into sentences and repair them
///
/// The tokenizer is generic; the repair passes undo its false boundaries
/// after abbreviations and ordinals and add boundaries around quotations.
pub fn execute_stage3(
    speeches: &[ConsolidatedSpeech],
    date: &str,
    protocol_no: &str,
    config: &Stage3Config,
) -> Stage3Result {
    let mut result = Stage3Result::default();

    for speech in speeches {
        let candidates = split_sentences(&speech.text, &config.tokenizer);
        let tokenized = candidates.len();
        let repaired = apply_repairs(candidates, &config.repair);

        debug!(
            "Speech by {:?}: {} candidates, {} sentences ({} merged, {} split)",
            speech.speaker,
            tokenized,
            repaired.sentences.len(),
            repaired.merges,
            repaired.splits
        );

        result.sentences_merged += repaired.merges;
        result.sentences_split += repaired.splits;
        result.speeches.push(RepairedSpeech::from_consolidated(
            speech,
            repaired.sentences,
            date,
            protocol_no,
        ));
    }

    info!(
        "Stage 3: {} sentences in {} speeches ({} merged, {} split)",
        result.sentence_count(),
        result.speeches.len(),
        result.sentences_merged,
        result.sentences_split
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpeechSegment;

    fn consolidated(text: &str) -> ConsolidatedSpeech {
        ConsolidatedSpeech {
            segment: SpeechSegment {
                topic: "1 Haushalt".to_string(),
                speaker: "Anna Beispiel (SPD)".to_string(),
                flow_indices: vec![1],
            },
            speaker: "Anna Beispiel".to_string(),
            party: Some("SPD".to_string()),
            text: text.to_string(),
        }
    }

    fn collapse(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_citation_is_its_own_sentence() {
        let speeches = vec![consolidated("Er sagte: „Das ist gut.“ Weiter.")];

        let result = execute_stage3(&speeches, "2018-01-24", "17/3", &Stage3Config::default());

        assert_eq!(
            result.speeches[0].sentences,
            vec!["Er sagte:", "„Das ist gut.“", "Weiter."]
        );
        assert_eq!(result.sentences_split, 1);
    }

    #[test]
    fn test_identity_is_carried() {
        let speeches = vec![consolidated("Hello. World.")];

        let result = execute_stage3(&speeches, "2018-01-24", "17/3", &Stage3Config::default());

        let speech = &result.speeches[0];
        assert_eq!(speech.date, "2018-01-24");
        assert_eq!(speech.protocol_no, "17/3");
        assert_eq!(speech.topic, "1 Haushalt");
        assert_eq!(speech.speaker, "Anna Beispiel");
        assert_eq!(speech.party.as_deref(), Some("SPD"));
        assert_eq!(speech.sentences, vec!["Hello.", "World."]);
        assert!(!speech.speech_id.is_empty());
    }

    #[test]
    fn test_numbers_and_ordinals_stay_in_sentence() {
        let speeches = vec![consolidated(
            "Der Entwurf kostet ca. 5 Millionen Euro. Wir sind in der 17. Wahlperiode, und das ist gut.",
        )];

        let result = execute_stage3(&speeches, "2018-01-24", "17/3", &Stage3Config::default());

        assert_eq!(
            result.speeches[0].sentences,
            vec![
                "Der Entwurf kostet ca. 5 Millionen Euro.",
                "Wir sind in der 17. Wahlperiode, und das ist gut.",
            ]
        );
        assert_eq!(result.sentences_merged, 2);
    }

    #[test]
    fn test_text_survives_repair() {
        let text = "Meine Damen und Herren! Nach Art. 3 gilt das.  Im 2. Kapitel steht: „Alle   sind gleich.“ Das ist klar. Herr Dr. Muster sieht das anders.";
        let speeches = vec![consolidated(text)];

        let result = execute_stage3(&speeches, "2018-01-24", "17/3", &Stage3Config::default());

        assert_eq!(collapse(&result.speeches[0].text()), collapse(text));
        assert!(result.speeches[0].sentences.iter().all(|s| !s.trim().is_empty()));
    }

    #[test]
    fn test_empty_speech_has_no_sentences() {
        let speeches = vec![consolidated("")];

        let result = execute_stage3(&speeches, "2018-01-24", "17/3", &Stage3Config::default());

        assert_eq!(result.speeches.len(), 1);
        assert!(result.speeches[0].sentences.is_empty());
    }
}
