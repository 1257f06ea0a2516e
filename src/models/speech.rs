use serde::{Deserialize, Serialize};

/// A contiguous run of paragraphs attributed to one speaker on one topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechSegment {
    /// Agenda topic label
    pub topic: String,
    /// Announced speaker as written in the agenda, or the transcript name
    /// for a returning speaker
    pub speaker: String,
    /// Flow indices in stream order, never empty
    pub flow_indices: Vec<u64>,
}

impl SpeechSegment {
    pub fn paragraph_count(&self) -> usize {
        self.flow_indices.len()
    }
}

/// A segment with its paragraph text joined into one string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidatedSpeech {
    pub segment: SpeechSegment,
    /// Speaker name as detected in the transcript
    pub speaker: String,
    /// Party, or ministry for members of government
    pub party: Option<String>,
    /// Speech and citation text joined by single spaces
    pub text: String,
}

impl ConsolidatedSpeech {
    pub fn topic(&self) -> &str {
        &self.segment.topic
    }
}

/// Final per-speech artifact: identity plus repaired sentences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairedSpeech {
    /// Unique identifier for this speech (UUID)
    pub speech_id: String,
    /// Session date
    pub date: String,
    /// Protocol identifier `<period>/<index>`
    pub protocol_no: String,
    pub topic: String,
    pub speaker: String,
    /// Party, or ministry for members of government
    pub party: Option<String>,
    /// Complete sentences in speech order
    pub sentences: Vec<String>,
}

impl RepairedSpeech {
    pub fn from_consolidated(
        speech: &ConsolidatedSpeech,
        sentences: Vec<String>,
        date: &str,
        protocol_no: &str,
    ) -> Self {
        Self {
            speech_id: uuid::Uuid::new_v4().to_string(),
            date: date.to_string(),
            protocol_no: protocol_no.to_string(),
            topic: speech.segment.topic.clone(),
            speaker: speech.speaker.clone(),
            party: speech.party.clone(),
            sentences,
        }
    }

    /// Sentences joined back into running text
    pub fn text(&self) -> String {
        self.sentences.join(" ")
    }
}

/// Counters gathered while processing one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    pub paragraphs: usize,
    pub segments: usize,
    pub paragraphs_skipped: usize,
    pub speeches: usize,
    pub sentences: usize,
    pub sentences_merged: usize,
    pub sentences_split: usize,
    /// Whether the end of the session was observed in the stream
    pub session_closed: bool,
    /// RFC 3339 timestamp of the run
    pub generated_at: String,
}

/// All speeches of one session, ready for downstream consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedSession {
    pub date: String,
    pub period: u32,
    pub index: u32,
    pub protocol_no: String,
    pub speeches: Vec<RepairedSpeech>,
    pub metadata: ProcessingMetadata,
}

impl ProcessedSession {
    pub fn sentence_count(&self) -> usize {
        self.speeches.iter().map(|s| s.sentences.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consolidated() -> ConsolidatedSpeech {
        ConsolidatedSpeech {
            segment: SpeechSegment {
                topic: "1 Haushalt".to_string(),
                speaker: "Anna Beispiel (SPD)".to_string(),
                flow_indices: vec![4, 5, 7],
            },
            speaker: "Anna Beispiel".to_string(),
            party: Some("SPD".to_string()),
            text: "Erster Satz. Zweiter Satz.".to_string(),
        }
    }

    #[test]
    fn test_repaired_speech_from_consolidated() {
        let speech = consolidated();
        let sentences = vec!["Erster Satz.".to_string(), "Zweiter Satz.".to_string()];

        let repaired = RepairedSpeech::from_consolidated(&speech, sentences, "2019-01-23", "17/45");

        assert_eq!(repaired.topic, "1 Haushalt");
        assert_eq!(repaired.speaker, "Anna Beispiel");
        assert_eq!(repaired.party.as_deref(), Some("SPD"));
        assert_eq!(repaired.protocol_no, "17/45");
        assert_eq!(repaired.text(), speech.text);
        assert!(uuid::Uuid::parse_str(&repaired.speech_id).is_ok());
    }

    #[test]
    fn test_speech_ids_are_unique() {
        let speech = consolidated();
        let a = RepairedSpeech::from_consolidated(&speech, vec![], "2019-01-23", "17/45");
        let b = RepairedSpeech::from_consolidated(&speech, vec![], "2019-01-23", "17/45");
        assert_ne!(a.speech_id, b.speech_id);
    }
}
