/// Configuration for telling a speech apart from an interposed question
#[derive(Debug, Clone)]
pub struct InterjectionConfig {
    /// Fragments of the ceremonial address that opens a speech
    pub address_markers: Vec<String>,
    /// Subtracted when the text ends with a question mark
    pub question_penalty: i32,
    /// The text counts as a speech when its score is strictly above this
    pub min_score: i32,
}

impl Default for InterjectionConfig {
    fn default() -> Self {
        Self {
            address_markers: vec![
                // "Meine Damen und Herren!"
                "Herren!".to_string(),
                // "Herr Präsident", "Frau Landtagspräsidentin"
                "räsident".to_string(),
                // "Liebe Kolleginnen und Kollegen"
                "Kolleginnen".to_string(),
            ],
            question_penalty: 1,
            min_score: 1,
        }
    }
}

/// Score how much a text opens like a recognized speech turn
///
/// Each word containing an address marker counts once; a trailing question
/// mark is penalized.
pub fn address_score(text: &str, config: &InterjectionConfig) -> i32 {
    let mut score = 0;

    if text.trim_end().ends_with('?') {
        score -= config.question_penalty;
    }

    for word in text.split_whitespace() {
        if config
            .address_markers
            .iter()
            .any(|marker| word.contains(marker.as_str()))
        {
            score += 1;
        }
    }

    score
}

/// Whether a paragraph text is a genuine speech rather than a question
/// shouted from the floor
pub fn is_genuine_speech(text: &str, config: &InterjectionConfig) -> bool {
    address_score(text, config) > config.min_score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_address_is_speech() {
        let config = InterjectionConfig::default();
        let text = "Herr Präsident! Meine Damen und Herren! Liebe Kolleginnen und Kollegen! Ich beginne.";
        assert_eq!(address_score(text, &config), 3);
        assert!(is_genuine_speech(text, &config));
    }

    #[test]
    fn test_two_markers_are_enough() {
        let config = InterjectionConfig::default();
        assert!(is_genuine_speech(
            "Frau Präsidentin! Meine Damen und Herren! Zur Sache.",
            &config
        ));
    }

    #[test]
    fn test_single_marker_is_not_enough() {
        let config = InterjectionConfig::default();
        assert!(!is_genuine_speech("Meine Damen und Herren! Zur Sache.", &config));
    }

    #[test]
    fn test_question_is_penalized() {
        let config = InterjectionConfig::default();
        let text = "Herr Präsident! Liebe Kolleginnen, stimmt das wirklich?";
        assert_eq!(address_score(text, &config), 1);
        assert!(!is_genuine_speech(text, &config));
    }

    #[test]
    fn test_plain_question_scores_negative() {
        let config = InterjectionConfig::default();
        assert_eq!(address_score("Wer bezahlt das? ", &config), -1);
    }

    #[test]
    fn test_custom_threshold() {
        let config = InterjectionConfig {
            min_score: 0,
            ..Default::default()
        };
        assert!(is_genuine_speech("Meine Damen und Herren! Zur Sache.", &config));
    }
}
