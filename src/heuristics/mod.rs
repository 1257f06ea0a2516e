pub mod citations;
pub mod interjection;
pub mod reconnect;

pub use citations::*;
pub use interjection::*;
pub use reconnect::*;

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Configuration for the sentence repair passes
#[derive(Debug, Clone)]
pub struct RepairConfig {
    /// Abbreviations after which a numeral continues the sentence
    pub abbreviations: Vec<String>,
    /// Words that follow an ordinal, e.g. "3. Kapitel"
    pub enumerable_nouns: Vec<String>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            abbreviations: words(&["ca.", "Art.", "Co."]),
            enumerable_nouns: words(&[
                "Band",
                "Band,",
                "Abschnitt",
                "Abschnitt,",
                "Kapitel",
                "Kapitel,",
                "Jahr",
                "Jahr,",
                "Wahlperiode",
                "Wahlperiode,",
                "Wahlperiode.",
                "Sitzung",
                "Sitzung,",
                "Tag",
                "Tag,",
                "Landtag",
                "Landtag,",
                "Landtags",
                "Landtages",
            ]),
        }
    }
}

/// Result of repairing one speech
#[derive(Debug, Clone, Default)]
pub struct RepairResult {
    /// Repaired sentences in order
    pub sentences: Vec<String>,
    /// Number of reconnections performed
    pub merges: usize,
    /// Number of citation splits performed
    pub splits: usize,
}

/// Apply all sentence repair passes to tokenizer output
///
/// Passes run in a fixed order, each until it makes no further change:
/// 1. Reconnect numerals split off after an abbreviation ("ca. 5")
/// 2. Reconnect enumerable nouns split off after an ordinal ("3. Kapitel")
/// 3. Split before an opening quotation introduced by a colon
/// 4. Split after a closing quotation that ends a sentence
/// 5. Reconnect candidates starting with a lowercase letter
pub fn apply_repairs(mut sentences: Vec<String>, config: &RepairConfig) -> RepairResult {
    let mut merges = 0;
    let mut splits = 0;

    merges += reconnect_numeral_starts(&mut sentences, config);
    merges += reconnect_enumerable_nouns(&mut sentences, config);
    splits += split_citation_starts(&mut sentences);
    splits += split_citation_ends(&mut sentences);
    merges += reconnect_lowercase_starts(&mut sentences);

    RepairResult {
        sentences,
        merges,
        splits,
    }
}
