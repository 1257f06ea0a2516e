//! Generic sentence tokenizer
//!
//! Splits running text after sentence terminators that are followed by
//! whitespace. It knows nothing about parliamentary citation style or
//! domain abbreviations; the repair passes in [`crate::heuristics`] correct
//! the false boundaries it produces.

/// Configuration for sentence tokenization
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Words after which a period never ends a sentence (without the period)
    pub non_breaking_prefixes: Vec<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            non_breaking_prefixes: vec![
                "Dr".to_string(),
                "Prof".to_string(),
                "Nr".to_string(),
                "bzw".to_string(),
                "vgl".to_string(),
                "z.B".to_string(),
                "d.h".to_string(),
                "u.a".to_string(),
                "usw".to_string(),
            ],
        }
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

/// Closing punctuation that stays attached to the sentence it ends
fn is_closer(c: char) -> bool {
    matches!(c, '“' | '”' | '’' | ')' | ']')
}

fn is_opener(c: char) -> bool {
    matches!(c, '„' | '“' | '‚' | '(' | '[' | '"' | '\'')
}

/// Split text into sentence candidates
pub fn split_sentences(text: &str, config: &TokenizerConfig) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }

        // Swallow runs like "?!" or ".“)" into the boundary
        let mut end = pos + c.len_utf8();
        while let Some(&(next_pos, next)) = chars.peek() {
            if is_terminator(next) || is_closer(next) {
                end = next_pos + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        let at_end = end >= text.len();
        let before_space = chars.peek().is_some_and(|&(_, next)| next.is_whitespace());
        if !at_end && !before_space {
            continue;
        }

        if c == '.' && ends_with_prefix(&text[start..pos], config) {
            continue;
        }

        push_sentence(&mut sentences, &text[start..end]);
        start = end;
    }

    if start < text.len() {
        push_sentence(&mut sentences, &text[start..]);
    }

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, fragment: &str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        sentences.push(fragment.to_string());
    }
}

/// Whether the word right before a period is a non-breaking prefix
fn ends_with_prefix(preceding: &str, config: &TokenizerConfig) -> bool {
    let word = preceding
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(is_opener);
    !word.is_empty() && config.non_breaking_prefixes.iter().any(|p| p == word)
}
