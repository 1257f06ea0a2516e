use tracing::debug;

use super::RepairConfig;

/// First non-punctuation character is a digit
pub fn starts_with_numeral(sentence: &str) -> bool {
    for c in sentence.chars() {
        if c.is_numeric() {
            return true;
        }
        if c.is_alphabetic() {
            return false;
        }
    }
    false
}

/// First letter is lowercase; a digit before any letter means no
pub fn starts_with_lowercase(sentence: &str) -> bool {
    for c in sentence.chars() {
        if c.is_numeric() {
            return false;
        }
        if c.is_alphabetic() {
            return c.is_lowercase();
        }
    }
    false
}

pub fn ends_with_abbreviation(sentence: &str, abbreviations: &[String]) -> bool {
    sentence
        .split_whitespace()
        .next_back()
        .is_some_and(|word| abbreviations.iter().any(|a| a == word))
}

pub fn starts_with_enumerable_noun(sentence: &str, nouns: &[String]) -> bool {
    sentence
        .split_whitespace()
        .next()
        .is_some_and(|word| nouns.iter().any(|n| n == word))
}

/// Last word is a bare number, optionally followed by a period ("3.")
pub fn ends_with_number(sentence: &str) -> bool {
    let Some(last) = sentence.split_whitespace().next_back() else {
        return false;
    };
    let last = last.strip_suffix('.').unwrap_or(last);
    !last.is_empty() && last.chars().all(char::is_numeric)
}

/// "ca." | "5 Millionen." -> "ca. 5 Millionen."
pub fn reconnect_numeral_starts(sentences: &mut Vec<String>, config: &RepairConfig) -> usize {
    merge_to_fix_point(sentences, "numeral start", false, |previous, current| {
        starts_with_numeral(current) && ends_with_abbreviation(previous, &config.abbreviations)
    })
}

/// "Im 3." | "Kapitel steht es." -> "Im 3. Kapitel steht es."
pub fn reconnect_enumerable_nouns(sentences: &mut Vec<String>, config: &RepairConfig) -> usize {
    merge_to_fix_point(sentences, "enumerable noun", false, |previous, current| {
        starts_with_enumerable_noun(current, &config.enumerable_nouns)
            && ends_with_number(previous)
    })
}

/// "Warum?" | "fragte er." -> "Warum fragte er."
pub fn reconnect_lowercase_starts(sentences: &mut Vec<String>) -> usize {
    merge_to_fix_point(sentences, "lowercase start", true, |_, current| {
        starts_with_lowercase(current)
    })
}

/// Merge the first matching pair, then look again until nothing matches
fn merge_to_fix_point<F>(
    sentences: &mut Vec<String>,
    pass: &str,
    drop_question_mark: bool,
    should_merge: F,
) -> usize
where
    F: Fn(&str, &str) -> bool,
{
    let mut merges = 0;

    while let Some(index) =
        (1..sentences.len()).find(|&i| should_merge(sentences[i - 1].as_str(), sentences[i].as_str()))
    {
        let current = sentences.remove(index);
        let previous = sentences[index - 1].trim();
        let head = if drop_question_mark {
            previous.strip_suffix('?').unwrap_or(previous)
        } else {
            previous
        };

        debug!("Reconnect ({}): {:?} + {:?}", pass, head, current);
        let joined = format!("{} {}", head, current.trim());
        sentences[index - 1] = joined;
        merges += 1;
    }

    merges
}
