use tracing::debug;

/// Colon introducing a quotation: `sagte: „...`
const CITATION_START: &str = ": „";

/// Terminator plus closing quote inside a candidate: `...gut.“ Weiter`
const CITATION_ENDS: [&str; 2] = [".“ ", "?“ "];

/// Split "Er sagte: „Das ..." into "Er sagte:" and "„Das ..."
pub fn split_citation_starts(sentences: &mut Vec<String>) -> usize {
    split_to_fix_point(sentences, "citation start", split_at_citation_start)
}

/// Split "„Das ist gut.“ Weiter." into "„Das ist gut.“" and "Weiter."
pub fn split_citation_ends(sentences: &mut Vec<String>) -> usize {
    split_to_fix_point(sentences, "citation end", split_at_citation_end)
}

fn split_at_citation_start(sentence: &str) -> Option<(String, String)> {
    let pos = sentence.find(CITATION_START)?;
    // keep the colon on the introducing clause, the quote on the citation
    let head = sentence[..pos + 1].trim();
    let tail = sentence[pos + 2..].trim();
    Some((head.to_string(), tail.to_string()))
}

fn split_at_citation_end(sentence: &str) -> Option<(String, String)> {
    let (pos, pattern) = CITATION_ENDS
        .iter()
        .filter_map(|pattern| sentence.find(pattern).map(|pos| (pos, *pattern)))
        .min_by_key(|(pos, _)| *pos)?;

    let quote_end = pos + pattern.trim_end().len();
    let head = sentence[..quote_end].trim();
    let tail = sentence[quote_end..].trim();
    if tail.is_empty() {
        return None;
    }
    Some((head.to_string(), tail.to_string()))
}

/// Split the first matching candidate, then look again until nothing matches
fn split_to_fix_point<F>(sentences: &mut Vec<String>, pass: &str, split: F) -> usize
where
    F: Fn(&str) -> Option<(String, String)>,
{
    let mut splits = 0;

    loop {
        let next = sentences
            .iter()
            .enumerate()
            .find_map(|(i, sentence)| split(sentence.as_str()).map(|(head, tail)| (i, head, tail)));
        let Some((index, head, tail)) = next else {
            break;
        };

        debug!("Split ({}): {:?} | {:?}", pass, head, tail);
        sentences[index] = head;
        sentences.insert(index + 1, tail);
        splits += 1;
    }

    splits
}
