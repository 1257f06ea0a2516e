use std::collections::HashMap;

use tracing::info;

use crate::error::PipelineError;
use crate::models::{ConsolidatedSpeech, Paragraph, SpeechSegment};

/// Execute Stage 2: join the paragraphs of every segment into one text
///
/// Speech and citation text is kept, annotations are dropped. Speaker
/// name and party come from the last paragraph of the segment. Output
/// order follows segment order.
pub fn execute_stage2(
    segments: &[SpeechSegment],
    paragraphs: &[Paragraph],
) -> Result<Vec<ConsolidatedSpeech>, PipelineError> {
    let by_index: HashMap<u64, &Paragraph> =
        paragraphs.iter().map(|p| (p.flow_index, p)).collect();

    let mut speeches = Vec::with_capacity(segments.len());

    for segment in segments {
        let mut texts = Vec::with_capacity(segment.flow_indices.len());
        let mut last = None;

        for &flow_index in &segment.flow_indices {
            let paragraph =
                by_index
                    .get(&flow_index)
                    .ok_or_else(|| PipelineError::MissingParagraph {
                        flow_index,
                        topic: segment.topic.clone(),
                        speaker: segment.speaker.clone(),
                    })?;
            if let Some(text) = paragraph.text().map(str::trim).filter(|t| !t.is_empty()) {
                texts.push(text);
            }
            last = Some(*paragraph);
        }

        let (speaker, party) = match last {
            Some(paragraph) => (
                paragraph.speaker_name.trim().to_string(),
                paragraph.affiliation().map(str::to_string),
            ),
            None => (segment.speaker.clone(), None),
        };

        speeches.push(ConsolidatedSpeech {
            segment: segment.clone(),
            speaker,
            party,
            text: texts.join(" "),
        });
    }

    info!("Stage 2: consolidated {} speeches", speeches.len());

    Ok(speeches)
}
