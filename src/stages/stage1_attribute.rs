use tracing::{debug, info, warn};

use crate::heuristics::{InterjectionConfig, is_genuine_speech};
use crate::models::{Lineup, LineupToken, Paragraph, SpeechSegment};

/// Configuration for Stage 1
#[derive(Debug, Clone, Default)]
pub struct Stage1Config {
    /// Rules for rejecting questions from the floor
    pub interjection: InterjectionConfig,
}

/// Result of Stage 1 attribution
#[derive(Debug, Clone, Default)]
pub struct Stage1Result {
    /// Segments in the order they were closed
    pub segments: Vec<SpeechSegment>,
    /// Paragraphs not attributed to any speech
    pub paragraphs_skipped: usize,
    /// Whether the end of the session was observed in the stream
    pub session_closed: bool,
}

/// Why a paragraph at a topic boundary was taken as the end of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionClose {
    /// The chair spoke instead of the next announced speaker
    ChairRemark,
    /// Someone other than the next announced speaker took the floor
    FloorSpeaker,
    /// No announced speaker is left
    LineupExhausted,
}

/// What the automaton did with one paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Appended to the running speech
    Continue,
    /// Opened the first speech of the pending topic
    FirstOfTopic,
    /// Opened a speech for the next announced speaker
    NextSpeaker,
    /// Opened a speech for a speaker returning to the current topic
    ReturningSpeaker,
    /// Not attributed; the session is taken to be over
    SessionClose(SessionClose),
    /// Not attributed
    Skip,
}

/// A topic marker, identified by its position in the lineup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TopicRef<'a> {
    position: usize,
    label: &'a str,
}

/// Substring containment; the agenda carries party codes and page numbers
/// the transcript does not, and vice versa
fn speaker_matches(name: &str, announced: &str) -> bool {
    !name.is_empty() && announced.contains(name)
}

/// Attribution automaton over one session
///
/// Walks the paragraph stream once while reading the lineup through a
/// cursor with one speaker of lookahead. Lineup tokens behind the cursor
/// are never reconsidered.
#[derive(Debug)]
pub struct Attribution<'a> {
    lineup: &'a Lineup,
    config: &'a InterjectionConfig,
    /// Next lineup position to read
    cursor: usize,
    current_topic: Option<TopicRef<'a>>,
    next_topic: Option<TopicRef<'a>>,
    current_speaker: Option<&'a str>,
    next_listed_speaker: Option<&'a str>,
    flow_indices: Vec<u64>,
    end_of_session: bool,
    segments: Vec<SpeechSegment>,
    paragraphs_skipped: usize,
}

impl<'a> Attribution<'a> {
    pub fn new(lineup: &'a Lineup, config: &'a InterjectionConfig) -> Self {
        let mut state = Self {
            lineup,
            config,
            cursor: 0,
            current_topic: None,
            next_topic: None,
            current_speaker: None,
            next_listed_speaker: None,
            flow_indices: Vec::new(),
            end_of_session: false,
            segments: Vec::new(),
            paragraphs_skipped: 0,
        };

        match lineup.get(0) {
            Some(LineupToken::Topic(label)) => {
                let first = TopicRef {
                    position: 0,
                    label: label.as_str(),
                };
                state.current_topic = Some(first);
                state.next_topic = Some(first);
                state.cursor = 1;
                state.advance();
            }
            Some(LineupToken::Speaker(name)) => {
                warn!("Lineup starts with speaker {:?} instead of a topic, nothing attributed", name);
            }
            None => {}
        }

        state
    }

    pub fn current_topic(&self) -> Option<&'a str> {
        self.current_topic.map(|t| t.label)
    }

    pub fn next_topic(&self) -> Option<&'a str> {
        self.next_topic.map(|t| t.label)
    }

    pub fn current_speaker(&self) -> Option<&'a str> {
        self.current_speaker
    }

    pub fn next_listed_speaker(&self) -> Option<&'a str> {
        self.next_listed_speaker
    }

    /// Flow indices of the speech in progress
    pub fn pending_indices(&self) -> &[u64] {
        &self.flow_indices
    }

    pub fn end_of_session(&self) -> bool {
        self.end_of_session
    }

    fn topic_change_pending(&self) -> bool {
        self.current_topic != self.next_topic
    }

    /// Feed the next paragraph of the stream
    pub fn step(&mut self, paragraph: &'a Paragraph) -> Decision {
        let decision = self.decide(paragraph);
        if matches!(decision, Decision::Skip | Decision::SessionClose(_)) {
            self.paragraphs_skipped += 1;
        }
        decision
    }

    fn decide(&mut self, paragraph: &'a Paragraph) -> Decision {
        if self.current_topic.is_none() || !paragraph.has_speaker() {
            return Decision::Skip;
        }

        let flow_index = paragraph.flow_index;
        let name = paragraph.speaker_name.trim();

        // Same speaker keeps talking
        if self
            .current_speaker
            .is_some_and(|speaker| speaker_matches(name, speaker))
        {
            self.flow_indices.push(flow_index);
            return Decision::Continue;
        }

        if self.topic_change_pending() {
            if let Some(next) = self
                .next_listed_speaker
                .filter(|next| speaker_matches(name, next))
            {
                self.finalize();
                self.current_topic = self.next_topic;
                self.current_speaker = Some(next);
                self.flow_indices.push(flow_index);
                debug!(
                    "Topic {:?} opened by {:?} at {}",
                    self.current_topic(),
                    next,
                    flow_index
                );
                self.advance();
                return Decision::FirstOfTopic;
            }

            let reason = if paragraph.speaker_is_chair {
                SessionClose::ChairRemark
            } else if self.next_listed_speaker.is_none() {
                SessionClose::LineupExhausted
            } else {
                SessionClose::FloorSpeaker
            };
            if !self.end_of_session {
                debug!("End of session assumed at {} ({:?})", flow_index, reason);
            }
            self.end_of_session = true;
            return Decision::SessionClose(reason);
        }

        if let Some(next) = self
            .next_listed_speaker
            .filter(|next| speaker_matches(name, next))
        {
            self.finalize();
            self.current_speaker = Some(next);
            self.flow_indices.push(flow_index);
            debug!("Next speaker {:?} at {}", next, flow_index);
            self.advance();
            return Decision::NextSpeaker;
        }

        // Announced speakers may come back to the same topic out of order,
        // but questions from the floor must not open a speech
        let returning = self.in_current_lineup(name)
            && paragraph
                .speech
                .as_deref()
                .is_some_and(|speech| is_genuine_speech(speech, self.config));
        if returning {
            self.finalize();
            self.current_speaker = Some(name);
            self.flow_indices.push(flow_index);
            debug!("Returning speaker {:?} at {}", name, flow_index);
            return Decision::ReturningSpeaker;
        }

        Decision::Skip
    }

    /// Whether the speaker was announced anywhere for the current topic
    fn in_current_lineup(&self, name: &str) -> bool {
        self.current_topic.is_some_and(|topic| {
            self.lineup
                .speakers_of(topic.position)
                .any(|announced| speaker_matches(name, announced))
        })
    }

    /// Read lineup tokens up to and including the next speaker
    ///
    /// Topic markers read on the way become the next topic. When nothing is
    /// left to read, both lookaheads are cleared.
    fn advance(&mut self) {
        let lineup = self.lineup;
        let mut read_topic = false;
        self.next_listed_speaker = None;

        while let Some(token) = lineup.get(self.cursor) {
            let position = self.cursor;
            self.cursor += 1;
            match token {
                LineupToken::Topic(label) => {
                    self.next_topic = Some(TopicRef {
                        position,
                        label: label.as_str(),
                    });
                    read_topic = true;
                }
                LineupToken::Speaker(name) => {
                    self.next_listed_speaker = Some(name.as_str());
                    return;
                }
            }
        }

        if !read_topic {
            self.next_topic = None;
        }
    }

    /// Close the speech in progress, if any
    fn finalize(&mut self) {
        if self.flow_indices.is_empty() {
            return;
        }
        let (Some(topic), Some(speaker)) = (self.current_topic, self.current_speaker) else {
            self.flow_indices.clear();
            return;
        };

        let segment = SpeechSegment {
            topic: topic.label.to_string(),
            speaker: speaker.to_string(),
            flow_indices: std::mem::take(&mut self.flow_indices),
        };
        debug!(
            "Speech by {:?} on {:?}: {} paragraphs",
            segment.speaker,
            segment.topic,
            segment.paragraph_count()
        );
        self.segments.push(segment);
    }

    /// Whether every announced speaker has been reached
    ///
    /// Trailing topics without speakers, such as the closing agenda item,
    /// do not count.
    fn lineup_consumed(&self) -> bool {
        self.cursor >= self.lineup.len() && self.next_listed_speaker.is_none()
    }

    /// End of stream: close the last speech if its end was observed
    pub fn finish(mut self) -> Stage1Result {
        if self.end_of_session || self.lineup_consumed() {
            self.finalize();
        } else if !self.flow_indices.is_empty() {
            warn!(
                "Stream ended inside a speech by {:?} before the session closed, {} paragraphs dropped",
                self.current_speaker,
                self.flow_indices.len()
            );
        }

        Stage1Result {
            segments: self.segments,
            paragraphs_skipped: self.paragraphs_skipped,
            session_closed: self.end_of_session,
        }
    }
}

/// Execute Stage 1: attribute paragraphs to announced speakers
///
/// Produces one segment per speaking turn. Interjections (chair remarks,
/// stage directions, questions from the floor) are skipped without
/// breaking the speech around them.
pub fn execute_stage1(
    lineup: &Lineup,
    paragraphs: &[Paragraph],
    config: &Stage1Config,
) -> Stage1Result {
    let mut attribution = Attribution::new(lineup, &config.interjection);

    for paragraph in paragraphs {
        attribution.step(paragraph);
    }

    let result = attribution.finish();

    info!(
        "Stage 1: {} speeches from {} paragraphs ({} skipped, session closed: {})",
        result.segments.len(),
        paragraphs.len(),
        result.paragraphs_skipped,
        result.session_closed
    );

    result
}
