use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// One agenda item with the speakers announced for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaItem {
    /// Topic label as extracted from the agenda
    pub topic: String,
    /// Announced speakers in agenda order, e.g. "Anna Beispiel (SPD)"
    #[serde(default)]
    pub speakers: Vec<String>,
}

impl AgendaItem {
    pub fn new(topic: impl Into<String>, speakers: Vec<String>) -> Self {
        Self {
            topic: topic.into(),
            speakers,
        }
    }
}

/// Session agenda: topics with their speaker lineups, in announced order
///
/// Accepts either a JSON object mapping topic to speaker list (document key
/// order is kept) or a JSON array of `{"topic": ..., "speakers": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Agenda {
    pub items: Vec<AgendaItem>,
}

impl Agenda {
    pub fn new(items: Vec<AgendaItem>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of announced speakers over all topics
    pub fn speaker_count(&self) -> usize {
        self.items.iter().map(|item| item.speakers.len()).sum()
    }
}

impl<'de> Deserialize<'de> for Agenda {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AgendaVisitor)
    }
}

struct AgendaVisitor;

impl<'de> Visitor<'de> for AgendaVisitor {
    type Value = Agenda;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of topic to speakers or a list of agenda items")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Agenda, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some((topic, speakers)) = map.next_entry::<String, Vec<String>>()? {
            items.push(AgendaItem { topic, speakers });
        }
        Ok(Agenda { items })
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Agenda, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element::<AgendaItem>()? {
            items.push(item);
        }
        Ok(Agenda { items })
    }
}

/// A single lineup entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LineupToken {
    /// Start of a topic run
    Topic(String),
    /// Announced speaker, raw agenda text
    Speaker(String),
}

impl LineupToken {
    pub fn is_topic(&self) -> bool {
        matches!(self, LineupToken::Topic(_))
    }
}

/// Flat topic/speaker sequence derived from the agenda
///
/// Starts with a topic marker unless empty. The automaton walks it with a
/// cursor and never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Lineup {
    pub tokens: Vec<LineupToken>,
}

impl Lineup {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn get(&self, position: usize) -> Option<&LineupToken> {
        self.tokens.get(position)
    }

    pub fn speaker_count(&self) -> usize {
        self.tokens.iter().filter(|t| !t.is_topic()).count()
    }

    pub fn topic_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_topic()).count()
    }

    /// Speakers of the topic run whose marker sits at `topic_position`
    pub fn speakers_of(&self, topic_position: usize) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .skip(topic_position + 1)
            .map_while(|token| match token {
                LineupToken::Speaker(name) => Some(name.as_str()),
                LineupToken::Topic(_) => None,
            })
    }
}
