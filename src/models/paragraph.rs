use serde::{Deserialize, Deserializer, Serialize};

use super::Agenda;

/// One transcript record of the paragraph stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Primary order key, strictly increasing within a session
    pub flow_index: u64,
    /// Detected speaker, empty when none was detected
    #[serde(default, deserialize_with = "null_as_default")]
    pub speaker_name: String,
    /// Whether the presiding officer is speaking
    #[serde(default, deserialize_with = "null_as_default")]
    pub speaker_is_chair: bool,
    #[serde(default)]
    pub speaker_party: Option<String>,
    #[serde(default)]
    pub speaker_ministry: Option<String>,
    #[serde(default)]
    pub speech: Option<String>,
    #[serde(default)]
    pub citation: Option<String>,
    /// Stage directions such as applause; never part of a speech
    #[serde(default)]
    pub annotation: Option<String>,
}

impl Paragraph {
    pub fn has_speaker(&self) -> bool {
        !self.speaker_name.trim().is_empty()
    }

    pub fn is_citation(&self) -> bool {
        self.citation.is_some()
    }

    pub fn is_annotation(&self) -> bool {
        self.annotation.is_some()
    }

    /// Substantive text: the speech if present, else the citation
    pub fn text(&self) -> Option<&str> {
        self.speech.as_deref().or(self.citation.as_deref())
    }

    /// Party of a member, or ministry of a member of government
    pub fn affiliation(&self) -> Option<&str> {
        self.speaker_party
            .as_deref()
            .or(self.speaker_ministry.as_deref())
    }
}

/// A parsed plenary session protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "protocol_date")]
    pub date: String,
    #[serde(rename = "protocol_period")]
    pub period: u32,
    #[serde(rename = "protocol_index")]
    pub index: u32,
    /// Paragraph stream in flow order
    #[serde(default)]
    pub content: Vec<Paragraph>,
    #[serde(default)]
    pub agenda: Option<Agenda>,
}

impl Session {
    /// Protocol identifier `<period>/<index>`
    pub fn protocol_no(&self) -> String {
        protocol_no(self.period, self.index)
    }
}

pub fn protocol_no(period: u32, index: u32) -> String {
    format!("{}/{}", period, index)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
