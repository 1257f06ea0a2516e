use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::ProcessedSession;

impl ProcessedSession {
    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable protocol format
pub struct HumanProtocol<'a> {
    session: &'a ProcessedSession,
}

impl<'a> HumanProtocol<'a> {
    pub fn new(session: &'a ProcessedSession) -> Self {
        Self { session }
    }

    /// Format the speeches as readable text, grouped by topic
    pub fn format(&self) -> String {
        let mut output = format!(
            "Protocol {} ({})\n\n",
            self.session.protocol_no, self.session.date
        );
        let mut topic: Option<&str> = None;

        for speech in &self.session.speeches {
            if topic != Some(speech.topic.as_str()) {
                output.push_str(&format!("== {} ==\n\n", speech.topic));
                topic = Some(speech.topic.as_str());
            }

            match &speech.party {
                Some(party) => output.push_str(&format!("{} ({}):\n", speech.speaker, party)),
                None => output.push_str(&format!("{}:\n", speech.speaker)),
            }

            output.push_str(&wrap_text(&speech.text(), 80));
            output.push_str("\n\n");
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Wrap text at approximately the given width
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len + word_len + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word_len;
    }

    result
}
