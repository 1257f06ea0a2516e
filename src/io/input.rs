use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::models::{Agenda, Session, protocol_no};

const PROTOCOL_PREFIX: &str = "protocol-";

/// Load a session protocol from a JSON file
pub fn load_session(path: &Path) -> Result<Session> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_session_json(&content).with_context(|| format!("Failed to load session: {:?}", path))
}

/// Parse a session protocol from a JSON string
///
/// The paragraph stream is brought into flow order if the file is not.
pub fn parse_session_json(json: &str) -> Result<Session> {
    let mut session: Session = serde_json::from_str(json).context("Failed to parse session JSON")?;

    if !session.content.windows(2).all(|w| w[0].flow_index < w[1].flow_index) {
        warn!(
            "Protocol {}: paragraphs out of flow order, sorting",
            session.protocol_no()
        );
        session.content.sort_by_key(|p| p.flow_index);
    }

    debug!(
        "Parsed protocol {} with {} paragraphs",
        session.protocol_no(),
        session.content.len()
    );

    Ok(session)
}

/// Load an agenda from a JSON file
pub fn load_agenda(path: &Path) -> Result<Agenda> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse agenda: {:?}", path))
}

/// File name of a protocol, e.g. `protocol-17-3.json`
pub fn protocol_file_name(period: u32, index: u32) -> String {
    format!("{}{}-{}.json", PROTOCOL_PREFIX, period, index)
}

/// Period and index encoded in a protocol file name
pub fn parse_protocol_file_name(name: &str) -> Option<(u32, u32)> {
    let stem = name.strip_prefix(PROTOCOL_PREFIX)?.strip_suffix(".json")?;
    let (period, index) = stem.split_once('-')?;
    Some((period.parse().ok()?, index.parse().ok()?))
}

/// Check that a loaded session is the protocol that was asked for
pub fn check_protocol(session: &Session, period: u32, index: u32) -> Result<(), PipelineError> {
    if session.period != period || session.index != index {
        return Err(PipelineError::SessionMismatch {
            expected: protocol_no(period, index),
            found: session.protocol_no(),
        });
    }
    Ok(())
}

/// Load protocol `<period>/<index>` from a protocol directory
pub fn load_protocol(dir: &Path, period: u32, index: u32) -> Result<Session> {
    let path = dir.join(protocol_file_name(period, index));
    let session = load_session(&path)?;
    check_protocol(&session, period, index)?;
    Ok(session)
}

/// All protocol files of one period in a directory, ordered by index
pub fn list_period_protocols(dir: &Path, period: u32) -> Result<Vec<(u32, PathBuf)>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to read directory: {:?}", dir))?;

    let mut protocols = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read directory: {:?}", dir))?;
        let name = entry.file_name();
        let Some((file_period, index)) = name.to_str().and_then(parse_protocol_file_name) else {
            continue;
        };
        if file_period == period {
            protocols.push((index, entry.path()));
        }
    }

    protocols.sort_by_key(|(index, _)| *index);
    Ok(protocols)
}

/// Session date as ISO `YYYY-MM-DD`
///
/// Accepts ISO and German `DD.MM.YYYY` dates. Anything else is kept as is.
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    let parsed = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d.%m.%Y"));

    match parsed {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => {
            warn!("Unrecognized session date {:?}, keeping it verbatim", raw);
            raw.to_string()
        }
    }
}
