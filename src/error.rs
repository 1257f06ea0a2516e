use thiserror::Error;

/// Errors that abort processing of a single session
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A speech segment points at a paragraph that is not in the stream
    #[error("flow index {flow_index} of speech by {speaker:?} on {topic:?} has no paragraph")]
    MissingParagraph {
        flow_index: u64,
        topic: String,
        speaker: String,
    },

    /// The loaded protocol is not the one that was requested
    #[error("protocol mismatch: expected {expected}, found {found}")]
    SessionMismatch { expected: String, found: String },

    /// Neither the session nor the caller supplied an agenda
    #[error("no agenda available for protocol {protocol_no}")]
    MissingAgenda { protocol_no: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_paragraph_message() {
        let err = PipelineError::MissingParagraph {
            flow_index: 17,
            topic: "1 Haushalt".to_string(),
            speaker: "Anna Beispiel (SPD)".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("17"));
        assert!(message.contains("Anna Beispiel (SPD)"));
    }

    #[test]
    fn test_session_mismatch_message() {
        let err = PipelineError::SessionMismatch {
            expected: "17/3".to_string(),
            found: "17/4".to_string(),
        };
        assert_eq!(err.to_string(), "protocol mismatch: expected 17/3, found 17/4");
    }
}
