use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::error::PipelineError;
use crate::io::{
    check_protocol, list_period_protocols, load_session, normalize_date, protocol_file_name,
};
use crate::models::{Agenda, ProcessedSession, ProcessingMetadata, Session};
use crate::stages::{
    Stage1Config, Stage3Config, execute_stage1, execute_stage2, execute_stage3, flatten_agenda,
};

/// Configuration for the whole pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Speaker attribution (stage 1)
    pub attribution: Stage1Config,
    /// Sentence tokenization and repair (stage 3)
    pub sentences: Stage3Config,
}

/// Run all stages on one session
///
/// An explicit agenda takes precedence over the one embedded in the session.
pub fn process_session(
    session: &Session,
    agenda: Option<&Agenda>,
    config: &PipelineConfig,
) -> Result<ProcessedSession, PipelineError> {
    let protocol_no = session.protocol_no();
    let agenda = agenda
        .or(session.agenda.as_ref())
        .ok_or_else(|| PipelineError::MissingAgenda {
            protocol_no: protocol_no.clone(),
        })?;

    info!(
        "Protocol {}: {} paragraphs, {} topics, {} announced speakers",
        protocol_no,
        session.content.len(),
        agenda.items.len(),
        agenda.speaker_count()
    );

    let lineup = flatten_agenda(agenda);
    let stage1 = execute_stage1(&lineup, &session.content, &config.attribution);
    let consolidated = execute_stage2(&stage1.segments, &session.content)?;

    let date = normalize_date(&session.date);
    let stage3 = execute_stage3(&consolidated, &date, &protocol_no, &config.sentences);

    let metadata = ProcessingMetadata {
        paragraphs: session.content.len(),
        segments: stage1.segments.len(),
        paragraphs_skipped: stage1.paragraphs_skipped,
        speeches: stage3.speeches.len(),
        sentences: stage3.sentence_count(),
        sentences_merged: stage3.sentences_merged,
        sentences_split: stage3.sentences_split,
        session_closed: stage1.session_closed,
        generated_at: chrono::Utc::now().to_rfc3339(),
    };

    Ok(ProcessedSession {
        date,
        period: session.period,
        index: session.index,
        protocol_no,
        speeches: stage3.speeches,
        metadata,
    })
}

/// Load, check, process and write one protocol file
pub fn process_protocol_file(
    input: &Path,
    period: u32,
    index: u32,
    output: &Path,
    config: &PipelineConfig,
) -> Result<ProcessedSession> {
    let session = load_session(input)?;
    check_protocol(&session, period, index)?;
    let processed = process_session(&session, None, config)
        .with_context(|| format!("Failed to process protocol {:?}", input))?;
    processed.write_json(output)?;
    Ok(processed)
}

/// Outcome of processing every protocol of a period
#[derive(Debug, Clone, Default)]
pub struct PeriodSummary {
    /// Written output files, ordered by protocol index
    pub written: Vec<(u32, PathBuf)>,
    /// Indices of protocols that failed
    pub failed: Vec<u32>,
    pub speeches: usize,
}

/// Process all protocols of a period concurrently
///
/// Sessions share no state; each runs as a blocking task. A failing
/// session is logged and counted while the others continue.
pub async fn process_period(
    protocol_dir: &Path,
    output_dir: &Path,
    period: u32,
    config: &PipelineConfig,
) -> Result<PeriodSummary> {
    let protocols = list_period_protocols(protocol_dir, period)?;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {:?}", output_dir))?;

    info!("Period {}: {} protocols found", period, protocols.len());

    let config = Arc::new(config.clone());
    let mut tasks = JoinSet::new();

    for (index, input) in protocols {
        let config = Arc::clone(&config);
        let output = output_dir.join(protocol_file_name(period, index));
        tasks.spawn_blocking(move || {
            let result = process_protocol_file(&input, period, index, &output, &config);
            (index, output, result)
        });
    }

    let mut summary = PeriodSummary::default();

    while let Some(joined) = tasks.join_next().await {
        let (index, output, result) = joined.context("Session task failed")?;
        match result {
            Ok(processed) => {
                info!(
                    "Protocol {}: {} speeches written to {:?}",
                    processed.protocol_no,
                    processed.speeches.len(),
                    output
                );
                summary.speeches += processed.speeches.len();
                summary.written.push((index, output));
            }
            Err(e) => {
                error!("Protocol {}/{} failed: {:#}", period, index, e);
                summary.failed.push(index);
            }
        }
    }

    summary.written.sort_by_key(|(index, _)| *index);
    summary.failed.sort();

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_session_json;

    const SESSION_JSON: &str = r#"{
        "protocol_date": "24.01.2018",
        "protocol_period": 17,
        "protocol_index": 3,
        "content": [
            {"flow_index": 1, "speaker_name": "Präsident André Beispiel", "speaker_is_chair": true, "speech": "Ich eröffne die Aussprache. Das Wort hat Frau Beispiel."},
            {"flow_index": 2, "speaker_name": "Anna Beispiel", "speaker_party": "SPD", "speech": "Herr Präsident! Meine Damen und Herren! Das kostet ca. 5 Millionen Euro."},
            {"flow_index": 3, "annotation": "(Beifall bei der SPD)"},
            {"flow_index": 4, "speaker_name": "Dieter Zwischenruf", "speaker_party": "FDP", "speech": "Wer soll das bezahlen?"},
            {"flow_index": 5, "speaker_name": "Anna Beispiel", "speaker_party": "SPD", "speech": "Der Kollege sagte: „Das ist zu teuer.“ Das stimmt nicht."},
            {"flow_index": 6, "speaker_name": "Präsident André Beispiel", "speaker_is_chair": true, "speech": "Als Nächster spricht Herr Muster."},
            {"flow_index": 7, "speaker_name": "Bernd Muster", "speaker_party": "CDU", "speech": "Herr Präsident! Im 3. Kapitel steht das anders."},
            {"flow_index": 8, "speaker_name": "Präsident André Beispiel", "speaker_is_chair": true, "speech": "Ich rufe Punkt 2 auf."},
            {"flow_index": 9, "speaker_name": "Clara Probe", "speaker_ministry": "Kultusministerium", "speech": "Frau Präsidentin! Die Schule beginnt."},
            {"flow_index": 10, "speaker_name": "Präsident André Beispiel", "speaker_is_chair": true, "speech": "Die Sitzung ist geschlossen."}
        ],
        "agenda": {
            "1 Haushalt": ["Anna Beispiel (SPD)", "Bernd Muster (CDU)"],
            "2 Schule": ["Clara Probe (Kultusministerin)"]
        }
    }"#;

    #[test]
    fn test_process_session() {
        let session = parse_session_json(SESSION_JSON).unwrap();

        let processed = process_session(&session, None, &PipelineConfig::default()).unwrap();

        assert_eq!(processed.protocol_no, "17/3");
        assert_eq!(processed.date, "2018-01-24");
        assert_eq!(processed.speeches.len(), 3);

        let anna = &processed.speeches[0];
        assert_eq!(anna.topic, "1 Haushalt");
        assert_eq!(anna.speaker, "Anna Beispiel");
        assert_eq!(anna.party.as_deref(), Some("SPD"));
        assert_eq!(
            anna.sentences,
            vec![
                "Herr Präsident!",
                "Meine Damen und Herren!",
                "Das kostet ca. 5 Millionen Euro.",
                "Der Kollege sagte:",
                "„Das ist zu teuer.“",
                "Das stimmt nicht.",
            ]
        );

        let bernd = &processed.speeches[1];
        assert_eq!(bernd.sentences, vec!["Herr Präsident!", "Im 3. Kapitel steht das anders."]);

        let clara = &processed.speeches[2];
        assert_eq!(clara.topic, "2 Schule");
        assert_eq!(clara.party.as_deref(), Some("Kultusministerium"));

        let metadata = &processed.metadata;
        assert_eq!(metadata.paragraphs, 10);
        assert_eq!(metadata.segments, 3);
        assert_eq!(metadata.paragraphs_skipped, 6);
        assert_eq!(metadata.sentences, processed.sentence_count());
        assert_eq!(metadata.sentences_merged, 2);
        assert_eq!(metadata.sentences_split, 1);
        assert!(metadata.session_closed);
        assert!(!metadata.generated_at.is_empty());
    }

    #[test]
    fn test_explicit_agenda_wins() {
        let session = parse_session_json(SESSION_JSON).unwrap();
        let agenda: Agenda = serde_json::from_str(r#"{"Aktuelle Stunde": ["Bernd Muster (CDU)"]}"#).unwrap();

        let processed = process_session(&session, Some(&agenda), &PipelineConfig::default()).unwrap();

        assert_eq!(processed.speeches.len(), 1);
        assert_eq!(processed.speeches[0].topic, "Aktuelle Stunde");
        assert_eq!(processed.speeches[0].speaker, "Bernd Muster");
    }

    #[test]
    fn test_missing_agenda() {
        let mut session = parse_session_json(SESSION_JSON).unwrap();
        session.agenda = None;

        let err = process_session(&session, None, &PipelineConfig::default()).unwrap_err();

        assert!(matches!(err, PipelineError::MissingAgenda { .. }));
    }

    #[test]
    fn test_speech_ids_are_unique() {
        let session = parse_session_json(SESSION_JSON).unwrap();

        let processed = process_session(&session, None, &PipelineConfig::default()).unwrap();

        let mut ids: Vec<&str> = processed.speeches.iter().map(|s| s.speech_id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), processed.speeches.len());
    }

    #[tokio::test]
    async fn test_process_period() {
        let protocols = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(protocols.path().join("protocol-17-3.json"), SESSION_JSON).unwrap();
        // misplaced: the file claims to be 17/3
        std::fs::write(protocols.path().join("protocol-17-4.json"), SESSION_JSON).unwrap();
        std::fs::write(protocols.path().join("protocol-16-3.json"), SESSION_JSON).unwrap();

        let summary = process_period(
            protocols.path(),
            &output.path().join("processed"),
            17,
            &PipelineConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(summary.failed, vec![4]);
        assert_eq!(summary.written.len(), 1);
        assert_eq!(summary.speeches, 3);
        let written = &summary.written[0].1;
        assert!(written.ends_with("protocol-17-3.json"));
        let content = std::fs::read_to_string(written).unwrap();
        let parsed: ProcessedSession = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.protocol_no, "17/3");
    }

    #[tokio::test]
    async fn test_process_period_missing_dir() {
        let output = tempfile::tempdir().unwrap();

        let result = process_period(
            &output.path().join("nowhere"),
            output.path(),
            17,
            &PipelineConfig::default(),
        )
        .await;

        assert!(result.is_err());
    }
}
