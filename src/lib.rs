pub mod error;
pub mod heuristics;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod stages;
pub mod tokenizer;

pub use error::PipelineError;
pub use heuristics::{InterjectionConfig, RepairConfig, apply_repairs, is_genuine_speech};
pub use io::{HumanProtocol, load_agenda, load_protocol, load_session, normalize_date};
pub use models::{Agenda, Lineup, Paragraph, ProcessedSession, RepairedSpeech, Session};
pub use pipeline::{PeriodSummary, PipelineConfig, process_period, process_session};
pub use stages::{
    Stage1Config, Stage3Config, execute_stage1, execute_stage2, execute_stage3, flatten_agenda,
};
pub use tokenizer::{TokenizerConfig, split_sentences};
