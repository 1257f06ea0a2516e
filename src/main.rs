use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use plenary::io::check_protocol;
use plenary::models::LineupToken;
use plenary::{
    Agenda, HumanProtocol, InterjectionConfig, PipelineConfig, PipelineError, Session,
    Stage1Config, execute_stage1, flatten_agenda, load_agenda, load_session, process_period,
    process_session,
};

#[derive(Parser)]
#[command(name = "plenary")]
#[command(author, version, about = "Speech extraction from plenary session protocols", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the speeches of one session protocol
    Process {
        /// Input session protocol (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Agenda file (JSON), overrides the agenda embedded in the protocol
        #[arg(short, long)]
        agenda: Option<PathBuf>,

        /// Output file for the processed session (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for human-readable speeches (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Expected electoral period of the protocol
        #[arg(long, requires = "index")]
        period: Option<u32>,

        /// Expected session index of the protocol
        #[arg(long, requires = "period")]
        index: Option<u32>,

        /// Address score a returning speaker's paragraph must exceed
        #[arg(long, default_value = "1")]
        min_address_score: i32,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Extract the speeches of every protocol of an electoral period
    ProcessPeriod {
        /// Directory containing protocol-<period>-<index>.json files
        #[arg(long)]
        protocol_dir: PathBuf,

        /// Directory for processed sessions
        #[arg(long)]
        output_dir: PathBuf,

        /// Electoral period
        #[arg(long)]
        period: u32,

        /// Address score a returning speaker's paragraph must exceed
        #[arg(long, default_value = "1")]
        min_address_score: i32,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze a protocol's agenda and attribution without writing output
    Analyze {
        /// Input session protocol (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Agenda file (JSON), overrides the agenda embedded in the protocol
        #[arg(short, long)]
        agenda: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            agenda,
            output,
            human_readable,
            period,
            index,
            min_address_score,
            verbose,
        } => {
            setup_logging(verbose);
            let expected = period.zip(index);
            process_protocol(
                input,
                agenda,
                output,
                human_readable,
                expected,
                pipeline_config(min_address_score),
            )
        }
        Commands::ProcessPeriod {
            protocol_dir,
            output_dir,
            period,
            min_address_score,
            verbose,
        } => {
            setup_logging(verbose);
            let config = pipeline_config(min_address_score);
            let summary = process_period(&protocol_dir, &output_dir, period, &config).await?;

            info!(
                "Period {}: {} protocols written, {} speeches, {} failed",
                period,
                summary.written.len(),
                summary.speeches,
                summary.failed.len()
            );
            if !summary.failed.is_empty() {
                bail!(
                    "{} protocols of period {} failed: {:?}",
                    summary.failed.len(),
                    period,
                    summary.failed
                );
            }
            Ok(())
        }
        Commands::Analyze {
            input,
            agenda,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_protocol(input, agenda)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn pipeline_config(min_address_score: i32) -> PipelineConfig {
    PipelineConfig {
        attribution: Stage1Config {
            interjection: InterjectionConfig {
                min_score: min_address_score,
                ..Default::default()
            },
        },
        ..Default::default()
    }
}

fn load_inputs(input: &Path, agenda: Option<PathBuf>) -> Result<(Session, Option<Agenda>)> {
    info!("Loading protocol from {:?}", input);
    let session = load_session(input).context("Failed to load input protocol")?;

    let agenda = match agenda {
        Some(path) => {
            info!("Loading agenda from {:?}", path);
            Some(load_agenda(&path).context("Failed to load agenda")?)
        }
        None => None,
    };

    Ok((session, agenda))
}

fn process_protocol(
    input: PathBuf,
    agenda: Option<PathBuf>,
    output: PathBuf,
    human_readable: Option<PathBuf>,
    expected: Option<(u32, u32)>,
    config: PipelineConfig,
) -> Result<()> {
    let (session, agenda) = load_inputs(&input, agenda)?;

    if let Some((period, index)) = expected {
        check_protocol(&session, period, index)?;
    }

    let processed = process_session(&session, agenda.as_ref(), &config)?;

    info!("Writing processed session to {:?}", output);
    processed.write_json(&output)?;

    if let Some(path) = human_readable {
        info!("Writing human-readable speeches to {:?}", path);
        HumanProtocol::new(&processed).write_file(&path)?;
    }

    let metadata = &processed.metadata;
    info!(
        "Complete: {} speeches, {} sentences ({} merged, {} split), {} of {} paragraphs skipped",
        metadata.speeches,
        metadata.sentences,
        metadata.sentences_merged,
        metadata.sentences_split,
        metadata.paragraphs_skipped,
        metadata.paragraphs
    );

    Ok(())
}

fn analyze_protocol(input: PathBuf, agenda: Option<PathBuf>) -> Result<()> {
    let (session, agenda) = load_inputs(&input, agenda)?;
    let agenda = agenda
        .as_ref()
        .or(session.agenda.as_ref())
        .ok_or_else(|| PipelineError::MissingAgenda {
            protocol_no: session.protocol_no(),
        })?;

    println!("Protocol Analysis");
    println!("=================");
    println!("Protocol: {}", session.protocol_no());
    println!("Date: {}", session.date);
    println!("Paragraphs: {}", session.content.len());
    println!(
        "Chair paragraphs: {}",
        session.content.iter().filter(|p| p.speaker_is_chair).count()
    );
    println!(
        "Annotations: {}",
        session.content.iter().filter(|p| p.is_annotation()).count()
    );
    println!();

    let lineup = flatten_agenda(agenda);

    println!("Lineup");
    println!("------");
    for token in &lineup.tokens {
        match token {
            LineupToken::Topic(label) => println!("{}", label),
            LineupToken::Speaker(name) => println!("    {}", name),
        }
    }
    println!(
        "{} topics, {} announced speakers",
        lineup.topic_count(),
        lineup.speaker_count()
    );
    println!();

    let result = execute_stage1(&lineup, &session.content, &Stage1Config::default());

    println!("Attribution");
    println!("-----------");
    let mut topic: Option<&str> = None;
    for segment in &result.segments {
        if topic != Some(segment.topic.as_str()) {
            println!("{}", segment.topic);
            topic = Some(segment.topic.as_str());
        }
        println!(
            "    {}: {} paragraphs ({}..{})",
            segment.speaker,
            segment.paragraph_count(),
            segment.flow_indices.first().copied().unwrap_or_default(),
            segment.flow_indices.last().copied().unwrap_or_default()
        );
    }
    println!();
    println!("Speeches: {}", result.segments.len());
    println!("Paragraphs skipped: {}", result.paragraphs_skipped);
    println!("Session close observed: {}", result.session_closed);

    Ok(())
}
