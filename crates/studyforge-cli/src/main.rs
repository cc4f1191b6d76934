//! studyforge — ask questions, generate quizzes, documents, and practice
//! papers from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use studyforge_core::{
    AnswerMode, AnswerRequest, DocumentKind, DocumentRequest, PaperRequest, QuizRequest,
};
use studyforge_gen::{credential_sources_from_env, GenConfig, StudyService};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "studyforge", about = "studyforge — study-aid content generation")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "studyforge.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a free-form question
    Ask {
        /// Subject, e.g. "Physics"
        #[arg(short, long)]
        subject: String,
        /// Level or grade, e.g. "Class 10"
        #[arg(short, long)]
        level: String,
        /// Answer style
        #[arg(short, long, value_enum, default_value_t = Mode::Detailed)]
        mode: Mode,
        /// Optional topic to anchor the answer to
        #[arg(short, long)]
        topic: Option<String>,
        /// The question itself
        question: String,
    },
    /// Generate a multiple-choice quiz
    Quiz {
        #[arg(short, long)]
        subject: String,
        #[arg(short, long)]
        level: String,
        #[arg(short, long)]
        topic: Option<String>,
        /// Number of questions
        #[arg(short = 'n', long, default_value_t = 5)]
        count: u32,
    },
    /// Generate document or project content
    Document {
        #[arg(short, long)]
        subject: String,
        #[arg(short, long)]
        level: String,
        /// Document shape
        #[arg(short, long, value_enum, default_value_t = Kind::Report)]
        kind: Kind,
        /// What the document should be about
        topic: String,
    },
    /// Generate a practice exam paper
    Paper {
        #[arg(short, long)]
        subject: String,
        #[arg(short, long)]
        level: String,
        #[arg(short, long)]
        topic: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Detailed,
    Succinct,
    OneLine,
}

impl From<Mode> for AnswerMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Detailed => AnswerMode::Detailed,
            Mode::Succinct => AnswerMode::Succinct,
            Mode::OneLine => AnswerMode::OneLine,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Report,
    Essay,
    ProjectOutline,
}

impl From<Kind> for DocumentKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Report => DocumentKind::Report,
            Kind::Essay => DocumentKind::Essay,
            Kind::ProjectOutline => DocumentKind::ProjectOutline,
        }
    }
}

/// Loads the config file, falling back to defaults when it is absent.
async fn load_config(path: &Path) -> anyhow::Result<GenConfig> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Ok(toml::from_str(&raw)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(GenConfig::default()),
        Err(e) => Err(anyhow::anyhow!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        )),
    }
}

fn print_outcome(outcome: Result<String, String>) {
    match outcome {
        Ok(text) => println!("{text}"),
        Err(message) => println!("{message}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = load_config(&cli.config).await?;
    let sources = credential_sources_from_env();
    let service = StudyService::from_config(&config, &sources)?;

    match cli.command {
        Commands::Ask {
            subject,
            level,
            mode,
            topic,
            question,
        } => {
            let request = AnswerRequest {
                subject,
                level,
                mode: mode.into(),
                topic,
                question,
            };
            print_outcome(service.answer(&request).await);
        }
        Commands::Quiz {
            subject,
            level,
            topic,
            count,
        } => {
            let request = QuizRequest {
                subject,
                level,
                topic,
                count,
            };
            match service.quiz(&request).await {
                Ok(questions) if questions.is_empty() => {
                    println!("No quiz questions could be generated. Please try again.");
                }
                Ok(questions) => {
                    info!(count = questions.len(), "quiz generated");
                    for (i, q) in questions.iter().enumerate() {
                        println!("{}. {}", i + 1, q.question);
                        for (j, option) in q.options.iter().enumerate() {
                            let letter = (b'a' + j as u8) as char;
                            println!("   {letter}) {option}");
                        }
                        println!("   Answer: {}", q.correct_answer);
                        if !q.explanation.is_empty() {
                            println!("   Why: {}", q.explanation);
                        }
                        println!();
                    }
                }
                Err(message) => println!("{message}"),
            }
        }
        Commands::Document {
            subject,
            level,
            kind,
            topic,
        } => {
            let request = DocumentRequest {
                subject,
                level,
                kind: kind.into(),
                topic,
            };
            print_outcome(service.document(&request).await);
        }
        Commands::Paper {
            subject,
            level,
            topic,
        } => {
            let request = PaperRequest {
                subject,
                level,
                topic,
            };
            print_outcome(service.paper(&request).await);
        }
    }

    Ok(())
}
