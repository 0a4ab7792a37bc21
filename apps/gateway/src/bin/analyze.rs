//! Command-line client: uploads a resume, then scores it against a job description.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gateway::client::render::render_output;
use gateway::client::{Document, HttpGateway, Session, SessionState, TerminalPrompter};

#[derive(Debug, Parser)]
#[command(name = "analyze", about = "Analyze a resume against a job description")]
struct Args {
    /// Gateway base URL
    #[arg(long, env = "GATEWAY_URL", default_value = "http://localhost:5000")]
    gateway: String,

    /// Resume document (.pdf or .docx)
    #[arg(long)]
    resume: Option<PathBuf>,

    /// File holding the job description text
    #[arg(long, conflicts_with = "jd_text")]
    jd: Option<PathBuf>,

    /// Job description text given inline
    #[arg(long)]
    jd_text: Option<String>,

    /// Proceed with extraction only when no job description is given, without asking
    #[arg(long, short = 'y')]
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let document = match &args.resume {
        Some(path) => Some(Document::from_path(path).await?),
        None => None,
    };
    let jd_text = match (&args.jd, args.jd_text) {
        (Some(path), _) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, Some(text)) => text,
        (None, None) => String::new(),
    };

    let gateway = Arc::new(HttpGateway::new(&args.gateway));
    let prompter = Arc::new(TerminalPrompter {
        assume_yes: args.yes,
    });
    let mut session = Session::new(gateway, prompter);

    let code = match session.submit(document.as_ref(), &jd_text).await? {
        SessionState::Succeeded(output) => {
            print!("{}", render_output(output));
            ExitCode::SUCCESS
        }
        SessionState::Idle => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    };
    Ok(code)
}
