//! CLI module for mindmap.
//!
//! This module provides the command-line interface:
//! - Argument parsing
//! - Version display
//! - Running generations with live progress on stderr
//! - Rendering the resulting tree
//!
//! # Usage
//!
//! ```ignore
//! use mindmap::cli::{parse_args, run};
//!
//! let invocation = parse_args(std::env::args());
//! run(invocation).await?;
//! ```

pub mod args;
pub mod render;
pub mod version;

pub use args::{parse_args, CliCommand, CliOptions, InputSource, Invocation, USAGE};
pub use render::render_tree;
pub use version::{version_line, VERSION};

use std::io::Write;
use std::path::Path;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use tokio::io::AsyncReadExt;
use tokio::sync::watch;

use crate::client::{GenerationRequest, MindmapClient, HEALTH_PATH};
use crate::config::ClientConfig;
use crate::models::{DocumentRequest, OutlineNode, TextRequest};
use crate::outline::parse_outline;
use crate::reducer::{Phase, ReducerState};
use crate::session::GenerationSession;

/// Execute a parsed command line.
pub async fn run(invocation: Invocation) -> Result<()> {
    let Invocation { command, options } = invocation;
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            Ok(())
        }
        CliCommand::Help => {
            print!("{}", USAGE);
            Ok(())
        }
        CliCommand::Invalid(message) => {
            eprint!("{}", USAGE);
            Err(eyre!(message))
        }
        CliCommand::Parse { input } => {
            let markdown = read_input(&input).await?;
            print_tree(&parse_outline(&markdown), options.json)
        }
        CliCommand::Health => {
            let client = MindmapClient::with_config(client_config(&options));
            let url = client.config().endpoint(HEALTH_PATH);
            if client.health_check().await? {
                println!("ok: {}", url);
                Ok(())
            } else {
                Err(eyre!("backend at {} is not healthy", url))
            }
        }
        CliCommand::Text { input } => {
            let content = read_input(&input).await?;
            if content.trim().is_empty() {
                return Err(eyre!("input text is empty"));
            }
            generate(TextRequest::new(content).into(), &options).await
        }
        CliCommand::Pdf {
            path,
            title,
            max_depth,
        } => {
            let config = client_config(&options);
            let bytes = tokio::fs::read(&path)
                .await
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            let title = title.unwrap_or_else(|| default_title(&path));
            let request = DocumentRequest::pdf(&bytes)
                .with_title(title)
                .with_max_depth(max_depth.unwrap_or(config.max_depth));
            generate(request.into(), &options).await
        }
    }
}

fn client_config(options: &CliOptions) -> ClientConfig {
    let config = ClientConfig::from_env();
    match &options.base_url {
        Some(url) => config.with_base_url(url.as_str()),
        None => config,
    }
}

/// File stem of `path`, used as the document title.
fn default_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

async fn read_input(input: &InputSource) -> Result<String> {
    match input {
        InputSource::Stdin => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .wrap_err("failed to read stdin")?;
            Ok(buffer)
        }
        InputSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("failed to read {}", path.display())),
    }
}

async fn generate(request: GenerationRequest, options: &CliOptions) -> Result<()> {
    let client = MindmapClient::with_config(client_config(options));
    tracing::info!("Requesting {}", client.config().endpoint(request.path()));

    let session = GenerationSession::start(client, request);
    let reporter = if options.quiet {
        None
    } else {
        Some(tokio::spawn(report_progress(session.subscribe())))
    };

    let result = session.wait().await;
    if let Some(reporter) = reporter {
        let _ = reporter.await;
    }

    match result {
        Ok(document) => print_tree(&parse_outline(&document), options.json),
        Err(err) => {
            tracing::debug!("Generation error: {:?}", err);
            Err(eyre!(err.user_message()))
        }
    }
}

fn print_tree(tree: &OutlineNode, json: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, tree)?;
        writeln!(stdout)?;
    } else {
        write!(stdout, "{}", render_tree(tree))?;
    }
    Ok(())
}

/// Echo a generation to stderr until its reducer goes away.
async fn report_progress(mut updates: watch::Receiver<ReducerState>) {
    let mut progress = Progress::default();
    loop {
        let output = progress.advance(&updates.borrow_and_update());
        if !output.is_empty() {
            let mut stderr = std::io::stderr().lock();
            let _ = stderr.write_all(output.as_bytes());
            let _ = stderr.flush();
        }
        if updates.changed().await.is_err() {
            break;
        }
    }
    if progress.reasoning_len > 0 {
        eprintln!();
    }
}

/// What has already been echoed for one generation.
#[derive(Debug, Default)]
struct Progress {
    reasoning_len: usize,
    notes_len: usize,
    warnings_len: usize,
    lines: usize,
}

impl Progress {
    /// Text to print for everything new in `state`.
    fn advance(&mut self, state: &ReducerState) -> String {
        let mut out = String::new();

        for note in state.notes.iter().skip(self.notes_len) {
            out.push_str(&format!("[{}] {}\n", note.at.format("%H:%M:%S"), note.message));
        }
        self.notes_len = state.notes.len();

        for warning in state.warnings.iter().skip(self.warnings_len) {
            out.push_str(&format!("warning: {}\n", warning));
        }
        self.warnings_len = state.warnings.len();

        // Reasoning is replaced wholesale on completion; only echo appends.
        if state.phase != Phase::Complete {
            if let Some(delta) = state.reasoning.get(self.reasoning_len..) {
                out.push_str(delta);
            }
        }
        self.reasoning_len = state.reasoning.len();

        let lines = state.document.lines().count();
        if lines > self.lines {
            out.push_str(&format!("... {} outline lines\n", lines));
        }
        self.lines = lines;

        out
    }
}
