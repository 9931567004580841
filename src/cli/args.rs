//! Command-line argument parsing for the mindmap CLI.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use std::path::PathBuf;

/// Where to read input text from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(arg))
        }
    }
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Generate a mindmap from text
    Text { input: InputSource },
    /// Generate a mindmap from a PDF file
    Pdf {
        path: PathBuf,
        title: Option<String>,
        max_depth: Option<u8>,
    },
    /// Parse a markdown outline locally, without the backend
    Parse { input: InputSource },
    /// Check that the backend is up
    Health,
    /// Arguments could not be understood
    Invalid(String),
}

/// Flags that apply to every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// `--url <URL>` overrides the backend base URL
    pub base_url: Option<String>,
    /// `--json` prints the tree as JSON instead of an indented tree
    pub json: bool,
    /// `--quiet` suppresses live progress on stderr
    pub quiet: bool,
}

/// A full command line: the command plus its global options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: CliCommand,
    pub options: CliOptions,
}

/// Parse command-line arguments and return the command to run.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use mindmap::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["mindmap".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).command, CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> Invocation
where
    I: Iterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut positional: Vec<String> = Vec::new();
    let mut title = None;
    let mut max_depth = None;

    // Skip the program name
    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return invocation(CliCommand::Version, options),
            "--help" | "-h" => return invocation(CliCommand::Help, options),
            "--json" => options.json = true,
            "--quiet" | "-q" => options.quiet = true,
            "--url" => match args.next() {
                Some(url) => options.base_url = Some(url),
                None => return invalid("--url requires a value", options),
            },
            "--title" => match args.next() {
                Some(t) => title = Some(t),
                None => return invalid("--title requires a value", options),
            },
            "--max-depth" => match args.next().map(|d| d.parse::<u8>()) {
                Some(Ok(depth)) if (1..=5).contains(&depth) => max_depth = Some(depth),
                _ => return invalid("--max-depth requires a number from 1 to 5", options),
            },
            flag if flag.starts_with("--") => {
                return invalid(&format!("unknown option: {}", flag), options)
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let command = match (positional.next().as_deref(), positional.next()) {
        (None, _) => CliCommand::Help,
        (Some("health"), None) => CliCommand::Health,
        (Some("health"), Some(_)) => return invalid("too many arguments", options),
        (Some("text"), input) => CliCommand::Text {
            input: input.map_or(InputSource::Stdin, |i| InputSource::from_arg(&i)),
        },
        (Some("parse"), input) => CliCommand::Parse {
            input: input.map_or(InputSource::Stdin, |i| InputSource::from_arg(&i)),
        },
        (Some("pdf"), Some(path)) => CliCommand::Pdf {
            path: PathBuf::from(path),
            title,
            max_depth,
        },
        (Some("pdf"), None) => return invalid("pdf requires a file path", options),
        (Some(other), _) => return invalid(&format!("unknown command: {}", other), options),
    };

    if positional.next().is_some() {
        return invalid("too many arguments", options);
    }
    invocation(command, options)
}

fn invocation(command: CliCommand, options: CliOptions) -> Invocation {
    Invocation { command, options }
}

fn invalid(message: &str, options: CliOptions) -> Invocation {
    invocation(CliCommand::Invalid(message.to_string()), options)
}

/// Usage text for `--help`.
pub const USAGE: &str = "\
Usage: mindmap [OPTIONS] <COMMAND>

Commands:
  text [FILE|-]   Generate a mindmap from text (stdin by default)
  pdf <FILE>      Generate a mindmap from a PDF
  parse [FILE|-]  Convert a markdown outline to a tree locally
  health          Check that the backend is reachable

Options:
  --url <URL>         Backend base URL (env: MINDMAP_API_URL)
  --title <TITLE>     Title sent with a PDF (default: file name)
  --max-depth <1-5>   Outline depth for PDFs (default: 3)
  --json              Print the tree as JSON
  -q, --quiet         No live progress on stderr
  -h, --help          Show this help
  -V, --version       Show the version
";
