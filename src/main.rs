use mindmap::cli::{self, parse_args};

use color_eyre::Result;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "mindmap=warn";

/// Send logs to stderr so stdout only carries the rendered tree.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let invocation = parse_args(std::env::args());

    let runtime = tokio::runtime::Runtime::new()?;
    if let Err(e) = runtime.block_on(cli::run(invocation)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
