//! Command-line driver: parses one interface document and prints an
//! overview of the resulting model.
//!
//! Run with: `cargo run -p rpcidl -- interfaces.xml`

use anyhow::Context;
use clap::Parser as ClapParser;
use rpcidl::summary;
use rpcidl_schema::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Parse an RPC interface definition document.
#[derive(Debug, ClapParser)]
#[command(name = "rpcidl", version, about)]
struct Args {
    /// Interface document to parse.
    path: PathBuf,

    /// Reject unknown attributes instead of ignoring them.
    #[arg(long)]
    strict: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let model = Parser::new()
        .strict_attributes(args.strict)
        .parse_file(&args.path)
        .with_context(|| format!("failed to parse {}", args.path.display()))?;

    print!("{}", summary::render(&model));
    Ok(())
}
