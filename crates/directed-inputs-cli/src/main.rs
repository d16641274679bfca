//! Directed inputs CLI application
//!
//! Resolves inputs the same way a directed class does and prints them as
//! JSON, which makes it easy to check what a service would see.
//!
//! ```bash
//! APP_PORT=8080 directed-inputs --env-prefix APP_ --strip-prefix get port --type integer
//! echo '{"config": "{\"a\": 1}"}' | directed-inputs --stdin decode config --json
//! ```

mod args;
mod commands;
mod router;

use args::Cli;
use clap::Parser;
use directed_inputs_core::SourceLoader;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set RUST_LOG to override; --verbose raises the default to debug
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let output = router::route(cli, SourceLoader::process())?;
    println!("{}", output);
    Ok(())
}
