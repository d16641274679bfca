//! Command routing logic for CLI

use crate::args::{Cli, Commands, decode_flags};
use crate::commands;
use directed_inputs_core::{InputContext, InputResult, SourceLoader};

/// Route a parsed command line to its handler and return the rendered output
pub fn route(cli: Cli, loader: SourceLoader) -> InputResult<String> {
    tracing::debug!(
        from_environment = !cli.no_env,
        from_stdin = cli.stdin,
        explicit = cli.inputs.len(),
        "Resolving inputs"
    );
    let mut context = InputContext::with_loader(cli.options(), loader);

    match &cli.command {
        Commands::Get {
            key,
            coerce,
            lookup,
        } => commands::get::get(&mut context, key, *coerce, lookup),
        Commands::Decode {
            key,
            base64,
            json,
            yaml,
            lookup,
        } => commands::decode::decode(
            &mut context,
            key,
            decode_flags(*base64, *json, *yaml),
            lookup,
        ),
        Commands::Dump => commands::dump::dump(&mut context),
    }
}
