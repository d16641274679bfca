//! CLI argument definitions using clap
//!
//! - directed-inputs get KEY            # Resolve one input
//! - directed-inputs decode KEY --json  # Resolve and decode one input
//! - directed-inputs dump               # Print every merged input

use clap::{Args, Parser, Subcommand};
use directed_inputs_core::{CoerceType, DecodeFlags, InputMap, InputOptions};

#[derive(Parser, Debug)]
#[command(name = "directed-inputs")]
#[command(about = "Resolve inputs from explicit values, the environment and stdin")]
#[command(version)]
pub struct Cli {
    /// Do not read inputs from the environment
    #[arg(long, global = true)]
    pub no_env: bool,

    /// Read a JSON object of inputs from stdin
    #[arg(long, global = true)]
    pub stdin: bool,

    /// Only use environment variables starting with this prefix
    #[arg(long, global = true)]
    pub env_prefix: Option<String>,

    /// Remove the environment prefix from input keys
    #[arg(long, global = true, requires = "env_prefix")]
    pub strip_prefix: bool,

    /// Explicit input, lowest precedence (repeatable)
    #[arg(
        short = 'i',
        long = "input",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value,
        global = true
    )]
    pub inputs: Vec<(String, String)>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one input and print it as JSON
    Get {
        key: String,

        /// Coerce the value to this type
        #[arg(long = "type", value_name = "TYPE")]
        coerce: Option<CoerceType>,

        #[command(flatten)]
        lookup: LookupArgs,
    },

    /// Resolve one input, run the decode pipeline and print the result as JSON
    Decode {
        key: String,

        /// Decode base64 first
        #[arg(long)]
        base64: bool,

        /// Parse as JSON
        #[arg(long)]
        json: bool,

        /// Parse as YAML
        #[arg(long)]
        yaml: bool,

        #[command(flatten)]
        lookup: LookupArgs,
    },

    /// Print every merged input as JSON
    Dump,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LookupArgs {
    /// Value used when the input is absent or blank
    #[arg(long)]
    pub default: Option<String>,

    /// Fail when the input resolves to nothing
    #[arg(long)]
    pub required: bool,
}

impl Cli {
    pub fn options(&self) -> InputOptions {
        let mut options = InputOptions::new()
            .with_inputs(self.inputs.iter().cloned().collect::<InputMap>())
            .from_environment(!self.no_env)
            .from_stdin(self.stdin)
            .strip_env_prefix(self.strip_prefix);
        if let Some(prefix) = &self.env_prefix {
            options = options.env_prefix(prefix.clone());
        }
        options
    }
}

pub fn decode_flags(base64: bool, json: bool, yaml: bool) -> DecodeFlags {
    DecodeFlags { base64, json, yaml }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get_with_globals() {
        let cli = Cli::try_parse_from([
            "directed-inputs",
            "--env-prefix",
            "APP_",
            "--strip-prefix",
            "-i",
            "domain=example.com",
            "get",
            "port",
            "--type",
            "int",
            "--default",
            "80",
        ])
        .unwrap();

        let options = cli.options();
        assert_eq!(options.env_prefix.as_deref(), Some("APP_"));
        assert!(options.strip_env_prefix);
        assert!(options.from_environment);
        assert!(options.inputs.contains_key("domain"));

        match cli.command {
            Commands::Get { key, coerce, lookup } => {
                assert_eq!(key, "port");
                assert_eq!(coerce, Some(CoerceType::Integer));
                assert_eq!(lookup.default.as_deref(), Some("80"));
                assert!(!lookup.required);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_decode_flags() {
        let cli = Cli::try_parse_from([
            "directed-inputs",
            "--no-env",
            "decode",
            "config",
            "--base64",
            "--yaml",
            "--required",
        ])
        .unwrap();
        assert!(!cli.options().from_environment);
        match cli.command {
            Commands::Decode { base64, json, yaml, lookup, .. } => {
                assert_eq!(decode_flags(base64, json, yaml), DecodeFlags::new().base64().yaml());
                assert!(lookup.required);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_input_pairs_and_types() {
        assert!(Cli::try_parse_from(["directed-inputs", "-i", "novalue", "dump"]).is_err());
        assert!(Cli::try_parse_from(["directed-inputs", "get", "k", "--type", "decimal"]).is_err());
        assert!(Cli::try_parse_from(["directed-inputs", "--strip-prefix", "dump"]).is_err());
    }

    #[test]
    fn test_input_value_may_contain_equals() {
        assert_eq!(
            parse_key_value("token=a=b").unwrap(),
            ("token".to_string(), "a=b".to_string())
        );
    }
}
