//! Mediasweep CLI: removes derived objects of deleted assets.
//!
//! Storage is selected from the environment (STORAGE_BACKEND, S3_BUCKET,
//! S3_REGION / AWS_REGION, S3_ENDPOINT, LOCAL_STORAGE_PATH). Results are printed
//! as JSON on stdout; logs go to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mediasweep_cleanup::{CleanupHandler, ManagerRegistry};
use mediasweep_cli::init_tracing;
use mediasweep_core::Config;
use serde::Serialize;
use std::io::BufRead;

#[derive(Parser)]
#[command(name = "mediasweep", about = "Clean up derived media objects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete the derived objects of one or more deleted asset keys
    Clean {
        /// Asset keys, e.g. optimized/photos/cat.jpg
        keys: Vec<String>,
        /// Also read newline-separated keys from stdin
        #[arg(long)]
        stdin: bool,
    },
    /// Show what `clean` would delete for a key, without deleting anything
    Variants {
        /// Asset key
        key: String,
    },
    /// List the registered asset managers
    Managers,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

fn read_stdin_keys() -> anyhow::Result<Vec<String>> {
    let mut keys = Vec::new();
    for line in std::io::stdin().lock().lines() {
        let line = line.context("Read key from stdin")?;
        let key = line.trim();
        if !key.is_empty() {
            keys.push(key.to_string());
        }
    }
    Ok(keys)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let registry = ManagerRegistry::with_defaults();

    if let Commands::Managers = cli.command {
        return print_json(&registry.list().await);
    }

    let config = Config::from_env().context("Invalid configuration")?;
    init_tracing(config.log_format());

    let storage = mediasweep_storage::create_storage(&config)
        .await
        .context("Failed to create storage backend")?;
    let handler = CleanupHandler::from_config(storage, registry, &config);

    match cli.command {
        Commands::Clean { mut keys, stdin } => {
            if stdin {
                keys.extend(read_stdin_keys()?);
            }
            if keys.is_empty() {
                anyhow::bail!("No keys given. Pass keys as arguments or use --stdin");
            }

            tracing::info!(keys = keys.len(), environment = %config.environment(), "Starting cleanup");
            let summary = handler.handle_batch(&keys).await;
            print_json(&summary)?;

            if !summary.is_success() {
                anyhow::bail!("{} of {} key(s) failed", summary.failed, keys.len());
            }
        }
        Commands::Variants { key } => match handler.plan(&key).await? {
            Some(plan) => print_json(&plan)?,
            None => anyhow::bail!("No asset manager handles '{}'", key),
        },
        Commands::Managers => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_clean_keys_and_stdin_flag() {
        let cli = Cli::try_parse_from(["mediasweep", "clean", "--stdin", "optimized/a.jpg"]).unwrap();
        match cli.command {
            Commands::Clean { keys, stdin } => {
                assert!(stdin);
                assert_eq!(keys, vec!["optimized/a.jpg".to_string()]);
            }
            _ => panic!("expected clean command"),
        }
    }

    #[test]
    fn variants_requires_a_key() {
        assert!(Cli::try_parse_from(["mediasweep", "variants"]).is_err());
    }
}
