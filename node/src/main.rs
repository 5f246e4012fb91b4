#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::iterator_step_by_zero,
    clippy::invalid_regex,
    clippy::string_slice,
    clippy::unimplemented,
    clippy::todo
)]

use clap::{Parser, Subcommand};
use clap_utils::ParserExt;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Runs this party's side of its configured demonstration program to completion.
    Run {
        /// Path to the party's YAML configuration file.
        #[clap(long, env)]
        config: PathBuf,

        /// This party's index, `0 <= node_id < n`.
        #[clap(long, env)]
        node_id: usize,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse_with_version();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "node=info,mpc_core=info");
    }
    tracing_subscriber::fmt::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let Command::Run { config, node_id } = cli.command;
    let code = match node::Config::new(config) {
        Ok(config) => match node::run(&config, node_id).await {
            Ok(result) => {
                info!(%result, "program finished");
                println!("{result}");
                0
            }
            Err(error) => {
                let code = node::exit_code(&error);
                error!(%error, node_id, "program failed");
                code
            }
        },
        Err(error) => {
            error!(%error, "failed to load configuration");
            2
        }
    };
    std::process::exit(code);
}
