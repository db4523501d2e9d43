use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod chat;
pub mod query;
pub mod serve;

use crate::core::catalog_path_from_env;

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "3001")]
        port: String,

        /// Make a test request to check the API key before serving
        #[arg(long, action, default_value = "false")]
        verify_key: bool,
    },
    /// Search the newsletter catalog
    Query {
        #[arg(long)]
        term: String,
        /// Only include newsletters in this exact category
        #[arg(long)]
        category: Option<String>,
    },
    /// Start a chat session in the terminal
    Chat {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve {
            host,
            port,
            verify_key,
        }) => {
            serve::run(host, port, verify_key).await?;
        }
        Some(Command::Query { term, category }) => {
            let catalog_path = catalog_path_from_env();
            query::run(&term, category.as_deref(), &catalog_path)?;
        }
        Some(Command::Chat {}) => {
            chat::run().await?;
        }
        None => {}
    }

    Ok(())
}
