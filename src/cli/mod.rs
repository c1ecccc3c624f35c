pub mod client;
pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use client::ApiClient;

#[derive(Parser)]
#[command(name = "divcat")]
#[command(about = "divcat - command-line client for the dividend catalog API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "DIVCAT_URL", default_value = "http://localhost:3000", help = "Catalog server URL")]
    pub url: String,

    #[arg(long, global = true, env = "DIVCAT_TOKEN", help = "Bearer token from `auth login`")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Accounts and session tokens")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Browse and edit dividend records")]
    Dividends {
        #[command(subcommand)]
        cmd: commands::dividends::DividendCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = ApiClient::new(&cli.url, cli.token)?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(&client, cmd, output_format).await,
        Commands::Dividends { cmd } => commands::dividends::handle(&client, cmd, output_format).await,
    }
}
