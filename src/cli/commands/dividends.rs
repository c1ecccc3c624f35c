use std::io::Read;

use anyhow::Context;
use clap::Subcommand;
use serde_json::Value;

use crate::cli::client::ApiClient;
use crate::cli::output::{dividend_detail, dividend_table, filter_by_sector, output_success, print_json};
use crate::cli::OutputFormat;
use crate::storage::DividendRecord;

#[derive(Subcommand)]
pub enum DividendCommands {
    #[command(about = "List all dividend records")]
    List {
        #[arg(long, help = "Only show records in this sector (case-insensitive)")]
        sector: Option<String>,
    },

    #[command(about = "Show one record with its full history")]
    Get {
        #[arg(help = "Record id")]
        id: u32,
    },

    #[command(about = "Create a record from a JSON object on stdin (admin)")]
    Create,

    #[command(about = "Patch a record with a JSON object on stdin (admin)")]
    Update {
        #[arg(help = "Record id")]
        id: u32,
    },

    #[command(about = "Add or replace one year of history (admin)")]
    AddYear {
        #[arg(help = "Record id")]
        id: u32,
        #[arg(help = "Year, 1800 or later")]
        year: i32,
        #[arg(help = "Amount, e.g. 12.50")]
        amount: String,
    },

    #[command(about = "Delete a record (admin)")]
    Delete {
        #[arg(help = "Record id")]
        id: u32,
    },
}

pub async fn handle(client: &ApiClient, cmd: DividendCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DividendCommands::List { sector } => {
            let records = filter_by_sector(client.list_dividends().await?, sector.as_deref());
            match output_format {
                OutputFormat::Json => print_json(&records),
                OutputFormat::Text if records.is_empty() => {
                    println!("No dividend records found");
                    Ok(())
                }
                OutputFormat::Text => {
                    println!("{}", dividend_table(&records));
                    Ok(())
                }
            }
        }
        DividendCommands::Get { id } => {
            let record = client.get_dividend(id).await?;
            print_record(&output_format, &record)
        }
        DividendCommands::Create => {
            let body = read_stdin_json()?;
            let record = client.create_dividend(&body).await?;
            output_success(&output_format, &format!("Created {} with id {}", record.ticker, record.id), &record)
        }
        DividendCommands::Update { id } => {
            let body = read_stdin_json()?;
            let record = client.update_dividend(id, &body).await?;
            print_record(&output_format, &record)
        }
        DividendCommands::AddYear { id, year, amount } => {
            let record = client.add_year(id, year, &amount).await?;
            print_record(&output_format, &record)
        }
        DividendCommands::Delete { id } => {
            client.delete_dividend(id).await?;
            output_success(&output_format, &format!("Deleted dividend {}", id), &serde_json::json!({ "deleted": id }))
        }
    }
}

fn print_record(output_format: &OutputFormat, record: &DividendRecord) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Text => {
            println!("{}", dividend_detail(record));
            Ok(())
        }
    }
}

fn read_stdin_json() -> anyhow::Result<Value> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    parse_body(&input)
}

fn parse_body(input: &str) -> anyhow::Result<Value> {
    let body: Value = serde_json::from_str(input).context("Expected a JSON object on stdin")?;
    anyhow::ensure!(body.is_object(), "Expected a JSON object on stdin");
    Ok(body)
}
