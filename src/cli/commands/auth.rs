use clap::Subcommand;
use serde_json::Value;

use crate::cli::client::ApiClient;
use crate::cli::output::{output_success, print_json};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create an account and print its session token")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Password")]
        password: String,
    },

    #[command(about = "Log in and print a session token")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Password")]
        password: String,
    },

    #[command(about = "Show the account behind --token")]
    Whoami,
}

pub async fn handle(client: &ApiClient, cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Register { username, password } => {
            let session = client.register(&username, &password).await?;
            print_session(&output_format, "Registered", &session)
        }
        AuthCommands::Login { username, password } => {
            let session = client.login(&username, &password).await?;
            print_session(&output_format, "Logged in", &session)
        }
        AuthCommands::Whoami => {
            let user = client.whoami().await?;
            match output_format {
                OutputFormat::Json => print_json(&user),
                OutputFormat::Text => {
                    println!("{}", describe_user(&user));
                    Ok(())
                }
            }
        }
    }
}

/// Text mode prints the token alone on the last line so it can be captured
fn print_session(output_format: &OutputFormat, verb: &str, session: &Value) -> anyhow::Result<()> {
    output_success(output_format, &format!("{} as {}", verb, describe_user(&session["user"])), session)?;
    if let OutputFormat::Text = output_format {
        println!("{}", session["token"].as_str().unwrap_or_default());
    }
    Ok(())
}

fn describe_user(user: &Value) -> String {
    let username = user["username"].as_str().unwrap_or("?");
    let role = if user["isAdmin"].as_bool().unwrap_or(false) { "admin" } else { "user" };
    format!("{} (id {}, {})", username, user["id"], role)
}
