use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{resolve_server_url, RosterApi, RosterClient, SERVER_URL_ENV};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Scripted administration for the activity signup service")]
struct Cli {
    /// Base url of the signup server; falls back to ROSTER_SERVER_URL, then
    /// the default local bind.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every activity with its schedule, capacity, and roster.
    List,
    /// Register an email for an activity.
    Signup { activity: String, email: String },
    /// Remove an email from an activity.
    Unregister { activity: String, email: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let env_url = std::env::var(SERVER_URL_ENV).ok();
    let server_url = resolve_server_url(cli.server_url.as_deref(), env_url.as_deref());
    tracing::debug!(%server_url, "using signup server");
    let client = RosterClient::new(&server_url)?;

    match cli.command {
        Command::List => {
            let activities = client.fetch_activities().await?;
            for activity in activities {
                println!(
                    "{} ({}) - {} spots left",
                    activity.name,
                    activity.schedule,
                    activity.spots_left()
                );
                println!("  {}", activity.description);
                if activity.participants.is_empty() {
                    println!("  no participants");
                } else {
                    for participant in &activity.participants {
                        println!("  {participant}");
                    }
                }
            }
        }
        Command::Signup { activity, email } => {
            let message = client.signup(&activity, &email).await?;
            println!("{message}");
        }
        Command::Unregister { activity, email } => {
            let message = client.unregister(&activity, &email).await?;
            println!("{message}");
        }
    }

    Ok(())
}
