//! `tcc` -- operator command line for the TCC Entity Store.
//!
//! Reads its connection settings from the environment (see
//! [`ClientConfig::from_env`]) and runs one workflow per invocation.
//! Useful for administrators and for smoke-testing a deployment.
//!
//! # Environment variables
//!
//! | Variable                   | Required | Default                 |
//! |----------------------------|----------|-------------------------|
//! | `TCC_API_URL`              | no       | `http://localhost:5257` |
//! | `TCC_FILES_URL`            | no       | value of `TCC_API_URL`  |
//! | `TCC_API_TOKEN`            | for writes | --                    |
//! | `TCC_REQUEST_TIMEOUT_SECS` | no       | client default          |

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tcc_client::{ApiClient, ClientConfig, ProfileLookup, Session};
use tcc_core::auth::TokenAuthContext;
use tcc_core::board::BoardRequest;
use tcc_core::forms::LoginForm;
use tcc_core::schedule::validate_schedule;
use tcc_core::types::{timestamp, Timestamp};
use tcc_core::work_status::WorkStatus;

#[derive(Parser)]
#[command(name = "tcc")]
#[command(about = "TCC workflow administration", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print a bearer token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Show the profile of the token's account
    Profile,

    /// Works and their status
    Work {
        #[command(subcommand)]
        command: WorkCommands,
    },

    /// Edicts and their schedules
    Edict {
        #[command(subcommand)]
        command: EdictCommands,
    },

    /// Request a defense board for a work
    Board {
        #[arg(value_name = "WORK_ID")]
        work_id: String,
        /// Board date (RFC 3339 or YYYY-MM-DD); must be in the future
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
        #[arg(long)]
        place: String,
        /// URI of the uploaded final work
        #[arg(long)]
        file: String,
        #[arg(long)]
        member1: String,
        #[arg(long)]
        member2: String,
    },

    /// Upload a file and print its URI
    Upload {
        #[arg(value_name = "PATH")]
        path: PathBuf,
        #[arg(long)]
        content_type: Option<String>,
    },
}

#[derive(Subcommand)]
enum WorkCommands {
    List,
    Show {
        id: String,
    },
    /// Status actions offered to the token's account
    Actions {
        id: String,
    },
    /// Submit a status action by numeric code
    Status {
        id: String,
        code: i16,
    },
    /// Export the work report to a file
    Report {
        id: String,
        #[arg(long, short)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum EdictCommands {
    /// Print an edict with its schedule in display order
    Show { id: String },
    /// Check that the edict's schedule is complete
    Check { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tcc_client=info,tcc_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    tracing::debug!(api_url = %config.api_url, files_url = %config.files_url, "Loaded configuration");
    let api = ApiClient::new(&config)?;

    let result = run(cli.command, api, config.token).await;
    if let Err(e) = &result {
        if let Some(client_error) = e.downcast_ref::<tcc_client::ClientError>() {
            eprintln!("{}", client_error.user_message());
        }
    }
    result
}

async fn run(command: Commands, api: ApiClient, token: Option<String>) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => {
            let response = api.auth().login(&LoginForm { email, password }).await?;
            println!("{}", response.token);
        }
        Commands::Profile => {
            let session = session(api, token)?;
            match session.current_profile().await? {
                ProfileLookup::Found(info) => print_json(&info)?,
                ProfileLookup::Incomplete { auth_id, role } => {
                    let role = role.map(|r| r.to_string()).unwrap_or_else(|| "unknown".into());
                    println!("Profile for account {auth_id} ({role}) has not been completed");
                }
                ProfileLookup::NotRequired => println!("Admin accounts have no profile"),
            }
        }
        Commands::Work { command } => run_work(command, api, token).await?,
        Commands::Edict { command } => run_edict(command, api).await?,
        Commands::Board {
            work_id,
            date,
            time,
            place,
            file,
            member1,
            member2,
        } => {
            let session = session(api, token)?;
            let request = BoardRequest {
                date: parse_date(&date)?,
                time,
                place,
                file_path: file,
                member1,
                member2,
            };
            let work = session.request_board(&work_id, request).await?;
            print_json(&work.board)?;
        }
        Commands::Upload { path, content_type } => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .context("upload path has no file name")?;
            let uploaded = api
                .files()
                .upload(file_name, content_type.as_deref(), bytes)
                .await?;
            println!("{}", uploaded.uri);
        }
    }
    Ok(())
}

async fn run_work(command: WorkCommands, api: ApiClient, token: Option<String>) -> anyhow::Result<()> {
    match command {
        WorkCommands::List => {
            for work in api.works().list().await? {
                println!(
                    "{}\t{}\t{}",
                    work.id.as_deref().unwrap_or("-"),
                    work.status,
                    work.title
                );
            }
        }
        WorkCommands::Show { id } => print_json(&api.works().fetch(&id).await?)?,
        WorkCommands::Actions { id } => {
            let session = session(api, token)?;
            let actions = session.status_actions(&id).await?;
            println!("Status: {} ({})", actions.work.status, actions.work.status.id());
            if actions.offered.is_empty() {
                println!("No actions available");
            }
            for status in actions.offered {
                println!("  {}\t{}", status.id(), status);
            }
        }
        WorkCommands::Status { id, code } => {
            let to = WorkStatus::try_from(code)?;
            let session = session(api, token)?;
            let change = session.change_work_status(&id, to).await?;
            println!("Status: {} ({})", change.work.status, change.work.status.id());
        }
        WorkCommands::Report { id, out } => {
            let bytes = api.works().fetch_report(&id).await?;
            tokio::fs::write(&out, bytes)
                .await
                .with_context(|| format!("writing {}", out.display()))?;
            println!("Report written to {}", out.display());
        }
    }
    Ok(())
}

async fn run_edict(command: EdictCommands, api: ApiClient) -> anyhow::Result<()> {
    match command {
        EdictCommands::Show { id } => {
            let edict = api.edicts().fetch(&id).await?;
            println!("{} ({} .. {})", edict.name, edict.start_date, edict.end_date);
            for phase in &edict.schedule {
                println!(
                    "  {:<18} {} .. {}",
                    phase.name.title(),
                    fmt_date(phase.start_date),
                    fmt_date(phase.end_date)
                );
            }
        }
        EdictCommands::Check { id } => {
            let edict = api.edicts().fetch(&id).await?;
            match validate_schedule(&edict.schedule) {
                Ok(()) => println!("Schedule complete"),
                Err(e) => bail!("{}: {e}", e.phase().title()),
            }
        }
    }
    Ok(())
}

fn session(api: ApiClient, token: Option<String>) -> anyhow::Result<Session<TokenAuthContext>> {
    let Some(token) = token else {
        bail!("TCC_API_TOKEN is required for this command");
    };
    Ok(Session::new(api, TokenAuthContext::from_token(token)?))
}

fn parse_date(raw: &str) -> anyhow::Result<Timestamp> {
    timestamp::parse(raw).with_context(|| format!("invalid date {raw:?}"))
}

fn fmt_date(date: Option<Timestamp>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unset".into())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
