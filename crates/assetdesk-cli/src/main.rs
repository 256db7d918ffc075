use assetdesk_audit::AuditEventType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod commands;
mod server;

#[derive(Parser, Debug)]
#[command(name = "assetdesk", version, about = "AssetDesk natural-language query service")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the schema description handed to the language model.
    Describe {
        /// Path to assetdesk.yaml. Defaults to the built-in asset inventory schema.
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Run a SQL statement through the query guard and print the verdict.
    Check {
        /// Candidate SQL
        sql: String,

        /// Also require the statement to parse as a single query over allowed tables
        #[arg(long, default_value_t = false)]
        strict: bool,

        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Show recorded audit events, newest first.
    Audit {
        /// Show one event in full.
        #[arg(long)]
        id: Option<Uuid>,

        #[arg(long)]
        user: Option<String>,

        /// Event type, e.g. query_rejected
        #[arg(long = "type")]
        event_type: Option<AuditEventType>,

        #[arg(long)]
        correlation_id: Option<String>,

        #[arg(long, default_value_t = 20)]
        limit: usize,

        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Start the chat HTTP server.
    Serve {
        #[arg(long, short = 'c', env = "ASSETDESK_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Describe { config } => commands::describe::run(config.as_deref())?,
        Command::Check {
            sql,
            strict,
            config,
        } => commands::check::run(&sql, strict, config.as_deref())?,
        Command::Audit {
            id,
            user,
            event_type,
            correlation_id,
            limit,
            config,
        } => {
            let query = commands::audit::AuditQuery {
                id,
                user,
                event_type,
                correlation_id,
                limit,
            };
            commands::audit::run(query, config.as_deref()).await?
        }
        Command::Serve { config } => commands::serve::run(config.as_deref()).await?,
    }

    Ok(())
}
