use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "meter", version, about = "Meter credential administration")]
struct Cli {
    /// Path to the SQLite credential database.
    #[arg(
        long,
        global = true,
        default_value = "data/meter.sqlite",
        env = "METER_DATABASE"
    )]
    database: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// API credential management (create/list/revoke)
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Issue a new API credential and print its secret once.
    Create {
        /// Human-readable label, e.g. "Frontend API"
        #[arg(long)]
        name: String,

        /// Comma-separated grants, e.g. "read:insights,read:health"
        #[arg(long)]
        grants: String,

        /// Optional expiration, e.g. "30d", "1y", "12h"
        #[arg(long)]
        expires: Option<String>,
    },

    /// List credential metadata, newest first.
    List,

    /// Revoke a credential by id.
    Revoke { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Token { cmd } => match cmd {
            TokenCommand::Create {
                name,
                grants,
                expires,
            } => commands::token::create(&cli.database, name, grants, expires).await,
            TokenCommand::List => commands::token::list(&cli.database).await,
            TokenCommand::Revoke { id } => commands::token::revoke(&cli.database, &id).await,
        },
    }
}
