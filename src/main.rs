mod cli;
mod commands;
mod output;

use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::Level;

use cli::{Cli, Commands};
use commands::Store;
use projects_client::cache::Cache;
use projects_client::error::{ProjectsError, Result};
use projects_client::{ApiClient, Config, FileTokenStore, Session, TokenStore};
use std::error::Error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");

        // Show error chain if verbose flag was passed
        if std::env::args().any(|arg| arg == "--verbose" || arg == "-v") {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = std::error::Error::source(cause);
            }
        }

        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(io::stderr)
        .init();

    output::set_json_output(cli.json);

    match cli.command {
        // Commands that don't require config/client
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "projects", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        Commands::Login { token } => {
            commands::session::login(&FileTokenStore::open()?, &token)?;
        }
        Commands::Logout => {
            let mut cache = Cache::load();
            commands::session::logout(&FileTokenStore::open()?, &mut cache)?;
        }
        Commands::Validate { field, value } => {
            commands::projects::validate(field, &value)?;
        }
        Commands::Use(args) if args.clear => {
            commands::projects::clear_current(&mut Cache::load());
        }
        // Commands that require config and client
        command => {
            let config = Config::load()?;
            let store = build_store(&config)?;
            let mut cache = Cache::load();

            match command {
                Commands::List => {
                    commands::projects::list(&store, &cache).await?;
                }
                Commands::Create(args) => {
                    commands::projects::create(&store, &cache, args).await?;
                }
                Commands::Use(args) => {
                    commands::projects::use_project(&store, &mut cache, args).await?;
                }
                Commands::Completions { .. }
                | Commands::Init
                | Commands::Login { .. }
                | Commands::Logout
                | Commands::Validate { .. } => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}

fn build_store(config: &Config) -> Result<Store> {
    let tokens = FileTokenStore::open()?;
    if tokens.token().is_none() {
        return Err(ProjectsError::MissingToken);
    }

    let api = ApiClient::new(&config.api_url())?;
    tracing::debug!(url = %api.projects_url(), "using projects endpoint");

    Ok(Store::new(api, tokens, Session::new(true)))
}
