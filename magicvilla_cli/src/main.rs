mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use magicvilla_lib::{Config, VillaService};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "magicvilla")]
#[command(about = "Serve and query the MagicVilla villa API")]
struct Cli {
    /// Output format: table, json, csv, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// TOML config file applied on top of the environment
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API base URL (overrides MAGICVILLA_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token (overrides MAGICVILLA_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the villa API server
    Serve(commands::serve::ServeArgs),
    /// List all villas
    List,
    /// Show a single villa
    Get(commands::villas::GetArgs),
    /// Create a villa
    Create(commands::villas::CreateArgs),
    /// Replace every field of a villa
    Update(commands::villas::UpdateArgs),
    /// Apply JSON Patch operations to a villa
    Patch(commands::villas::PatchArgs),
    /// Delete a villa
    Delete(commands::villas::GetArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("magicvilla=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config.api_url = base_url.clone();
    }
    if let Some(token) = &cli.token {
        config.token = Some(token.clone());
    }

    let command = match cli.command {
        Commands::Serve(args) => return commands::serve::run(&args, config).await,
        other => other,
    };

    let service = VillaService::with_base_url(&config.api_url)?.with_token(config.token.clone());

    match &command {
        Commands::Serve(_) => {}
        Commands::List => commands::villas::list(&service, &format).await?,
        Commands::Get(args) => commands::villas::get(args, &service, &format).await?,
        Commands::Create(args) => commands::villas::create(args, &service, &format).await?,
        Commands::Update(args) => commands::villas::update(args, &service, &format).await?,
        Commands::Patch(args) => commands::villas::patch(args, &service, &format).await?,
        Commands::Delete(args) => commands::villas::delete(args, &service, &format).await?,
    }

    Ok(())
}
