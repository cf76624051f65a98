use anyhow::Result;
use clap::Args;
use magicvilla_lib::Config;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (overrides MAGICVILLA_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides MAGICVILLA_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// SQLite database file (overrides MAGICVILLA_DB)
    #[arg(long)]
    pub db: Option<std::path::PathBuf>,
}

pub async fn run(args: &ServeArgs, mut config: Config) -> Result<()> {
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(db) = &args.db {
        config.db_path = db.clone();
    }

    magicvilla_lib::serve(&config).await?;
    Ok(())
}
