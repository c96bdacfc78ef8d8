use std::sync::Arc;

use clap::Parser;
use sentinel::{
    config::AppConfig,
    http_server,
    notification::{AlertDispatcher, DiscordWebhookDispatcher},
    persistence::{SqliteRuleRepository, traits::RuleRepository},
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing app.yaml
    #[arg(long)]
    config_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    tracing::debug!("Loading application configuration...");
    let config = Arc::new(AppConfig::new(cli.config_dir.as_deref())?);
    tracing::debug!(database_url = %config.database_url, listen_address = %config.server.listen_address, "Configuration loaded.");

    if config.alchemy_signing_secret.is_none() {
        tracing::warn!("No Alchemy signing secret configured; Alchemy webhooks will be rejected.");
    }

    tracing::debug!("Initializing rule repository...");
    let repo = Arc::new(SqliteRuleRepository::new(&config.database_url).await?);
    repo.run_migrations().await?;
    tracing::info!("Database migrations completed.");

    let dispatcher = Arc::new(DiscordWebhookDispatcher::new(&config.dispatch)?);

    http_server::run_server_from_config(
        config,
        repo as Arc<dyn RuleRepository>,
        dispatcher as Arc<dyn AlertDispatcher>,
    )
    .await;

    Ok(())
}
