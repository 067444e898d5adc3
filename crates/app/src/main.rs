use std::sync::Arc;

use clap::Parser;
use engine::{Mailer, Notifier};
use gateways::{HttpMailer, HttpPushNotifier};
use migration::{Migrator, MigratorTrait};
use settings::Database;
use thiserror::Error;

mod settings;

#[derive(Debug, Parser)]
#[command(version, about = "Family finance backend")]
struct Cli {
    /// Settings file, without extension.
    #[arg(short, long, env = "FAMILY_LEDGER_CONFIG", default_value = "settings")]
    config: String,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("engine error: {0}")]
    Engine(#[from] engine::EngineError),
    #[error("gateway error: {0}")]
    Gateway(#[from] engine::GatewayError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "family_ledger={level},server={level},engine={level},gateways={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;

    let mut builder = engine::Engine::builder().database(db);
    if let Some(push) = &settings.push {
        tracing::info!("Found push settings...");
        let notifier: Arc<dyn Notifier> = Arc::new(HttpPushNotifier::new(push)?);
        builder = builder.notifier(notifier);
    }
    if let Some(mail) = &settings.mail {
        tracing::info!("Found mail settings...");
        let mailer: Arc<dyn Mailer> = Arc::new(HttpMailer::new(mail)?);
        builder = builder.mailer(mailer);
    }
    let engine = builder.build().await?;

    let tokens = server::TokenIssuer::new(
        &settings.server.jwt_secret,
        settings.server.token_ttl_minutes,
    );
    let bind = settings
        .server
        .bind
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let listener = tokio::net::TcpListener::bind(format!("{bind}:{}", settings.server.port)).await?;
    server::run_with_listener(engine, tokens, listener).await?;

    Ok(())
}

async fn parse_database(config: &Database) -> Result<sea_orm::DatabaseConnection, AppError> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
