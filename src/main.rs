use composition_api::{app, config::AppConfig, migration::Migrator, telemetry};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    telemetry::init_tracing();

    let db = Database::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;

    let router = app::build_router(&db);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        docs = app::DOCS_PATH,
        "composition API listening"
    );
    axum::serve(listener, router).await?;
    Ok(())
}
