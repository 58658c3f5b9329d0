use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoiceu::{
  adapters::http::{ApiDependencies, RequestIdMiddleware, configure_routes},
  domain::invoice::{InvoiceServiceConfig, RandomInvoiceNumberGenerator},
  infrastructure::{
    config::Config,
    persistence::Repositories,
    services::{Outbound, Services, tax_rate},
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "invoiceu=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting invoiceu");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    anyhow::anyhow!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    )
  })?
  .context("Failed to connect to database")?;
  tracing::info!("Database connection pool created");

  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  let repos = Repositories::postgres(db_pool);
  let outbound = Outbound::from_config(&config).context("Failed to set up PDF and email delivery")?;
  let services = Services::new(
    &repos,
    tax_rate(config.invoice.tax_rate_percent)?,
    InvoiceServiceConfig {
      max_number_attempts: config.invoice.max_number_attempts,
    },
    Arc::new(RandomInvoiceNumberGenerator::new()),
    outbound,
  );
  let deps = ApiDependencies::from_services(&services);

  let (host, port) = (config.server.host.clone(), config.server.port);
  tracing::info!("Listening on {}:{}", host, port);

  HttpServer::new(move || {
    App::new()
      .wrap(Logger::default())
      .wrap(RequestIdMiddleware::new())
      .configure(|cfg| configure_routes(cfg, deps.clone()))
  })
  .bind((host.as_str(), port))?
  .run()
  .await?;

  Ok(())
}
