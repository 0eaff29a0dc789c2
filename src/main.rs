mod api;
mod bible_client;
mod catalog;
mod config;
mod delivery;
mod domain;
mod storage;
mod transport;

use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Context;
use bible_client::BibleClient;
use catalog::Catalog;
use config::Config;
use delivery::{BatchRetriever, DeliveryEngine, DeliveryPacer, ScheduleDriver};
use migration::MigratorTrait;
use poem::{
    EndpointExt, Route, Server,
    listener::TcpListener,
    middleware::{Cors, Tracing as PoemTracing},
};
use poem_openapi::OpenApiService;
use sea_orm::Database;
use storage::{JsonRoster, SqliteStore};
use tokio_util::sync::CancellationToken;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};
use transport::{LogTransport, Transport, WebhookTransport};

type BibleBotResult<T> = anyhow::Result<T>;

#[tokio::main]
async fn main() -> BibleBotResult<()> {
    // Respect RUST_LOG if set, default to info for our crate and warn for deps.
    let default_filter = format!(
        "{}=info,poem=info,reqwest=warn,h2=warn,sea_orm=warn,sqlx=warn",
        env!("CARGO_PKG_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting bible_bot");

    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };
    let config = Config::load();
    config.validate().map_err(|e| anyhow::anyhow!(e))?;
    let delivery_at = config.delivery_at().map_err(|e| anyhow::anyhow!(e))?;

    let catalog = Arc::new(Catalog::load(config.catalog_path.as_deref())?);

    let db_conn = Database::connect(&config.db_connection_string)
        .await
        .with_context(|| "Failed to connect to database")?;
    migration::Migrator::up(&db_conn, None)
        .await
        .with_context(|| "Failed to run database migrations")?;
    let store = Arc::new(SqliteStore::new(db_conn));

    let bible = BibleClient::new(&config.bible_api_base_url)?.with_api_key(&config.bible_api_token);
    tracing::info!(
        api_base = %config.bible_api_base_url,
        has_api_key = !config.bible_api_token.is_empty(),
        "configured verse lookup client"
    );

    let transport: Arc<dyn Transport> = if config.transport_url.is_empty() {
        tracing::warn!("TRANSPORT_URL not set, messages will only be logged");
        Arc::new(LogTransport)
    } else {
        tracing::info!(gateway = %config.transport_url, "configured messaging gateway");
        Arc::new(WebhookTransport::new(&config.transport_url)?.with_token(&config.transport_token))
    };

    let retriever = BatchRetriever::new(
        catalog.clone(),
        Arc::new(bible),
        store.clone(),
        store.clone(),
    )
    .with_attempt_factor(config.fetch_attempt_factor);
    let pacer = DeliveryPacer::new(
        retriever,
        transport,
        config.pacing(),
        &config.destination_suffix,
    );
    let roster = Arc::new(JsonRoster::new(&config.roster_path));
    let engine = Arc::new(DeliveryEngine::new(pacer, roster));

    let shutdown = CancellationToken::new();
    let driver = ScheduleDriver::new(engine.clone(), delivery_at);
    let driver_task = tokio::spawn(driver.run(shutdown.clone()));

    let signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            return;
        }
        tracing::info!("shutdown requested");
        signal.cancel();
    });

    let state = api::ApiState {
        engine,
        catalog,
        cursors: store.clone(),
        preferences: store,
        shutdown: shutdown.clone(),
    };
    run_poem(state, &config.bind_addr, shutdown).await?;

    if let Err(e) = driver_task.await {
        tracing::error!(error = %e, "schedule driver task failed");
    }
    Ok(())
}

pub async fn run_poem(
    state: api::ApiState,
    bind_addr: &str,
    shutdown: CancellationToken,
) -> BibleBotResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let api = api::BibleBotApi { state };
    let api_service = OpenApiService::new(api, "Bible Bot API", version)
        .server(format!("http://{}", bind_addr));
    let ui = api_service.rapidoc();
    let spec = api_service.spec();
    let route = Route::new()
        .nest("/", api_service)
        .nest("/ui", ui)
        .nest("/spec", poem::endpoint::make_sync(move |_| spec.clone()))
        .with(Cors::new())
        .with(PoemTracing);

    tracing::info!(%bind_addr, "starting HTTP server");
    Server::new(TcpListener::bind(bind_addr))
        .run_with_graceful_shutdown(
            route,
            async move { shutdown.cancelled().await },
            Some(Duration::from_secs(10)),
        )
        .await?;
    Ok(())
}
