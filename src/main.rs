use catalog::{
    api::{handlers::AppState, routes},
    catalog::TermKey,
    cli::{commands, Cli, Commands},
    config::Settings,
    CatalogService, Error, Result,
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,catalog=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Search {
            year,
            term,
            query,
            limit,
            offset,
        } => {
            commands::search(&settings, TermKey::new(year, term), &query, limit, offset)?;
        }
        Commands::Graph {
            year,
            term,
            department,
            completed,
        } => {
            commands::graph(&settings, TermKey::new(year, term), &department, &completed)?;
        }
        Commands::Terms => {
            commands::terms(&settings)?;
        }
        Commands::Reindex { year, term } => {
            let only = year.zip(term).map(|(year, term)| TermKey::new(year, term));
            let rebuilt = commands::reindex(&settings, only)?;
            println!("Rebuilt {rebuilt} term index(es)");
        }
    }

    Ok(())
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    // Override settings with CLI arguments
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting course catalog server");
    info!("Courses: {:?}", settings.catalog.courses_dir);
    info!("Index: {:?}", settings.search.index_path);

    // Every index and graph is built before the listener accepts a request
    let init_settings = settings.clone();
    let catalog = tokio::task::spawn_blocking(move || CatalogService::initialize(&init_settings))
        .await
        .map_err(|e| Error::Internal(format!("Catalog initialization panicked: {e}")))??;

    let state = AppState {
        catalog: Arc::new(catalog),
        settings: settings.clone(),
    };

    let app = routes::create_router(state, &settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
