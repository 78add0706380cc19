use std::sync::Arc;
use std::time::Duration;

use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use redex_db::{init_database, RedbKeyValueStore};
use redex_server::{create_router, AppState, Config, SharedStorage};

/// Submissions older than this are forgotten.
const SUBMISSION_TTL: Duration = Duration::from_secs(3600);
const FAVORITES_IDLE: Duration = Duration::from_secs(30 * 60);

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Optional: REDEX_LISTEN_ADDR, REDEX_DB_PATH, REDEX_CATALOG_PATH");
            eprintln!("          REDEX_RESERVATION_DELAY_MS, REDEX_NEWSLETTER_DELAY_MS");
            eprintln!("          REDEX_WRITE_LIMIT, REDEX_READ_LIMIT");
            std::process::exit(1);
        }
    };

    tracing::info!("Starting REDEX server");
    tracing::info!("Listen address: {}", config.listen_addr);
    tracing::info!("Database path: {}", config.db_path.display());

    let catalog = match config.load_catalog() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Catalog error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Loaded {} cocktails", catalog.len());

    let db = match init_database(&config.db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Database error: {}", e);
            std::process::exit(1);
        }
    };

    let storage: SharedStorage = Arc::new(RedbKeyValueStore::new(db));
    let state = AppState::new(&config, catalog, storage);

    let housekeeping = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            housekeeping.write_limiter.cleanup();
            housekeeping.read_limiter.cleanup();
            housekeeping.reservations.cleanup(SUBMISSION_TTL);
            housekeeping.newsletter.cleanup(SUBMISSION_TTL);
            housekeeping.evict_idle_favorites(FAVORITES_IDLE);
        }
    });

    let app = create_router(state)
        .nest_service("/static", ServeDir::new("crates/redex-server/static"))
        .into_make_service_with_connect_info::<std::net::SocketAddr>();

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind {}: {}", config.listen_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server running at http://{}", config.listen_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
