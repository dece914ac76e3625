use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use intellimed::config::{LoggingSettings, Settings, StoreBackend};
use intellimed::core::ProximitySearch;
use intellimed::routes::{self, AppState};
use intellimed::services::{
    seed_sample_facilities, CacheManager, FacilityStore, InMemoryFacilityStore, PostgresFacilityStore,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("intellimed={level},actix_web={level}", level = logging.level)));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging is configured from settings, so load them first
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting IntelliMed facility search service...");

    let store: Arc<dyn FacilityStore> = match settings.store.backend {
        StoreBackend::Postgres => {
            let db = &settings.database;
            let postgres = PostgresFacilityStore::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

            info!("PostgreSQL store initialized (max: {} connections)", db.max_connections.unwrap_or(10));
            Arc::new(postgres)
        }
        StoreBackend::Memory => {
            info!("Using in-memory facility store");
            Arc::new(InMemoryFacilityStore::new())
        }
    };

    if settings.store.seed_on_startup {
        let outcome = seed_sample_facilities(store.as_ref())
            .await
            .map_err(|e| startup_error("Failed to seed sample facilities", e))?;
        info!("{}", outcome.message);
    }

    // Cache is optional - searches work without it
    let cache = if settings.cache.enabled {
        let ttl = settings.cache.ttl_secs.unwrap_or(300);
        let l1_size = settings.cache.l1_cache_size.unwrap_or(1000);

        match CacheManager::new(settings.cache.redis_url.as_deref(), l1_size, ttl).await {
            Ok(cache) => {
                info!(
                    "Cache manager initialized (L1: {} entries, TTL: {}s, Redis: {})",
                    l1_size,
                    ttl,
                    cache.has_redis()
                );
                Some(Arc::new(cache))
            }
            Err(e) => {
                warn!("Failed to connect to Redis ({}), using in-process cache only", e);
                Some(Arc::new(CacheManager::in_memory(l1_size, ttl)))
            }
        }
    } else {
        info!("Caching disabled");
        None
    };

    let search = ProximitySearch::new(settings.search.default_radius_km);

    info!("Search engine initialized (default radius: {} km)", search.default_radius_km());

    // Build application state
    let app_state = AppState {
        store,
        cache,
        search,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
