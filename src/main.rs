use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use medmatch_groups::config::{LoggingSettings, Settings};
use medmatch_groups::core::GroupAssembler;
use medmatch_groups::error::{handle_json_payload_error, handle_query_payload_error};
use medmatch_groups::models::ScoringWeights;
use medmatch_groups::routes::{self, AppState};
use medmatch_groups::services::{CacheManager, PostgresClient, ProfileStoreClient, StoreTables};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn config_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(config_error)?;

    init_logging(&settings.logging);

    info!("Starting MedMatch group matching service...");

    // Profile store client
    let store_tables = StoreTables {
        profiles: settings.backend.profiles_table.clone(),
        interests: settings.backend.interests_table.clone(),
        preferences: settings.backend.preferences_table.clone(),
    };

    let store = Arc::new(
        ProfileStoreClient::new(
            settings.backend.url.clone(),
            settings.backend.api_key.clone(),
            store_tables,
            Duration::from_secs(settings.backend.timeout_secs.unwrap_or(10)),
        )
        .map_err(config_error)?,
    );

    info!("Profile store client initialized ({})", settings.backend.url);

    // Cache manager (Redis optional)
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = Arc::new(
        CacheManager::new(settings.cache.redis_url.as_deref(), l1_cache_size, cache_ttl).await,
    );

    info!(
        "Cache manager initialized (L1: {} entries, TTL: {}s, Redis: {})",
        l1_cache_size,
        cache_ttl,
        cache.has_redis()
    );

    // PostgreSQL is only needed for persisted weekly suggestions
    let postgres = match &settings.database.url {
        Some(url) => match PostgresClient::from_settings(
            url,
            settings.database.max_connections,
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        {
            Ok(client) => {
                info!("PostgreSQL client initialized");
                Some(Arc::new(client))
            }
            Err(e) => {
                error!("Failed to connect to PostgreSQL: {}", e);
                return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
            }
        },
        None => {
            warn!("No database configured, suggestion persistence disabled");
            None
        }
    };

    // Assembler with configured weights, limits and tables
    let weights = ScoringWeights::from(&settings.scoring.weights);
    let limits = settings.matching.limits();
    let assembler = GroupAssembler::new(weights, limits, settings.scoring.tables());

    info!("Group assembler initialized with weights: {:?}, limits: {:?}", weights, limits);

    let app_state = AppState {
        store,
        cache,
        postgres,
        assembler,
        matching: settings.matching.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
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
