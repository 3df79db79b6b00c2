use actix_web::{web, HttpServer};
use anyhow::Context;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

use sf_api::routes::health::DependencyCheck;
use sf_api::{create_app, AppState};
use sf_core::{
    CleanupConfig, InMemoryRateLimiter, RateLimiterTrait, SecurityEventRepository, SecurityEventService,
    SecurityEventServiceConfig, VerificationCleanupService, VerificationRepository, VerificationService,
    VerificationServiceConfig,
};
use sf_infra::cache::RedisClient;
use sf_infra::database::{DatabasePool, MySqlSecurityEventRepository, MySqlVerificationRepository};
use sf_infra::services::{LoggingCodeSender, RedisRateLimiter};
use sf_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(config.logging.level.as_str()));

    info!("Starting Voltmart storefront API ({})", config.environment);
    config.validate().context("Invalid configuration")?;

    // Storage
    let pool = Arc::new(
        DatabasePool::new(&config.database)
            .await
            .context("Failed to connect to MySQL")?,
    );
    pool.run_migrations().await.context("Failed to run migrations")?;
    info!("Database ready ({})", pool.get_statistics());

    let verification_repository = Arc::new(MySqlVerificationRepository::new(pool.get_pool().clone()));
    let event_repository = Arc::new(MySqlSecurityEventRepository::new(pool.get_pool().clone()));

    // Services
    let events = Arc::new(SecurityEventService::new(
        event_repository,
        SecurityEventServiceConfig::default(),
    ));
    let code_sender = Arc::new(LoggingCodeSender::new(config.environment.is_development()));
    let verification_service = Arc::new(VerificationService::new(
        verification_repository.clone(),
        code_sender,
        events.clone(),
        VerificationServiceConfig::from(&config.verification),
    ));
    let cleanup_service = Arc::new(VerificationCleanupService::new(
        verification_repository,
        events,
        CleanupConfig::from(&config.verification),
    ));

    let (rate_limiter, redis_client) = create_rate_limiter(&config).await?;
    let mut dependency_checks: Vec<Arc<dyn DependencyCheck>> = Vec::new();
    dependency_checks.push(pool.clone());
    if let Some(client) = redis_client {
        dependency_checks.push(client);
    }

    if let Some(seconds) = config.admin.cleanup_interval_seconds {
        spawn_cleanup_schedule(cleanup_service.clone(), Duration::from_secs(seconds));
    }

    let app_state = web::Data::new(AppState {
        verification_service,
        cleanup_service,
        dependency_checks,
    });

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let workers = config.server.workers;
    let server_config = config.clone();
    let mut server = HttpServer::new(move || {
        create_app(app_state.clone(), rate_limiter.clone(), &server_config)
    });
    if workers > 0 {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    pool.close().await;
    Ok(())
}

/// Redis-backed limiter, falling back to per-process counters outside production
///
/// Also hands back the Redis client when one is in use so `/health` can check it.
async fn create_rate_limiter(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn RateLimiterTrait>, Option<Arc<RedisClient>>)> {
    match RedisClient::new(config.cache.clone()).await {
        Ok(client) => {
            let client = Arc::new(client);
            Ok((Arc::new(RedisRateLimiter::new(client.clone())), Some(client)))
        }
        Err(e) if !config.environment.is_production() => {
            warn!("Redis unavailable ({}); rate limits apply per instance only", e);
            Ok((Arc::new(InMemoryRateLimiter::new()), None))
        }
        Err(e) => Err(e).context("Failed to connect to Redis"),
    }
}

/// Run the verification cleanup every `period` for the life of the server
fn spawn_cleanup_schedule<R, A>(service: Arc<VerificationCleanupService<R, A>>, period: Duration)
where
    R: VerificationRepository + 'static,
    A: SecurityEventRepository + 'static,
{
    info!("Scheduling verification cleanup every {}s", period.as_secs());

    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately; skip it so startup stays quiet
        interval.tick().await;

        loop {
            interval.tick().await;
            match service.run_cleanup().await {
                Ok(stats) if stats.is_success() => {
                    info!("Scheduled cleanup removed {} record(s)", stats.total_cleaned)
                }
                Ok(stats) => warn!("Scheduled cleanup finished with errors: {:?}", stats.errors),
                Err(e) => warn!("Scheduled cleanup failed: {}", e),
            }
        }
    });
}
