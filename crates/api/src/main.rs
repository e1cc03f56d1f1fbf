use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rideline_api::auth::service::AuthService;
use rideline_api::background::{cleanup, session_touch};
use rideline_api::config::ServerConfig;
use rideline_api::email::Mailer;
use rideline_api::location::GeoLocator;
use rideline_api::router::build_app_router;
use rideline_api::state::AppState;
use rideline_cache::otp::OtpStore;
use rideline_cache::session::SessionStore;
use rideline_cache::Cache;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rideline_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = rideline_db::create_pool(&database_url)
        .await
        .expect("failed to connect to database");
    tracing::info!("database connection pool created");

    rideline_db::health_check(&pool)
        .await
        .expect("database health check failed");

    rideline_db::run_migrations(&pool)
        .await
        .expect("failed to run database migrations");
    tracing::info!("database migrations applied");

    // --- Cache ---
    let cache = match &config.redis_url {
        Some(url) => {
            let cache = Cache::connect_redis(url, config.cache_op_timeout)
                .await
                .expect("failed to connect to Redis");
            tracing::info!("redis cache connected");
            cache
        }
        None => {
            tracing::warn!("REDIS_URL not set; using in-process cache (single-node only)");
            Cache::in_memory(config.cache_op_timeout)
        }
    };
    let cache = Arc::new(cache);
    let sessions = SessionStore::new(Arc::clone(&cache), config.session_ttl);
    let otps = OtpStore::new(cache, config.otp_ttl);

    // --- Mailer ---
    let mailer = match config.email.clone() {
        Some(email_config) => {
            let mailer = Mailer::new(email_config).expect("failed to build SMTP mailer");
            tracing::info!("SMTP mailer configured");
            Some(Arc::new(mailer))
        }
        None => {
            tracing::warn!("SMTP_HOST not set; one-time codes will only be logged");
            None
        }
    };

    // --- Background workers ---
    let worker_cancel = CancellationToken::new();
    let (touch, touch_handle) = session_touch::spawn(pool.clone(), worker_cancel.clone());
    let cleanup_handle = tokio::spawn(cleanup::run(pool.clone(), worker_cancel.clone()));

    // --- App state ---
    let auth = AuthService::new(pool.clone(), sessions.clone());
    let state = AppState {
        pool,
        auth,
        sessions,
        otps,
        config: Arc::new(config.clone()),
        mailer,
        touch,
        geo: GeoLocator::new(),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("server stopped accepting connections, cleaning up");

    worker_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), touch_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), cleanup_handle).await;
    tracing::info!("background workers stopped");

    tracing::info!("graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}
