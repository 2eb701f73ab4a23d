//! Scribe server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use fred::prelude::*;
use scribe_api::{AppState, router};
use scribe_common::{Config, PageCache, ResponseCache};
use scribe_core::services::{
    CommentService, FeedService, FollowService, GroupService, LikeService, PostService,
    UserService,
};
use scribe_db::repositories::{
    CommentRepository, FollowRepository, GroupRepository, LikeRepository, PostRepository,
    UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install signal handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scribe=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting scribe server...");

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Connect to database
    let db = scribe_db::init(&config)
        .await
        .context("failed to initialize database")?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    scribe_db::migrate(&db)
        .await
        .context("failed to run migrations")?;
    info!("Migrations completed");

    // Connect to Redis for the page cache
    let redis_config = fred::types::config::Config::from_url(&config.redis.url)
        .context("failed to parse Redis URL")?;
    let redis_client = fred::clients::Client::new(redis_config, None, None, None);
    redis_client.connect();
    redis_client
        .wait_for_connect()
        .await
        .context("failed to connect to Redis")?;
    let page_cache: Arc<dyn ResponseCache> = Arc::new(PageCache::new(Arc::new(redis_client)));
    info!("Connected to Redis page cache");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let group_repo = GroupRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(user_repo.clone());
    let feed_service = FeedService::new(
        post_repo.clone(),
        group_repo.clone(),
        user_repo.clone(),
        follow_repo.clone(),
    );
    let post_service = PostService::new(
        post_repo.clone(),
        comment_repo.clone(),
        group_repo.clone(),
        user_repo.clone(),
    );
    let comment_service = CommentService::new(comment_repo, post_repo.clone());
    let follow_service = FollowService::new(follow_repo, user_repo);
    let like_service = LikeService::new(like_repo, post_repo);
    let group_service = GroupService::new(group_repo);

    // Create app state
    let state = AppState {
        user_service,
        feed_service,
        post_service,
        comment_service,
        follow_service,
        like_service,
        group_service,
        page_cache: Some(page_cache),
    };

    // Build router
    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
