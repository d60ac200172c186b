use dotenvy::dotenv;
use tracing::info;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod middleware;
mod modules;
mod routes;
mod state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_api=info,tower_http=info".into()),
        )
        .init();

    let config = config::settings::AppConfig::new().expect("Missing required environment variables");

    let db = infrastructure::db::pool::connect_to_db(&config.database_url)
        .await
        .expect("Failed to connect to PostgreSQL");

    let redis = infrastructure::redis::client::RedisService::new(&config.redis_url)
        .await
        .expect("Failed to connect to Redis");

    let storage = infrastructure::storage::s3::StorageService::new(
        &config.s3_endpoint,
        &config.s3_bucket,
        &config.s3_access_key,
        &config.s3_secret_key,
    )
    .await;

    let addr = format!("0.0.0.0:{}", config.server_port);
    let state = state::AppState::new(config, db, redis, storage);

    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await.expect("Server error");
}
