use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{
    config::ServerConfig,
    routes,
    state::AppState,
    storage::ImageStore,
    token::{JwtConfig, TokenService},
};
use common::database::{DatabaseConfig, health_check, init_pool};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Starting recipe API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    let jwt_config = JwtConfig::from_env()?;
    let token_service = TokenService::new(&jwt_config);

    let server_config = ServerConfig::from_env()?;
    let image_store = ImageStore::new(server_config.media_root.clone());

    let app_state = AppState::new(pool, token_service, image_store);

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&server_config.bind_addr).await?;
    info!("Recipe API service listening on {}", server_config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
