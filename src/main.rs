use std::sync::Arc;

use dotenvy::dotenv;
use ranque::logging::init_tracing;
use ranque::metrics::init_metrics;
use ranque::modules::auth::service::AuthService;
use ranque::router::init_router;
use ranque::state::AppState;
use ranque_config::{CorsConfig, JwtConfig, ServerConfig};
use ranque_db::{MemoryStore, PgStore, RoleStore, UserStore, init_db_pool};
use tracing::{error, info, warn};

const SEED_ROLES: [&str; 3] = ["Administrator", "Manager", "Participant"];

async fn init_stores(
    server_config: &ServerConfig,
) -> anyhow::Result<(Arc<dyn UserStore>, Arc<dyn RoleStore>)> {
    match &server_config.database_url {
        Some(database_url) => {
            let store = PgStore::new(init_db_pool(database_url).await?);
            store.migrate().await?;
            info!("Using PostgreSQL credential store");
            let store = Arc::new(store);
            let users: Arc<dyn UserStore> = store.clone();
            let roles: Arc<dyn RoleStore> = store;
            Ok((users, roles))
        }
        None => {
            warn!("DATABASE_URL is not set, using the in-memory credential store");
            let store = Arc::new(MemoryStore::with_roles(SEED_ROLES));
            let users: Arc<dyn UserStore> = store.clone();
            let roles: Arc<dyn RoleStore> = store;
            Ok((users, roles))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    // Without a usable signing secret no token can be issued or checked
    let jwt_config = match JwtConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid JWT configuration");
            std::process::exit(1);
        }
    };

    let server_config = ServerConfig::from_env();
    let (users, roles) = init_stores(&server_config).await?;
    let auth = AuthService::new(users, roles, jwt_config)?;

    let state = AppState::new(auth, CorsConfig::from_env()).with_metrics(init_metrics());
    let app = init_router(state);

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
