use axum::Router;
use axum_helpers::{cors_layer_from_env, create_router};
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_users::{InMemoryUserStore, MongoUserStore, UserService, UserStore};
use std::future::Future;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before anything fallible, so startup errors get colored reports
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    match config.mongo.clone() {
        Some(mongo) => {
            let client = database::mongodb::connect_from_config_with_retry(&mongo, None)
                .await
                .map_err(|e| eyre::eyre!("MongoDB connection failed: {}", e))?;

            let store = MongoUserStore::new(&client.database(&mongo.database));
            store.ensure_indexes().await?;
            info!(database = %mongo.database, "Using MongoDB user store");

            serve(config, store, async move {
                info!("Shutting down: closing MongoDB client");
                client.shutdown().await;
                info!("MongoDB client closed successfully");
            })
            .await
        }
        None => {
            warn!("MONGODB_URL not set, users are kept in memory and lost on restart");
            serve(config, InMemoryUserStore::new(), async {}).await
        }
    }
}

/// Build the full application around `store`.
fn build_app<S: UserStore + 'static>(config: Config, store: S) -> eyre::Result<Router> {
    let cors = cors_layer_from_env(&config.environment)?;
    let state = AppState {
        users: UserService::new(store),
        config,
    };

    let api_routes = api::routes(&state);
    let router = create_router::<openapi::ApiDoc>(api_routes, cors);

    // /health: liveness with app name/version, /ready: store reachability
    Ok(router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state)))
}

async fn serve<S, F>(config: Config, store: S, cleanup: F) -> eyre::Result<()>
where
    S: UserStore + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let server = config.server.clone();
    let app = build_app(config, store)?;

    info!(
        "Starting accounts API with graceful shutdown ({:?} timeout)",
        server.shutdown_timeout
    );

    create_production_app(app, &server, server.shutdown_timeout, cleanup)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Accounts API shutdown complete");
    Ok(())
}
