use crate::{config::ServerConfig, doc::ApiDoc, state::AppState, utils::shutdown::shutdown_signal};
use database::{
    db::create_connection,
    error::{ConfigError, RepositoryError},
    search::{SearchError, TantivyCourseIndex},
};
use log::{error, info};
use migration::{Migrator, MigratorTrait};
use sea_orm::DbErr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod state;
mod utils;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("database: {0}")]
    Db(#[from] DbErr),

    #[error("search index: {0}")]
    Search(#[from] SearchError),

    #[error("{0}")]
    Repository(#[from] RepositoryError),

    #[error("authentication: {0}")]
    Auth(String),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(e) = run().await {
        error!("Server failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;

    let db = create_connection(&config.database.database_url).await?;
    if config.run_migrations {
        info!("Applying pending migrations");
        Migrator::up(&db, None).await?;
    }

    let state = AppState {
        db,
        search: Arc::new(TantivyCourseIndex::open(&config.database.search)?),
        search_limit: config.database.search.result_limit,
    };

    let indexed = state.courses(None).rebuild_search_index().await?;
    info!("Indexed {indexed} courses for search");

    let oauth2_resource_server = <OAuth2ResourceServer>::builder()
        .issuer_url(config.oidc_issuer_url.as_str())
        .build()
        .await
        .map_err(|e| StartupError::Auth(e.to_string()))?;

    let (public, mut api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes::public_routes())
        .split_for_parts();
    let (protected, protected_api) = routes::protected_routes().split_for_parts();
    api.merge(protected_api);

    let app = public
        .merge(protected.layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer())))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", api))
        .layer(CompressionLayer::new());

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Running axum on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
