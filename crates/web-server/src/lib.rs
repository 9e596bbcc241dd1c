use axum::{routing::get, Router};
use configuration::Settings;
use database::{DbRepository, Gateway};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
}

impl AppState {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            db_repo: DbRepository::new(gateway),
        }
    }
}

/// Builds the application router around an already configured state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            "/v1/books",
            get(handlers::list_books).post(handlers::create_book),
        )
        .with_state(state)
        .layer(cors)
        // Logs information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// Tracing must already be initialized by the caller.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let addr = settings.server.socket_addr()?;
    let gateway = Arc::new(Gateway::configure(&settings.hana, settings.gateway.policy));
    let app = build_router(Arc::new(AppState::new(gateway)));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server started and listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
