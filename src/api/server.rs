//! HTTP server implementation

use std::sync::Arc;

use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::Result;

/// Start the web server: bootstraps the store and generation clients, then
/// serves the query form and API until shutdown.
pub async fn serve(config: &AppConfig, host: String, port: u16, enable_cors: bool) -> Result<()> {
    info!("Starting CourtIQ server...");

    let assistant = Arc::new(crate::bootstrap(config).await?);
    let state = AppState { assistant };

    let mut app = routes::app_routes(state).layer(TraceLayer::new_for_http());

    if enable_cors {
        info!("CORS enabled (permissive)");
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    let addr = format!("{host}:{port}");
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
