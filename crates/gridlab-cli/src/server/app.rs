//! Axum application setup.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for a separately served front end
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Grid
        .route("/data", get(handlers::get_data))
        .route("/query", post(handlers::query_data))
        .route("/dataset", post(handlers::replace_dataset))
        .route("/import-data", post(handlers::import_data))
        // Profiling
        .route("/statistics", get(handlers::get_statistics))
        .route("/validation", get(handlers::get_validation))
        .route("/chart-data", get(handlers::get_chart_data))
        // Processing
        .route("/process-data-clean", post(handlers::clean_data))
        .route("/export-data", post(handlers::export_data));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    println!("Server listening on http://{}/api", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
