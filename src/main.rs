use std::sync::Arc;

use axum::{
    debug_handler,
    extract::State,
    http::{Method, header},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use hushmatch::{AppResult, AppState, config::ServerConfig, events::ServerReady, matchmaking::Matchmaker, ws};
use log::info;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Arc::new(ServerConfig::from_env().unwrap());
    let matchmaker = Matchmaker::new(config.clone());
    let app_state = AppState {
        config: config.clone(),
        matchmaker,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST]);

    let app = Router::new()
        .route("/", get(index))
        .route("/ws", get(ws::chat_ws))
        .with_state(app_state)
        .layer(cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}

/// Same readiness document the websocket pushes on connect; doubles as a probe.
#[debug_handler(state = AppState)]
async fn index(State(config): State<Arc<ServerConfig>>) -> AppResult<Response> {
    let body = serde_json::to_string(&ServerReady::new(&config))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
