mod app;
mod auth;
mod config;
mod db;
mod handlers;
mod models;
mod service;
mod state;

use std::sync::Arc;

use tracker_common::{bind_listener, env_or, init_tracing, shutdown_signal};

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    let _guards = init_tracing("tracker-service");

    let port = env_or("PORT", 8080u16);
    let config = AppConfig::from_env();
    let state = AppState {
        config: Arc::new(config),
    };

    let app = app::build_router(state);
    let listener = bind_listener(port).await;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("serve");
}
