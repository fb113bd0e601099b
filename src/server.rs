use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{
    Res,
    api::{self, AppState},
    config, info,
};

/// Routes of the trigger server.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/collect-data", post(api::collect_data))
        .layer(Extension(Arc::new(state)))
}

pub async fn start_api_server(state: AppState) -> Res<()> {
    let addr = SocketAddr::from_str(&config::server_addr())?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;

    Ok(())
}
