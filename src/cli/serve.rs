use crate::{
    api::AppState,
    config, error, info,
    management::{SourceKind, Sources},
    server,
};

pub async fn serve(skip: Vec<SourceKind>) {
    let state = AppState {
        database_path: config::database_path(),
        sources: Sources::without(&skip),
    };
    info!(
        "Collection runs will be stored in {}",
        state.database_path.display()
    );

    if let Err(e) = server::start_api_server(state).await {
        error!("Server stopped. Err: {}", e);
    }
}
