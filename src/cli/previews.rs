use crate::{
    config, error, info,
    management::SqliteStore,
    preview::run_preview_batch,
    success, utils, warning,
};

pub async fn previews(dry_run: bool) {
    let store = match SqliteStore::open(config::database_path()) {
        Ok(store) => store,
        Err(e) => error!("Cannot open store. Err: {}", e),
    };

    if dry_run {
        let pb = utils::spinner("Reading songs without preview...");
        let candidates = store.songs_missing_preview();
        pb.finish_and_clear();

        match candidates {
            Ok(candidates) => {
                for candidate in &candidates {
                    info!(
                        "{} - {}",
                        candidate.song.title,
                        candidate.artist_name.as_deref().unwrap_or("unknown artist")
                    );
                }
                success!("{} songs lack a preview.", candidates.len());
            }
            Err(e) => error!("Cannot read songs. Err: {}", e),
        }
        return;
    }

    let Some(api_key) = config::preview_api_key() else {
        error!("Missing preview API key. Set YOUTUBE_KEY.");
    };
    let report = match run_preview_batch(api_key, store).await {
        Ok(report) => report,
        Err(e) => error!("Preview enrichment failed. Err: {}", e),
    };

    success!(
        "Added {} previews out of {} songs.",
        report.updated,
        report.looked_up
    );
    if report.still_missing > 0 {
        warning!("{} songs still have no preview.", report.still_missing);
    }
}
