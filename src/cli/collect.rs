use tabled::Table;

use crate::{
    config, error,
    management::{
        CollectionTables, SourceKind, Sources, collect_user_data, collector::run_for_token,
    },
    spotify::{RateLimitedFetcher, SpotifyClient},
    success,
    types::{PersistTableRow, Table as StoreTable},
    utils, warning,
};

pub async fn collect(token: Option<String>, skip: Vec<SourceKind>, dry_run: bool) {
    let Some(token) = token.or_else(config::spotify_access_token) else {
        error!("Missing access token. Pass --token or set SPOTIFY_ACCESS_TOKEN.");
    };
    let sources = Sources::without(&skip);

    if dry_run {
        let tables = match tokio::task::spawn_blocking(move || dry_run_collect(&token, &sources))
            .await
        {
            Ok(Ok(tables)) => tables,
            Ok(Err(e)) => error!("Collection failed. Err: {}", e),
            Err(e) => error!("Collection task panicked. Err: {}", e),
        };

        let rows: Vec<PersistTableRow> = StoreTable::ALL
            .iter()
            .map(|table| PersistTableRow {
                table: table.to_string(),
                rows: tables.row_count(*table),
                status: "dry run".to_string(),
            })
            .collect();
        println!("{}", Table::new(rows));
        return;
    }

    let database_path = config::database_path();
    let report = match tokio::task::spawn_blocking(move || {
        run_for_token(&token, &database_path, &sources)
    })
    .await
    {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => error!("Collection failed. Err: {}", e),
        Err(e) => error!("Collection task panicked. Err: {}", e),
    };

    println!("{}", Table::new(utils::persist_rows(&report.outcomes)));

    let failed = report.failed_tables();
    if failed == 0 {
        success!(
            "Collection for {} stored in {}",
            report.user_id,
            config::database_path().display()
        );
    } else {
        warning!(
            "{} of {} tables failed to persist.",
            failed,
            report.outcomes.len()
        );
    }
}

fn dry_run_collect(
    token: &str,
    sources: &Sources,
) -> Result<CollectionTables, Box<dyn std::error::Error + Send + Sync>> {
    let fetcher = RateLimitedFetcher::from_config()?;
    let client = SpotifyClient::new(fetcher, &config::spotify_apiurl(), token);
    Ok(collect_user_data(&client, sources)?)
}
