use tabled::Table;

use crate::{
    config, error,
    management::SqliteStore,
    types::{Table as StoreTable, TableCountRow},
    utils, warning,
};

pub async fn summary() {
    let store = match SqliteStore::open(config::database_path()) {
        Ok(store) => store,
        Err(e) => error!("Cannot open store. Err: {}", e),
    };

    let pb = utils::spinner("Counting rows...");
    let mut rows = Vec::with_capacity(StoreTable::ALL.len());
    for table in StoreTable::ALL {
        match store.table_count(table) {
            Ok((count, unique_keys)) => rows.push(TableCountRow {
                table: table.to_string(),
                rows: count,
                unique_keys,
            }),
            Err(e) => warning!("{}", e),
        }
    }
    pb.finish_and_clear();

    utils::sort_count_rows(&mut rows);
    println!("{}", Table::new(rows));
}
