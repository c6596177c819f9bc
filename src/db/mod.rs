use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::{
    errors::DbError,
    models::schema::{ColumnInfo, SchemaSnapshot},
};

pub mod mysql;

/// Read-only schema introspection against one server.
#[async_trait]
pub trait DbClient {
    async fn list_databases(&self) -> Result<Vec<String>, DbError>;
    /// Names of the base tables in the given database.
    async fn fetch_tables(&self, database: &str) -> Result<HashSet<String>, DbError>;
    /// Column descriptors for every table in the given database, grouped by
    /// table name.
    async fn fetch_columns(
        &self,
        database: &str,
    ) -> Result<HashMap<String, HashMap<String, ColumnInfo>>, DbError>;
}

/// Load a full snapshot of one database's tables and columns.
pub async fn load_snapshot<C>(client: &C, database: &str) -> Result<SchemaSnapshot, DbError>
where
    C: DbClient + Sync + ?Sized,
{
    let tables = client.fetch_tables(database).await?;
    let columns = client.fetch_columns(database).await?;

    log::debug!(
        "loaded snapshot of {}: {} tables, {} column mappings",
        database,
        tables.len(),
        columns.len()
    );

    Ok(SchemaSnapshot { tables, columns })
}
