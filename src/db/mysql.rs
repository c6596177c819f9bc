use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool, Row};

use crate::{
    errors::DbError,
    models::schema::{ColumnInfo, ColumnKey},
};

use super::DbClient;

pub struct MySqlClient {
    pub pool: MySqlPool,
}

impl MySqlClient {
    pub async fn connect(database_url: &str) -> Result<Self, DbError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl DbClient for MySqlClient {
    async fn list_databases(&self) -> Result<Vec<String>, DbError> {
        let rows = sqlx::query("SHOW DATABASES")
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Sqlx)?;

        let mut databases = Vec::with_capacity(rows.len());
        for row in &rows {
            databases.push(row.try_get::<String, _>("Database")?);
        }

        Ok(databases)
    }

    async fn fetch_tables(&self, database: &str) -> Result<HashSet<String>, DbError> {
        let query = r#"
            SELECT TABLE_NAME AS table_name
            FROM information_schema.TABLES
            WHERE TABLE_SCHEMA = ?
              AND TABLE_TYPE = 'BASE TABLE'
        "#;
        let rows = sqlx::query(query)
            .bind(database)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Sqlx)?;

        let mut tables = HashSet::with_capacity(rows.len());
        for row in &rows {
            tables.insert(row.try_get::<String, _>("table_name")?);
        }

        Ok(tables)
    }

    async fn fetch_columns(
        &self,
        database: &str,
    ) -> Result<HashMap<String, HashMap<String, ColumnInfo>>, DbError> {
        let query = r#"
            SELECT
                TABLE_NAME AS table_name,
                COLUMN_NAME AS column_name,
                DATA_TYPE AS data_type,
                COLUMN_TYPE AS column_type,
                IS_NULLABLE AS is_nullable,
                COLUMN_DEFAULT AS column_default,
                COLUMN_KEY AS column_key,
                EXTRA AS extra
            FROM information_schema.COLUMNS
            WHERE TABLE_SCHEMA = ?
            ORDER BY TABLE_NAME, ORDINAL_POSITION
        "#;
        let rows = sqlx::query(query)
            .bind(database)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Sqlx)?;

        let mut columns: HashMap<String, HashMap<String, ColumnInfo>> = HashMap::new();
        for row in &rows {
            let table_name: String = row.try_get("table_name")?;
            let column_name: String = row.try_get("column_name")?;

            let info = ColumnInfo {
                name: column_name.clone(),
                data_type: row.try_get("data_type")?,
                column_type: row.try_get("column_type")?,
                is_nullable: row.try_get::<String, _>("is_nullable")? == "YES",
                column_default: row.try_get::<Option<String>, _>("column_default")?,
                column_key: ColumnKey::parse(&row.try_get::<String, _>("column_key")?),
                extra: row.try_get("extra")?,
            };

            columns.entry(table_name).or_default().insert(column_name, info);
        }

        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::load_snapshot;
    use async_trait::async_trait;
    use mockall::{mock, predicate};

    mock! {
        pub DbClientMock {}

        #[async_trait]
        impl DbClient for DbClientMock {
            async fn list_databases(&self) -> Result<Vec<String>, DbError>;
            async fn fetch_tables(&self, database: &str) -> Result<HashSet<String>, DbError>;
            async fn fetch_columns(
                &self,
                database: &str,
            ) -> Result<HashMap<String, HashMap<String, ColumnInfo>>, DbError>;
        }
    }

    fn column(name: &str) -> ColumnInfo {
        ColumnInfo {
            name: name.to_string(),
            data_type: "int".to_string(),
            column_type: "int(11)".to_string(),
            is_nullable: false,
            column_default: None,
            column_key: ColumnKey::None,
            extra: String::new(),
        }
    }

    #[tokio::test]
    async fn test_list_databases() {
        let mut mock_db = MockDbClientMock::new();

        mock_db
            .expect_list_databases()
            .returning(|| Ok(vec!["app_v1".to_string(), "app_v2".to_string()]));

        let databases = mock_db.list_databases().await.unwrap();
        assert_eq!(databases, vec!["app_v1".to_string(), "app_v2".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_tables() {
        let mut mock_db = MockDbClientMock::new();

        mock_db
            .expect_fetch_tables()
            .with(predicate::eq("app_v1"))
            .returning(|_| {
                Ok(["users".to_string(), "orders".to_string()]
                    .into_iter()
                    .collect())
            });

        let tables = mock_db.fetch_tables("app_v1").await.unwrap();
        assert_eq!(tables.len(), 2);
        assert!(tables.contains("users"));
        assert!(tables.contains("orders"));
    }

    #[tokio::test]
    async fn test_fetch_columns() {
        let mut mock_db = MockDbClientMock::new();

        mock_db
            .expect_fetch_columns()
            .with(predicate::eq("app_v1"))
            .returning(|_| {
                let users: HashMap<_, _> = [
                    ("id".to_string(), column("id")),
                    ("email".to_string(), column("email")),
                ]
                .into_iter()
                .collect();
                Ok([("users".to_string(), users)].into_iter().collect())
            });

        let columns = mock_db.fetch_columns("app_v1").await.unwrap();
        assert_eq!(columns["users"].len(), 2);
        assert_eq!(columns["users"]["id"].column_type, "int(11)");
    }

    #[tokio::test]
    async fn test_load_snapshot_assembles_both_fetches() {
        let mut mock_db = MockDbClientMock::new();

        mock_db
            .expect_fetch_tables()
            .with(predicate::eq("app_v1"))
            .returning(|_| Ok(["users".to_string()].into_iter().collect()));
        mock_db.expect_fetch_columns().returning(|_| {
            let users: HashMap<_, _> = [("id".to_string(), column("id"))].into_iter().collect();
            Ok([("users".to_string(), users)].into_iter().collect())
        });

        let snapshot = load_snapshot(&mock_db, "app_v1").await.unwrap();
        assert!(snapshot.tables.contains("users"));
        assert_eq!(snapshot.columns["users"]["id"].name, "id");
    }

    #[tokio::test]
    async fn test_load_snapshot_propagates_fetch_errors() {
        let mut mock_db = MockDbClientMock::new();

        mock_db
            .expect_fetch_tables()
            .returning(|_| Err(DbError::Connection("server is gone".to_string())));

        let result = load_snapshot(&mock_db, "app_v1").await;
        assert!(matches!(result, Err(DbError::Connection(_))));
    }
}
