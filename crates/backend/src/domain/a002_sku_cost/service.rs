use async_trait::async_trait;
use chrono::Utc;
use contracts::domain::a002_sku_cost::SkuCostDto;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::repository;
use crate::shared::config::{get_database_path, Config};
use crate::shared::data::db;

/// Manual unit costs per SKU, read by the report, written by the user
#[async_trait]
pub trait SkuCostStore: Send + Sync {
    /// "sqlite" or "memory"
    fn kind(&self) -> &'static str;

    async fn list(&self) -> anyhow::Result<Vec<SkuCostDto>>;
    async fn get(&self, sku: &str) -> anyhow::Result<Option<SkuCostDto>>;
    async fn upsert(&self, sku: &str, unit_cost: f64) -> anyhow::Result<SkuCostDto>;
    async fn delete(&self, sku: &str) -> anyhow::Result<bool>;

    /// SKU -> unit cost, taken once per report
    async fn snapshot(&self) -> anyhow::Result<HashMap<String, f64>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .map(|item| (item.sku, item.unit_cost))
            .collect())
    }
}

pub struct SqliteSkuCostStore {
    conn: DatabaseConnection,
}

impl SqliteSkuCostStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SkuCostStore for SqliteSkuCostStore {
    fn kind(&self) -> &'static str {
        "sqlite"
    }

    async fn list(&self) -> anyhow::Result<Vec<SkuCostDto>> {
        repository::list_all(&self.conn).await
    }

    async fn get(&self, sku: &str) -> anyhow::Result<Option<SkuCostDto>> {
        repository::get_by_sku(&self.conn, sku).await
    }

    async fn upsert(&self, sku: &str, unit_cost: f64) -> anyhow::Result<SkuCostDto> {
        repository::upsert(&self.conn, sku, unit_cost).await
    }

    async fn delete(&self, sku: &str) -> anyhow::Result<bool> {
        repository::delete(&self.conn, sku).await
    }
}

/// Process-lifetime store used when no database path is configured
#[derive(Default)]
pub struct InMemorySkuCostStore {
    items: RwLock<HashMap<String, SkuCostDto>>,
}

#[async_trait]
impl SkuCostStore for InMemorySkuCostStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> anyhow::Result<Vec<SkuCostDto>> {
        let mut items: Vec<SkuCostDto> = self.items.read().await.values().cloned().collect();
        items.sort_by(|a, b| a.sku.cmp(&b.sku));
        Ok(items)
    }

    async fn get(&self, sku: &str) -> anyhow::Result<Option<SkuCostDto>> {
        Ok(self.items.read().await.get(sku).cloned())
    }

    async fn upsert(&self, sku: &str, unit_cost: f64) -> anyhow::Result<SkuCostDto> {
        let item = SkuCostDto {
            sku: sku.to_string(),
            unit_cost,
            updated_at: Some(Utc::now()),
        };
        self.items
            .write()
            .await
            .insert(sku.to_string(), item.clone());
        Ok(item)
    }

    async fn delete(&self, sku: &str) -> anyhow::Result<bool> {
        Ok(self.items.write().await.remove(sku).is_some())
    }
}

/// SQLite store when `database.path` is set, in-memory otherwise
pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn SkuCostStore>> {
    match get_database_path(config) {
        Some(path) => {
            let conn = db::initialize_database(&path).await?;
            Ok(Arc::new(SqliteSkuCostStore::new(conn)))
        }
        None => {
            tracing::warn!("database.path is empty, SKU costs are kept in memory only");
            Ok(Arc::new(InMemorySkuCostStore::default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn exercise(store: &dyn SkuCostStore) {
        assert!(store.list().await.unwrap().is_empty());

        store.upsert("B-2", 40.0).await.unwrap();
        store.upsert("A-1", 10.0).await.unwrap();
        store.upsert("A-1", 12.5).await.unwrap();

        let items = store.list().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].sku, "A-1");
        assert_eq!(items[0].unit_cost, 12.5);
        assert!(items[0].updated_at.is_some());

        let one = store.get("B-2").await.unwrap().unwrap();
        assert_eq!(one.unit_cost, 40.0);
        assert!(store.get("missing").await.unwrap().is_none());

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.get("A-1"), Some(&12.5));

        assert!(store.delete("A-1").await.unwrap());
        assert!(!store.delete("A-1").await.unwrap());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemorySkuCostStore::default();
        assert_eq!(store.kind(), "memory");
        exercise(&store).await;
    }

    #[tokio::test]
    async fn test_sqlite_store() {
        let conn = db::connect("sqlite::memory:").await.unwrap();
        let store = SqliteSkuCostStore::new(conn);
        assert_eq!(store.kind(), "sqlite");
        exercise(&store).await;
    }

    #[tokio::test]
    async fn test_open_store_without_path_is_memory() {
        let mut config = Config::default();
        config.database.path = String::new();
        let store = open_store(&config).await.unwrap();
        assert_eq!(store.kind(), "memory");
    }
}
