use anyhow::Result;
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};

use crate::entities::{kv_entries, prelude::*};
use crate::store::PersistentStore;

/// `PersistentStore` backed by the `kv_entries` table
pub struct KvRepository {
    db: DatabaseConnection,
}

impl KvRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PersistentStore for KvRepository {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = KvEntries::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(entry.map(|model| model.entry_value))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let entry = kv_entries::ActiveModel {
            entry_key: ActiveValue::Set(key.to_string()),
            entry_value: ActiveValue::Set(value),
            updated_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        KvEntries::insert(entry)
            .on_conflict(
                OnConflict::column(kv_entries::Column::EntryKey)
                    .update_columns([kv_entries::Column::EntryValue, kv_entries::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
