use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{error, warn};

use crate::store::PersistentStore;
use crate::write_queue::WriteQueue;
use voca_types::{GradeSelector, GradeStats, SolvedIndex};

pub const REWARD_BALANCE_KEY: &str = "rewardBalance";
pub const CURRENT_GRADE_KEY: &str = "currentGrade";

pub fn stats_key(grade: GradeSelector) -> String {
    format!("stats_{}", grade)
}

pub fn solved_key(grade: GradeSelector) -> String {
    format!("solved_{}", grade)
}

/// Typed access to the persisted progress keys.
///
/// Reads go straight to the store and never fail: unreadable or corrupt
/// values load as absent. Writes are queued and return immediately.
#[derive(Clone)]
pub struct ProgressRepository {
    store: Arc<dyn PersistentStore>,
    writes: WriteQueue,
}

impl ProgressRepository {
    /// Must be called inside a tokio runtime
    pub fn new(store: Arc<dyn PersistentStore>) -> Self {
        let writes = WriteQueue::spawn(store.clone());
        Self { store, writes }
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                error!("Error loading {}: {:#}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding malformed value for {}: {}", key, e);
                None
            }
        }
    }

    fn save<T: Serialize>(&self, key: String, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.writes.put(key, json),
            Err(e) => error!("Failed to encode {}: {}", key, e),
        }
    }

    /// `None` when the grade has never been played
    pub async fn load_stats(&self, grade: GradeSelector) -> Option<GradeStats> {
        self.load(&stats_key(grade)).await
    }

    pub async fn load_solved(&self, grade: GradeSelector) -> SolvedIndex {
        self.load(&solved_key(grade)).await.unwrap_or_default()
    }

    pub async fn load_reward_balance(&self) -> u64 {
        self.load(REWARD_BALANCE_KEY).await.unwrap_or(0)
    }

    pub async fn load_current_grade(&self) -> Option<GradeSelector> {
        self.load(CURRENT_GRADE_KEY).await
    }

    pub fn save_stats(&self, grade: GradeSelector, stats: &GradeStats) {
        self.save(stats_key(grade), stats);
    }

    pub fn save_solved(&self, grade: GradeSelector, solved: &SolvedIndex) {
        self.save(solved_key(grade), solved);
    }

    pub fn save_reward_balance(&self, balance: u64) {
        self.save(REWARD_BALANCE_KEY.to_string(), &balance);
    }

    pub fn save_current_grade(&self, grade: GradeSelector) {
        self.save(CURRENT_GRADE_KEY.to_string(), &grade);
    }

    /// Wait for queued writes; returns how many keys could not be saved yet
    pub async fn flush(&self) -> Result<usize> {
        self.writes.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use crate::repositories::KvRepository;
    use crate::store::MemoryStore;
    use migration::{Migrator, MigratorTrait};
    use voca_types::Grade;

    fn grade(n: u8) -> GradeSelector {
        GradeSelector::Grade(Grade::new(n).unwrap())
    }

    #[tokio::test]
    async fn test_keys() {
        assert_eq!(stats_key(grade(2)), "stats_2");
        assert_eq!(stats_key(GradeSelector::All), "stats_all");
        assert_eq!(solved_key(grade(6)), "solved_6");
    }

    #[tokio::test]
    async fn test_defaults_when_nothing_stored() {
        let repo = ProgressRepository::new(Arc::new(MemoryStore::new()));
        assert_eq!(repo.load_stats(grade(1)).await, None);
        assert!(repo.load_solved(grade(1)).await.is_empty());
        assert_eq!(repo.load_reward_balance().await, 0);
        assert_eq!(repo.load_current_grade().await, None);
    }

    #[tokio::test]
    async fn test_roundtrip_through_sqlite() {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let repo = ProgressRepository::new(Arc::new(KvRepository::new(db)));

        let stats = GradeStats {
            wins: 7,
            losses: 3,
            current_streak: 2,
            best_streak: 5,
        };
        let solved: SolvedIndex = ["cat_1_0", "dog_1_1", "sun"].into_iter().collect();

        repo.save_stats(GradeSelector::All, &stats);
        repo.save_solved(GradeSelector::All, &solved);
        repo.save_reward_balance(140);
        repo.save_current_grade(GradeSelector::All);
        assert_eq!(repo.flush().await.unwrap(), 0);

        assert_eq!(repo.load_stats(GradeSelector::All).await, Some(stats));
        assert_eq!(repo.load_solved(GradeSelector::All).await, solved);
        assert_eq!(repo.load_reward_balance().await, 140);
        assert_eq!(repo.load_current_grade().await, Some(GradeSelector::All));
        // Other grades are untouched
        assert_eq!(repo.load_stats(grade(1)).await, None);
    }

    #[tokio::test]
    async fn test_malformed_values_load_as_absent() {
        let store = Arc::new(MemoryStore::new());
        store.set("stats_3", "{not json".to_string()).await.unwrap();
        store.set("solved_3", r#"{"ids": 4}"#.to_string()).await.unwrap();
        store.set(REWARD_BALANCE_KEY, "-12".to_string()).await.unwrap();
        store.set(CURRENT_GRADE_KEY, r#""9""#.to_string()).await.unwrap();

        let repo = ProgressRepository::new(store);
        assert_eq!(repo.load_stats(grade(3)).await, None);
        assert!(repo.load_solved(grade(3)).await.is_empty());
        assert_eq!(repo.load_reward_balance().await, 0);
        assert_eq!(repo.load_current_grade().await, None);
    }

    #[tokio::test]
    async fn test_failed_save_is_retried() {
        let store = Arc::new(MemoryStore::new());
        let repo = ProgressRepository::new(store.clone());

        store.set_fail_writes(true);
        repo.save_reward_balance(20);
        assert_eq!(repo.flush().await.unwrap(), 1);
        assert_eq!(repo.load_reward_balance().await, 0);

        store.set_fail_writes(false);
        repo.save_current_grade(grade(2));
        assert_eq!(repo.flush().await.unwrap(), 0);
        assert_eq!(repo.load_reward_balance().await, 20);
        assert_eq!(repo.load_current_grade().await, Some(grade(2)));
    }
}
