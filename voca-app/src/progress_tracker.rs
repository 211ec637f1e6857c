use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, info};

use voca_core::RewardTable;
use voca_persistence::repositories::ProgressRepository;
use voca_types::{GradeSelector, GradeStats, SolvedIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinRecord {
    pub stats: GradeStats,
    pub reward: u32,
    pub reward_balance: u64,
    pub newly_solved: bool,
}

/// Per-grade stats, solved history and the reward balance.
///
/// Every mutation updates memory first and queues the changed keys on the
/// repository; the in-memory values are authoritative for the session.
pub struct ProgressTracker {
    repository: ProgressRepository,
    stats: HashMap<GradeSelector, GradeStats>,
    solved: HashMap<GradeSelector, SolvedIndex>,
    reward_balance: u64,
    current_grade: GradeSelector,
    rewards: RewardTable,
    reset_stats_on_grade_reset: bool,
}

impl ProgressTracker {
    /// Load everything saved for grades 1-6 and `all`
    pub async fn load(
        repository: ProgressRepository,
        rewards: RewardTable,
        reset_stats_on_grade_reset: bool,
    ) -> Self {
        let mut stats = HashMap::new();
        let mut solved = HashMap::new();
        for grade in GradeSelector::every() {
            if let Some(grade_stats) = repository.load_stats(grade).await {
                stats.insert(grade, grade_stats);
            }
            solved.insert(grade, repository.load_solved(grade).await);
        }
        let reward_balance = repository.load_reward_balance().await;
        let current_grade = repository.load_current_grade().await.unwrap_or_default();

        info!(
            "Loaded progress: {} grades played, reward balance {}, current grade {}",
            stats.len(),
            reward_balance,
            current_grade
        );

        Self {
            repository,
            stats,
            solved,
            reward_balance,
            current_grade,
            rewards,
            reset_stats_on_grade_reset,
        }
    }

    pub fn stats(&self, grade: GradeSelector) -> GradeStats {
        self.stats.get(&grade).copied().unwrap_or_default()
    }

    /// Stats for every grade that has been played, in selector order
    pub fn played_grades(&self) -> Vec<(GradeSelector, GradeStats)> {
        GradeSelector::every()
            .filter_map(|grade| self.stats.get(&grade).map(|stats| (grade, *stats)))
            .collect()
    }

    pub fn solved(&self, grade: GradeSelector) -> &SolvedIndex {
        static EMPTY: SolvedIndex = SolvedIndex::new();
        self.solved.get(&grade).unwrap_or(&EMPTY)
    }

    pub fn reward_balance(&self) -> u64 {
        self.reward_balance
    }

    pub fn rewards(&self) -> RewardTable {
        self.rewards
    }

    pub fn current_grade(&self) -> GradeSelector {
        self.current_grade
    }

    pub fn set_current_grade(&mut self, grade: GradeSelector) {
        if self.current_grade != grade {
            self.current_grade = grade;
            self.repository.save_current_grade(grade);
        }
    }

    /// Credit a won word: solved history, streaks and reward balance
    pub fn record_win(&mut self, grade: GradeSelector, word_id: &str, word_length: usize) -> WinRecord {
        let solved = self.solved.entry(grade).or_default();
        let newly_solved = solved.insert(word_id);
        if newly_solved {
            self.repository.save_solved(grade, solved);
        }

        let stats = self.stats.entry(grade).or_default();
        stats.record_win();
        let stats = *stats;
        self.repository.save_stats(grade, &stats);

        let reward = self.rewards.reward_for(word_length);
        self.reward_balance += u64::from(reward);
        self.repository.save_reward_balance(self.reward_balance);

        info!(
            "Win recorded for grade {}: {} (+{} points, streak {})",
            grade, word_id, reward, stats.current_streak
        );

        WinRecord {
            stats,
            reward,
            reward_balance: self.reward_balance,
            newly_solved,
        }
    }

    /// A lost word stays unsolved and may come back
    pub fn record_loss(&mut self, grade: GradeSelector) -> GradeStats {
        let stats = self.stats.entry(grade).or_default();
        stats.record_loss();
        let stats = *stats;
        self.repository.save_stats(grade, &stats);

        info!("Loss recorded for grade {} (best streak {})", grade, stats.best_streak);
        stats
    }

    /// Forget which words were solved for `grade` so they can be replayed
    pub fn reset_grade(&mut self, grade: GradeSelector) {
        let solved = self.solved.entry(grade).or_default();
        solved.clear();
        self.repository.save_solved(grade, solved);

        if self.reset_stats_on_grade_reset {
            let stats = GradeStats::default();
            self.stats.insert(grade, stats);
            self.repository.save_stats(grade, &stats);
            debug!("Stats cleared for grade {}", grade);
        }

        info!("Solved history reset for grade {}", grade);
    }

    /// Wait for queued writes; returns how many keys are still unsaved
    pub async fn flush(&self) -> Result<usize> {
        self.repository.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use voca_persistence::{MemoryStore, PersistentStore};
    use voca_types::Grade;

    fn grade(n: u8) -> GradeSelector {
        GradeSelector::Grade(Grade::new(n).unwrap())
    }

    async fn tracker_with(store: Arc<MemoryStore>, reset_stats: bool) -> ProgressTracker {
        let repository = ProgressRepository::new(store);
        ProgressTracker::load(repository, RewardTable::default(), reset_stats).await
    }

    #[tokio::test]
    async fn test_fresh_tracker_defaults() {
        let tracker = tracker_with(Arc::new(MemoryStore::new()), false).await;
        assert_eq!(tracker.stats(grade(1)), GradeStats::default());
        assert!(tracker.solved(GradeSelector::All).is_empty());
        assert_eq!(tracker.reward_balance(), 0);
        assert_eq!(tracker.current_grade(), grade(1));
        assert!(tracker.played_grades().is_empty());
    }

    #[tokio::test]
    async fn test_record_win_updates_everything() {
        let mut tracker = tracker_with(Arc::new(MemoryStore::new()), false).await;

        let record = tracker.record_win(grade(2), "cat", 3);
        assert!(record.newly_solved);
        assert_eq!(record.reward, 10);
        assert_eq!(record.stats.wins, 1);
        assert_eq!(record.stats.current_streak, 1);
        assert_eq!(record.stats.best_streak, 1);

        let record = tracker.record_win(grade(2), "apple", 5);
        assert_eq!(record.reward, 20);
        assert_eq!(record.reward_balance, 30);
        assert_eq!(record.stats.current_streak, 2);

        assert!(tracker.solved(grade(2)).contains("cat"));
        assert!(tracker.solved(grade(2)).contains("apple"));
        assert!(tracker.solved(grade(3)).is_empty());
    }

    #[tokio::test]
    async fn test_record_win_is_idempotent_for_solved_ids() {
        let mut tracker = tracker_with(Arc::new(MemoryStore::new()), false).await;
        tracker.record_win(grade(1), "cat", 3);
        let record = tracker.record_win(grade(1), "cat", 3);
        assert!(!record.newly_solved);
        assert_eq!(tracker.solved(grade(1)).len(), 1);
    }

    #[tokio::test]
    async fn test_record_loss_resets_streak_only() {
        let mut tracker = tracker_with(Arc::new(MemoryStore::new()), false).await;
        tracker.record_win(grade(1), "cat", 3);
        tracker.record_win(grade(1), "dog", 3);
        let stats = tracker.record_loss(grade(1));

        assert_eq!(stats.losses, 1);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.best_streak, 2);
        assert_eq!(tracker.solved(grade(1)).len(), 2);
        assert_eq!(tracker.reward_balance(), 20);
    }

    #[tokio::test]
    async fn test_progress_survives_reload() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut tracker = tracker_with(store.clone(), false).await;
            tracker.record_win(GradeSelector::All, "sun_1_0", 3);
            tracker.record_win(GradeSelector::All, "rainbow_2_0", 7);
            tracker.record_loss(grade(4));
            tracker.set_current_grade(GradeSelector::All);
            assert_eq!(tracker.flush().await.unwrap(), 0);
        }

        let tracker = tracker_with(store, false).await;
        assert_eq!(
            tracker.stats(GradeSelector::All),
            GradeStats {
                wins: 2,
                losses: 0,
                current_streak: 2,
                best_streak: 2
            }
        );
        assert_eq!(tracker.stats(grade(4)).losses, 1);
        assert_eq!(tracker.solved(GradeSelector::All).len(), 2);
        assert_eq!(tracker.reward_balance(), 30);
        assert_eq!(tracker.current_grade(), GradeSelector::All);
        assert_eq!(
            tracker.played_grades().iter().map(|(g, _)| *g).collect::<Vec<_>>(),
            vec![grade(4), GradeSelector::All]
        );
    }

    #[tokio::test]
    async fn test_reset_grade_keeps_stats_by_default() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker_with(store.clone(), false).await;
        tracker.record_win(grade(3), "owl", 3);
        tracker.reset_grade(grade(3));

        assert!(tracker.solved(grade(3)).is_empty());
        assert_eq!(tracker.stats(grade(3)).best_streak, 1);
        tracker.flush().await.unwrap();
        assert_eq!(store.get("solved_3").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_reset_grade_can_clear_stats() {
        let mut tracker = tracker_with(Arc::new(MemoryStore::new()), true).await;
        tracker.record_win(grade(3), "owl", 3);
        tracker.record_win(grade(5), "fox", 3);
        tracker.reset_grade(grade(3));

        assert_eq!(tracker.stats(grade(3)), GradeStats::default());
        assert_eq!(tracker.stats(grade(5)).wins, 1);
        // Reward balance is global and unaffected
        assert_eq!(tracker.reward_balance(), 20);
    }

    #[tokio::test]
    async fn test_write_failures_do_not_lose_memory_state() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = tracker_with(store.clone(), false).await;

        store.set_fail_writes(true);
        tracker.record_win(grade(1), "cat", 3);
        assert!(tracker.flush().await.unwrap() > 0);
        assert_eq!(tracker.stats(grade(1)).wins, 1);

        store.set_fail_writes(false);
        tracker.record_win(grade(1), "dog", 3);
        assert_eq!(tracker.flush().await.unwrap(), 0);
        assert_eq!(
            store.get("stats_1").await.unwrap().as_deref(),
            Some(r#"{"wins":2,"losses":0,"currentStreak":2,"bestStreak":2}"#)
        );
    }
}
