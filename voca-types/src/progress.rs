use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;

/// Cumulative results for one grade selector.
///
/// `best_streak` never decreases and is never below `current_streak`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GradeStats {
    pub wins: u32,
    pub losses: u32,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl GradeStats {
    pub fn record_win(&mut self) {
        self.wins += 1;
        self.current_streak += 1;
        self.best_streak = self.best_streak.max(self.current_streak);
    }

    pub fn record_loss(&mut self) {
        self.losses += 1;
        self.current_streak = 0;
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses
    }
}

/// Word ids already won under one grade selector.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolvedIndex(BTreeSet<String>);

impl SolvedIndex {
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns false when the id was already present
    pub fn insert(&mut self, word_id: impl Into<String>) -> bool {
        self.0.insert(word_id.into())
    }

    pub fn contains(&self, word_id: &str) -> bool {
        self.0.contains(word_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SolvedIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
