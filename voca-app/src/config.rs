use anyhow::{Result, anyhow};
use std::env;
use std::fmt::Display;
use std::str::FromStr;

use voca_core::RewardTable;
use voca_persistence::connection::DEFAULT_DATABASE_URL;
use voca_types::GuessMode;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub words_directory: String,
    pub guess_mode: GuessMode,
    pub rewards: RewardTable,
    pub reset_stats_on_grade_reset: bool,
}

impl Config {
    /// Read the configuration from the environment, falling back to defaults
    pub fn new() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RewardTable::default();
        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            words_directory: lookup("WORDS_DIRECTORY").unwrap_or_else(|| "./assets/data".to_string()),
            guess_mode: parse_var(&lookup, "GUESS_MODE", GuessMode::Positional)?,
            rewards: RewardTable::new(
                parse_var(&lookup, "LONG_WORD_THRESHOLD", defaults.long_word_threshold)?,
                parse_var(&lookup, "SHORT_WORD_REWARD", defaults.short_word_reward)?,
                parse_var(&lookup, "LONG_WORD_REWARD", defaults.long_word_reward)?,
            ),
            reset_stats_on_grade_reset: parse_var(&lookup, "RESET_STATS_ON_GRADE_RESET", false)?,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {}={:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}
