use crate::word::{GradeSelector, WordHints};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

/// Balloons available at the start of every round
pub const MAX_LIVES: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

/// How a guessed letter is checked against the hidden word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GuessMode {
    /// Any position; every distinct letter must be found
    FreeLetter,
    /// Only the next unrevealed position, picked from shuffled tiles
    Positional,
}

impl FromStr for GuessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" | "free-letter" | "keyboard" => Ok(GuessMode::FreeLetter),
            "positional" | "tiles" => Ok(GuessMode::Positional),
            other => Err(format!("unknown guess mode: {:?}", other)),
        }
    }
}

impl fmt::Display for GuessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuessMode::FreeLetter => f.write_str("free"),
            GuessMode::Positional => f.write_str("positional"),
        }
    }
}

/// Result of evaluating a single guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind")]
pub enum GuessOutcome {
    Correct,
    Incorrect { lives_remaining: u8 },
    RoundWon,
    RoundLost,
}

impl GuessOutcome {
    pub fn ends_round(&self) -> bool {
        matches!(self, GuessOutcome::RoundWon | GuessOutcome::RoundLost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoundResult {
    Won,
    Lost,
}

/// Emitted exactly once when a round reaches a terminal status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundCompletion {
    pub round_id: Uuid,
    pub word_id: String,
    pub solution: String,
    pub word_length: usize,
    pub result: RoundResult,
    pub finished_at: String, // ISO 8601 string
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoundKind {
    /// A normal round over a real word
    Word,
    /// Every word of the grade has been solved
    AllSolved,
    /// The grade has no words at all
    Unavailable,
}

/// What the presentation layer renders for the current round.
/// The target word is only present in `solution` once the round is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundView {
    pub kind: RoundKind,
    #[ts(type = "string")]
    pub grade: GradeSelector,
    pub round_id: Option<Uuid>,
    pub word_id: Option<String>,
    pub display: String,
    pub word_length: usize,
    pub hints: WordHints,
    pub category: String,
    pub mode: GuessMode,
    pub status: GameStatus,
    pub lives_remaining: u8,
    pub max_lives: u8,
    pub attempted_letters: Vec<char>,
    pub wrong_letters: Vec<char>,
    pub letter_tiles: Vec<char>,
    pub solution: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mode_from_str() {
        assert_eq!("free".parse::<GuessMode>(), Ok(GuessMode::FreeLetter));
        assert_eq!("Positional".parse::<GuessMode>(), Ok(GuessMode::Positional));
        assert_eq!("tiles".parse::<GuessMode>(), Ok(GuessMode::Positional));
        assert!("wordle".parse::<GuessMode>().is_err());
    }

    #[test]
    fn test_outcome_wire_shape() {
        let json = serde_json::to_value(GuessOutcome::Incorrect { lives_remaining: 4 }).unwrap();
        assert_eq!(json["kind"], "Incorrect");
        assert_eq!(json["lives_remaining"], 4);

        let json = serde_json::to_value(GuessOutcome::RoundWon).unwrap();
        assert_eq!(json["kind"], "RoundWon");
    }

    #[test]
    fn test_ends_round() {
        assert!(GuessOutcome::RoundWon.ends_round());
        assert!(GuessOutcome::RoundLost.ends_round());
        assert!(!GuessOutcome::Correct.ends_round());
        assert!(!GuessOutcome::Incorrect { lives_remaining: 1 }.ends_round());
    }
}
