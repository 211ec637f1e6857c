use thiserror::Error;
use voca_types::{GameStatus, GradeSelector};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("No words available for grade {grade}")]
    NoWordsAvailable { grade: GradeSelector },
    #[error("Every word for grade {grade} has been solved")]
    Exhausted { grade: GradeSelector },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Guess must be a single letter, got {input:?}")]
    InvalidGuess { input: String },
    #[error("Round already finished as {status:?}")]
    RoundFinished { status: GameStatus },
    #[error("No word is in play")]
    NoActiveRound,
}
