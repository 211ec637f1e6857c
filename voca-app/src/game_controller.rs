use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::progress_tracker::ProgressTracker;
use voca_core::{
    CurrentRound, GameError, GameEvent, GameEventBus, GameSession, WordCorpus, WordPool,
};
use voca_types::{
    GameStatus, GradeSelector, GradeStats, GuessMode, GuessOutcome, RoundCompletion, RoundResult,
    RoundView,
};

/// Ties the word pool, the round state machine and the progress tracker
/// together for a single player.
///
/// Everything here is synchronous; persistence happens behind the tracker's
/// write queue and is awaited only by `persist`.
pub struct GameController {
    corpus: Arc<WordCorpus>,
    tracker: ProgressTracker,
    events: GameEventBus,
    mode: GuessMode,
    grade: GradeSelector,
    pool: Option<WordPool>,
    round: CurrentRound,
}

impl GameController {
    /// Resume on the remembered grade and deal the first word
    pub fn start(
        corpus: Arc<WordCorpus>,
        tracker: ProgressTracker,
        mode: GuessMode,
        events: GameEventBus,
    ) -> Self {
        let grade = tracker.current_grade();
        let mut controller = Self {
            corpus,
            tracker,
            events,
            mode,
            grade,
            pool: None,
            round: CurrentRound::Unavailable {
                grade,
                reason: "Not started".to_string(),
            },
        };
        controller.select_grade(grade);
        controller
    }

    /// Switch to `grade` and deal a word from it.
    ///
    /// A grade without words falls back to grade 1. If grade 1 has none
    /// either, the controller parks in the `Unavailable` state.
    pub fn select_grade(&mut self, grade: GradeSelector) {
        let pool = match WordPool::load_candidates(&self.corpus, grade) {
            Ok(pool) => Ok(pool),
            Err(e) if grade != GradeSelector::DEFAULT => {
                warn!("{}; falling back to grade {}", e, GradeSelector::DEFAULT);
                WordPool::load_candidates(&self.corpus, GradeSelector::DEFAULT)
            }
            Err(e) => Err(e),
        };

        match pool {
            Ok(pool) => {
                self.grade = pool.grade();
                self.pool = Some(pool);
                self.tracker.set_current_grade(self.grade);
                info!("Playing grade {} in {} mode", self.grade, self.mode);
                self.deal();
            }
            Err(e) => {
                error!("No playable words: {}", e);
                self.grade = grade;
                self.pool = None;
                self.round = CurrentRound::Unavailable {
                    grade,
                    reason: e.to_string(),
                };
            }
        }
    }

    /// Move on to another word.
    ///
    /// An unfinished round is abandoned without touching stats. On the
    /// all-solved screen the grade's solved history is reset first.
    pub fn next_round(&mut self) {
        match &self.round {
            CurrentRound::AllSolved { grade } => {
                let grade = *grade;
                self.reset_grade(grade);
            }
            CurrentRound::Unavailable { .. } => {
                self.select_grade(self.grade);
                return;
            }
            CurrentRound::Active(session) if session.status() == GameStatus::Playing => {
                info!("Round {} abandoned", session.round_id());
            }
            CurrentRound::Active(_) => {}
        }
        self.deal();
    }

    /// Guess one letter of the current word
    pub fn submit_guess(&mut self, guess: char) -> Result<GuessOutcome, GameError> {
        let session = self.round.session_mut().ok_or(GameError::NoActiveRound)?;
        let outcome = session.evaluate_guess(guess)?;

        let round_id = session.round_id();
        let letter = session.attempted_letters().last().copied().unwrap_or(guess);
        let lives_remaining = session.lives_remaining();
        let event = match outcome {
            GuessOutcome::Correct | GuessOutcome::RoundWon => GameEvent::LetterAccepted { round_id, letter },
            GuessOutcome::Incorrect { .. } | GuessOutcome::RoundLost => GameEvent::LetterRejected {
                round_id,
                letter,
                lives_remaining,
            },
        };
        self.events.publish(event);

        if outcome.ends_round() {
            self.report_completion();
        }
        Ok(outcome)
    }

    /// Give up the current word, counting it as a loss
    pub fn forfeit(&mut self) -> Result<(), GameError> {
        let session = self.round.session_mut().ok_or(GameError::NoActiveRound)?;
        if !session.finalize_loss() {
            return Err(GameError::RoundFinished {
                status: session.status(),
            });
        }
        self.report_completion();
        Ok(())
    }

    /// Clear the solved history of the current grade
    pub fn reset_progress(&mut self) {
        self.reset_grade(self.grade);
        if self.round.is_all_solved() {
            self.deal();
        }
    }

    fn reset_grade(&mut self, grade: GradeSelector) {
        self.tracker.reset_grade(grade);
        self.events.publish(GameEvent::GradeReset { grade });
    }

    fn deal(&mut self) {
        let Some(pool) = &self.pool else {
            warn!("No word pool loaded for grade {}", self.grade);
            return;
        };

        let picked = pool
            .pick_random(self.tracker.solved(self.grade), &mut rand::thread_rng())
            .cloned();

        match picked {
            Ok(word) => {
                let session = GameSession::start_round(word, self.mode);
                self.events.publish(GameEvent::RoundStarted {
                    round_id: session.round_id(),
                    word_id: session.word().id.clone(),
                    grade: self.grade,
                    mode: self.mode,
                });
                self.round = CurrentRound::Active(session);
            }
            Err(e) => {
                info!("{}", e);
                self.round = CurrentRound::AllSolved { grade: self.grade };
                self.events.publish(GameEvent::PoolExhausted { grade: self.grade });
            }
        }
    }

    fn report_completion(&mut self) {
        let Some(session) = self.round.session_mut() else {
            return;
        };
        let Some(RoundCompletion {
            round_id,
            word_id,
            solution,
            word_length,
            result,
            ..
        }) = session.take_completion()
        else {
            return;
        };

        let event = match result {
            RoundResult::Won => {
                let record = self.tracker.record_win(self.grade, &word_id, word_length);
                GameEvent::RoundWon {
                    round_id,
                    word_id,
                    reward: record.reward,
                }
            }
            RoundResult::Lost => {
                self.tracker.record_loss(self.grade);
                GameEvent::RoundLost {
                    round_id,
                    word_id,
                    solution,
                }
            }
        };
        self.events.publish(event);
    }

    pub fn view(&self) -> RoundView {
        self.round.view(self.grade, self.mode)
    }

    pub fn round(&self) -> &CurrentRound {
        &self.round
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.round.session()
    }

    pub fn grade(&self) -> GradeSelector {
        self.grade
    }

    pub fn mode(&self) -> GuessMode {
        self.mode
    }

    pub fn stats(&self) -> GradeStats {
        self.tracker.stats(self.grade)
    }

    pub fn played_grades(&self) -> Vec<(GradeSelector, GradeStats)> {
        self.tracker.played_grades()
    }

    pub fn reward_balance(&self) -> u64 {
        self.tracker.reward_balance()
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Wait until every queued progress write has been attempted.
    /// Returns how many keys could not be saved.
    pub async fn persist(&self) -> Result<usize> {
        let pending = self.tracker.flush().await?;
        if pending > 0 {
            warn!("{} progress entries are not saved yet", pending);
        }
        Ok(pending)
    }
}
