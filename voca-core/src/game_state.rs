use crate::errors::GameError;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};
use uuid::Uuid;
use voca_types::{
    GameStatus, GradeSelector, GuessMode, GuessOutcome, MAX_LIVES, RoundCompletion, RoundKind,
    RoundResult, RoundView, WordEntry, WordHints,
};

pub type RoundId = Uuid;

/// State machine for one round over one word.
///
/// Status only moves `Playing -> Won` or `Playing -> Lost`. A new round is a
/// new `GameSession`.
#[derive(Debug, Clone)]
pub struct GameSession {
    round_id: RoundId,
    word: WordEntry,
    target: Vec<char>, // Uppercased
    mode: GuessMode,
    attempted: Vec<char>,
    revealed: BTreeSet<char>,
    wrong: Vec<char>,
    correct_positions: usize,
    tiles: Vec<char>,
    lives_remaining: u8,
    status: GameStatus,
    unreported: Option<RoundCompletion>,
}

impl GameSession {
    pub fn start_round(word: WordEntry, mode: GuessMode) -> Self {
        Self::start_round_with_rng(word, mode, &mut rand::thread_rng())
    }

    /// Start a round, shuffling the letter tiles with `rng`
    pub fn start_round_with_rng<R: Rng + ?Sized>(word: WordEntry, mode: GuessMode, rng: &mut R) -> Self {
        let target: Vec<char> = word.canonical().chars().collect();
        let mut tiles: Vec<char> = target.iter().copied().filter(|c| c.is_alphabetic()).collect();
        tiles.shuffle(rng);

        let mut session = Self {
            round_id: Uuid::new_v4(),
            word,
            target,
            mode,
            attempted: Vec::new(),
            revealed: BTreeSet::new(),
            wrong: Vec::new(),
            correct_positions: 0,
            tiles,
            lives_remaining: MAX_LIVES,
            status: GameStatus::Playing,
            unreported: None,
        };
        session.skip_unguessable();

        info!(
            "Round {} started: word {} ({} letters, {} mode)",
            session.round_id,
            session.word.id,
            session.word.letter_count(),
            mode
        );
        session
    }

    /// Check one letter against the word.
    ///
    /// Invalid input and guesses after the round ended are rejected without
    /// touching any state.
    pub fn evaluate_guess(&mut self, guess: char) -> Result<GuessOutcome, GameError> {
        if self.status != GameStatus::Playing {
            return Err(GameError::RoundFinished { status: self.status });
        }
        let letter = normalize_letter(guess)?;
        self.attempted.push(letter);

        let hit = match self.mode {
            GuessMode::FreeLetter => {
                if self.target.contains(&letter) {
                    self.revealed.insert(letter);
                    true
                } else {
                    false
                }
            }
            GuessMode::Positional => {
                if self.target.get(self.correct_positions) == Some(&letter) {
                    self.correct_positions += 1;
                    self.skip_unguessable();
                    if let Some(index) = self.tiles.iter().position(|&t| t == letter) {
                        self.tiles.remove(index);
                    }
                    true
                } else {
                    false
                }
            }
        };

        if hit {
            debug!("Round {}: {} accepted", self.round_id, letter);
            if self.is_solved() {
                self.finalize_win();
                return Ok(GuessOutcome::RoundWon);
            }
            return Ok(GuessOutcome::Correct);
        }

        self.wrong.push(letter);
        self.lives_remaining = self.lives_remaining.saturating_sub(1);
        debug!(
            "Round {}: {} rejected, {} lives left",
            self.round_id, letter, self.lives_remaining
        );

        if self.lives_remaining == 0 {
            self.finalize_loss();
            return Ok(GuessOutcome::RoundLost);
        }
        Ok(GuessOutcome::Incorrect {
            lives_remaining: self.lives_remaining,
        })
    }

    /// Mark the round won. Only succeeds once, and only when every letter is found.
    pub fn finalize_win(&mut self) -> bool {
        if self.status != GameStatus::Playing {
            warn!("Round {} already finalized as {:?}", self.round_id, self.status);
            return false;
        }
        if !self.is_solved() {
            warn!("Round {} cannot be won before the word is complete", self.round_id);
            return false;
        }
        self.finish(RoundResult::Won);
        true
    }

    /// Mark the round lost. Also used when the player gives up.
    pub fn finalize_loss(&mut self) -> bool {
        if self.status != GameStatus::Playing {
            warn!("Round {} already finalized as {:?}", self.round_id, self.status);
            return false;
        }
        self.finish(RoundResult::Lost);
        true
    }

    fn finish(&mut self, result: RoundResult) {
        self.status = match result {
            RoundResult::Won => GameStatus::Won,
            RoundResult::Lost => GameStatus::Lost,
        };
        info!("Round {} finished: {:?} ({})", self.round_id, result, self.word.id);

        self.unreported = Some(RoundCompletion {
            round_id: self.round_id,
            word_id: self.word.id.clone(),
            solution: self.target.iter().collect(),
            word_length: self.word.letter_count(),
            result,
            finished_at: chrono::Utc::now().to_rfc3339(),
        });
    }

    /// Hand out the completion record. Returns `Some` at most once per round.
    pub fn take_completion(&mut self) -> Option<RoundCompletion> {
        self.unreported.take()
    }

    /// True once every guessable letter has been found
    pub fn is_solved(&self) -> bool {
        match self.mode {
            GuessMode::FreeLetter => self
                .target
                .iter()
                .filter(|c| c.is_alphabetic())
                .all(|c| self.revealed.contains(c)),
            GuessMode::Positional => self.correct_positions >= self.target.len(),
        }
    }

    // Positional mode never asks for spaces or punctuation
    fn skip_unguessable(&mut self) {
        if self.mode != GuessMode::Positional {
            return;
        }
        while self
            .target
            .get(self.correct_positions)
            .is_some_and(|c| !c.is_alphabetic())
        {
            self.correct_positions += 1;
        }
    }

    fn is_visible(&self, index: usize) -> bool {
        let c = self.target[index];
        if !c.is_alphabetic() || self.status != GameStatus::Playing {
            return true;
        }
        match self.mode {
            GuessMode::FreeLetter => self.revealed.contains(&c),
            GuessMode::Positional => index < self.correct_positions,
        }
    }

    /// The word with hidden letters as `_`, space separated
    pub fn display_word(&self) -> String {
        (0..self.target.len())
            .map(|i| if self.is_visible(i) { self.target[i] } else { '_' })
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn round_id(&self) -> RoundId {
        self.round_id
    }

    pub fn word(&self) -> &WordEntry {
        &self.word
    }

    pub fn mode(&self) -> GuessMode {
        self.mode
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn lives_remaining(&self) -> u8 {
        self.lives_remaining
    }

    pub fn attempted_letters(&self) -> &[char] {
        &self.attempted
    }

    pub fn wrong_letters(&self) -> &[char] {
        &self.wrong
    }

    pub fn correct_positions(&self) -> usize {
        self.correct_positions
    }

    pub fn revealed_letters(&self) -> impl Iterator<Item = char> + '_ {
        self.revealed.iter().copied()
    }

    /// Remaining pickable tiles (positional mode)
    pub fn letter_tiles(&self) -> &[char] {
        &self.tiles
    }

    /// The answer, once the round is over
    pub fn solution(&self) -> Option<String> {
        (self.status != GameStatus::Playing).then(|| self.target.iter().collect())
    }

    pub fn view(&self, grade: GradeSelector) -> RoundView {
        RoundView {
            kind: RoundKind::Word,
            grade,
            round_id: Some(self.round_id),
            word_id: Some(self.word.id.clone()),
            display: self.display_word(),
            word_length: self.word.letter_count(),
            hints: self.word.hints.clone(),
            category: self.word.category.clone(),
            mode: self.mode,
            status: self.status,
            lives_remaining: self.lives_remaining,
            max_lives: MAX_LIVES,
            attempted_letters: self.attempted.clone(),
            wrong_letters: self.wrong.clone(),
            letter_tiles: match self.mode {
                GuessMode::Positional => self.tiles.clone(),
                GuessMode::FreeLetter => Vec::new(),
            },
            solution: self.solution(),
        }
    }
}

fn normalize_letter(guess: char) -> Result<char, GameError> {
    let invalid = || GameError::InvalidGuess {
        input: guess.to_string(),
    };
    if !guess.is_alphabetic() {
        return Err(invalid());
    }
    let mut upper = guess.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(letter), None) => Ok(letter),
        _ => Err(invalid()),
    }
}

pub const ALL_SOLVED_MESSAGE: &str = "Congratulations! You solved every word in this grade.";
pub const NO_WORDS_MESSAGE: &str = "No words are available for this grade.";

/// Whatever the player is currently looking at
#[derive(Debug, Clone)]
pub enum CurrentRound {
    Active(GameSession),
    /// Every word in the grade is solved; no lives are used and guesses are refused
    AllSolved { grade: GradeSelector },
    /// Terminal error state: no grade could supply a word
    Unavailable { grade: GradeSelector, reason: String },
}

impl CurrentRound {
    pub fn session(&self) -> Option<&GameSession> {
        match self {
            CurrentRound::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession> {
        match self {
            CurrentRound::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_all_solved(&self) -> bool {
        matches!(self, CurrentRound::AllSolved { .. })
    }

    pub fn view(&self, grade: GradeSelector, mode: GuessMode) -> RoundView {
        let placeholder = |kind, message: String| RoundView {
            kind,
            grade,
            round_id: None,
            word_id: None,
            display: String::new(),
            word_length: 0,
            hints: WordHints {
                hint1: message,
                hint2: None,
            },
            category: String::new(),
            mode,
            status: GameStatus::Playing,
            lives_remaining: MAX_LIVES,
            max_lives: MAX_LIVES,
            attempted_letters: Vec::new(),
            wrong_letters: Vec::new(),
            letter_tiles: Vec::new(),
            solution: None,
        };

        match self {
            CurrentRound::Active(session) => session.view(grade),
            CurrentRound::AllSolved { .. } => {
                placeholder(RoundKind::AllSolved, ALL_SOLVED_MESSAGE.to_string())
            }
            CurrentRound::Unavailable { reason, .. } => {
                let mut view = placeholder(RoundKind::Unavailable, NO_WORDS_MESSAGE.to_string());
                view.hints.hint2 = Some(reason.clone());
                view.lives_remaining = 0;
                view
            }
        }
    }
}
