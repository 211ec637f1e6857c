use crate::game_state::RoundId;
use voca_types::{GradeSelector, GuessMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    RoundStarted {
        round_id: RoundId,
        word_id: String,
        grade: GradeSelector,
        mode: GuessMode,
    },
    LetterAccepted {
        round_id: RoundId,
        letter: char,
    },
    LetterRejected {
        round_id: RoundId,
        letter: char,
        lives_remaining: u8,
    },
    RoundWon {
        round_id: RoundId,
        word_id: String,
        reward: u32,
    },
    RoundLost {
        round_id: RoundId,
        word_id: String,
        solution: String,
    },
    PoolExhausted {
        grade: GradeSelector,
    },
    GradeReset {
        grade: GradeSelector,
    },
}

impl GameEvent {
    pub fn round_id(&self) -> Option<RoundId> {
        match self {
            GameEvent::RoundStarted { round_id, .. } => Some(*round_id),
            GameEvent::LetterAccepted { round_id, .. } => Some(*round_id),
            GameEvent::LetterRejected { round_id, .. } => Some(*round_id),
            GameEvent::RoundWon { round_id, .. } => Some(*round_id),
            GameEvent::RoundLost { round_id, .. } => Some(*round_id),
            GameEvent::PoolExhausted { .. } => None,
            GameEvent::GradeReset { .. } => None,
        }
    }
}

/// Event handler trait for processing game events
pub trait GameEventHandler: Send {
    fn handle_event(&mut self, event: GameEvent);
}

/// Simple event bus for distributing game events
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for GameEventBus {
    fn default() -> Self {
        Self::new()
    }
}
