use crate::game_events::{GameEvent, GameEventHandler};
use anyhow::Result;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Correct,
    Wrong,
    Success,
    Fail,
}

impl SoundCue {
    pub fn for_event(event: &GameEvent) -> Option<SoundCue> {
        match event {
            GameEvent::LetterAccepted { .. } => Some(SoundCue::Correct),
            GameEvent::LetterRejected { .. } => Some(SoundCue::Wrong),
            GameEvent::RoundWon { .. } => Some(SoundCue::Success),
            GameEvent::RoundLost { .. } => Some(SoundCue::Fail),
            _ => None,
        }
    }
}

/// Audio capability supplied by the host.
pub trait SoundBank: Send {
    fn load(&mut self) -> Result<()>;
    fn play(&mut self, cue: SoundCue) -> Result<()>;
    fn unload(&mut self);
}

/// Owns a loaded `SoundBank` for the lifetime of a game session and
/// releases it on drop. Playback failures never reach the game.
pub struct SoundScope<B: SoundBank> {
    bank: B,
    loaded: bool,
}

impl<B: SoundBank> SoundScope<B> {
    pub fn acquire(mut bank: B) -> Self {
        let loaded = match bank.load() {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to preload sounds: {:#}", e);
                false
            }
        };
        Self { bank, loaded }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn play(&mut self, cue: SoundCue) {
        if !self.loaded {
            // Preloading failed, try again before playing
            match self.bank.load() {
                Ok(()) => self.loaded = true,
                Err(e) => {
                    debug!("Sounds still unavailable, skipping {:?}: {:#}", cue, e);
                    return;
                }
            }
        }
        if let Err(e) = self.bank.play(cue) {
            warn!("Error playing {:?} sound: {:#}", cue, e);
        }
    }
}

impl<B: SoundBank> GameEventHandler for SoundScope<B> {
    fn handle_event(&mut self, event: GameEvent) {
        if let Some(cue) = SoundCue::for_event(&event) {
            self.play(cue);
        }
    }
}

impl<B: SoundBank> Drop for SoundScope<B> {
    fn drop(&mut self) {
        if self.loaded {
            self.bank.unload();
            self.loaded = false;
        }
    }
}
