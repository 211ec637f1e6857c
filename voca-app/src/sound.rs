use anyhow::Result;
use tracing::info;

use voca_core::{SoundBank, SoundCue};

/// Sound bank for the terminal: cues become log lines and, optionally, a bell.
#[derive(Debug, Default)]
pub struct LoggingSoundBank {
    bell: bool,
    played: usize,
}

impl LoggingSoundBank {
    pub fn new(bell: bool) -> Self {
        Self { bell, played: 0 }
    }

    pub fn played(&self) -> usize {
        self.played
    }
}

impl SoundBank for LoggingSoundBank {
    fn load(&mut self) -> Result<()> {
        info!("Sound cues ready");
        Ok(())
    }

    fn play(&mut self, cue: SoundCue) -> Result<()> {
        self.played += 1;
        info!("Sound cue: {:?}", cue);
        if self.bell && matches!(cue, SoundCue::Success | SoundCue::Fail) {
            print!("\x07");
        }
        Ok(())
    }

    fn unload(&mut self) {
        info!("Sound cues released after {} plays", self.played);
    }
}
