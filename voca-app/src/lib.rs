pub mod config;
pub mod game_controller;
pub mod progress_tracker;
pub mod sound;
pub mod terminal;

pub use game_controller::GameController;
pub use progress_tracker::{ProgressTracker, WinRecord};
