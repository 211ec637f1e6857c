pub mod game;
pub mod progress;
pub mod word;

// Re-export all types
pub use game::*;
pub use progress::*;
pub use word::*;
