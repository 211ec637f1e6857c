pub mod corpus;
pub mod errors;
pub mod feedback;
pub mod game_events;
pub mod game_state;
pub mod scoring;
pub mod word_pool;

// Re-export main components
pub use corpus::*;
pub use errors::*;
pub use feedback::*;
pub use game_events::*;
pub use game_state::*;
pub use scoring::*;
pub use word_pool::*;
