pub mod config;
pub mod render;
mod scheduler;
pub mod session;
pub mod state;
mod ticker;

#[cfg(test)]
mod testing;

pub use session::{FeedSession, SessionConfig};
pub use state::{DisplayStatus, FeedState};
