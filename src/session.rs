//! Dialogue sessions and their concurrent registry

mod store;
mod sweeper;

pub use store::{Session, SessionStats, SessionStore};
pub use sweeper::spawn_sweeper;
