//! What each player can see.

pub mod projector;

pub use projector::{project, VisibleCell, VisiblePlayer, VisibleWindow};
