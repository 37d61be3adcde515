//! Game simulation
//!
//! All gameplay logic lives here, free of rendering and platform code:
//! - Level controller state machine driven by pointer input and animation
//!   completions
//! - Seeded RNG only (geometry rolls, background tint)
//! - Animation and persistence reached through traits

pub mod autoplay;
pub mod controller;
pub mod geometry;
pub mod state;

pub use autoplay::AutoPlayer;
pub use controller::LevelController;
pub use geometry::{DropOutcome, LevelGeometry};
pub use state::{DropAttempt, GameEvent, GameState, Hud};
