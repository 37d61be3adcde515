//! Block Drop - grow a block and drop it into the hole
//!
//! Core modules:
//! - `sim`: Level controller state machine, level geometry, auto player
//! - `anim`: Animator contract and the host-clocked timeline
//! - `persistence`: Level save record on top of a key/value storage backend
//! - `options`: Game options (palette, ranges, timings, scene size)

pub mod anim;
pub mod error;
pub mod options;
pub mod persistence;
pub mod sim;

pub use error::{BlockDropError, Result};
pub use options::GameOptions;

/// Scene and animation constants
pub mod consts {
    /// Block spawn height (above the visible scene)
    pub const SPAWN_Y: f32 = -400.0;
    /// Height the block rests at while waiting for input
    pub const REST_Y: f32 = 150.0;

    /// Entrance tween (block drops in, floor/walls slide into place)
    pub const ENTRANCE_MS: f32 = 500.0;
    /// Angle the block arrives at
    pub const ENTRANCE_ANGLE: f32 = 50.0;

    /// One leg of the idle wobble (yoyo, repeats forever)
    pub const WOBBLE_MS: f32 = 300.0;
    pub const WOBBLE_ANGLE: f32 = 40.0;

    /// Rotation reset after release
    pub const SETTLE_MS: f32 = 300.0;

    /// Fall/bounce after the settle
    pub const DROP_MS: f32 = 600.0;

    /// Result banners
    pub const SUCCESS_MESSAGE: &str = "Yeah!!";
    pub const LEDGE_MESSAGE: &str = "Oh no!!!!!";
    pub const MISS_MESSAGE: &str = "Oh no!!";

    /// First-round overlay: instructions, then the label over the landing zone
    pub const HINT_LINES: [&str; 2] = ["tap and hold to grow", "release to drop"];
    pub const HINT_LABEL: &str = "land here";
}

/// Banner text shown while a level is in play
pub fn level_banner(level: u32) -> String {
    format!("level {}", level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_banner() {
        assert_eq!(level_banner(1), "level 1");
        assert_eq!(level_banner(12), "level 12");
    }

    #[test]
    fn test_hint_text() {
        assert_eq!(consts::HINT_LINES, ["tap and hold to grow", "release to drop"]);
        assert_eq!(consts::HINT_LABEL, "land here");
    }
}
