//! Game state and per-level bookkeeping

use serde::{Deserialize, Serialize};

use super::geometry::{DropOutcome, LevelGeometry};

/// Whether pointer input is accepted and what it triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Entrance or drop animation in flight; input ignored
    #[default]
    Idle,
    /// Block resting and wobbling; pointer-down starts growing
    Waiting,
    /// Pointer held, block growing; pointer-up drops it
    Growing,
}

/// Successful drops so far against the number the level asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropAttempt {
    success_count: u32,
    target: u32,
}

impl DropAttempt {
    pub fn new(target: u32) -> Self {
        Self {
            success_count: 0,
            target: target.max(1),
        }
    }

    pub fn success_count(&self) -> u32 {
        self.success_count
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    /// Drops still needed to clear the level
    pub fn remaining(&self) -> u32 {
        self.target - self.success_count
    }

    pub fn is_complete(&self) -> bool {
        self.success_count == self.target
    }

    /// Count a landed drop; saturates at the target
    pub fn record_success(&mut self) {
        if self.success_count < self.target {
            self.success_count += 1;
        }
    }
}

/// Text and tint the host shows on top of the scene
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hud {
    /// "level N" or the latest result message
    pub banner: String,
    /// Drawn on the block
    pub remaining: u32,
    /// Background color (0xRRGGBB)
    pub tint: u32,
    /// First-round overlay: landing zone plus hold/release instructions
    pub hint_visible: bool,
}

/// Something hosts may want to react to (sound, logging, analytics)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelEntered { level: u32 },
    RoundStarted { geometry: LevelGeometry },
    GrowStarted,
    Dropped { outcome: DropOutcome, width: f32 },
    LevelCompleted { level: u32 },
    LevelFailed { level: u32, outcome: DropOutcome },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_counts_toward_target() {
        let mut attempt = DropAttempt::new(3);
        assert_eq!(attempt.remaining(), 3);
        assert!(!attempt.is_complete());

        attempt.record_success();
        attempt.record_success();
        assert_eq!(attempt.success_count(), 2);
        assert_eq!(attempt.remaining(), 1);

        attempt.record_success();
        assert!(attempt.is_complete());

        // Never exceeds the target
        attempt.record_success();
        assert_eq!(attempt.success_count(), 3);
        assert_eq!(attempt.remaining(), 0);
    }

    #[test]
    fn test_attempt_target_is_at_least_one() {
        let attempt = DropAttempt::new(0);
        assert_eq!(attempt.target(), 1);
    }

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(GameState::default(), GameState::Idle);
    }
}
