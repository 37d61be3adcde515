//! Demo player
//!
//! Presses when the block is waiting, aims for a width somewhat under the
//! hole, and releases once the planned hold time has passed. Used by the
//! native headless demo.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::controller::LevelController;
use super::geometry::LevelGeometry;
use super::state::GameState;
use crate::anim::Animator;
use crate::options::GameOptions;
use crate::persistence::Storage;

#[derive(Debug, Clone)]
pub struct AutoPlayer {
    rng: Pcg32,
    /// 1.0 never overshoots the hole; lower values aim wider
    accuracy: f32,
    /// Hold time left on the current press
    holding: Option<f32>,
}

impl AutoPlayer {
    pub fn new(seed: u64, accuracy: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            accuracy: accuracy.clamp(0.0, 1.0),
            holding: None,
        }
    }

    /// Hold time for a width just under the hole, overshooting by up to
    /// `1 - accuracy` of the hole
    pub fn plan_hold(&mut self, geometry: &LevelGeometry, options: &GameOptions) -> f32 {
        let overshoot = 1.0 - self.accuracy;
        let share = self.rng.random_range(0.75..=0.98 + overshoot);
        options.hold_for_width(geometry.hole_width as f32 * share)
    }

    /// Feed pointer input for one frame, `dt` ms before the next update
    ///
    /// Releases early rather than late: the block never grows past the
    /// planned hold.
    pub fn update<A: Animator, S: Storage>(
        &mut self,
        controller: &mut LevelController<A, S>,
        dt: f32,
    ) {
        match (controller.state(), self.holding) {
            (GameState::Waiting, None) => {
                let hold = self.plan_hold(controller.geometry(), controller.options());
                log::debug!("Auto player holding for {:.0} ms", hold);
                controller.on_pointer_down();
                if hold < dt {
                    controller.on_pointer_up();
                } else {
                    self.holding = Some(hold);
                }
            }
            (GameState::Growing, Some(left)) => {
                let left = left - dt;
                if left < dt {
                    controller.on_pointer_up();
                    self.holding = None;
                } else {
                    self.holding = Some(left);
                }
            }
            (GameState::Growing, None) => controller.on_pointer_up(),
            (_, Some(_)) => self.holding = None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::Timeline;
    use crate::persistence::MemoryStorage;
    use crate::sim::{DropOutcome, GameEvent};

    #[test]
    fn test_perfect_player_never_overshoots() {
        let options = GameOptions::default();
        let mut player = AutoPlayer::new(5, 1.0);
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..1000 {
            let geometry = LevelGeometry::roll(&mut rng, &options);
            let hold = player.plan_hold(&geometry, &options);
            let width = options.grown_width(hold / options.grow_time);
            assert!(
                width <= geometry.hole_width as f32 + 0.01,
                "width {} for hole {}",
                width,
                geometry.hole_width
            );
        }
    }

    #[test]
    fn test_perfect_player_clears_levels() {
        let mut controller =
            LevelController::new(GameOptions::default(), Timeline::new(), MemoryStorage::new(), 77)
                .unwrap();
        let mut player = AutoPlayer::new(77, 1.0);
        controller.on_enter();

        // 1 + 2 + 3 drops at roughly 3.5 s each
        for _ in 0..(30_000 / 10) {
            player.update(&mut controller, 10.0);
            for handle in controller.animator_mut().advance(10.0) {
                controller.on_animation_complete(handle);
            }
        }

        assert!(controller.level() >= 4, "reached level {}", controller.level());
        let events = controller.drain_events();
        assert!(events.iter().all(|e| !matches!(
            e,
            GameEvent::Dropped {
                outcome: DropOutcome::LedgeFail | DropOutcome::TotalMiss,
                ..
            }
        )));
    }
}
