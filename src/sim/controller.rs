//! Level controller
//!
//! Drives one scene of the game: the block drops in, wobbles until the
//! player presses, grows while held, and is judged once released. The
//! controller only reacts to pointer input and to completion handles coming
//! back from the [`Animator`]; it never blocks or draws.
//!
//! Every transition stops the animations it supersedes before issuing new
//! ones, and completions for anything but the pending step are dropped, so a
//! stale callback can never advance the state machine.

use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::geometry::{DropOutcome, LevelGeometry};
use super::state::{DropAttempt, GameEvent, GameState, Hud};
use crate::anim::{AnimHandle, Animator, Easing, Target, TweenProps};
use crate::consts::*;
use crate::error::Result;
use crate::level_banner;
use crate::options::GameOptions;
use crate::persistence::{LevelProgress, LevelStore, Storage};

/// Animation the controller is waiting on
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    /// Block dropping in from above
    Entrance,
    /// Rotation resetting after release
    Settle { width: f32 },
    /// Block falling onto its resting place
    Landing { outcome: DropOutcome },
    /// Result banner on screen
    Pause { outcome: DropOutcome },
}

pub struct LevelController<A, S> {
    options: GameOptions,
    animator: A,
    store: LevelStore<S>,
    rng: Pcg32,
    state: GameState,
    progress: LevelProgress,
    attempt: DropAttempt,
    geometry: LevelGeometry,
    hud: Hud,
    pending: Option<(AnimHandle, Step)>,
    wobble: Option<AnimHandle>,
    grow: Option<AnimHandle>,
    /// Floor and wall entrance tweens
    pieces: Vec<AnimHandle>,
    events: Vec<GameEvent>,
}

impl<A: Animator, S: Storage> LevelController<A, S> {
    /// Create a controller; nothing happens until [`Self::on_enter`]
    pub fn new(options: GameOptions, animator: A, storage: S, seed: u64) -> Result<Self> {
        options.validate()?;
        let store = LevelStore::new(storage, options.storage_key.clone());
        let mut rng = Pcg32::seed_from_u64(seed);
        let geometry = LevelGeometry::roll(&mut rng, &options);

        Ok(Self {
            options,
            animator,
            store,
            rng,
            state: GameState::Idle,
            progress: LevelProgress::default(),
            attempt: DropAttempt::new(1),
            geometry,
            hud: Hud::default(),
            pending: None,
            wobble: None,
            grow: None,
            pieces: Vec::new(),
            events: Vec::new(),
        })
    }

    // === Accessors ===

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Current level (in-memory mirror of the persisted record)
    pub fn level(&self) -> u32 {
        self.progress.level
    }

    pub fn success_count(&self) -> u32 {
        self.attempt.success_count()
    }

    pub fn attempt(&self) -> &DropAttempt {
        &self.attempt
    }

    pub fn geometry(&self) -> &LevelGeometry {
        &self.geometry
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    pub fn store(&self) -> &LevelStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LevelStore<S> {
        &mut self.store
    }

    /// True while a drop is being animated or judged
    pub fn is_resolving(&self) -> bool {
        matches!(
            self.pending,
            Some((_, Step::Settle { .. } | Step::Landing { .. } | Step::Pause { .. }))
        )
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Lifecycle hooks ===

    /// Start the scene from the persisted level
    pub fn on_enter(&mut self) {
        self.progress = LevelProgress {
            level: self.store.read_level(),
        };
        self.start_scene();
    }

    pub fn on_pointer_down(&mut self) {
        if self.state != GameState::Waiting {
            return;
        }
        self.state = GameState::Growing;
        self.hud.hint_visible = false;

        let grown = self.options.grown_scale;
        let duration = self.options.grow_time;
        self.grow = Some(self.animator.animate_to(
            Target::Square,
            TweenProps::new().scale(grown),
            duration,
            Easing::Linear,
        ));
        self.events.push(GameEvent::GrowStarted);
        log::debug!("Growing");
    }

    pub fn on_pointer_up(&mut self) {
        if self.state != GameState::Growing {
            return;
        }
        self.state = GameState::Idle;

        // A growth tween that already finished has been cleared; the block is
        // at full size
        let fraction = match self.grow.take() {
            Some(handle) => self.animator.stop(handle),
            None => 1.0,
        };
        if let Some(handle) = self.wobble.take() {
            self.animator.stop(handle);
        }

        let width = self.options.grown_width(fraction);
        let handle = self.animator.animate_to(
            Target::Square,
            TweenProps::new().angle(0.0),
            SETTLE_MS,
            Easing::CubicOut,
        );
        self.pending = Some((handle, Step::Settle { width }));
        log::debug!("Released at width {:.1}", width);
    }

    pub fn on_animation_complete(&mut self, handle: AnimHandle) {
        if self.grow == Some(handle) {
            self.grow = None;
            log::debug!("Block fully grown");
            return;
        }
        if let Some(index) = self.pieces.iter().position(|&h| h == handle) {
            self.pieces.swap_remove(index);
            return;
        }

        let step = match self.pending {
            Some((pending, step)) if pending == handle => step,
            _ => {
                log::trace!("Ignoring completion of {:?}", handle);
                return;
            }
        };
        self.pending = None;

        match step {
            Step::Entrance => self.finish_entrance(),
            Step::Settle { width } => self.land(width),
            Step::Landing { outcome } => self.show_result(outcome),
            Step::Pause { outcome } => self.finish_drop(outcome),
        }
    }

    // === Transitions ===

    /// Reset the scene at the current level
    fn start_scene(&mut self) {
        self.cancel_animations();

        let level = self.progress.level;
        self.attempt = DropAttempt::new(level);
        self.state = GameState::Idle;

        self.hud = Hud {
            banner: level_banner(level),
            remaining: self.attempt.remaining(),
            tint: self
                .options
                .bg_colors
                .choose(&mut self.rng)
                .copied()
                .unwrap_or_default(),
            hint_visible: false,
        };

        let scene = self.options.scene;
        let floor_top = scene.height - self.options.floor_height;
        self.animator.set(
            Target::Square,
            TweenProps::new()
                .x(scene.width / 2.0)
                .y(SPAWN_Y)
                .scale(self.options.start_scale)
                .angle(0.0),
        );
        self.animator
            .set(Target::LeftFloor, TweenProps::new().x(0.0).y(scene.height));
        self.animator
            .set(Target::RightFloor, TweenProps::new().x(scene.width).y(scene.height));
        self.animator
            .set(Target::LeftWall, TweenProps::new().x(0.0).y(floor_top));
        self.animator
            .set(Target::RightWall, TweenProps::new().x(scene.width).y(floor_top));

        log::info!("Entering level {}", level);
        self.events.push(GameEvent::LevelEntered { level });
        self.start_round();
    }

    /// Roll new geometry and bring the block in
    fn start_round(&mut self) {
        self.stop_pieces();
        self.geometry = LevelGeometry::roll(&mut self.rng, &self.options);

        for (target, x) in self.geometry.piece_positions(self.options.scene.width) {
            let handle =
                self.animator
                    .animate_to(target, TweenProps::new().x(x), ENTRANCE_MS, Easing::CubicOut);
            self.pieces.push(handle);
        }

        let handle = self.animator.animate_to(
            Target::Square,
            TweenProps::new()
                .y(REST_Y)
                .scale(self.options.start_scale)
                .angle(ENTRANCE_ANGLE),
            ENTRANCE_MS,
            Easing::CubicOut,
        );
        self.pending = Some((handle, Step::Entrance));

        log::debug!(
            "Round {}/{}: hole {} wall {}",
            self.attempt.success_count() + 1,
            self.attempt.target(),
            self.geometry.hole_width,
            self.geometry.wall_width
        );
        self.events.push(GameEvent::RoundStarted {
            geometry: self.geometry,
        });
    }

    fn finish_entrance(&mut self) {
        self.wobble = Some(self.animator.loop_animation(
            Target::Square,
            TweenProps::new().angle(WOBBLE_ANGLE),
            WOBBLE_MS,
        ));
        if self.attempt.success_count() == 0 {
            self.hud.hint_visible = true;
        }
        self.state = GameState::Waiting;
    }

    /// Judge the released block and send it to its resting place
    fn land(&mut self, width: f32) {
        let outcome = self.geometry.classify(width);
        log::debug!(
            "Width {:.1} vs hole {} / walls {}: {:?}",
            width,
            self.geometry.hole_width,
            self.geometry.wall_to_wall(),
            outcome
        );
        self.events.push(GameEvent::Dropped { outcome, width });

        let scene_height = self.options.scene.height;
        let floor_top = scene_height - self.options.floor_height;
        let (y, easing) = match outcome {
            DropOutcome::TotalMiss => (scene_height + width, Easing::CubicIn),
            DropOutcome::Success => {
                self.attempt.record_success();
                (floor_top - width / 2.0, Easing::BounceOut)
            }
            DropOutcome::LedgeFail => (
                floor_top - self.options.wall_height - width / 2.0,
                Easing::BounceOut,
            ),
        };

        let handle = self
            .animator
            .animate_to(Target::Square, TweenProps::new().y(y), DROP_MS, easing);
        self.pending = Some((handle, Step::Landing { outcome }));
    }

    fn show_result(&mut self, outcome: DropOutcome) {
        self.hud.banner = outcome.message().to_string();
        let handle = self.animator.schedule_delayed(self.options.result_delay);
        self.pending = Some((handle, Step::Pause { outcome }));
    }

    fn finish_drop(&mut self, outcome: DropOutcome) {
        let level = self.progress.level;

        if !outcome.is_success() {
            log::info!("Level {} failed ({:?}), restarting", level, outcome);
            self.events.push(GameEvent::LevelFailed { level, outcome });
            self.start_scene();
            return;
        }

        if self.attempt.is_complete() {
            let next = level + 1;
            if let Err(e) = self.store.write_level(next) {
                log::warn!("Could not save level {}: {}", next, e);
            }
            self.progress.level = next;
            log::info!("Level {} complete", level);
            self.events.push(GameEvent::LevelCompleted { level });
            self.start_scene();
        } else {
            self.hud.remaining = self.attempt.remaining();
            self.hud.banner = level_banner(level);
            self.start_round();
        }
    }

    fn cancel_animations(&mut self) {
        for handle in [self.pending.take().map(|(h, _)| h), self.wobble.take(), self.grow.take()]
            .into_iter()
            .flatten()
        {
            self.animator.stop(handle);
        }
        self.stop_pieces();
    }

    fn stop_pieces(&mut self) {
        for handle in std::mem::take(&mut self.pieces) {
            self.animator.stop(handle);
        }
    }
}
