//! Animation contract
//!
//! The level controller never draws or interpolates anything itself. It asks
//! an [`Animator`] to move sprites and reacts to the completion handles the
//! host feeds back into it.

pub mod timeline;

pub use timeline::{RenderCommand, Timeline};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Sprites the controller animates
///
/// The remaining-count label is drawn on top of the block and always moves
/// with [`Target::Square`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Square,
    LeftFloor,
    RightFloor,
    LeftWall,
    RightWall,
}

impl Target {
    pub const COUNT: usize = 5;

    pub const ALL: [Target; Self::COUNT] = [
        Target::Square,
        Target::LeftFloor,
        Target::RightFloor,
        Target::LeftWall,
        Target::RightWall,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Easing curves a tween may request (interpolation is the host's job)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    CubicIn,
    CubicOut,
    BounceOut,
}

/// Sprite transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub pos: Vec2,
    pub scale: f32,
    /// Degrees
    pub angle: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            scale: 1.0,
            angle: 0.0,
        }
    }
}

/// Properties a tween drives; `None` leaves the property untouched
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TweenProps {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub scale: Option<f32>,
    pub angle: Option<f32>,
}

impl TweenProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(mut self, x: f32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn y(mut self, y: f32) -> Self {
        self.y = Some(y);
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn angle(mut self, angle: f32) -> Self {
        self.angle = Some(angle);
        self
    }

    /// Transform with every driven property at its end value
    pub fn apply(&self, t: Transform) -> Transform {
        self.blend(t, t, 1.0)
    }

    /// Driven properties interpolated linearly from `from` toward their end
    /// values; undriven properties are taken from `base`
    pub fn blend(&self, base: Transform, from: Transform, f: f32) -> Transform {
        let lerp = |a: f32, b: f32| a + (b - a) * f;
        Transform {
            pos: Vec2::new(
                self.x.map_or(base.pos.x, |x| lerp(from.pos.x, x)),
                self.y.map_or(base.pos.y, |y| lerp(from.pos.y, y)),
            ),
            scale: self.scale.map_or(base.scale, |s| lerp(from.scale, s)),
            angle: self.angle.map_or(base.angle, |a| lerp(from.angle, a)),
        }
    }
}

/// Handle of a running tween, loop or delayed callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimHandle(pub u64);

/// Renderer/animator consumed by the level controller
///
/// Completion of one-shot tweens and delayed callbacks is reported by the
/// host calling `LevelController::on_animation_complete` with the handle
/// returned here. Loops never complete.
pub trait Animator {
    /// Place a sprite instantly
    fn set(&mut self, target: Target, props: TweenProps);

    /// Tween a sprite toward `props` over `duration` ms
    fn animate_to(
        &mut self,
        target: Target,
        props: TweenProps,
        duration: f32,
        easing: Easing,
    ) -> AnimHandle;

    /// Yoyo a sprite between its current transform and `props` forever,
    /// `duration` ms per leg
    fn loop_animation(&mut self, target: Target, props: TweenProps, duration: f32) -> AnimHandle;

    /// Fire a completion for the returned handle after `delay` ms
    fn schedule_delayed(&mut self, delay: f32) -> AnimHandle;

    /// Cancel a tween, loop or delay
    ///
    /// Returns the fraction of the duration that had elapsed (position within
    /// the current leg for loops), or 1.0 if the handle is no longer running.
    fn stop(&mut self, handle: AnimHandle) -> f32;
}
