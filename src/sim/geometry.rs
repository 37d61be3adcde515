//! Level geometry and drop classification
//!
//! Each round rolls a hole (gap between the two floor pieces) and a wall
//! width (ledge on either side of the hole, bounded by the wall pieces).
//! The released block is judged against both widths.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::anim::Target;
use crate::consts::{LEDGE_MESSAGE, MISS_MESSAGE, SUCCESS_MESSAGE};
use crate::options::GameOptions;

/// How a released block lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropOutcome {
    /// Fits the hole
    Success,
    /// Wider than the hole, rests on the ledge
    LedgeFail,
    /// Wider than the walls, falls past the floor
    TotalMiss,
}

impl DropOutcome {
    pub fn is_success(&self) -> bool {
        *self == DropOutcome::Success
    }

    /// Banner shown once the block has landed
    pub fn message(&self) -> &'static str {
        match self {
            DropOutcome::Success => SUCCESS_MESSAGE,
            DropOutcome::LedgeFail => LEDGE_MESSAGE,
            DropOutcome::TotalMiss => MISS_MESSAGE,
        }
    }
}

/// Per-round hole and wall widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelGeometry {
    pub hole_width: u32,
    pub wall_width: u32,
}

impl LevelGeometry {
    pub fn new(hole_width: u32, wall_width: u32) -> Self {
        Self {
            hole_width,
            wall_width,
        }
    }

    /// Draw both widths uniformly and independently from the option ranges
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, options: &GameOptions) -> Self {
        let hole_width = rng.random_range(options.hole_widths());
        let wall_width = rng.random_range(options.wall_widths());
        Self {
            hole_width,
            wall_width,
        }
    }

    /// Gap between the inner faces of the two walls
    pub fn wall_to_wall(&self) -> u32 {
        self.wall_width
            .saturating_mul(2)
            .saturating_add(self.hole_width)
    }

    /// Judge a block of the given width
    ///
    /// The fall-past-floor check runs first: a block too wide for the walls
    /// is a total miss whatever the hole width.
    pub fn classify(&self, width: f32) -> DropOutcome {
        let hole = self.hole_width as f32;
        let span = self.wall_to_wall() as f32;
        if width > span.max(hole) {
            DropOutcome::TotalMiss
        } else if width <= hole {
            DropOutcome::Success
        } else {
            DropOutcome::LedgeFail
        }
    }

    /// Inner edge x of each floor and wall piece for a scene `scene_width` wide
    pub fn piece_positions(&self, scene_width: f32) -> [(Target, f32); 4] {
        let hole = self.hole_width as f32;
        let wall = self.wall_width as f32;
        [
            (Target::LeftFloor, (scene_width - hole) / 2.0),
            (Target::RightFloor, (scene_width + hole) / 2.0),
            (Target::LeftWall, (scene_width - hole) / 2.0 - wall),
            (Target::RightWall, (scene_width + hole) / 2.0 + wall),
        ]
    }
}
