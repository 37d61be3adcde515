//! Game options
//!
//! Passed explicitly into the level controller. On the web build they can be
//! overridden from LocalStorage; everywhere else the defaults apply.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{BlockDropError, Result};

/// Scene size in scene units (pixels on the reference layout)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneSize {
    pub width: f32,
    pub height: f32,
}

impl Default for SceneSize {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 960.0,
        }
    }
}

/// Game options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Background tints, one picked at random per scene start
    pub bg_colors: Vec<u32>,
    /// Inclusive hole width range
    pub hole_width_range: [u32; 2],
    /// Inclusive wall width range
    pub wall_range: [u32; 2],
    /// Growth tween duration (ms)
    pub grow_time: f32,
    /// Storage key of the level record
    pub storage_key: String,

    // === Layout ===
    pub scene: SceneSize,
    /// Block texture size at scale 1.0
    pub square_size: f32,
    /// Block scale while resting
    pub start_scale: f32,
    /// Block scale once the growth tween completes
    pub grown_scale: f32,
    /// Height of the floor pieces
    pub floor_height: f32,
    /// Height of the wall pieces sitting on the floor
    pub wall_height: f32,

    /// Pause between a landed drop and what follows (ms)
    pub result_delay: f32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            bg_colors: vec![
                0x62bd18, 0xff5300, 0xd21034, 0xff475c, 0x8f16b2, 0x588c7e, 0x8c4646,
            ],
            hole_width_range: [80, 260],
            wall_range: [10, 50],
            grow_time: 1500.0,
            storage_key: "block-drop".to_string(),

            scene: SceneSize::default(),
            square_size: 400.0,
            start_scale: 0.2,
            grown_scale: 1.0,
            floor_height: 200.0,
            wall_height: 40.0,

            result_delay: 1000.0,
        }
    }
}

impl GameOptions {
    /// LocalStorage key for option overrides
    const STORAGE_KEY: &'static str = "block-drop-options";

    pub fn hole_widths(&self) -> RangeInclusive<u32> {
        self.hole_width_range[0]..=self.hole_width_range[1]
    }

    pub fn wall_widths(&self) -> RangeInclusive<u32> {
        self.wall_range[0]..=self.wall_range[1]
    }

    /// Block width for a given scale
    pub fn block_width(&self, scale: f32) -> f32 {
        self.square_size * scale
    }

    /// Block width once the growth tween has run for `fraction` of `grow_time`
    pub fn grown_width(&self, fraction: f32) -> f32 {
        let f = fraction.clamp(0.0, 1.0);
        self.block_width(self.start_scale + (self.grown_scale - self.start_scale) * f)
    }

    /// Hold duration (ms) that grows the block to `width`
    pub fn hold_for_width(&self, width: f32) -> f32 {
        let scale = width / self.square_size;
        let f = (scale - self.start_scale) / (self.grown_scale - self.start_scale);
        f.clamp(0.0, 1.0) * self.grow_time
    }

    /// Reject options the controller cannot play with
    pub fn validate(&self) -> Result<()> {
        if self.bg_colors.is_empty() {
            return Err(BlockDropError::InvalidOptions("bg_colors is empty"));
        }
        if self.hole_width_range[0] == 0 || self.hole_width_range[0] > self.hole_width_range[1] {
            return Err(BlockDropError::InvalidOptions("hole_width_range is empty"));
        }
        if self.wall_range[0] > self.wall_range[1] {
            return Err(BlockDropError::InvalidOptions("wall_range is empty"));
        }
        // Widest wall-to-wall gap must fit in a u32
        if self.wall_range[1]
            .checked_mul(2)
            .and_then(|walls| walls.checked_add(self.hole_width_range[1]))
            .is_none()
        {
            return Err(BlockDropError::InvalidOptions(
                "hole_width_range and wall_range are too wide",
            ));
        }
        if !(self.square_size > 0.0 && self.square_size.is_finite()) {
            return Err(BlockDropError::InvalidOptions("square_size must be positive"));
        }
        if !(self.grow_time > 0.0) {
            return Err(BlockDropError::InvalidOptions("grow_time must be positive"));
        }
        if !(self.start_scale > 0.0 && self.start_scale < self.grown_scale) {
            return Err(BlockDropError::InvalidOptions(
                "start_scale must be positive and below grown_scale",
            ));
        }
        if !(self.result_delay >= 0.0) {
            return Err(BlockDropError::InvalidOptions("result_delay must not be negative"));
        }
        if self.storage_key.is_empty() {
            return Err(BlockDropError::InvalidOptions("storage_key is empty"));
        }
        Ok(())
    }

    /// Parse options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load option overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(options) => {
                        log::info!("Loaded game options from LocalStorage");
                        return options;
                    }
                    Err(e) => log::warn!("Ignoring stored game options: {}", e),
                }
            }
        }

        log::info!("Using default game options");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No option overrides outside the browser ({})", Self::STORAGE_KEY);
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = GameOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.hole_widths(), 80..=260);
        assert_eq!(options.wall_widths(), 10..=50);
        assert_eq!(options.grow_time, 1500.0);
        assert_eq!(options.storage_key, "block-drop");
    }

    #[test]
    fn test_validate_rejects_inverted_ranges() {
        let options = GameOptions {
            hole_width_range: [200, 100],
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(BlockDropError::InvalidOptions(_))
        ));

        let options = GameOptions {
            wall_range: [60, 10],
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_timing_and_palette() {
        let options = GameOptions {
            grow_time: 0.0,
            ..Default::default()
        };
        assert!(options.validate().is_err());

        let options = GameOptions {
            bg_colors: Vec::new(),
            ..Default::default()
        };
        assert!(options.validate().is_err());

        let options = GameOptions {
            start_scale: 1.0,
            grown_scale: 0.5,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_widths_that_overflow() {
        let options = GameOptions {
            hole_width_range: [3_000_000_000, 3_000_000_000],
            wall_range: [1_000_000_000, 1_000_000_000],
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(BlockDropError::InvalidOptions(_))
        ));
        assert!(
            GameOptions::from_json(
                r#"{ "hole_width_range": [3000000000, 3000000000], "wall_range": [1000000000, 1000000000] }"#
            )
            .is_err()
        );

        // Largest span that still fits is accepted
        let options = GameOptions {
            hole_width_range: [1, u32::MAX - 2],
            wall_range: [0, 1],
            ..Default::default()
        };
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_degenerate_block_and_delay() {
        for square_size in [0.0, -400.0, f32::NAN, f32::INFINITY] {
            let options = GameOptions {
                square_size,
                ..Default::default()
            };
            assert!(options.validate().is_err(), "square_size {}", square_size);
        }
        assert!(GameOptions::from_json(r#"{ "square_size": 0 }"#).is_err());

        let options = GameOptions {
            result_delay: -1.0,
            ..Default::default()
        };
        assert!(options.validate().is_err());

        // No pause at all is fine
        let options = GameOptions {
            result_delay: 0.0,
            ..Default::default()
        };
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_override() {
        let options = GameOptions::from_json(r#"{ "grow_time": 900, "wall_range": [5, 5] }"#)
            .expect("valid options");
        assert_eq!(options.grow_time, 900.0);
        assert_eq!(options.wall_widths(), 5..=5);
        assert_eq!(options.hole_widths(), 80..=260);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            GameOptions::from_json("not json"),
            Err(BlockDropError::MalformedRecord(_))
        ));
        assert!(GameOptions::from_json(r#"{ "hole_width_range": [0, 10] }"#).is_err());
    }

    #[test]
    fn test_block_width_scales_square() {
        let options = GameOptions::default();
        assert!((options.block_width(options.start_scale) - 80.0).abs() < 1e-3);
        assert!((options.block_width(options.grown_scale) - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_hold_and_width_are_inverse() {
        let options = GameOptions::default();
        assert!((options.grown_width(0.5) - 240.0).abs() < 1e-3);
        assert!((options.hold_for_width(240.0) - 750.0).abs() < 1e-2);
        // Holding past the budget cannot grow the block further
        assert!((options.grown_width(3.0) - 400.0).abs() < 1e-3);
        assert_eq!(options.hold_for_width(1000.0), options.grow_time);
        assert_eq!(options.hold_for_width(10.0), 0.0);
    }
}
