//! Carousel configuration.
//!
//! Every timing and placement constant of the card sequence lives here under
//! a name, so decks can be tuned from a TOML file without touching code.
//! Missing keys fall back to the defaults below.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Position of a card slot in world space (`y` is always 0).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPosition {
    pub x: f32,
    pub z: f32,
}

impl SlotPosition {
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Logical widths below this use the narrow camera.
    pub narrow_breakpoint: f32,
    pub narrow_fov_deg: f32,
    pub narrow_distance: f32,
    pub wide_fov_deg: f32,
    pub wide_distance: f32,
    pub near: f32,
    pub far: f32,
    pub max_pixel_ratio: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            narrow_breakpoint: 768.0,
            narrow_fov_deg: 85.0,
            narrow_distance: 6.0,
            wide_fov_deg: 75.0,
            wide_distance: 5.0,
            near: 0.1,
            far: 100.0,
            max_pixel_ratio: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient: f32,
    pub directional: f32,
    pub directional_position: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient: 0.8,
            directional: 0.5,
            directional_position: [5.0, 5.0, 5.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Time a card shows its front before flipping.
    pub pre_flip_dwell_ms: u64,
    pub flip_duration_ms: u64,
    /// Time the back stays up before the carousel advances.
    pub post_flip_dwell_ms: u64,
    pub slide_duration_ms: u64,
    /// How early the entrance starts relative to the end of the exit.
    pub entrance_overlap_ms: u64,
    /// Length of the tilt reset at the tail of the flip.
    pub flip_tilt_reset_ms: u64,
    /// Auto-play period; zero or negative disables auto-play.
    pub auto_play_interval_ms: i64,
    /// Advance to the next card once the back has been shown.
    pub advance_after_flip: bool,

    pub texture_width: u32,
    pub texture_height: u32,
    pub card_width: f32,
    pub card_height: f32,
    /// Distance of each face from the card's centre plane.
    pub face_offset: f32,

    pub center: SlotPosition,
    pub hidden_left: SlotPosition,
    pub hidden_right: SlotPosition,

    /// Label printed on the front face when the card has none.
    pub default_label: String,

    pub camera: CameraConfig,
    pub lighting: LightingConfig,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            pre_flip_dwell_ms: 2000,
            flip_duration_ms: 1200,
            post_flip_dwell_ms: 2000,
            slide_duration_ms: 800,
            entrance_overlap_ms: 300,
            flip_tilt_reset_ms: 300,
            auto_play_interval_ms: 8000,
            advance_after_flip: true,

            texture_width: 1024,
            texture_height: 1536,
            card_width: 4.5,
            card_height: 6.0,
            face_offset: 0.011,

            center: SlotPosition::new(0.0, 0.0),
            hidden_left: SlotPosition::new(-10.0, -4.0),
            hidden_right: SlotPosition::new(10.0, -4.0),

            default_label: "HEALTHCARE".to_string(),

            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
        }
    }
}

impl CarouselConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn pre_flip_dwell(&self) -> Duration {
        Duration::from_millis(self.pre_flip_dwell_ms)
    }

    pub fn flip_duration(&self) -> Duration {
        Duration::from_millis(self.flip_duration_ms)
    }

    pub fn post_flip_dwell(&self) -> Duration {
        Duration::from_millis(self.post_flip_dwell_ms)
    }

    pub fn slide_duration(&self) -> Duration {
        Duration::from_millis(self.slide_duration_ms)
    }

    /// Delay between the exit starting and the entrance starting.
    pub fn entrance_delay(&self) -> Duration {
        Duration::from_millis(self.slide_duration_ms.saturating_sub(self.entrance_overlap_ms))
    }

    pub fn flip_tilt_reset(&self) -> Duration {
        Duration::from_millis(self.flip_tilt_reset_ms.min(self.flip_duration_ms))
    }

    /// `None` when auto-play is disabled.
    pub fn auto_play_interval(&self) -> Option<Duration> {
        u64::try_from(self.auto_play_interval_ms)
            .ok()
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_timings() {
        let c = CarouselConfig::default();
        assert_eq!(c.pre_flip_dwell(), Duration::from_millis(2000));
        assert_eq!(c.flip_duration(), Duration::from_millis(1200));
        assert_eq!(c.entrance_delay(), Duration::from_millis(500));
        assert_eq!(c.auto_play_interval(), Some(Duration::from_millis(8000)));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let c = CarouselConfig::from_toml_str(
            r#"
            auto_play_interval_ms = 0
            slide_duration_ms = 600

            [camera]
            wide_fov_deg = 60.0
            "#,
        )
        .unwrap();

        assert_eq!(c.auto_play_interval(), None);
        assert_eq!(c.slide_duration_ms, 600);
        assert_eq!(c.flip_duration_ms, 1200);
        assert_eq!(c.camera.wide_fov_deg, 60.0);
        assert_eq!(c.camera.narrow_fov_deg, 85.0);
    }

    #[test]
    fn negative_interval_disables_auto_play() {
        let c = CarouselConfig {
            auto_play_interval_ms: -5,
            ..CarouselConfig::default()
        };
        assert_eq!(c.auto_play_interval(), None);
    }

    #[test]
    fn overlap_longer_than_slide_starts_entrance_immediately() {
        let c = CarouselConfig {
            entrance_overlap_ms: 5000,
            ..CarouselConfig::default()
        };
        assert_eq!(c.entrance_delay(), Duration::ZERO);
    }

    #[test]
    fn bad_toml_is_reported() {
        assert!(matches!(
            CarouselConfig::from_toml_str("flip_duration_ms = \"soon\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
