use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{GrainVizError, Result};

/// Largest canvas edge accepted, in pixels.
pub const MAX_CANVAS_DIMENSION: u32 = 16_384;

/// Visual treatment applied to grains when they are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrainStyle {
    /// Each full cycle of lanes shares one randomly drawn color.
    ColorEpochs,
    /// A single ink color whose opacity falls to zero across the canvas.
    Fade,
}

/// Top-level configuration structure for the visualiser.
///
/// Every field has a default, so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualiserConfig {
    pub zoom_level: f32,
    pub sample_rate: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Shortest grain worth showing; the playhead line sits at its width.
    pub min_grain_duration_ms: f32,
    /// Redraw period of the animation loop.
    pub refresh_rate_ms: u32,
    /// Number of vertical lanes grains are spread across.
    pub grain_tracks: u32,
    pub grain_height: u32,
    pub style: GrainStyle,
    /// Seed for the color generator. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for VisualiserConfig {
    fn default() -> Self {
        Self {
            zoom_level: 20.0,
            sample_rate: 41_000,
            canvas_width: 1500,
            canvas_height: 1000,
            min_grain_duration_ms: 300.0,
            refresh_rate_ms: 40,
            grain_tracks: 25,
            grain_height: 10,
            style: GrainStyle::ColorEpochs,
            seed: None,
        }
    }
}

impl VisualiserConfig {
    /// Thin, fading grains on a mint background.
    pub fn fading() -> Self {
        Self {
            grain_height: 3,
            style: GrainStyle::Fade,
            ..Self::default()
        }
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    /// Checks that the values can produce finite, positive scaling constants.
    pub fn validate(&self) -> Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(GrainVizError::invalid_config(format!(
                "canvas must not be empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.canvas_width > MAX_CANVAS_DIMENSION || self.canvas_height > MAX_CANVAS_DIMENSION {
            return Err(GrainVizError::invalid_config(format!(
                "canvas {}x{} exceeds the {MAX_CANVAS_DIMENSION} px limit",
                self.canvas_width, self.canvas_height
            )));
        }
        if !self.zoom_level.is_finite() || self.zoom_level <= 0.0 {
            return Err(GrainVizError::invalid_config(format!(
                "zoom_level must be positive, got {}",
                self.zoom_level
            )));
        }
        if self.sample_rate == 0 {
            return Err(GrainVizError::invalid_config("sample_rate must be positive"));
        }
        if self.refresh_rate_ms == 0 {
            return Err(GrainVizError::invalid_config(
                "refresh_rate_ms must be positive",
            ));
        }
        if self.grain_tracks == 0 {
            return Err(GrainVizError::invalid_config("grain_tracks must be positive"));
        }
        if self.grain_height == 0 {
            return Err(GrainVizError::invalid_config("grain_height must be positive"));
        }
        if !self.min_grain_duration_ms.is_finite() || self.min_grain_duration_ms < 0.0 {
            return Err(GrainVizError::invalid_config(format!(
                "min_grain_duration_ms must be a non-negative number, got {}",
                self.min_grain_duration_ms
            )));
        }
        Ok(())
    }

    /// Wall-clock period between two animation ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.refresh_rate_ms))
    }
}
