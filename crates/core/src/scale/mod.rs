use crate::VisualiserConfig;

/// Pixel constants derived once from the configuration.
///
/// Durations map to widths through `scaling_coefficient`, grains move by
/// `advance_by_x` per tick, and new grains end on the playhead line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleModel {
    scaling_coefficient: f32,
    advance_by_x: f32,
    play_line_x: f32,
    canvas_width: f32,
    canvas_height: f32,
}

impl ScaleModel {
    pub fn new(config: &VisualiserConfig) -> Self {
        let zoom = config.zoom_level;
        let sample_rate = config.sample_rate as f32;
        let canvas_width = config.canvas_width as f32;

        let scaling_coefficient = (zoom * canvas_width) / sample_rate;
        let advance_by_x = sample_rate / config.refresh_rate_ms as f32 / zoom;
        let play_line_x = (config.min_grain_duration_ms * scaling_coefficient).round();

        Self {
            scaling_coefficient,
            advance_by_x,
            play_line_x,
            canvas_width,
            canvas_height: config.canvas_height as f32,
        }
    }

    /// Pixels of width per millisecond of grain duration.
    pub fn scaling_coefficient(&self) -> f32 {
        self.scaling_coefficient
    }

    /// Horizontal displacement applied to every grain per tick.
    pub fn advance_by_x(&self) -> f32 {
        self.advance_by_x
    }

    pub fn play_line_x(&self) -> f32 {
        self.play_line_x
    }

    pub fn canvas_width(&self) -> f32 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f32 {
        self.canvas_height
    }

    /// Width in pixels for a grain of the given duration.
    ///
    /// The duration is truncated to whole milliseconds first. Anything that
    /// is not a finite, non-negative number collapses to the 1 px minimum,
    /// and widths stop at [`max_width`](Self::max_width).
    pub fn width_for(&self, duration_ms: f64) -> f32 {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return 1.0;
        }
        let scaled = duration_ms.trunc() * f64::from(self.scaling_coefficient);
        scaled.round().clamp(1.0, f64::from(self.max_width())) as f32
    }

    /// Widest grain drawn. Its spawn position sits one canvas width left of
    /// the origin, which keeps every `x` small enough for the per-tick
    /// advance to be added without rounding away.
    pub fn max_width(&self) -> f32 {
        (self.play_line_x + self.canvas_width).max(1.0)
    }

    /// Left edge for a freshly spawned grain: its right edge touches the
    /// playhead line.
    pub fn spawn_x(&self, width: f32) -> f32 {
        self.play_line_x - width
    }
}
