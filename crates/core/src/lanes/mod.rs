use std::fmt;

use rand::RngCore;

use crate::render::Rgba;

/// Vertical slot and color handed to a new grain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneSlot {
    pub lane: u32,
    pub y: f32,
    pub color: Rgba,
}

/// Lane of the `k`-th grain (0-based) given `grain_tracks` lanes.
pub fn lane_for(k: u64, grain_tracks: u32) -> u32 {
    (k % u64::from(grain_tracks)) as u32
}

/// Round-robin lane allocator with color epochs.
///
/// Grains fill lanes top to bottom. Every time all lanes have been used the
/// counter wraps and a fresh color is drawn, so one sweep of lanes shares a
/// color.
pub struct LaneAssigner {
    grain_tracks: u32,
    grain_height: f32,
    counter: u32,
    total: u64,
    epoch: u64,
    color: Rgba,
    rng: Box<dyn RngCore + Send>,
}

impl LaneAssigner {
    /// `grain_tracks` must be non-zero. The first epoch color is drawn here.
    pub fn new(grain_tracks: u32, grain_height: u32, rng: impl RngCore + Send + 'static) -> Self {
        let mut rng: Box<dyn RngCore + Send> = Box::new(rng);
        let color = Rgba::random(rng.as_mut());
        Self {
            grain_tracks: grain_tracks.max(1),
            grain_height: grain_height as f32,
            counter: 0,
            total: 0,
            epoch: 0,
            color,
            rng,
        }
    }

    pub fn assign(&mut self) -> LaneSlot {
        if self.counter == self.grain_tracks {
            self.counter = 0;
            self.epoch += 1;
            self.color = Rgba::random(self.rng.as_mut());
            tracing::trace!(epoch = self.epoch, color = %self.color.to_hex(), "new color epoch");
        }

        let lane = self.counter % self.grain_tracks;
        let y = self.grain_height + lane as f32 * self.grain_height * 3.0;

        self.counter += 1;
        self.total += 1;

        LaneSlot {
            lane,
            y,
            color: self.color,
        }
    }

    /// Grains assigned since construction. Never wraps.
    pub fn total_assigned(&self) -> u64 {
        self.total
    }

    /// Number of completed lane sweeps.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn current_color(&self) -> Rgba {
        self.color
    }

    pub fn grain_tracks(&self) -> u32 {
        self.grain_tracks
    }
}

impl fmt::Debug for LaneAssigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaneAssigner")
            .field("grain_tracks", &self.grain_tracks)
            .field("grain_height", &self.grain_height)
            .field("counter", &self.counter)
            .field("total", &self.total)
            .field("epoch", &self.epoch)
            .field("color", &self.color.to_hex())
            .finish()
    }
}
