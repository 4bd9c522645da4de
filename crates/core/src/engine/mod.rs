//! The grain engine owns every piece of mutable visual state: the live
//! grain queue, the lane counter and the lifecycle. Ingest and redraw both
//! go through `&mut GrainEngine`, so ordering between them is whatever
//! order the caller runs them in.

use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::{
    grain::{Grain, GrainStore},
    ingest::{parse_duration_text, GrainEvent},
    lanes::LaneAssigner,
    render::{Rgba, Surface},
    GrainStyle, Result, ScaleModel, VisualiserConfig,
};

/// Whether the redraw loop has been started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
}

/// Outcome of a single redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// False when the engine is still idle and nothing was drawn.
    pub painted: bool,
    pub pruned: usize,
    pub drawn: usize,
}

#[derive(Debug)]
pub struct GrainEngine {
    config: VisualiserConfig,
    scale: ScaleModel,
    grains: GrainStore,
    lanes: LaneAssigner,
    lifecycle: Lifecycle,
    ticks: u64,
}

impl GrainEngine {
    /// Builds an idle engine. Colors come from `config.seed` when set.
    pub fn new(config: VisualiserConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Builds an idle engine drawing epoch colors from `rng`.
    pub fn with_rng(config: VisualiserConfig, rng: impl RngCore + Send + 'static) -> Result<Self> {
        config.validate()?;
        let scale = ScaleModel::new(&config);
        let lanes = LaneAssigner::new(config.grain_tracks, config.grain_height, rng);
        Ok(Self {
            config,
            scale,
            grains: GrainStore::new(),
            lanes,
            lifecycle: Lifecycle::Idle,
            ticks: 0,
        })
    }

    /// Builds and starts an engine in one step.
    pub fn running(config: VisualiserConfig) -> Result<Self> {
        let mut engine = Self::new(config)?;
        engine.start();
        Ok(engine)
    }

    /// Moves the engine from idle to running. Returns false if it was
    /// already running.
    pub fn start(&mut self) -> bool {
        if self.lifecycle == Lifecycle::Running {
            return false;
        }
        self.lifecycle = Lifecycle::Running;
        tracing::info!(
            canvas_width = self.config.canvas_width,
            canvas_height = self.config.canvas_height,
            advance_by_x = self.scale.advance_by_x(),
            play_line_x = self.scale.play_line_x(),
            style = ?self.config.style,
            "grain engine running"
        );
        true
    }

    /// Records a new grain of `duration_ms` milliseconds.
    ///
    /// Durations are truncated to whole milliseconds. Values that are not
    /// finite and non-negative still produce a grain, at the minimum width.
    pub fn add_grain(&mut self, duration_ms: f64, position: Option<f64>) {
        let width = self.scale.width_for(duration_ms);
        let slot = self.lanes.assign();
        let id = self.lanes.total_assigned() - 1;

        let grain = Grain::new(
            id,
            self.scale.spawn_x(width),
            slot.y,
            width,
            self.config.grain_height as f32,
            slot.color,
        )
        .with_position(position);

        tracing::trace!(id, width, lane = slot.lane, "grain added");
        self.grains.append(grain);
    }

    /// Text form of [`add_grain`](Self::add_grain); only the leading integer
    /// is read.
    pub fn add_grain_text(&mut self, duration: &str, position: Option<f64>) {
        let duration_ms = parse_duration_text(duration).unwrap_or_else(|| {
            tracing::debug!(duration, "unparseable grain duration, using minimum width");
            f64::NAN
        });
        self.add_grain(duration_ms, position);
    }

    pub fn ingest(&mut self, event: GrainEvent) {
        self.add_grain(event.duration_ms, event.position);
    }

    /// Redraws one frame and moves every grain one step to the right.
    ///
    /// Grains are drawn before they advance, so a new grain first shows up
    /// at its spawn position.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> TickReport {
        if self.lifecycle == Lifecycle::Idle {
            return TickReport::default();
        }

        let canvas_width = self.scale.canvas_width();
        let advance_by_x = self.scale.advance_by_x();

        surface.clear();
        surface.fill(self.background());
        surface.vertical_line(self.scale.play_line_x(), Rgba::SLATE);

        let pruned = self.grains.prune_head(canvas_width);
        if pruned > 0 {
            tracing::trace!(pruned, remaining = self.grains.len(), "pruned grains");
        }

        let style = self.config.style;
        let mut drawn = 0;
        for grain in self.grains.iter_mut() {
            let color = match style {
                GrainStyle::ColorEpochs => grain.color(),
                GrainStyle::Fade => Rgba::SLATE.with_alpha(grain.opacity(canvas_width)),
            };
            surface.fill_rect(grain.rect(), color);
            grain.advance(advance_by_x);
            drawn += 1;
        }

        self.ticks += 1;
        TickReport {
            painted: true,
            pruned,
            drawn,
        }
    }

    fn background(&self) -> Rgba {
        match self.config.style {
            GrainStyle::ColorEpochs => Rgba::WHITE,
            GrainStyle::Fade => Rgba::MINT,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn config(&self) -> &VisualiserConfig {
        &self.config
    }

    pub fn scale(&self) -> &ScaleModel {
        &self.scale
    }

    pub fn grains(&self) -> &GrainStore {
        &self.grains
    }

    /// Grains ingested since construction, including pruned ones.
    pub fn total_grains_added(&self) -> u64 {
        self.lanes.total_assigned()
    }

    /// Redraws performed while running.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
