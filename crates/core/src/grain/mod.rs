use std::collections::VecDeque;

use crate::render::{Rect, Rgba};

/// On-screen rectangle tracking one granulation event.
///
/// Only `x` changes after construction, and it only ever grows.
#[derive(Debug, Clone, PartialEq)]
pub struct Grain {
    id: u64,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    color: Rgba,
    position: Option<f64>,
}

impl Grain {
    pub fn new(id: u64, x: f32, y: f32, width: f32, height: f32, color: Rgba) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            color,
            position: None,
        }
    }

    /// Attaches the granulator read position the event was produced at.
    pub fn with_position(mut self, position: Option<f64>) -> Self {
        self.position = position;
        self
    }

    /// Creation sequence number, unique for the lifetime of an engine.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn position(&self) -> Option<f64> {
        self.position
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Moves the grain right by `dx` pixels.
    pub fn advance(&mut self, dx: f32) {
        debug_assert!(dx >= 0.0, "grains never move left");
        self.x += dx.max(0.0);
    }

    /// Linear fade from 1 at the left edge to 0 at `canvas_width`, kept to
    /// three decimals.
    pub fn opacity(&self, canvas_width: f32) -> f32 {
        let raw = 1.0 - self.x / canvas_width;
        ((raw * 1000.0).round() / 1000.0).clamp(0.0, 1.0)
    }

    /// True once the grain has scrolled past the right edge.
    pub fn is_past(&self, canvas_width: f32) -> bool {
        self.x > canvas_width
    }
}

/// Live grains, oldest first.
///
/// Insertion order is also age order is also pruning order: every grain
/// advances by the same amount per tick, so the head is always the one
/// furthest to the right and pruning only ever needs to look at the head.
#[derive(Debug, Default, Clone)]
pub struct GrainStore {
    grains: VecDeque<Grain>,
}

impl GrainStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, grain: Grain) {
        self.grains.push_back(grain);
    }

    /// Drops grains from the head while they sit past `canvas_width`.
    /// Returns how many were removed.
    pub fn prune_head(&mut self, canvas_width: f32) -> usize {
        let mut removed = 0;
        while self
            .grains
            .front()
            .is_some_and(|head| head.is_past(canvas_width))
        {
            self.grains.pop_front();
            removed += 1;
        }
        removed
    }

    pub fn head(&self) -> Option<&Grain> {
        self.grains.front()
    }

    pub fn len(&self) -> usize {
        self.grains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Grain> {
        self.grains.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Grain> {
        self.grains.iter_mut()
    }
}
