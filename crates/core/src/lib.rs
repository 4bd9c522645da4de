//! Core library for the Grain Visualiser.
//!
//! Grain events coming out of a granulator are turned into rectangles that
//! scroll across a canvas at a fixed redraw cadence. [`GrainEngine`] owns the
//! live state; the other modules provide the pieces it is built from
//! (scaling, lane assignment, the grain queue, drawing surfaces) plus a
//! synthetic grain source for driving it without an audio engine.

pub mod config;
pub mod engine;
pub mod error;
pub mod grain;
pub mod ingest;
pub mod lanes;
pub mod params;
pub mod render;
pub mod scale;
pub mod source;
pub mod timeline;

pub use config::{GrainStyle, VisualiserConfig};
pub use engine::{GrainEngine, Lifecycle, TickReport};
pub use error::{GrainVizError, Result};
pub use grain::{Grain, GrainStore};
pub use ingest::GrainEvent;
pub use lanes::{LaneAssigner, LaneSlot};
pub use params::{GranulatorControl, ParameterSignal};
pub use render::{CanvasSurface, DrawCommand, RecordingSurface, Rect, Rgba, Surface};
pub use scale::ScaleModel;
pub use source::SyntheticGrainSource;
pub use timeline::{PlaybackClock, TickScheduler};
