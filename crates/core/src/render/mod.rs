//! Drawing primitives shared by the redraw loop and its surfaces.
//!
//! The engine only ever talks to a [`Surface`]; [`CanvasSurface`] rasterises
//! into an RGBA buffer while [`RecordingSurface`] keeps the command stream.

mod canvas;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::Result;

pub use canvas::CanvasSurface;

/// Straight (non-premultiplied) color with a fractional alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    /// Background of the fading style.
    pub const MINT: Rgba = Rgba::rgb(0xbc, 0xec, 0xe0);
    /// Playhead line and fading grain ink.
    pub const SLATE: Rgba = Rgba::rgb(76, 82, 112);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Builds an opaque color from the low 24 bits of `value`.
    pub const fn from_rgb24(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Draws a uniformly distributed opaque 24-bit color.
    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self::from_rgb24(rng.next_u32() & 0x00ff_ffff)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// `#rrggbb`, alpha is not encoded.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Axis aligned rectangle in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A 2D drawable addressed in absolute pixel coordinates.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Resets every pixel to transparent.
    fn clear(&mut self);
    /// Paints the whole surface.
    fn fill(&mut self, color: Rgba);
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    /// One pixel wide line spanning the full surface height.
    fn vertical_line(&mut self, x: f32, color: Rgba);
}

/// Single operation issued against a [`Surface`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    Fill { color: Rgba },
    FillRect { rect: Rect, color: Rgba },
    VerticalLine { x: f32, color: Rgba },
}

impl DrawCommand {
    /// Replays the command onto `surface`.
    pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S) {
        match *self {
            Self::Clear => surface.clear(),
            Self::Fill { color } => surface.fill(color),
            Self::FillRect { rect, color } => surface.fill_rect(rect, color),
            Self::VerticalLine { x, color } => surface.vertical_line(x, color),
        }
    }
}

/// Surface that records commands instead of rasterising them.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns the recorded commands and starts a fresh recording.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Rectangles filled since the last [`take_commands`](Self::take_commands).
    pub fn filled_rects(&self) -> impl Iterator<Item = (&Rect, &Rgba)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillRect { rect, color } => Some((rect, color)),
            _ => None,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.commands)?)
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Fill { color });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn vertical_line(&mut self, x: f32, color: Rgba) {
        self.commands.push(DrawCommand::VerticalLine { x, color });
    }
}
