use std::io::Write;

use super::{Rect, Rgba, Surface};
use crate::{config::MAX_CANVAS_DIMENSION, GrainVizError, Result};

/// RGBA pixel surface that mirrors a browser canvas.
///
/// Drawing uses source-over blending and silently clips anything that falls
/// outside the buffer, so grains may scroll past either edge.
#[derive(Clone, Debug)]
pub struct CanvasSurface {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl CanvasSurface {
    /// Width and height must both be non-zero and at most
    /// [`MAX_CANVAS_DIMENSION`].
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GrainVizError::invalid_config(format!(
                "canvas must not be empty, got {width}x{height}"
            )));
        }
        if width > MAX_CANVAS_DIMENSION || height > MAX_CANVAS_DIMENSION {
            return Err(GrainVizError::invalid_config(format!(
                "canvas {width}x{height} exceeds the {MAX_CANVAS_DIMENSION} px limit"
            )));
        }
        let (width, height) = (width as usize, height as usize);
        Ok(Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        })
    }

    /// Raw RGBA bytes, row major.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[offset..offset + 4]);
        Some(out)
    }

    /// Writes the frame as a binary PPM (P6). Alpha is dropped.
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> Result<()> {
        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)?;
        let rgb: Vec<u8> = self
            .pixels
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        writer.write_all(&rgb)?;
        writer.flush()?;
        Ok(())
    }

    fn blend_span(&mut self, x0: usize, x1: usize, y0: usize, y1: usize, color: Rgba) {
        for y in y0..y1 {
            let row = y * self.width;
            for x in x0..x1 {
                let offset = (row + x) * 4;
                blend(&mut self.pixels[offset..offset + 4], color);
            }
        }
    }

    /// Converts a floating point span into clipped pixel bounds.
    fn clip(start: f32, len: f32, limit: usize) -> Option<(usize, usize)> {
        if !start.is_finite() || !len.is_finite() || len <= 0.0 {
            return None;
        }
        let lo = start.round().max(0.0);
        let hi = (start + len).round().min(limit as f32);
        if hi <= lo {
            return None;
        }
        Some((lo as usize, hi as usize))
    }
}

fn blend(dst: &mut [u8], src: Rgba) {
    let alpha = src.a.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let dst_alpha = f32::from(dst[3]) / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    let mix = |s: u8, d: u8| -> u8 {
        let s = f32::from(s) * alpha;
        let d = f32::from(d) * dst_alpha * (1.0 - alpha);
        ((s + d) / out_alpha).round().clamp(0.0, 255.0) as u8
    };
    dst[0] = mix(src.r, dst[0]);
    dst[1] = mix(src.g, dst[1]);
    dst[2] = mix(src.b, dst[2]);
    dst[3] = (out_alpha * 255.0).round() as u8;
}

impl Surface for CanvasSurface {
    fn width(&self) -> u32 {
        self.width as u32
    }

    fn height(&self) -> u32 {
        self.height as u32
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn fill(&mut self, color: Rgba) {
        self.blend_span(0, self.width, 0, self.height, color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some((x0, x1)) = Self::clip(rect.x, rect.width, self.width) else {
            return;
        };
        let Some((y0, y1)) = Self::clip(rect.y, rect.height, self.height) else {
            return;
        };
        self.blend_span(x0, x1, y0, y1, color);
    }

    fn vertical_line(&mut self, x: f32, color: Rgba) {
        if !x.is_finite() || x < 0.0 || x >= self.width as f32 {
            return;
        }
        let column = x.floor() as usize;
        self.blend_span(column, column + 1, 0, self.height, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_or_oversized_canvas() {
        assert!(CanvasSurface::new(0, 10).is_err());
        assert!(CanvasSurface::new(100_000, 100_000).is_err());
    }

    #[test]
    fn buffer_holds_four_bytes_per_pixel() {
        let mut canvas = CanvasSurface::new(3, 2).unwrap();
        assert_eq!(canvas.as_rgba().len(), 24);
        canvas.fill(Rgba::SLATE);
        assert!(canvas
            .as_rgba()
            .chunks_exact(4)
            .all(|px| px == [76, 82, 112, 255]));
    }

    #[test]
    fn fill_then_rect_overwrites_opaque_pixels() {
        let mut canvas = CanvasSurface::new(8, 4).unwrap();
        canvas.fill(Rgba::WHITE);
        canvas.fill_rect(
            Rect {
                x: 2.0,
                y: 1.0,
                width: 3.0,
                height: 2.0,
            },
            Rgba::BLACK,
        );

        assert_eq!(canvas.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(2, 1), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(4, 2), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(5, 2), Some([255, 255, 255, 255]));
    }

    #[test]
    fn rects_are_clipped_at_the_edges() {
        let mut canvas = CanvasSurface::new(4, 4).unwrap();
        canvas.fill_rect(
            Rect {
                x: -10.0,
                y: 3.0,
                width: 12.0,
                height: 10.0,
            },
            Rgba::SLATE,
        );

        assert_eq!(canvas.pixel(1, 3), Some([76, 82, 112, 255]));
        assert_eq!(canvas.pixel(2, 3), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(4, 3), None);
    }

    #[test]
    fn translucent_ink_blends_with_background() {
        let mut canvas = CanvasSurface::new(1, 1).unwrap();
        canvas.fill(Rgba::WHITE);
        canvas.fill(Rgba::BLACK.with_alpha(0.5));

        let [r, g, b, a] = canvas.pixel(0, 0).unwrap();
        assert_eq!((r, g, b, a), (128, 128, 128, 255));
    }

    #[test]
    fn vertical_line_spans_full_height() {
        let mut canvas = CanvasSurface::new(5, 3).unwrap();
        canvas.vertical_line(2.0, Rgba::SLATE);

        for y in 0..3 {
            assert_eq!(canvas.pixel(2, y), Some([76, 82, 112, 255]));
            assert_eq!(canvas.pixel(1, y), Some([0, 0, 0, 0]));
        }
    }

    #[test]
    fn writes_ppm_header_and_body() {
        let mut canvas = CanvasSurface::new(2, 1).unwrap();
        canvas.fill(Rgba::MINT);

        let mut out = Vec::new();
        canvas.write_ppm(&mut out).unwrap();

        let header = b"P6\n2 1\n255\n";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(&out[header.len()..], &[0xbc, 0xec, 0xe0, 0xbc, 0xec, 0xe0]);
    }
}
