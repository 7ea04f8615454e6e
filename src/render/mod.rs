//! Stroke rasterization.
//!
//! The decode loop and the synthetic generator only see the [`Renderer`]
//! trait; [`RasterRenderer`] is the built-in implementation.

use crate::data::image::{Image, IMAGE_SIZE};
use crate::error::Result;
use crate::language::{Point, Program, Stroke, GRID_BINS};

/// Renders whole programs to intensity images (1.0 = ink).
pub trait Renderer {
    /// One image per program, in input order.
    fn render(&mut self, programs: &[Program]) -> Result<Vec<Image>>;
}

/// Draws strokes with a fixed pen width on a square canvas.
#[derive(Clone, Debug)]
pub struct RasterRenderer {
    pub size: usize,
    pub line_width: f32,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self::new(IMAGE_SIZE)
    }
}

impl RasterRenderer {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            line_width: (size as f32 / 50.0).max(1.0),
        }
    }

    /// Width of one grid bin in pixels.
    fn cell(&self) -> f32 {
        self.size as f32 / GRID_BINS as f32
    }

    /// Pixel-space center of a grid point.
    fn project(&self, p: Point) -> (f32, f32) {
        let cell = self.cell();
        ((p.x as f32 + 0.5) * cell, (p.y as f32 + 0.5) * cell)
    }

    pub fn render_program(&self, program: &Program) -> Image {
        let mut canvas = Image::zeros(self.size, self.size);
        for stroke in program.iter() {
            self.draw_stroke(&mut canvas, stroke);
        }
        canvas
    }

    fn draw_stroke(&self, canvas: &mut Image, stroke: &Stroke) {
        let half = self.line_width / 2.0;
        match *stroke {
            Stroke::Circle { center, radius } => {
                let (cx, cy) = self.project(center);
                let r = radius as f32 * self.cell();
                let lo = (cx - r - half, cy - r - half);
                let hi = (cx + r + half, cy + r + half);
                self.fill(canvas, lo, hi, |x, y| {
                    ((x - cx).hypot(y - cy) - r).abs() <= half
                });
            }
            Stroke::Line { points: [a, b] } => {
                let (ax, ay) = self.project(a);
                let (bx, by) = self.project(b);
                let lo = (ax.min(bx) - half, ay.min(by) - half);
                let hi = (ax.max(bx) + half, ay.max(by) + half);
                self.fill(canvas, lo, hi, |x, y| {
                    segment_distance((x, y), (ax, ay), (bx, by)) <= half
                });
            }
        }
    }

    /// Ink every pixel in the clipped box whose center satisfies `hit`.
    fn fill(
        &self,
        canvas: &mut Image,
        lo: (f32, f32),
        hi: (f32, f32),
        hit: impl Fn(f32, f32) -> bool,
    ) {
        let max = self.size as f32 - 1.0;
        let x0 = lo.0.floor().clamp(0.0, max) as usize;
        let y0 = lo.1.floor().clamp(0.0, max) as usize;
        let x1 = hi.0.ceil().clamp(0.0, max) as usize;
        let y1 = hi.1.ceil().clamp(0.0, max) as usize;
        for y in y0..=y1 {
            for x in x0..=x1 {
                if hit(x as f32 + 0.5, y as f32 + 0.5) {
                    canvas.set(x, y, 1.0);
                }
            }
        }
    }
}

impl Renderer for RasterRenderer {
    fn render(&mut self, programs: &[Program]) -> Result<Vec<Image>> {
        Ok(programs.iter().map(|p| self.render_program(p)).collect())
    }
}

/// Euclidean distance from `p` to the segment from `a` to `b`.
fn segment_distance(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
    };
    (p.0 - (a.0 + t * dx)).hypot(p.1 - (a.1 + t * dy))
}
