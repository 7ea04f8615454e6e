//! Synthetic training data: random programs plus their per-stroke traces.

use std::path::Path;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::language::{self, Program, Stroke, StrokeKind, GRID_BINS};
use crate::render::Renderer;

/// Stroke recipe for generated programs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Two unit circles, then a line.
    DoubleCircleLine,
    /// One unit circle, then a line.
    CircleLine,
    /// Two lines.
    DoubleLine,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Self::DoubleCircleLine, Self::CircleLine, Self::DoubleLine];

    /// File-prefix name, as used under `syntheticTrainingData/`.
    pub fn name(self) -> &'static str {
        match self {
            Self::DoubleCircleLine => "doubleCircleLine",
            Self::CircleLine => "circleLine",
            Self::DoubleLine => "doubleLine",
        }
    }

    pub fn from_name(name: &str) -> Option<Layout> {
        Self::ALL.into_iter().find(|l| l.name() == name)
    }

    fn kinds(self) -> &'static [StrokeKind] {
        match self {
            Self::DoubleCircleLine => &[StrokeKind::Circle, StrokeKind::Circle, StrokeKind::Line],
            Self::CircleLine => &[StrokeKind::Circle, StrokeKind::Line],
            Self::DoubleLine => &[StrokeKind::Line, StrokeKind::Line],
        }
    }

    /// Draw one random program following this layout.
    pub fn sample(self, rng: &mut impl Rng) -> Program {
        let strokes = self
            .kinds()
            .iter()
            .map(|kind| match kind {
                StrokeKind::Circle => {
                    Stroke::circle(rng.gen_range(0..GRID_BINS), rng.gen_range(0..GRID_BINS), 1)
                }
                StrokeKind::Line => loop {
                    let (x1, y1) = (rng.gen_range(0..GRID_BINS), rng.gen_range(0..GRID_BINS));
                    let (x2, y2) = (rng.gen_range(0..GRID_BINS), rng.gen_range(0..GRID_BINS));
                    if (x1, y1) != (x2, y2) {
                        break Stroke::line(x1, y1, x2, y2);
                    }
                },
            })
            .collect();
        Program::new(strokes)
    }
}

/// Write `count` programs to `<prefix>-<j>.p` and their traces to
/// `<prefix>-<j>-<k>.png`, where trace `k` shows strokes `0..=k`.
pub fn generate<R: Renderer>(
    count: usize,
    prefix: &str,
    layout: Layout,
    renderer: &mut R,
    seed: u64,
) -> Result<()> {
    if let Some(dir) = Path::new(prefix).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    for j in 0..count {
        let program = layout.sample(&mut rng);
        program.save(Path::new(&language::program_path(prefix, j)))?;

        let prefixes: Vec<Program> = (1..=program.len()).map(|k| program.prefix(k)).collect();
        let trace = renderer.render(&prefixes)?;
        for (k, image) in trace.iter().enumerate() {
            image.save_png(Path::new(&language::trace_path(prefix, j, k)))?;
        }
    }
    info!("generated {} {} programs under {}", count, layout.name(), prefix);
    Ok(())
}
