//! Drawing programs: points, strokes, and ordered stroke sequences.
//!
//! Programs are persisted as serde JSON in `<prefix>-<j>.p` files. The
//! `Display` form is the one-line description logged while decoding.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of discrete bins per axis; coordinates live in `0..GRID_BINS`.
pub const GRID_BINS: u8 = 10;

/// A point on the coarse drawing grid.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u8,
    pub y: u8,
}

impl Point {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates fall inside the grid.
    pub fn in_grid(&self) -> bool {
        self.x < GRID_BINS && self.y < GRID_BINS
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Kind tag carried alongside every stroke label.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrokeKind {
    Circle,
    Line,
}

impl StrokeKind {
    /// Number of kinds, and so of kind-head classes.
    pub const COUNT: usize = 2;

    /// Class index used by the kind head.
    pub fn class(self) -> usize {
        match self {
            Self::Circle => 0,
            Self::Line => 1,
        }
    }

    pub fn from_class(class: usize) -> Self {
        if class == 0 {
            Self::Circle
        } else {
            Self::Line
        }
    }
}

/// A single drawing primitive.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Stroke {
    Circle { center: Point, radius: u8 },
    Line { points: [Point; 2] },
}

impl Stroke {
    pub fn circle(x: u8, y: u8, radius: u8) -> Self {
        Self::Circle {
            center: Point::new(x, y),
            radius,
        }
    }

    pub fn line(x1: u8, y1: u8, x2: u8, y2: u8) -> Self {
        Self::Line {
            points: [Point::new(x1, y1), Point::new(x2, y2)],
        }
    }

    pub fn kind(&self) -> StrokeKind {
        match self {
            Self::Circle { .. } => StrokeKind::Circle,
            Self::Line { .. } => StrokeKind::Line,
        }
    }
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Circle { center, radius } => write!(f, "circle({}, {})", center, radius),
            Self::Line { points: [a, b] } => write!(f, "line({}, {})", a, b),
        }
    }
}

/// An ordered, append-only sequence of strokes.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    pub strokes: Vec<Stroke>,
}

impl Program {
    pub fn new(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    /// The program made of the first `len` strokes.
    pub fn prefix(&self, len: usize) -> Program {
        Program::new(self.strokes[..len.min(self.strokes.len())].to_vec())
    }

    /// Read a program file.
    pub fn load(path: &Path) -> Result<Program> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&content).map_err(|source| Error::Program {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write this program to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string(self).map_err(|source| Error::Program {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content).map_err(|e| Error::io(path, e))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stroke) in self.strokes.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", stroke)?;
        }
        Ok(())
    }
}

/// Load `<prefix>-<j>.p` for every `j` in `0..count`.
pub fn load_programs(prefix: &str, count: usize) -> Result<Vec<Program>> {
    (0..count)
        .map(|j| Program::load(Path::new(&program_path(prefix, j))))
        .collect()
}

/// Path of the serialized program `j` under `prefix`.
pub fn program_path(prefix: &str, j: usize) -> String {
    format!("{}-{}.p", prefix, j)
}

/// Path of the trace image after stroke `k` of program `j`.
pub fn trace_path(prefix: &str, j: usize, k: usize) -> String {
    format!("{}-{}-{}.png", prefix, j, k)
}
