//! Training example extraction: (partial canvas, target, next stroke).
//!
//! Every stroke `k` of a program becomes one example. The partial canvas
//! is the trace image after stroke `k-1` (blank for `k = 0`), the target
//! is the final trace image, and the label encodes stroke `k`.

use std::path::Path;
use std::rc::Rc;

use log::{info, warn};

use crate::data::image::{load_images, Image};
use crate::error::{Error, Result};
use crate::language::{self, Program, Stroke, StrokeKind};

/// Number of coordinate heads: x1, y1, x2, y2.
pub const LABEL_SLOTS: usize = 4;

/// Classification target for one stroke.
///
/// Circles fill the slots as `(cx, cy, 0, 0)`; the kind tag is what
/// tells them apart from a line starting and ending at the origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrokeLabel {
    pub kind: StrokeKind,
    pub slots: [u8; LABEL_SLOTS],
}

impl StrokeLabel {
    pub fn encode(stroke: &Stroke) -> Result<Self> {
        let label = match *stroke {
            Stroke::Circle { center, .. } => Self {
                kind: StrokeKind::Circle,
                slots: [center.x, center.y, 0, 0],
            },
            Stroke::Line { points: [a, b] } => Self {
                kind: StrokeKind::Line,
                slots: [a.x, a.y, b.x, b.y],
            },
        };
        if label.slots.iter().any(|&s| s >= language::GRID_BINS) {
            return Err(Error::UnencodableStroke(format!(
                "{} has a coordinate outside 0..{}",
                stroke,
                language::GRID_BINS
            )));
        }
        Ok(label)
    }

    /// The stroke this label names; circles are always unit radius.
    pub fn decode(&self) -> Stroke {
        let [x1, y1, x2, y2] = self.slots;
        match self.kind {
            StrokeKind::Circle => Stroke::circle(x1, y1, 1),
            StrokeKind::Line => Stroke::line(x1, y1, x2, y2),
        }
    }
}

/// Index-aligned partials, targets, and labels.
#[derive(Clone, Debug, Default)]
pub struct ExampleSet {
    pub partials: Vec<Rc<Image>>,
    pub targets: Vec<Rc<Image>>,
    pub labels: Vec<StrokeLabel>,
}

impl ExampleSet {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(width, height)` shared by every image, if any are present.
    pub fn image_shape(&self) -> Option<(usize, usize)> {
        self.targets.first().map(|t| t.shape())
    }

    /// Values of one coordinate slot across all examples.
    pub fn slot_vector(&self, slot: usize) -> Vec<u8> {
        self.labels.iter().map(|l| l.slots[slot]).collect()
    }

    /// The four per-slot label vectors.
    pub fn slot_vectors(&self) -> [Vec<u8>; LABEL_SLOTS] {
        std::array::from_fn(|slot| self.slot_vector(slot))
    }

    pub fn kind_vector(&self) -> Vec<StrokeKind> {
        self.labels.iter().map(|l| l.kind).collect()
    }

    /// Gather the examples at `indices`, keeping every array aligned.
    pub fn select(&self, indices: &[usize]) -> ExampleSet {
        ExampleSet {
            partials: indices.iter().map(|&i| self.partials[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Append one example per stroke of `program`, given its trace.
    ///
    /// `trace[k]` must be the rendering after stroke `k`.
    pub fn extend_from_trace(&mut self, program: &Program, trace: Vec<Image>) -> Result<()> {
        if trace.len() != program.len() {
            return Err(Error::Shape(format!(
                "{} trace images for a {}-stroke program",
                trace.len(),
                program.len()
            )));
        }
        let Some(last) = trace.last() else {
            return Ok(());
        };
        let shape = last.shape();
        if let Some(existing) = self.image_shape() {
            if existing != shape {
                return Err(Error::Shape(format!(
                    "trace is {:?}, earlier examples are {:?}",
                    shape, existing
                )));
            }
        }
        if let Some(bad) = trace.iter().find(|img| img.shape() != shape) {
            return Err(Error::Shape(format!(
                "trace mixes {:?} and {:?}",
                bad.shape(),
                shape
            )));
        }

        let labels = program
            .iter()
            .map(StrokeLabel::encode)
            .collect::<Result<Vec<_>>>()?;
        let trace: Vec<Rc<Image>> = trace.into_iter().map(Rc::new).collect();
        let target = trace[trace.len() - 1].clone();
        let mut current = Rc::new(Image::zeros(shape.0, shape.1));

        for (k, label) in labels.into_iter().enumerate() {
            self.partials.push(current);
            self.targets.push(target.clone());
            self.labels.push(label);
            current = trace[k].clone();
        }
        Ok(())
    }
}

/// Load programs `0..count` under `prefix` with their traces.
pub fn load_examples(count: usize, prefix: &str) -> Result<ExampleSet> {
    let programs = language::load_programs(prefix, count)?;
    let mut set = ExampleSet::default();

    for (j, program) in programs.iter().enumerate() {
        let paths: Vec<String> = (0..program.len())
            .map(|k| language::trace_path(prefix, j, k))
            .collect();
        let trace = load_images(&paths)?;
        set.extend_from_trace(program, trace)?;
    }

    if set.is_empty() {
        warn!("no examples under {} ({} programs)", prefix, count);
    } else {
        info!(
            "loaded {} examples from {} programs under {}",
            set.len(),
            count,
            Path::new(prefix).display()
        );
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RasterRenderer;

    fn trace_of(program: &Program, size: usize) -> Vec<Image> {
        let r = RasterRenderer::new(size);
        (1..=program.len())
            .map(|k| r.render_program(&program.prefix(k)))
            .collect()
    }

    #[test]
    fn circle_label_zero_fills_second_point() {
        let label = StrokeLabel::encode(&Stroke::circle(4, 7, 1)).unwrap();
        assert_eq!(label.slots, [4, 7, 0, 0]);
        assert_eq!(label.kind, StrokeKind::Circle);
        assert_eq!(label.decode(), Stroke::circle(4, 7, 1));
    }

    #[test]
    fn origin_line_is_not_a_circle() {
        let label = StrokeLabel::encode(&Stroke::line(3, 3, 0, 0)).unwrap();
        assert_eq!(label.slots, [3, 3, 0, 0]);
        assert_eq!(label.decode(), Stroke::line(3, 3, 0, 0));
    }

    #[test]
    fn out_of_grid_coordinate_is_rejected() {
        let err = StrokeLabel::encode(&Stroke::line(0, 0, 10, 2)).unwrap_err();
        assert!(matches!(err, Error::UnencodableStroke(_)));
    }

    #[test]
    fn partials_follow_the_trace() {
        let program = Program::new(vec![
            Stroke::circle(2, 2, 1),
            Stroke::circle(6, 6, 1),
            Stroke::line(1, 8, 8, 1),
        ]);
        let trace = trace_of(&program, 40);
        let mut set = ExampleSet::default();
        set.extend_from_trace(&program, trace.clone()).unwrap();

        assert_eq!(set.len(), 3);
        assert!(set.partials[0].pixels.iter().all(|&v| v == 0.0));
        assert_eq!(*set.partials[1], trace[0]);
        assert_eq!(*set.partials[2], trace[1]);
        for target in &set.targets {
            assert_eq!(**target, trace[2]);
        }
        assert_eq!(
            set.slot_vectors(),
            [vec![2, 6, 1], vec![2, 6, 8], vec![0, 0, 8], vec![0, 0, 1]]
        );
        assert_eq!(
            set.kind_vector(),
            vec![StrokeKind::Circle, StrokeKind::Circle, StrokeKind::Line]
        );
    }

    #[test]
    fn empty_program_adds_nothing() {
        let mut set = ExampleSet::default();
        set.extend_from_trace(&Program::default(), Vec::new()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.image_shape(), None);
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let program = Program::new(vec![Stroke::circle(2, 2, 1)]);
        let mut set = ExampleSet::default();
        set.extend_from_trace(&program, trace_of(&program, 20)).unwrap();
        let err = set
            .extend_from_trace(&program, trace_of(&program, 30))
            .unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
    }

    #[test]
    fn select_keeps_alignment() {
        let program = Program::new(vec![
            Stroke::circle(1, 1, 1),
            Stroke::line(2, 3, 4, 5),
            Stroke::circle(8, 8, 1),
        ]);
        let mut set = ExampleSet::default();
        set.extend_from_trace(&program, trace_of(&program, 20)).unwrap();

        let picked = set.select(&[2, 0, 2]);
        assert_eq!(picked.len(), 3);
        assert_eq!(picked.labels[0], set.labels[2]);
        assert_eq!(picked.labels[1], set.labels[0]);
        assert!(Rc::ptr_eq(&picked.partials[0], &set.partials[2]));
        assert!(Rc::ptr_eq(&picked.partials[1], &set.partials[0]));
    }
}
