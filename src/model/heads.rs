//! Per-head logits, targets, loss and accuracy.

use burn::prelude::*;
use burn::tensor::activation;

use crate::data::examples::{StrokeLabel, LABEL_SLOTS};
use crate::error::{Error, Result};
use crate::language::StrokeKind;

/// Raw network output: one `[batch, classes]` tensor per head.
#[derive(Debug, Clone)]
pub struct HeadLogits<B: Backend> {
    /// Coordinate heads in slot order (x1, y1, x2, y2).
    pub slots: Vec<Tensor<B, 2>>,
    pub kind: Tensor<B, 2>,
}

/// Class indices for every head, `[batch]` each.
#[derive(Debug, Clone)]
pub struct HeadTargets<B: Backend> {
    pub slots: Vec<Tensor<B, 1, Int>>,
    pub kind: Tensor<B, 1, Int>,
}

impl<B: Backend> HeadTargets<B> {
    pub fn from_labels(labels: &[StrokeLabel], device: &B::Device) -> Self {
        let n = labels.len();
        let column = |values: Vec<i32>| {
            Tensor::<B, 1, Int>::from_data(TensorData::new(values, [n]), device)
        };

        let slots = (0..LABEL_SLOTS)
            .map(|slot| column(labels.iter().map(|l| l.slots[slot] as i32).collect()))
            .collect();
        let kind = column(labels.iter().map(|l| l.kind.class() as i32).collect());
        Self { slots, kind }
    }
}

impl<B: Backend> HeadLogits<B> {
    /// Sum over heads of the batch-summed sparse cross-entropy.
    pub fn loss(&self, targets: &HeadTargets<B>) -> Tensor<B, 1> {
        let mut total = summed_cross_entropy(self.kind.clone(), targets.kind.clone());
        for (logits, target) in self.slots.iter().zip(&targets.slots) {
            total = total + summed_cross_entropy(logits.clone(), target.clone());
        }
        total
    }

    /// Arg-max of every head, assembled into one label per example.
    pub fn predictions(&self) -> Result<Vec<StrokeLabel>> {
        let kinds = argmax_rows(self.kind.clone())?;
        let slots = self
            .slots
            .iter()
            .map(|logits| argmax_rows(logits.clone()))
            .collect::<Result<Vec<_>>>()?;

        Ok((0..kinds.len())
            .map(|i| StrokeLabel {
                kind: StrokeKind::from_class(kinds[i]),
                slots: std::array::from_fn(|s| slots.get(s).map_or(0, |col| col[i] as u8)),
            })
            .collect())
    }
}

/// `-sum_i log softmax(logits_i)[target_i]`.
fn summed_cross_entropy<B: Backend>(
    logits: Tensor<B, 2>,
    targets: Tensor<B, 1, Int>,
) -> Tensor<B, 1> {
    let log_probs = activation::log_softmax(logits, 1);
    let picked = log_probs.gather(1, targets.unsqueeze_dim::<2>(1)); // [batch, 1]
    picked.sum().neg()
}

/// Row-wise arg-max, computed on the host.
fn argmax_rows<B: Backend>(logits: Tensor<B, 2>) -> Result<Vec<usize>> {
    let [rows, cols] = logits.dims();
    let values: Vec<f32> = logits
        .into_data()
        .convert::<f32>()
        .to_vec()
        .map_err(|e| Error::Tensor(format!("{:?}", e)))?;

    Ok((0..rows)
        .map(|r| {
            let row = &values[r * cols..(r + 1) * cols];
            let mut best = 0;
            for (c, &v) in row.iter().enumerate() {
                if v > row[best] {
                    best = c;
                }
            }
            best
        })
        .collect())
}

/// Fraction of examples whose every head matches its label.
pub fn joint_accuracy(predictions: &[StrokeLabel], labels: &[StrokeLabel]) -> f32 {
    if labels.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(labels)
        .filter(|(p, l)| p == l)
        .count();
    correct as f32 / labels.len() as f32
}
