//! Jointly-correct accuracy over a whole example set.

use std::path::Path;

use burn::prelude::*;
use log::{info, warn};

use crate::data::examples::{ExampleSet, StrokeLabel};
use crate::data::image::show;
use crate::error::Result;
use crate::model::input::examples_to_input;
use crate::model::{joint_accuracy, RecognitionModel, RecognitionModelConfig};

/// How many examples get previews and a printed label comparison.
pub const SHOWN_EXAMPLES: usize = 5;

#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Fraction of examples with every head correct.
    pub accuracy: f32,
    /// Predicted label for every example, in set order.
    pub predictions: Vec<StrokeLabel>,
}

/// Score the model on every example in one batch.
pub fn evaluate<B: Backend>(
    model: &RecognitionModel<B>,
    model_config: &RecognitionModelConfig,
    examples: &ExampleSet,
    device: &B::Device,
) -> Result<Evaluation> {
    if examples.is_empty() {
        warn!("evaluating on an empty example set");
        return Ok(Evaluation {
            accuracy: 0.0,
            predictions: Vec::new(),
        });
    }
    let input = examples_to_input::<B>(examples, model_config, device)?;
    let predictions = model.forward(input).predictions()?;
    Ok(Evaluation {
        accuracy: joint_accuracy(&predictions, &examples.labels),
        predictions,
    })
}

/// Evaluate, log the accuracy, then preview the first few examples with
/// their predicted and true labels.
pub fn test<B: Backend>(
    model: &RecognitionModel<B>,
    model_config: &RecognitionModelConfig,
    examples: &ExampleSet,
    previews: &Path,
    device: &B::Device,
) -> Result<Evaluation> {
    let evaluation = evaluate(model, model_config, examples, device)?;
    info!("Average accuracy: {}", evaluation.accuracy);

    for j in 0..SHOWN_EXAMPLES.min(examples.len()) {
        show(&examples.partials[j], previews, &format!("example-{}-partial", j))?;
        show(&examples.targets[j], previews, &format!("example-{}-target", j))?;
        let predicted = evaluation.predictions[j];
        let truth = examples.labels[j];
        info!("predicted {:?} {:?}", predicted.kind, predicted.slots);
        info!("expected  {:?} {:?}", truth.kind, truth.slots);
    }
    Ok(evaluation)
}
