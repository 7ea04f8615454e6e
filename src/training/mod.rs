//! Supervised training with summed cross-entropy over all heads.
//!
//! Fixed-iteration Adam on shuffled minibatches; no early stopping and
//! no validation split. The checkpoint is overwritten periodically and
//! once more after the last step.

use std::path::{Path, PathBuf};

use burn::module::Module;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::ElementConversion;
use log::info;

use crate::checkpoint;
use crate::config::TrainingConfig;
use crate::data::batch::BatchIterator;
use crate::data::examples::ExampleSet;
use crate::error::{Error, Result};
use crate::model::input::examples_to_input;
use crate::model::{joint_accuracy, HeadTargets, RecognitionModel};

/// Loss and accuracy measured on one logged batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub step: usize,
    /// Jointly-correct fraction of the batch, before the update.
    pub accuracy: f32,
    pub loss: f32,
}

/// Outcome of a full training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// One entry per logged step.
    pub history: Vec<StepReport>,
    /// The checkpoint record holding the final weights.
    pub checkpoint: PathBuf,
}

/// Adam with default betas and epsilon 1e-8.
pub fn adam_config() -> AdamConfig {
    AdamConfig::new().with_epsilon(1e-8)
}

/// Create the Adam optimizer used for every run.
pub fn create_optimizer<B: AutodiffBackend>() -> impl Optimizer<RecognitionModel<B>, B> {
    adam_config().init()
}

fn every(step: usize, period: usize) -> bool {
    period > 0 && step % period == 0
}

/// Train a fresh model on `examples` and checkpoint it at `checkpoint_path`.
///
/// The config is written beside the checkpoint before the first step so
/// `draw` and `test` can rebuild the same network shape.
pub fn train<B: AutodiffBackend>(
    config: &TrainingConfig,
    examples: &ExampleSet,
    checkpoint_path: &Path,
    device: &B::Device,
) -> Result<(RecognitionModel<B>, TrainingReport)> {
    config.validate()?;
    if examples.is_empty() {
        return Err(Error::Shape("cannot train on an empty example set".into()));
    }

    let mut model = config.model.init::<B>(device);
    let mut optimizer = create_optimizer::<B>();
    let mut batches = BatchIterator::new(
        examples.len(),
        config.batch_size,
        config.seed,
        config.reshuffle,
    );
    config.save_beside(checkpoint_path)?;

    info!(
        "training on {} examples: {} steps of {}, lr {}, {} parameters",
        examples.len(),
        config.num_iterations,
        config.batch_size,
        config.learning_rate,
        model.num_params()
    );

    let mut history = Vec::new();
    for step in 0..config.num_iterations {
        let batch = examples.select(&batches.next_indices());
        let input = examples_to_input::<B>(&batch, &config.model, device)?;
        let targets = HeadTargets::from_labels(&batch.labels, device);

        let logits = model.forward(input);
        let loss = logits.loss(&targets);

        if every(step, config.log_every) {
            let predictions = logits.predictions()?;
            let report = StepReport {
                step,
                accuracy: joint_accuracy(&predictions, &batch.labels),
                loss: loss.clone().into_scalar().elem::<f32>(),
            };
            info!("{} {} {}", report.step, report.accuracy, report.loss);
            history.push(report);
        }

        let grads = GradientsParams::from_grads(loss.backward(), &model);
        model = optimizer.step(config.learning_rate, model, grads);

        if every(step, config.checkpoint_every) {
            let path = checkpoint::save(&model, checkpoint_path)?;
            info!("Saving checkpoint: {}", path.display());
        }
    }

    let path = checkpoint::save(&model, checkpoint_path)?;
    info!("final checkpoint: {}", path.display());

    Ok((
        model,
        TrainingReport {
            history,
            checkpoint: path,
        },
    ))
}
