use std::path::PathBuf;
use std::time::Instant;

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::wgpu::WgpuDevice;
use burn::backend::{Autodiff, NdArray, Wgpu};
use burn::tensor::backend::AutodiffBackend;
use clap::Args;
use log::info;

use recognizer::data::examples::load_examples;
use recognizer::training::train;
use recognizer::TrainingConfig;

use super::{fail, DataArgs, ModelArgs};

#[derive(Args, Clone, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub data: DataArgs,
    #[command(flatten)]
    pub model: ModelArgs,
    /// Training config JSON (defaults: lr 1e-3, batch 50, 1000 steps)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

pub fn cmd_train(args: TrainArgs) {
    let config = match &args.config {
        Some(path) => TrainingConfig::load_file(path).unwrap_or_else(|e| fail(e)),
        None => TrainingConfig::default(),
    };

    if args.model.cpu {
        run::<Autodiff<NdArray>>(&args, &config, NdArrayDevice::Cpu);
    } else {
        run::<Autodiff<Wgpu>>(&args, &config, WgpuDevice::default());
    }
}

fn run<B: AutodiffBackend>(args: &TrainArgs, config: &TrainingConfig, device: B::Device) {
    let start = Instant::now();
    let examples =
        load_examples(args.data.examples, &args.data.prefix()).unwrap_or_else(|e| fail(e));

    match train::<B>(config, &examples, &args.model.checkpoint, &device) {
        Ok((_model, report)) => {
            let last = report.history.last();
            info!(
                "done in {:.1}s: checkpoint {}{}",
                start.elapsed().as_secs_f64(),
                report.checkpoint.display(),
                last.map_or(String::new(), |r| format!(
                    ", last logged accuracy {} loss {}",
                    r.accuracy, r.loss
                ))
            );
        }
        Err(e) => fail(e),
    }
}
