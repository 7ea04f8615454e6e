use std::path::PathBuf;

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::wgpu::WgpuDevice;
use burn::backend::{NdArray, Wgpu};
use burn::prelude::Backend;
use clap::Args;

use recognizer::data::examples::load_examples;
use recognizer::inference::test;

use super::{fail, load_trained, DataArgs, ModelArgs};

#[derive(Args, Clone, Debug)]
pub struct EvalArgs {
    #[command(flatten)]
    pub data: DataArgs,
    #[command(flatten)]
    pub model: ModelArgs,
    /// Directory for partial/target previews of the first examples
    #[arg(long, default_value = "previews")]
    pub previews: PathBuf,
}

pub fn cmd_eval(args: EvalArgs) {
    if args.model.cpu {
        run::<NdArray>(&args, NdArrayDevice::Cpu);
    } else {
        run::<Wgpu>(&args, WgpuDevice::default());
    }
}

fn run<B: Backend>(args: &EvalArgs, device: B::Device) {
    let (config, model) =
        load_trained::<B>(&args.model.checkpoint, &device).unwrap_or_else(|e| fail(e));
    let examples =
        load_examples(args.data.examples, &args.data.prefix()).unwrap_or_else(|e| fail(e));

    if let Err(e) = test(&model, &config, &examples, &args.previews, &device) {
        fail(e);
    }
}
