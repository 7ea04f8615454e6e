use std::path::PathBuf;

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::wgpu::WgpuDevice;
use burn::backend::{NdArray, Wgpu};
use burn::prelude::Backend;
use clap::Args;
use log::info;

use recognizer::data::image::load_images;
use recognizer::inference::{draw, DecodeConfig};
use recognizer::render::RasterRenderer;

use super::{fail, load_trained, ModelArgs};

#[derive(Args, Clone, Debug)]
pub struct DrawArgs {
    /// Target images to decode
    #[arg(default_value = "syntheticTrainingData/doubleCircleLine-0-2.png")]
    pub targets: Vec<PathBuf>,
    #[command(flatten)]
    pub model: ModelArgs,
    /// Stop after this many strokes
    #[arg(long, default_value = "3")]
    pub max_strokes: usize,
    /// Also stop once the mean pixel difference to the target is at most this
    #[arg(long, value_name = "DISTANCE")]
    pub stop_distance: Option<f32>,
    /// Directory for target and per-stroke canvas previews
    #[arg(long, default_value = "previews")]
    pub previews: PathBuf,
}

pub fn cmd_draw(args: DrawArgs) {
    if args.model.cpu {
        run::<NdArray>(&args, NdArrayDevice::Cpu);
    } else {
        run::<Wgpu>(&args, WgpuDevice::default());
    }
}

fn run<B: Backend>(args: &DrawArgs, device: B::Device) {
    let (config, model) =
        load_trained::<B>(&args.model.checkpoint, &device).unwrap_or_else(|e| fail(e));
    let targets = load_images(&args.targets).unwrap_or_else(|e| fail(e));

    let decode = DecodeConfig {
        max_strokes: args.max_strokes,
        stop_distance: args.stop_distance,
    };
    let mut renderer = RasterRenderer::new(config.image_size);

    match draw(
        &model,
        &config,
        &targets,
        &mut renderer,
        &decode,
        Some(args.previews.as_path()),
        &device,
    ) {
        Ok(programs) => {
            for (path, program) in args.targets.iter().zip(&programs) {
                info!("{}: {}", path.display(), program);
            }
        }
        Err(e) => fail(e),
    }
}
