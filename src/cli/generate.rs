use clap::Args;

use recognizer::data::image::IMAGE_SIZE;
use recognizer::data::synthetic::{generate, Layout};
use recognizer::render::RasterRenderer;

use super::{fail, DataArgs};

#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    // `--examples` is the number of programs to write
    #[command(flatten)]
    pub data: DataArgs,
    /// Canvas side in pixels
    #[arg(long, default_value_t = IMAGE_SIZE)]
    pub size: usize,
    /// Seed for the random programs
    #[arg(long, default_value = "0")]
    pub seed: u64,
}

pub fn cmd_generate(args: GenerateArgs) {
    let Some(layout) = Layout::from_name(&args.data.kind) else {
        let known: Vec<&str> = Layout::ALL.iter().map(|l| l.name()).collect();
        fail(format!(
            "unknown layout '{}' (expected one of: {})",
            args.data.kind,
            known.join(", ")
        ));
    };

    let mut renderer = RasterRenderer::new(args.size);
    if let Err(e) = generate(
        args.data.examples,
        &args.data.prefix(),
        layout,
        &mut renderer,
        args.seed,
    ) {
        fail(e);
    }
}
