pub mod draw;
pub mod eval;
pub mod generate;
pub mod train;

use std::path::{Path, PathBuf};
use std::process;

use burn::prelude::Backend;
use clap::Args;
use log::error;

use recognizer::checkpoint;
use recognizer::model::{RecognitionModel, RecognitionModelConfig};
use recognizer::TrainingConfig;

/// Where the example set lives.
#[derive(Args, Clone, Debug)]
pub struct DataArgs {
    /// Number of programs to load
    #[arg(long, default_value = "100")]
    pub examples: usize,
    /// Example layout name (file prefix)
    #[arg(long, default_value = "doubleCircleLine")]
    pub kind: String,
    /// Directory holding `<kind>-<j>.p` and trace PNGs
    #[arg(long, default_value = "syntheticTrainingData")]
    pub data_dir: PathBuf,
}

impl DataArgs {
    /// `<data_dir>/<kind>`, the prefix every data file name starts with.
    pub fn prefix(&self) -> String {
        self.data_dir.join(&self.kind).to_string_lossy().into_owned()
    }
}

/// Checkpoint location and backend choice.
#[derive(Args, Clone, Debug)]
pub struct ModelArgs {
    /// Checkpoint path (burn stores it with an .mpk extension)
    #[arg(long, default_value_os_t = checkpoint::default_checkpoint_path())]
    pub checkpoint: PathBuf,
    /// Run on the CPU (ndarray) backend instead of wgpu
    #[arg(long)]
    pub cpu: bool,
}

/// Log `err` and exit with status 1.
pub fn fail(err: impl std::fmt::Display) -> ! {
    error!("{}", err);
    process::exit(1);
}

/// Rebuild the network described beside `path` and load its weights.
///
/// Falls back to the default shape when no config was saved.
pub fn load_trained<B: Backend>(
    path: &Path,
    device: &B::Device,
) -> recognizer::Result<(RecognitionModelConfig, RecognitionModel<B>)> {
    let config = TrainingConfig::load_beside(path)?
        .map(|c| c.model)
        .unwrap_or_else(RecognitionModelConfig::new);
    config.validate()?;
    let model = config.init::<B>(device);
    let model = checkpoint::restore(model, path, device)?.require_trained(path)?;
    Ok((config, model))
}
