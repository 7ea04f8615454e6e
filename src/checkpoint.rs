//! Checkpoint management for the recognition model.
//!
//! Uses burn's native record format (NamedMpk, full precision). Burn
//! replaces the checkpoint path's extension with `.mpk`, so the default
//! `<tmp>/model.checkpoint` is stored as `<tmp>/model.mpk`.

use std::path::{Path, PathBuf};

use burn::module::Module;
use burn::prelude::*;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder};
use log::info;

use crate::error::{Error, Result};
use crate::model::RecognitionModel;

/// File name used under the system temp directory by default.
pub const DEFAULT_CHECKPOINT: &str = "model.checkpoint";

/// `<tmp>/model.checkpoint`.
pub fn default_checkpoint_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_CHECKPOINT)
}

/// The file burn actually writes for `path`.
pub fn record_path(path: &Path) -> PathBuf {
    path.with_extension("mpk")
}

/// Whether a model carries trained weights.
#[derive(Debug)]
pub enum ModelState<B: Backend> {
    /// Freshly initialized parameters; no checkpoint was found.
    Untrained(RecognitionModel<B>),
    /// Parameters restored from (or just saved to) a checkpoint.
    Trained(RecognitionModel<B>),
}

impl<B: Backend> ModelState<B> {
    pub fn is_trained(&self) -> bool {
        matches!(self, Self::Trained(_))
    }

    pub fn model(&self) -> &RecognitionModel<B> {
        match self {
            Self::Untrained(m) | Self::Trained(m) => m,
        }
    }

    /// The trained model, or `Error::Untrained` naming `path`.
    pub fn require_trained(self, path: &Path) -> Result<RecognitionModel<B>> {
        match self {
            Self::Trained(m) => Ok(m),
            Self::Untrained(_) => Err(Error::Untrained {
                path: record_path(path),
            }),
        }
    }
}

/// Save a model checkpoint, overwriting any previous one.
///
/// Returns the path of the written record.
pub fn save<B: Backend>(model: &RecognitionModel<B>, path: &Path) -> Result<PathBuf> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
    }

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    model
        .clone()
        .save_file(path.to_path_buf(), &recorder)
        .map_err(|e| Error::Checkpoint {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(record_path(path))
}

/// Load weights from `path` into `model`.
///
/// A missing checkpoint is not an error: the model comes back as
/// `Untrained`. Only a checkpoint that exists but cannot be read fails.
pub fn restore<B: Backend>(
    model: RecognitionModel<B>,
    path: &Path,
    device: &B::Device,
) -> Result<ModelState<B>> {
    let full_path = record_path(path);
    if !full_path.exists() {
        return Ok(ModelState::Untrained(model));
    }

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let loaded = model
        .load_file(path.to_path_buf(), &recorder, device)
        .map_err(|e| Error::Checkpoint {
            path: full_path.clone(),
            message: e.to_string(),
        })?;
    info!("restored checkpoint {}", full_path.display());
    Ok(ModelState::Trained(loaded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecognitionModelConfig;
    use burn::backend::NdArray;

    type B = NdArray;

    fn tiny() -> RecognitionModelConfig {
        RecognitionModelConfig::new().with_image_size(20)
    }

    #[test]
    fn record_path_swaps_extension() {
        assert_eq!(
            record_path(Path::new("/tmp/model.checkpoint")),
            PathBuf::from("/tmp/model.mpk")
        );
        assert!(default_checkpoint_path().ends_with("model.checkpoint"));
        assert_eq!(
            record_path(Path::new("runs/a.v1")),
            record_path(Path::new("runs/a.v2"))
        );
    }

    #[test]
    fn missing_checkpoint_restores_untrained() {
        let device = Default::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.checkpoint");

        let state = restore(tiny().init::<B>(&device), &path, &device).unwrap();
        assert!(!state.is_trained());
        let err = state.require_trained(&path).unwrap_err();
        assert!(matches!(err, Error::Untrained { .. }));
    }

    #[test]
    fn save_then_restore_keeps_predictions() {
        let device = Default::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/model.checkpoint");

        let model = tiny().init::<B>(&device);
        let written = save(&model, &path).unwrap();
        assert!(written.exists());

        let fresh = tiny().init::<B>(&device);
        let state = restore(fresh, &path, &device).unwrap();
        assert!(state.is_trained());

        let input = Tensor::<B, 4>::ones([1, 2, 20, 20], &device);
        let before: Vec<f32> = model.forward(input.clone()).slots[0]
            .clone()
            .into_data()
            .to_vec()
            .unwrap();
        let after: Vec<f32> = state.model().forward(input).slots[0]
            .clone()
            .into_data()
            .to_vec()
            .unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn corrupt_checkpoint_is_an_error() {
        let device = Default::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.checkpoint");
        std::fs::write(record_path(&path), b"not a record").unwrap();

        let err = restore(tiny().init::<B>(&device), &path, &device).unwrap_err();
        assert!(matches!(err, Error::Checkpoint { .. }));
    }
}
