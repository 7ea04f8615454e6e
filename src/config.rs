//! Training hyperparameters, persisted as JSON next to each checkpoint.

use std::path::{Path, PathBuf};

use burn::config::Config;

use crate::error::{Error, Result};
use crate::model::RecognitionModelConfig;

/// Everything `train` needs besides the data.
#[derive(Config, Debug)]
pub struct TrainingConfig {
    pub model: RecognitionModelConfig,
    /// Adam learning rate.
    #[config(default = 1e-3)]
    pub learning_rate: f64,
    #[config(default = 50)]
    pub batch_size: usize,
    /// Number of optimizer steps.
    #[config(default = 1000)]
    pub num_iterations: usize,
    /// Log accuracy and loss every this many steps.
    #[config(default = 50)]
    pub log_every: usize,
    /// Overwrite the checkpoint every this many steps.
    #[config(default = 100)]
    pub checkpoint_every: usize,
    /// Seed for batch shuffling.
    #[config(default = 42)]
    pub seed: u64,
    /// Reshuffle the example order at each pass.
    #[config(default = true)]
    pub reshuffle: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self::new(RecognitionModelConfig::new())
    }
}

/// Where the config for the checkpoint at `checkpoint` lives.
pub fn config_path(checkpoint: &Path) -> PathBuf {
    checkpoint.with_extension("json")
}

impl TrainingConfig {
    /// Write this config beside `checkpoint`.
    pub fn save_beside(&self, checkpoint: &Path) -> Result<PathBuf> {
        let path = config_path(checkpoint);
        self.save(&path).map_err(|e| Error::io(&path, e))?;
        Ok(path)
    }

    /// Read the config saved beside `checkpoint`, if there is one.
    pub fn load_beside(checkpoint: &Path) -> Result<Option<TrainingConfig>> {
        let path = config_path(checkpoint);
        if !path.exists() {
            return Ok(None);
        }
        Self::load_file(&path).map(Some)
    }

    /// Reject configs that would panic inside the backend or train on nothing.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Shape("batch_size must be at least 1".into()));
        }
        self.model.validate()
    }

    pub fn load_file(path: &Path) -> Result<TrainingConfig> {
        TrainingConfig::load(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let config = TrainingConfig::default();
        assert_eq!(config.learning_rate, 1e-3);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.num_iterations, 1000);
        assert_eq!(config.log_every, 50);
        assert_eq!(config.checkpoint_every, 100);
        assert_eq!(config.model.image_size, 300);
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = dir.path().join("model.checkpoint");
        let config = TrainingConfig::default()
            .with_batch_size(8)
            .with_num_iterations(3);

        let path = config.save_beside(&checkpoint).unwrap();
        assert_eq!(path, dir.path().join("model.json"));

        let loaded = TrainingConfig::load_beside(&checkpoint).unwrap().unwrap();
        assert_eq!(loaded.batch_size, 8);
        assert_eq!(loaded.num_iterations, 3);
        assert_eq!(loaded.model.output_dims, vec![10, 10, 10, 10]);
    }

    #[test]
    fn zero_batch_or_bad_heads_fail_validation() {
        assert!(TrainingConfig::default().validate().is_ok());

        let empty_batches = TrainingConfig::default().with_batch_size(0);
        assert!(matches!(empty_batches.validate(), Err(Error::Shape(_))));

        let short_heads = TrainingConfig::new(
            RecognitionModelConfig::new().with_output_dims(vec![10, 10, 10]),
        );
        assert!(matches!(short_heads.validate(), Err(Error::Shape(_))));
    }

    #[test]
    fn missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = dir.path().join("absent.checkpoint");
        assert!(TrainingConfig::load_beside(&checkpoint).unwrap().is_none());
    }

    #[test]
    fn malformed_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = TrainingConfig::load_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
