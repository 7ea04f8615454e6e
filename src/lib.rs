//! Stroke recognizer: learns to rebuild circle/line drawing programs from
//! raster images.
//!
//! # Public API
//!
//! ```ignore
//! use recognizer::{data, training, TrainingConfig};
//! let examples = data::examples::load_examples(100, "syntheticTrainingData/doubleCircleLine")?;
//! let (model, report) = training::train::<B>(&TrainingConfig::default(), &examples, &path, &device)?;
//! ```

pub mod checkpoint;
pub mod config;
pub mod data;
pub mod error;
pub mod inference;
pub mod language;
pub mod model;
pub mod render;
pub mod training;

pub use config::TrainingConfig;
pub use error::{Error, Result};
pub use language::{Point, Program, Stroke, StrokeKind};
