pub mod heads;
pub mod input;
pub mod network;

pub use heads::{joint_accuracy, HeadLogits, HeadTargets};
pub use network::{RecognitionModel, RecognitionModelConfig};
