pub mod decode;
pub mod evaluate;

pub use decode::{decode_target, draw, DecodeConfig};
pub use evaluate::{evaluate, test, Evaluation};
