//! Error type shared by every stage of the recognizer pipeline.

use std::fmt;
use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    /// A file could not be read, written, or created.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A raster could not be decoded or encoded.
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    /// A program file is malformed or names an unknown stroke kind.
    Program {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A stroke has coordinates the label heads cannot represent.
    UnencodableStroke(String),
    /// Image shapes disagree with each other or with the model.
    Shape(String),
    /// The burn recorder failed to save or load parameters.
    Checkpoint { path: PathBuf, message: String },
    /// A persisted training configuration could not be read.
    Config { path: PathBuf, message: String },
    /// An operation needing trained weights ran without a checkpoint.
    Untrained { path: PathBuf },
    /// Tensor data could not be copied back to the host.
    Tensor(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            Self::Image { path, source } => write!(f, "image {}: {}", path.display(), source),
            Self::Program { path, source } => write!(f, "program {}: {}", path.display(), source),
            Self::UnencodableStroke(msg) => write!(f, "unencodable stroke: {}", msg),
            Self::Shape(msg) => write!(f, "shape mismatch: {}", msg),
            Self::Checkpoint { path, message } => {
                write!(f, "checkpoint {}: {}", path.display(), message)
            }
            Self::Config { path, message } => write!(f, "config {}: {}", path.display(), message),
            Self::Untrained { path } => write!(
                f,
                "no trained checkpoint at {} (run `recognizer train` first)",
                path.display()
            ),
            Self::Tensor(msg) => write!(f, "tensor data: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Image { source, .. } => Some(source),
            Self::Program { source, .. } => Some(source),
            _ => None,
        }
    }
}
