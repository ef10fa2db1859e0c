//! Error types with actionable diagnostics (Andon principle).
//!
//! Every error carries enough context to resolve the problem without
//! consulting external documentation. Pipeline stages propagate these with
//! `?`; nothing is retried or translated a second time.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for exportar operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that can occur while exporting a checkpoint.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Checkpoint file not found.
    #[error("Checkpoint not found: {}\n  → Check the path to the trained model file", .path.display())]
    ModelNotFound { path: PathBuf },

    /// Checkpoint file exists but cannot be read as a model.
    #[error("Invalid checkpoint {}:\n  {message}\n  → The file must be a SafeTensors checkpoint with a 'graph' metadata entry", .path.display())]
    Checkpoint { path: PathBuf, message: String },

    /// Checkpoint was trained with a different backbone.
    #[error("Backbone mismatch: checkpoint was trained with '{found}', expected '{expected}'\n  → Re-train with the expected backbone or convert with a matching build")]
    BackboneMismatch { expected: String, found: String },

    /// Tensor dtype that cannot be widened to f32.
    #[error("Unsupported tensor dtype {dtype} in '{tensor}'\n  → Supported dtypes: F32, F16, BF16")]
    UnsupportedDtype { tensor: String, dtype: String },

    /// The variable set still contains training-only wiring.
    #[error("Checkpoint contains training-only state: {}\n  → Strip loss/optimizer tensors before export", .tensors.join(", "))]
    TrainingArtifacts { tensors: Vec<String> },

    /// Conversion removed every declared output.
    #[error("No servable outputs remain after conversion\n  → The checkpoint declares only training-only outputs")]
    NoServableOutputs,

    /// Destination directory already holds an export bundle.
    #[error("Export bundle already exists at {}\n  → Choose an empty destination directory; existing bundles are never overwritten", .path.display())]
    BundleExists { path: PathBuf },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic error for unexpected conditions.
    #[error("Internal error: {message}\n  → Please report this bug")]
    Internal { message: String },
}

impl ExportError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Get the error code reported alongside the diagnostic.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ModelNotFound { .. } => "E010",
            Self::Checkpoint { .. } => "E011",
            Self::BackboneMismatch { .. } => "E012",
            Self::UnsupportedDtype { .. } => "E013",
            Self::TrainingArtifacts { .. } => "E020",
            Self::NoServableOutputs => "E021",
            Self::BundleExists { .. } => "E030",
            Self::Io { .. } => "E050",
            Self::Serialization { .. } => "E051",
            Self::Internal { .. } => "E999",
        }
    }
}
