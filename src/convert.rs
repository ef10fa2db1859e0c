//! Inference conversion.
//!
//! Consumes the checked training-mode handle and returns an inference-only
//! handle: training-only outputs are dropped and the graph mode flips to
//! inference. Weight values are untouched.

use crate::error::{ExportError, Result};
use crate::model::{DetectionModel, GraphMode};

/// Convert a checked model into an inference-only model.
///
/// Fails if every declared output is training-only; a graph with nothing left
/// to serve cannot be exported.
pub fn convert_model(mut model: DetectionModel) -> Result<DetectionModel> {
    model.outputs.retain(|o| !o.training_only);

    if model.outputs.is_empty() {
        return Err(ExportError::NoServableOutputs);
    }

    model.mode = GraphMode::Inference;
    Ok(model)
}
