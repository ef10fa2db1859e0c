//! Servable export of trained detection checkpoints.
//!
//! This crate converts a trained object-detection checkpoint into a
//! SavedModel-style serving bundle:
//! - Load a SafeTensors checkpoint with embedded graph metadata
//! - Assert the variable set carries no training-only wiring
//! - Strip training heads to produce an inference-only graph
//! - Attach a predict signature and persist graph plus weights under the
//!   `serve` tag
//!
//! # Toyota Way Principles
//!
//! - **Jidoka**: The training-artifact check stops the line before any
//!   filesystem write
//! - **Poka-yoke**: The bundle builder refuses to overwrite an existing export
//! - **Genchi Genbutsu**: Signatures are a faithful copy of the declared
//!   tensors, never inferred

pub mod bundle;
pub mod check;
pub mod cli;
pub mod convert;
pub mod error;
pub mod load;
pub mod model;
pub mod signature;

pub use bundle::{read_manifest, BundleBuilder, BundleManifest, SERVING_TAG};
pub use check::check_training_artifacts;
pub use convert::convert_model;
pub use error::{ExportError, Result};
pub use load::load_model;
pub use model::{DetectionModel, GraphMetadata, GraphMode, TensorSpec};
pub use signature::{predict_signature, SignatureDef, DEFAULT_SERVING_SIGNATURE_KEY};

use std::path::{Path, PathBuf};

/// Backbone the conversion is built for. Checkpoints trained with a different
/// backbone are rejected at load time.
pub const DEFAULT_BACKBONE: &str = "resnet50";

/// Summary of a completed export.
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Bundle directory on disk
    pub bundle_path: PathBuf,
    /// Number of signature inputs
    pub signature_inputs: usize,
    /// Number of signature outputs
    pub signature_outputs: usize,
    /// Number of exported variables
    pub variable_count: usize,
    /// Total execution time in seconds
    pub duration_seconds: f64,
}

/// Run the full export pipeline: load, check, convert, sign, persist.
///
/// Stages execute strictly in order; the destination directory is only
/// touched by the final persist step, so any earlier failure leaves it
/// untouched.
pub fn export(checkpoint: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<ExportReport> {
    let start = std::time::Instant::now();

    let model = load::load_model(checkpoint.as_ref(), DEFAULT_BACKBONE)?;
    check::check_training_artifacts(&model)?;
    let model = convert::convert_model(model)?;

    let signatures = signature::serving_signature_map(&model);
    let signature_inputs = model.inputs.len();
    let signature_outputs = model.outputs.len();
    let variable_count = model.tensors.len();

    let mut builder = bundle::BundleBuilder::new(output_dir.as_ref());
    builder.add_graph_and_variables(&model, &[SERVING_TAG], signatures);
    let bundle_path = builder.save()?;

    Ok(ExportReport {
        bundle_path,
        signature_inputs,
        signature_outputs,
        variable_count,
        duration_seconds: start.elapsed().as_secs_f64(),
    })
}
