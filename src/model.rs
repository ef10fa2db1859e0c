//! Model handle and graph metadata types.
//!
//! A checkpoint's SafeTensors `__metadata__` map carries a JSON graph
//! description under [`GRAPH_METADATA_KEY`]; the loader combines it with the
//! tensor payload into a [`DetectionModel`], the in-memory handle passed
//! linearly through the export pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key under which the graph description is stored in a checkpoint.
pub const GRAPH_METADATA_KEY: &str = "graph";

/// Whether a graph still carries its training heads or is inference-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphMode {
    /// As produced by a training run; may declare training-only outputs.
    Training,
    /// Training heads stripped; every output is servable.
    Inference,
}

/// A named graph input or output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorSpec {
    /// Tensor name, unique within its input or output set
    pub name: String,
    /// Dimension sizes
    pub shape: Vec<usize>,
    /// Data type (e.g., "F32")
    pub dtype: String,
    /// Output exists only to feed loss computation during training
    #[serde(default)]
    pub training_only: bool,
}

impl TensorSpec {
    /// Create a servable f32 spec.
    pub fn new(name: impl Into<String>, shape: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            shape,
            dtype: "F32".to_string(),
            training_only: false,
        }
    }

    /// Mark this spec as a training-only output.
    pub fn training_only(mut self) -> Self {
        self.training_only = true;
        self
    }
}

/// Graph description embedded in a checkpoint's metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphMetadata {
    /// Feature-extraction backbone the detection heads were built on
    pub backbone: String,
    /// Graph mode at save time
    pub mode: GraphMode,
    /// Declared graph inputs
    pub inputs: Vec<TensorSpec>,
    /// Declared graph outputs
    pub outputs: Vec<TensorSpec>,
}

/// Flattened weight values for one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorData {
    /// Dimension sizes
    pub shape: Vec<usize>,
    /// Values, widened to f32 on load
    pub data: Vec<f32>,
}

/// In-memory trained-model handle: graph description plus weight values.
///
/// Owned by exactly one pipeline stage at a time. The converter consumes and
/// replaces it; the bundle builder only borrows it.
#[derive(Debug, Clone)]
pub struct DetectionModel {
    /// Feature-extraction backbone name
    pub backbone: String,
    /// Current graph mode
    pub mode: GraphMode,
    /// Declared graph inputs
    pub inputs: Vec<TensorSpec>,
    /// Declared graph outputs
    pub outputs: Vec<TensorSpec>,
    /// Variable name → weight values, sorted for deterministic export
    pub tensors: BTreeMap<String, TensorData>,
}

impl DetectionModel {
    /// Declared input names, in declaration order.
    pub fn input_names(&self) -> Vec<&str> {
        self.inputs.iter().map(|t| t.name.as_str()).collect()
    }

    /// Declared output names, in declaration order.
    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.iter().map(|t| t.name.as_str()).collect()
    }

    /// Total number of weight values across all variables.
    pub fn num_parameters(&self) -> u64 {
        self.tensors.values().map(|t| t.data.len() as u64).sum()
    }
}
