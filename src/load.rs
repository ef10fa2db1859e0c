//! Checkpoint loading.
//!
//! Reads a SafeTensors checkpoint, parses the embedded graph metadata, and
//! widens all weights to f32 (F16/BF16 via `half`, matching what serving
//! runtimes expect).

use crate::error::{ExportError, Result};
use crate::model::{DetectionModel, GraphMetadata, TensorData, GRAPH_METADATA_KEY};
use safetensors::SafeTensors;
use std::collections::BTreeMap;
use std::path::Path;

/// Load a trained checkpoint for the given backbone.
///
/// Fails on a missing file, a corrupt container, missing graph metadata, or a
/// backbone mismatch. Errors propagate untranslated to the caller; there is no
/// retry.
pub fn load_model(path: impl AsRef<Path>, backbone: &str) -> Result<DetectionModel> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExportError::ModelNotFound { path: path.to_path_buf() });
    }

    let data = std::fs::read(path).map_err(|e| ExportError::Io {
        context: format!("reading checkpoint: {}", path.display()),
        source: e,
    })?;

    let graph = read_graph_metadata(path, &data)?;

    if graph.backbone != backbone {
        return Err(ExportError::BackboneMismatch {
            expected: backbone.to_string(),
            found: graph.backbone,
        });
    }

    let st = SafeTensors::deserialize(&data).map_err(|e| ExportError::Checkpoint {
        path: path.to_path_buf(),
        message: format!("invalid SafeTensors container: {e}"),
    })?;

    let mut tensors = BTreeMap::new();
    for name in st.names() {
        let view = st.tensor(name).map_err(|e| ExportError::Checkpoint {
            path: path.to_path_buf(),
            message: format!("failed to read tensor '{name}': {e}"),
        })?;

        let shape: Vec<usize> = view.shape().to_vec();
        let float_data: Vec<f32> = match view.dtype() {
            safetensors::Dtype::F32 => bytemuck::cast_slice(view.data()).to_vec(),
            safetensors::Dtype::F16 => {
                let halfs: &[u16] = bytemuck::cast_slice(view.data());
                halfs.iter().map(|&h| half::f16::from_bits(h).to_f32()).collect()
            }
            safetensors::Dtype::BF16 => {
                let bits: &[u16] = bytemuck::cast_slice(view.data());
                bits.iter().map(|&b| half::bf16::from_bits(b).to_f32()).collect()
            }
            other => {
                return Err(ExportError::UnsupportedDtype {
                    tensor: name.to_string(),
                    dtype: format!("{other:?}"),
                });
            }
        };

        tensors.insert(name.to_string(), TensorData { shape, data: float_data });
    }

    Ok(DetectionModel {
        backbone: graph.backbone,
        mode: graph.mode,
        inputs: graph.inputs,
        outputs: graph.outputs,
        tensors,
    })
}

/// Parse the `graph` entry out of the checkpoint's `__metadata__` map.
fn read_graph_metadata(path: &Path, data: &[u8]) -> Result<GraphMetadata> {
    let (_, metadata) =
        SafeTensors::read_metadata(data).map_err(|e| ExportError::Checkpoint {
            path: path.to_path_buf(),
            message: format!("unreadable header: {e}"),
        })?;

    let user_meta = metadata.metadata().as_ref().ok_or_else(|| ExportError::Checkpoint {
        path: path.to_path_buf(),
        message: "checkpoint has no metadata map".to_string(),
    })?;

    let graph_json = user_meta.get(GRAPH_METADATA_KEY).ok_or_else(|| ExportError::Checkpoint {
        path: path.to_path_buf(),
        message: format!("missing '{GRAPH_METADATA_KEY}' metadata entry"),
    })?;

    serde_json::from_str(graph_json).map_err(|e| ExportError::Checkpoint {
        path: path.to_path_buf(),
        message: format!("invalid graph metadata: {e}"),
    })
}
