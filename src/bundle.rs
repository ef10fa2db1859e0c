//! Export bundle builder (Poka-yoke - the builder refuses to overwrite).
//!
//! The on-disk bundle is a SavedModel-style directory: a `saved_model.json`
//! manifest describing the graph, tag set, and signatures, plus the full
//! variable payload under `variables/`. The manifest is written last so a
//! bundle without one is never mistaken for a finished export.

use crate::error::{ExportError, Result};
use crate::model::DetectionModel;
use crate::signature::SignatureDef;
use safetensors::tensor::{Dtype, TensorView};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Tag under which the serving graph is exported.
pub const SERVING_TAG: &str = "serve";

/// Manifest file name; its presence marks a finished bundle.
pub const MANIFEST_FILE: &str = "saved_model.json";

/// Subdirectory holding the weight payload.
pub const VARIABLES_DIR: &str = "variables";

/// Weight payload file name.
pub const VARIABLES_FILE: &str = "variables.safetensors";

/// Current bundle format version.
pub const FORMAT_VERSION: u32 = 1;

/// Self-describing bundle manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Bundle format version
    pub format_version: u32,
    /// Backbone the exported graph was built on
    pub backbone: String,
    /// Meta-graph tags, always `["serve"]` for this tool
    pub tags: Vec<String>,
    /// Signature name → definition
    pub signature_defs: BTreeMap<String, SignatureDef>,
    /// Variables path relative to the bundle root
    pub variables: String,
}

/// One staged variable: name, shape, little-endian f32 bytes.
struct StagedVariable {
    name: String,
    shape: Vec<usize>,
    bytes: Vec<u8>,
}

/// Two-phase bundle builder scoped to a destination directory.
///
/// Stage the graph and variables with [`add_graph_and_variables`], then
/// [`save`] to flush everything to disk. Nothing is written before `save`.
///
/// [`add_graph_and_variables`]: BundleBuilder::add_graph_and_variables
/// [`save`]: BundleBuilder::save
pub struct BundleBuilder {
    output_dir: PathBuf,
    manifest: Option<BundleManifest>,
    variables: Vec<StagedVariable>,
}

impl BundleBuilder {
    /// Create a builder targeting the given directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            manifest: None,
            variables: Vec::new(),
        }
    }

    /// Stage the model's graph, all variable values, the tag set, and the
    /// signature map. In-memory only; no filesystem effect.
    pub fn add_graph_and_variables(
        &mut self,
        model: &DetectionModel,
        tags: &[&str],
        signature_defs: BTreeMap<String, SignatureDef>,
    ) {
        self.variables = model
            .tensors
            .iter()
            .map(|(name, tensor)| StagedVariable {
                name: name.clone(),
                shape: tensor.shape.clone(),
                bytes: bytemuck::cast_slice(&tensor.data).to_vec(),
            })
            .collect();

        self.manifest = Some(BundleManifest {
            format_version: FORMAT_VERSION,
            backbone: model.backbone.clone(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            signature_defs,
            variables: format!("{VARIABLES_DIR}/{VARIABLES_FILE}"),
        });
    }

    /// Finalize the bundle to disk, returning the bundle directory.
    ///
    /// Fails without writing anything if the destination already holds a
    /// bundle manifest. Variables are written first, the manifest last.
    pub fn save(self) -> Result<PathBuf> {
        let manifest = self.manifest.ok_or_else(|| ExportError::Internal {
            message: "no meta graph staged before save".to_string(),
        })?;

        let manifest_path = self.output_dir.join(MANIFEST_FILE);
        if manifest_path.exists() {
            return Err(ExportError::BundleExists { path: self.output_dir });
        }

        let variables_dir = self.output_dir.join(VARIABLES_DIR);
        std::fs::create_dir_all(&variables_dir).map_err(|e| ExportError::Io {
            context: format!("creating bundle directory: {}", variables_dir.display()),
            source: e,
        })?;

        let views: Vec<(&str, TensorView<'_>)> = self
            .variables
            .iter()
            .map(|v| {
                TensorView::new(Dtype::F32, v.shape.clone(), &v.bytes)
                    .map(|view| (v.name.as_str(), view))
                    .map_err(|e| ExportError::Serialization {
                        message: format!("staging variable '{}': {e}", v.name),
                    })
            })
            .collect::<Result<_>>()?;

        let payload = safetensors::serialize(views, &None).map_err(|e| {
            ExportError::Serialization { message: format!("serializing variables: {e}") }
        })?;

        let variables_path = variables_dir.join(VARIABLES_FILE);
        std::fs::write(&variables_path, payload).map_err(|e| ExportError::Io {
            context: format!("writing variables: {}", variables_path.display()),
            source: e,
        })?;

        let manifest_json = serde_json::to_string_pretty(&manifest).map_err(|e| {
            ExportError::Serialization { message: format!("serializing manifest: {e}") }
        })?;

        std::fs::write(&manifest_path, manifest_json).map_err(|e| ExportError::Io {
            context: format!("writing manifest: {}", manifest_path.display()),
            source: e,
        })?;

        Ok(self.output_dir)
    }
}

/// Read a bundle's manifest back from disk.
pub fn read_manifest(bundle_dir: impl AsRef<Path>) -> Result<BundleManifest> {
    let path = bundle_dir.as_ref().join(MANIFEST_FILE);
    let json = std::fs::read_to_string(&path).map_err(|e| ExportError::Io {
        context: format!("reading manifest: {}", path.display()),
        source: e,
    })?;

    serde_json::from_str(&json).map_err(|e| ExportError::Serialization {
        message: format!("invalid manifest {}: {e}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GraphMode, TensorData, TensorSpec};
    use crate::signature::{serving_signature_map, DEFAULT_SERVING_SIGNATURE_KEY};
    use tempfile::TempDir;

    fn inference_model() -> DetectionModel {
        let mut tensors = BTreeMap::new();
        tensors.insert(
            "head.box.weight".to_string(),
            TensorData { shape: vec![2, 2], data: vec![1.0, 2.0, 3.0, 4.0] },
        );
        DetectionModel {
            backbone: "resnet50".to_string(),
            mode: GraphMode::Inference,
            inputs: vec![TensorSpec::new("image", vec![1, 800, 1333, 3])],
            outputs: vec![TensorSpec::new("boxes", vec![1, 300, 4])],
            tensors,
        }
    }

    fn build_and_save(dir: &Path) -> Result<PathBuf> {
        let model = inference_model();
        let mut builder = BundleBuilder::new(dir);
        builder.add_graph_and_variables(&model, &[SERVING_TAG], serving_signature_map(&model));
        builder.save()
    }

    #[test]
    fn test_save_writes_manifest_and_variables() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("export");

        let bundle = build_and_save(&out).unwrap();

        assert!(bundle.join(MANIFEST_FILE).exists());
        let variables = bundle.join(VARIABLES_DIR).join(VARIABLES_FILE);
        assert!(variables.exists());
        assert!(std::fs::metadata(&variables).unwrap().len() > 0);
    }

    #[test]
    fn test_manifest_round_trip() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("export");
        build_and_save(&out).unwrap();

        let manifest = read_manifest(&out).unwrap();

        assert_eq!(manifest.format_version, FORMAT_VERSION);
        assert_eq!(manifest.backbone, "resnet50");
        assert_eq!(manifest.tags, vec![SERVING_TAG]);
        assert_eq!(manifest.signature_defs.len(), 1);
        assert!(manifest.signature_defs.contains_key(DEFAULT_SERVING_SIGNATURE_KEY));
        assert_eq!(manifest.variables, "variables/variables.safetensors");
    }

    #[test]
    fn test_save_twice_fails_without_overwrite() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("export");

        build_and_save(&out).unwrap();
        let before = std::fs::read_to_string(out.join(MANIFEST_FILE)).unwrap();

        let result = build_and_save(&out);
        assert!(matches!(result, Err(ExportError::BundleExists { .. })));

        let after = std::fs::read_to_string(out.join(MANIFEST_FILE)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_save_without_staged_graph_fails() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("export");

        let builder = BundleBuilder::new(&out);
        let result = builder.save();

        assert!(matches!(result, Err(ExportError::Internal { .. })));
        assert!(!out.exists());
    }

    #[test]
    fn test_saved_variables_readable_as_safetensors() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("export");
        build_and_save(&out).unwrap();

        let data = std::fs::read(out.join(VARIABLES_DIR).join(VARIABLES_FILE)).unwrap();
        let st = safetensors::SafeTensors::deserialize(&data).unwrap();

        let view = st.tensor("head.box.weight").unwrap();
        assert_eq!(view.shape(), &[2, 2]);
        let values: &[f32] = bytemuck::cast_slice(view.data());
        assert_eq!(values, &[1.0, 2.0, 3.0, 4.0]);
    }
}
