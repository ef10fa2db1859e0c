//! Serving signature construction.
//!
//! A signature is a faithful name → spec copy of the converted model's
//! declared inputs and outputs, fixed to the generic predict method. The
//! export bundle carries exactly one signature, keyed by
//! [`DEFAULT_SERVING_SIGNATURE_KEY`].

use crate::model::{DetectionModel, TensorSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known key for the default serving signature.
pub const DEFAULT_SERVING_SIGNATURE_KEY: &str = "serving_default";

/// Method name for the generic predict contract.
pub const PREDICT_METHOD_NAME: &str = "exportar/predict";

/// A serving signature: predict method plus input and output tensor maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureDef {
    /// Signature method, always the predict contract
    pub method_name: String,
    /// Input tensor name → spec
    pub inputs: BTreeMap<String, TensorSpec>,
    /// Output tensor name → spec
    pub outputs: BTreeMap<String, TensorSpec>,
}

/// Build a predict signature from the converted model's declared tensors.
pub fn predict_signature(model: &DetectionModel) -> SignatureDef {
    let mut inputs = BTreeMap::new();
    for input in &model.inputs {
        inputs.insert(input.name.clone(), input.clone());
    }

    let mut outputs = BTreeMap::new();
    for output in &model.outputs {
        outputs.insert(output.name.clone(), output.clone());
    }

    SignatureDef {
        method_name: PREDICT_METHOD_NAME.to_string(),
        inputs,
        outputs,
    }
}

/// Wrap the predict signature in a one-entry map under the default serving key.
pub fn serving_signature_map(model: &DetectionModel) -> BTreeMap<String, SignatureDef> {
    let mut map = BTreeMap::new();
    map.insert(DEFAULT_SERVING_SIGNATURE_KEY.to_string(), predict_signature(model));
    map
}
