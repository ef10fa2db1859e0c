//! Training-artifact precondition check (Jidoka - stop the line).
//!
//! A checkpoint whose variable set still contains loss-computation layers or
//! optimizer state cannot be made servable by output rewiring alone; the
//! pipeline stops here before anything touches the destination directory.

use crate::error::{ExportError, Result};
use crate::model::DetectionModel;

/// Variable-name prefixes that mark embedded training state.
pub const TRAINING_TENSOR_PREFIXES: [&str; 2] = ["loss.", "optimizer."];

/// Assert that the model carries no training-only wiring in its variable set.
///
/// Pure precondition: no mutation, no return value beyond success. Outputs
/// flagged `training_only` are fine here; the converter strips those.
pub fn check_training_artifacts(model: &DetectionModel) -> Result<()> {
    let offending: Vec<String> = model
        .tensors
        .keys()
        .filter(|name| TRAINING_TENSOR_PREFIXES.iter().any(|p| name.starts_with(p)))
        .cloned()
        .collect();

    if !offending.is_empty() {
        return Err(ExportError::TrainingArtifacts { tensors: offending });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GraphMode, TensorData, TensorSpec};
    use std::collections::BTreeMap;

    fn model_with_tensors(names: &[&str]) -> DetectionModel {
        let mut tensors = BTreeMap::new();
        for name in names {
            tensors.insert(
                (*name).to_string(),
                TensorData { shape: vec![2], data: vec![0.0, 0.0] },
            );
        }
        DetectionModel {
            backbone: "resnet50".to_string(),
            mode: GraphMode::Training,
            inputs: vec![TensorSpec::new("image", vec![1, 3])],
            outputs: vec![TensorSpec::new("boxes", vec![1, 4])],
            tensors,
        }
    }

    #[test]
    fn test_clean_model_passes() {
        let model = model_with_tensors(&["backbone.conv1.weight", "head.box.weight"]);
        assert!(check_training_artifacts(&model).is_ok());
    }

    #[test]
    fn test_loss_tensor_rejected() {
        let model = model_with_tensors(&["backbone.conv1.weight", "loss.focal.alpha"]);
        let err = check_training_artifacts(&model).unwrap_err();
        match err {
            ExportError::TrainingArtifacts { tensors } => {
                assert_eq!(tensors, vec!["loss.focal.alpha"]);
            }
            other => panic!("expected TrainingArtifacts, got {other:?}"),
        }
    }

    #[test]
    fn test_optimizer_state_rejected() {
        let model = model_with_tensors(&["optimizer.m.backbone", "optimizer.v.backbone"]);
        let err = check_training_artifacts(&model).unwrap_err();
        match err {
            ExportError::TrainingArtifacts { tensors } => assert_eq!(tensors.len(), 2),
            other => panic!("expected TrainingArtifacts, got {other:?}"),
        }
    }

    #[test]
    fn test_training_only_outputs_are_not_artifacts() {
        // Strippable training heads pass the check; the converter handles them.
        let mut model = model_with_tensors(&["head.box.weight"]);
        model.outputs.push(TensorSpec::new("regression", vec![1, 4]).training_only());
        assert!(check_training_artifacts(&model).is_ok());
    }
}
