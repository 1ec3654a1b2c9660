//! ONNX Runtime backend for sign classification.
//!
//! The model takes a `[1, frames, FEATURE_DIM]` float tensor and returns
//! one row of class logits.

use std::path::Path;
use std::sync::Mutex;

use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use signscribe_classifier::{ClassifierError, ClassifierLoader, Prediction, SignClassifier};
use signscribe_pose::{FrameFeature, FEATURE_DIM};

#[derive(Debug, thiserror::Error)]
pub enum OnnxError {
    #[error("failed to load model: {0}")]
    Model(String),
    #[error("inference failed: {0}")]
    Inference(String),
}

impl From<OnnxError> for ClassifierError {
    fn from(e: OnnxError) -> Self {
        match e {
            OnnxError::Model(msg) => ClassifierError::Model(msg),
            OnnxError::Inference(msg) => ClassifierError::Inference(msg),
        }
    }
}

#[derive(Debug)]
pub struct OnnxSignClassifier {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    num_classes: usize,
}

impl OnnxSignClassifier {
    pub fn load(model_path: impl AsRef<Path>, num_classes: usize) -> Result<Self, OnnxError> {
        let model_path = model_path.as_ref();
        let session = Session::builder()
            .map_err(|e| OnnxError::Model(e.to_string()))?
            .with_parallel_execution(false)
            .map_err(|e| OnnxError::Model(e.to_string()))?
            .with_intra_threads(1)
            .map_err(|e| OnnxError::Model(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| OnnxError::Model(e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e| OnnxError::Model(e.to_string()))?;

        let input_name = session
            .inputs
            .iter()
            .find(|i| i.name == "keypoints")
            .map(|i| i.name.clone())
            .or_else(|| session.inputs.first().map(|i| i.name.clone()))
            .ok_or_else(|| OnnxError::Model("model has no inputs".to_string()))?;

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == "logits")
            .map(|o| o.name.clone())
            .or_else(|| session.outputs.first().map(|o| o.name.clone()))
            .ok_or_else(|| OnnxError::Model("model has no outputs".to_string()))?;

        tracing::info!(
            path = %model_path.display(),
            input = %input_name,
            output = %output_name,
            num_classes,
            "Loaded sign classifier"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            num_classes,
        })
    }

    fn run(&self, window: &[FrameFeature]) -> Result<Vec<f32>, OnnxError> {
        let mut data = Vec::with_capacity(window.len() * FEATURE_DIM);
        for feature in window {
            data.extend_from_slice(feature.as_slice());
        }

        let input = Tensor::from_array(([1i64, window.len() as i64, FEATURE_DIM as i64], data))
            .map_err(|e| OnnxError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| OnnxError::Inference("lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| OnnxError::Inference(e.to_string()))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| OnnxError::Inference("missing model output".to_string()))?;

        let (_shape, logits) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| OnnxError::Inference(e.to_string()))?;
        Ok(logits.to_vec())
    }
}

impl SignClassifier for OnnxSignClassifier {
    fn name(&self) -> &str {
        "onnx-sign-classifier"
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn classify(&self, window: &[FrameFeature]) -> signscribe_classifier::Result<Prediction> {
        if window.is_empty() {
            return Err(ClassifierError::InvalidInput("empty window".to_string()));
        }
        let logits = self.run(window)?;
        if logits.len() != self.num_classes {
            return Err(ClassifierError::Inference(format!(
                "expected {} logits, got {}",
                self.num_classes,
                logits.len()
            )));
        }
        Prediction::from_logits(&logits)
            .ok_or_else(|| ClassifierError::Inference("empty output".to_string()))
    }
}

/// [`ClassifierLoader`] for ONNX models.
#[derive(Debug, Default, Clone, Copy)]
pub struct OnnxLoader;

impl ClassifierLoader for OnnxLoader {
    fn name(&self) -> &str {
        "ONNX Runtime"
    }

    fn load(
        &self,
        model_path: &Path,
        num_classes: usize,
    ) -> signscribe_classifier::Result<Box<dyn SignClassifier>> {
        if !model_path.exists() {
            return Err(ClassifierError::Model(format!(
                "model file not found: {}",
                model_path.display()
            )));
        }
        let classifier = OnnxSignClassifier::load(model_path, num_classes)?;
        Ok(Box::new(classifier))
    }
}
