mod labels;
mod prediction;

use std::path::{Path, PathBuf};

pub use labels::LabelMap;
pub use prediction::Prediction;

use signscribe_pose::FrameFeature;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("model not loaded")]
    ModelNotLoaded,
    #[error("failed to load model: {0}")]
    Model(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid label map: {0}")]
    InvalidLabels(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Sequence classifier over windows of frame features.
pub trait SignClassifier: Send + Sync {
    fn name(&self) -> &str;

    fn num_classes(&self) -> usize;

    /// Classify a window of consecutive features, oldest first.
    fn classify(&self, window: &[FrameFeature]) -> Result<Prediction>;
}

/// Factory for classifiers backed by model files.
pub trait ClassifierLoader: Send + Sync {
    /// Human-readable name of the backend (e.g. "ONNX Runtime").
    fn name(&self) -> &str;

    fn load(&self, model_path: &Path, num_classes: usize) -> Result<Box<dyn SignClassifier>>;
}

/// Default file name of the recognition model.
pub const MODEL_FILE_NAME: &str = "sign_language_model.onnx";

/// Default file name of the label table.
pub const LABELS_FILE_NAME: &str = "labels.csv";

pub fn models_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("signscribe")
        .join("models")
}

/// Places to look for the model, in priority order.
pub fn model_candidates() -> Vec<PathBuf> {
    vec![
        PathBuf::from("models").join(MODEL_FILE_NAME),
        models_dir().join(MODEL_FILE_NAME),
    ]
}

/// Places to look for the label table, in priority order.
pub fn label_candidates() -> Vec<PathBuf> {
    vec![
        PathBuf::from(LABELS_FILE_NAME),
        PathBuf::from("models").join(LABELS_FILE_NAME),
        models_dir().join(LABELS_FILE_NAME),
    ]
}

/// First candidate that exists on disk.
pub fn find_existing(candidates: &[PathBuf]) -> Option<&Path> {
    candidates
        .iter()
        .map(PathBuf::as_path)
        .find(|path| path.exists())
}
