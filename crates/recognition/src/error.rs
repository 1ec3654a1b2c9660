use std::fmt;

use signscribe_video::VideoError;

use crate::config::ConfigError;

/// A model-backed dependency of the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    PoseExtractor,
    Classifier,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::PoseExtractor => f.write_str("pose extractor"),
            Capability::Classifier => f.write_str("sign classifier"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("{capability} unavailable: {reason}")]
    CapabilityUnavailable {
        capability: Capability,
        reason: String,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("video source unavailable: {0}")]
    SourceUnavailable(#[from] VideoError),
    #[error("recognition worker failed: {0}")]
    WorkerFailed(String),
}

impl RecognitionError {
    pub(crate) fn unavailable(capability: Capability, reason: impl ToString) -> Self {
        Self::CapabilityUnavailable {
            capability,
            reason: reason.to_string(),
        }
    }

    /// Short message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::CapabilityUnavailable { capability, .. } => {
                format!("Recognition is unavailable: the {capability} could not be loaded.")
            }
            Self::InvalidConfig(_) => "Recognition settings are invalid.".to_string(),
            Self::SourceUnavailable(_) => "The video could not be read.".to_string(),
            Self::WorkerFailed(_) => "Recognition stopped unexpectedly.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecognitionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_message() {
        let err = RecognitionError::unavailable(Capability::Classifier, "model missing");
        assert_eq!(err.to_string(), "sign classifier unavailable: model missing");
        assert!(err.user_message().contains("sign classifier"));
        assert!(!err.user_message().contains("model missing"));
    }

    #[test]
    fn test_from_video_error() {
        let err: RecognitionError = VideoError::Reset("closed".to_string()).into();
        assert!(matches!(err, RecognitionError::SourceUnavailable(_)));
    }
}
