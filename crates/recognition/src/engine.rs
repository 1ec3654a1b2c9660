use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use signscribe_classifier::{
    find_existing, model_candidates, ClassifierLoader, LabelMap, SignClassifier,
};
use signscribe_pose::PoseExtractor;
use signscribe_video::{ClipInfo, FrameSource};

use crate::activity::{ActivityEstimate, ActivityEstimator};
use crate::config::RecognizerConfig;
use crate::error::{Capability, RecognitionError, Result};
use crate::params::{AdaptiveParameters, ParameterAdapter, Regime};
use crate::recognizer::{ConfirmedWord, RecognitionStats, WindowSettings, WindowedRecognizer};
use crate::service::RecognitionStatus;

/// The loaded models a recognizer runs on.
///
/// The extractor and classifier are shared by all concurrent requests; see
/// [`PoseExtractor`] for how trackers keep per-pass state.
#[derive(Clone)]
pub struct Capabilities {
    pub extractor: Arc<dyn PoseExtractor>,
    pub classifier: Arc<dyn SignClassifier>,
    pub labels: Arc<LabelMap>,
}

impl Capabilities {
    pub fn new(
        extractor: Arc<dyn PoseExtractor>,
        classifier: Arc<dyn SignClassifier>,
        labels: LabelMap,
    ) -> Self {
        Self {
            extractor,
            classifier,
            labels: Arc::new(labels),
        }
    }

    /// Load the classifier and label table from disk.
    ///
    /// When `model_path` is `None` the default model locations are searched.
    /// A missing or unreadable label table falls back to the default labels;
    /// a missing model is an error.
    pub fn load(
        extractor: Arc<dyn PoseExtractor>,
        loader: &dyn ClassifierLoader,
        model_path: Option<&Path>,
        label_candidates: &[PathBuf],
    ) -> Result<Self> {
        let labels = LabelMap::discover(label_candidates);

        let candidates = model_candidates();
        let model_path = match model_path {
            Some(path) => path,
            None => find_existing(&candidates).ok_or_else(|| {
                tracing::error!(candidates = ?candidates, "No sign classifier model found");
                RecognitionError::unavailable(
                    Capability::Classifier,
                    format!("no {} model found in default locations", loader.name()),
                )
            })?,
        };

        tracing::info!(
            backend = loader.name(),
            path = %model_path.display(),
            classes = labels.len(),
            "Loading sign classifier"
        );
        let classifier = loader
            .load(model_path, labels.len())
            .map_err(|e| {
                tracing::error!(path = %model_path.display(), "Failed to load sign classifier: {}", e);
                RecognitionError::unavailable(Capability::Classifier, e)
            })?;

        if classifier.num_classes() != labels.len() {
            tracing::warn!(
                model_classes = classifier.num_classes(),
                labels = labels.len(),
                "Classifier and label map disagree on class count"
            );
        }

        Ok(Self {
            extractor,
            classifier: Arc::from(classifier),
            labels: Arc::new(labels),
        })
    }

    pub fn ensure_ready(&self) -> Result<()> {
        self.extractor.ensure_ready().map_err(|e| {
            tracing::error!(extractor = self.extractor.name(), "Pose extractor not ready: {}", e);
            RecognitionError::unavailable(Capability::PoseExtractor, e)
        })?;
        if self.classifier.num_classes() == 0 {
            return Err(RecognitionError::unavailable(
                Capability::Classifier,
                format!("{} reports no classes", self.classifier.name()),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("extractor", &self.extractor.name())
            .field("classifier", &self.classifier.name())
            .field("labels", &self.labels.len())
            .finish()
    }
}

/// Everything one recognition run produced, before sentence assembly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionReport {
    pub clip: ClipInfo,
    pub estimate: ActivityEstimate,
    pub regime: Regime,
    pub parameters: AdaptiveParameters,
    pub confirmations: Vec<ConfirmedWord>,
    pub stats: RecognitionStats,
}

impl RecognitionReport {
    /// Confirmed labels in order.
    pub fn words(&self) -> Vec<String> {
        self.confirmations.iter().map(|w| w.label.clone()).collect()
    }

    pub fn status(&self) -> RecognitionStatus {
        if self.confirmations.is_empty() {
            RecognitionStatus::NoSignDetected
        } else {
            RecognitionStatus::Recognized
        }
    }
}

/// Two-pass recognizer: a coarse activity scan picks the thresholds, then a
/// fine windowed pass confirms words.
#[derive(Debug)]
pub struct SignRecognizer {
    capabilities: Capabilities,
    config: RecognizerConfig,
    estimator: ActivityEstimator,
    adapter: ParameterAdapter,
}

impl SignRecognizer {
    pub fn new(capabilities: Capabilities, config: RecognizerConfig) -> Result<Self> {
        config.validate()?;
        let adapter = ParameterAdapter::new(config.adaptive.clone())?;
        let estimator = ActivityEstimator::new(config.activity.clone())?;
        Ok(Self {
            capabilities,
            config,
            estimator,
            adapter,
        })
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    /// Recognize the signs in `source`, which must be positioned at its
    /// first frame. The source is rewound once between the two passes.
    pub fn recognize(&self, source: &mut dyn FrameSource) -> Result<RecognitionReport> {
        self.capabilities.ensure_ready()?;

        let clip = source.info();
        let fps = clip.effective_fps();
        tracing::info!(
            fps,
            total_frames = clip.total_frames,
            duration_secs = clip.duration_secs(),
            extractor = self.capabilities.extractor.name(),
            classifier = self.capabilities.classifier.name(),
            "Starting sign recognition"
        );

        let extractor = self.capabilities.extractor.as_ref();
        let estimate = self.estimator.estimate(extractor, source);
        source.reset()?;

        let regime = Regime::for_word_count(estimate.estimated_word_count);
        let parameters = self
            .adapter
            .adapt(estimate.estimated_word_count, clip.duration_secs());

        let pass = WindowedRecognizer::new(
            self.capabilities.classifier.as_ref(),
            self.capabilities.labels.as_ref(),
            parameters,
            WindowSettings::from(&self.config),
            fps,
        )
        .run(extractor, source);

        tracing::info!(
            words = pass.words.len(),
            frames_processed = pass.stats.frames_processed,
            frames_with_landmarks = pass.stats.frames_with_landmarks,
            votes = pass.stats.votes,
            "Sign recognition complete"
        );

        Ok(RecognitionReport {
            clip,
            estimate,
            regime,
            parameters,
            confirmations: pass.words,
            stats: pass.stats,
        })
    }
}
