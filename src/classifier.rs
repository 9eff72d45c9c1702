//! The gated classifier: composition of gate and disease evaluation.
//!
//! This is the crate's entry point. A [`GatedClassifier`] owns two
//! inference engines and their resolved label sets, all read-only after
//! construction, and exposes a per-image decision that is safe to call
//! from multiple threads at once.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::analysis::{evaluate_disease, evaluate_gate, DiseaseError};
use crate::config::Config;
use crate::engine::BoxedEngine;
use crate::labels::{resolve_labels, LabelError};
use crate::result::{
    ClassifyError, ClassifyResponse, FinalDecision, GateVerdict, RejectReason,
};

/// Error raised while building a [`GatedClassifier`].
#[derive(Debug)]
pub enum BuildError {
    /// No gate engine was supplied.
    MissingGateEngine,

    /// No disease engine was supplied.
    MissingDiseaseEngine,

    /// No disease class names could be resolved from any source. Running
    /// with unknown class identities would produce meaningless diagnoses,
    /// so construction fails instead.
    NoDiseaseLabels,

    /// The configuration failed range validation.
    InvalidConfig(String),

    /// A label file was present but unreadable.
    Label(LabelError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::MissingGateEngine => write!(f, "no gate engine supplied"),
            BuildError::MissingDiseaseEngine => write!(f, "no disease engine supplied"),
            BuildError::NoDiseaseLabels => {
                write!(f, "disease class names could not be resolved from any source")
            }
            BuildError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            BuildError::Label(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Label(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LabelError> for BuildError {
    fn from(e: LabelError) -> Self {
        BuildError::Label(e)
    }
}

/// Builder for [`GatedClassifier`].
///
/// Label files are optional for both models; the disease label set must
/// still resolve non-empty (from file or model mapping) or `build` fails.
#[derive(Default)]
pub struct GatedClassifierBuilder {
    gate_engine: Option<BoxedEngine>,
    disease_engine: Option<BoxedEngine>,
    gate_label_file: Option<PathBuf>,
    disease_label_file: Option<PathBuf>,
    config: Config,
}

impl GatedClassifierBuilder {
    /// Set the validity-gate engine.
    pub fn gate_engine(mut self, engine: BoxedEngine) -> Self {
        self.gate_engine = Some(engine);
        self
    }

    /// Set the disease-classifier engine.
    pub fn disease_engine(mut self, engine: BoxedEngine) -> Self {
        self.disease_engine = Some(engine);
        self
    }

    /// Use a label file for the gate model (one label per line).
    pub fn gate_label_file(mut self, path: impl AsRef<Path>) -> Self {
        self.gate_label_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use a label file for the disease model (one label per line).
    pub fn disease_label_file(mut self, path: impl AsRef<Path>) -> Self {
        self.disease_label_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replace the default configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Resolve label sets and assemble the classifier.
    ///
    /// This is the once-per-process startup step: label resolution happens
    /// here and never again, and the result is immutable.
    pub fn build(self) -> Result<GatedClassifier, BuildError> {
        self.config
            .validate()
            .map_err(BuildError::InvalidConfig)?;

        let gate_engine = self.gate_engine.ok_or(BuildError::MissingGateEngine)?;
        let disease_engine = self
            .disease_engine
            .ok_or(BuildError::MissingDiseaseEngine)?;

        // Empty gate labels are tolerated: the gate then falls through to
        // uncertain verdicts, which the policy handles.
        let gate_labels =
            resolve_labels(self.gate_label_file.as_deref(), &gate_engine.class_names())?;

        let disease_labels = resolve_labels(
            self.disease_label_file.as_deref(),
            &disease_engine.class_names(),
        )?;
        if disease_labels.is_empty() {
            return Err(BuildError::NoDiseaseLabels);
        }

        log::debug!(
            "classifier ready: {} gate labels, {} disease labels",
            gate_labels.len(),
            disease_labels.len()
        );

        Ok(GatedClassifier {
            gate_engine,
            disease_engine,
            gate_labels,
            disease_labels,
            config: self.config,
        })
    }
}

/// Two-stage gated skin-image classifier.
///
/// Holds process-wide, read-only state: the two engines, their resolved
/// label sets, and the decision thresholds. Every classification is
/// independent and derives its whole result from the image passed in.
pub struct GatedClassifier {
    gate_engine: BoxedEngine,
    disease_engine: BoxedEngine,
    gate_labels: Vec<String>,
    disease_labels: Vec<String>,
    config: Config,
}

impl GatedClassifier {
    /// Start building a classifier.
    pub fn builder() -> GatedClassifierBuilder {
        GatedClassifierBuilder::default()
    }

    /// The configuration in force.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The resolved disease label set.
    pub fn disease_labels(&self) -> &[String] {
        &self.disease_labels
    }

    /// Classify one image, never panicking.
    ///
    /// Every failure mode, including a panic inside an engine
    /// implementation, is converted into
    /// [`ClassifyResponse::Error`]. Callers always receive a structured,
    /// serializable result.
    pub fn classify(&self, image: &DynamicImage) -> ClassifyResponse {
        match catch_unwind(AssertUnwindSafe(|| self.classify_checked(image))) {
            Ok(result) => result.into(),
            Err(payload) => ClassifyResponse::Error {
                error: ClassifyError::Internal(panic_message(payload.as_ref())).to_string(),
            },
        }
    }

    /// Classify one image, surfacing errors as a plain `Result`.
    ///
    /// The decision sequence:
    ///
    /// 1. Normalize to RGB (idempotent for RGB input).
    /// 2. Gate the image. A confident non-skin verdict rejects immediately;
    ///    the disease model is never invoked for such input.
    /// 3. Otherwise run the disease model and rank its distribution.
    /// 4. An uncertain gate applies the strict policy: reject when the
    ///    top-1 confidence sits below the floor *or* the entropy exceeds
    ///    the ceiling. Either uncertainty signal alone suffices.
    pub fn classify_checked(&self, image: &DynamicImage) -> Result<FinalDecision, ClassifyError> {
        let rgb = image.to_rgb8();

        let gate_prediction = self.gate_engine.predict(&rgb).map_err(ClassifyError::Gate)?;
        let gate = evaluate_gate(
            &gate_prediction,
            &self.gate_labels,
            self.config.gate_accept_threshold,
            self.config.gate_reject_threshold,
        );
        log::debug!(
            "gate verdict {} (label {:?}, confidence {:?})",
            gate.verdict,
            gate.diagnostics.label,
            gate.diagnostics.confidence
        );

        if gate.verdict == GateVerdict::Reject {
            return Ok(FinalDecision::rejection(gate, RejectReason::GateReject, None));
        }

        let disease_prediction = self
            .disease_engine
            .predict(&rgb)
            .map_err(ClassifyError::Disease)?;
        let disease = evaluate_disease(&disease_prediction, &self.disease_labels, self.config.top_k)
            .map_err(|e| match e {
                DiseaseError::NoProbabilities => ClassifyError::NoDiseaseProbabilities,
            })?;

        if gate.verdict == GateVerdict::Uncertain {
            let low_confidence = disease.top1.confidence < self.config.uncertain_min_confidence;
            let high_entropy = disease.entropy > self.config.uncertain_max_entropy;
            if low_confidence || high_entropy {
                let reason = RejectReason::UncertainGateStrict {
                    top1_confidence: disease.top1.confidence,
                    entropy: disease.entropy,
                };
                return Ok(FinalDecision::rejection(gate, reason, Some(disease.entropy)));
            }
        }

        Ok(FinalDecision::diagnosis(gate, disease))
    }

    /// Classify a batch of images independently.
    ///
    /// One response per input, in order; an error for one image never
    /// affects the others.
    pub fn classify_all(&self, images: &[DynamicImage]) -> Vec<ClassifyResponse> {
        images.iter().map(|image| self.classify(image)).collect()
    }
}

impl fmt::Debug for GatedClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatedClassifier")
            .field("gate_labels", &self.gate_labels.len())
            .field("disease_labels", &self.disease_labels.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Best-effort message extraction from a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected fault".to_string()
    }
}
