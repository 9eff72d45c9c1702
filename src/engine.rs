//! Inference engine abstraction.
//!
//! The pipeline never loads model weights itself. It consumes two
//! implementations of [`InferenceEngine`] (one for the validity gate, one
//! for the disease classifier) and works exclusively with the raw
//! prediction shape defined here.

use std::collections::BTreeMap;
use std::fmt;

use image::RgbImage;

/// Raw output of a single classifier inference call.
///
/// Models differ in what they report: some expose a full per-class
/// probability vector, some additionally report their own top-1 pick.
/// Both fields are optional; [`RawPrediction::resolved_top1`] reconciles
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPrediction {
    /// Per-class probability vector, index-aligned to the model's classes.
    ///
    /// `None` (or an empty vector) means the model produced no usable
    /// probability output for this call.
    pub probabilities: Option<Vec<f64>>,

    /// Model-reported top-1 (class index, confidence), when available.
    pub top1: Option<(usize, f64)>,
}

impl RawPrediction {
    /// Build a prediction from a probability vector alone.
    pub fn from_probabilities(probabilities: Vec<f64>) -> Self {
        Self {
            probabilities: Some(probabilities),
            top1: None,
        }
    }

    /// Build a prediction with no probability output.
    pub fn empty() -> Self {
        Self {
            probabilities: None,
            top1: None,
        }
    }

    /// Attach a model-reported top-1 (index, confidence).
    pub fn with_top1(mut self, index: usize, confidence: f64) -> Self {
        self.top1 = Some((index, confidence));
        self
    }

    /// Whether this prediction carries a usable probability vector.
    pub fn has_probabilities(&self) -> bool {
        self.probabilities
            .as_ref()
            .is_some_and(|p| !p.is_empty())
    }

    /// The probability vector, if usable.
    pub fn probabilities(&self) -> Option<&[f64]> {
        match &self.probabilities {
            Some(p) if !p.is_empty() => Some(p.as_slice()),
            _ => None,
        }
    }

    /// Top-1 (index, confidence): model-reported when present and in range,
    /// otherwise derived by argmax over the probability vector.
    ///
    /// Ties in the argmax resolve to the lowest index. Returns `None` when
    /// no probability output exists and the model reported nothing.
    pub fn resolved_top1(&self) -> Option<(usize, f64)> {
        let probs = self.probabilities();
        if let Some((index, confidence)) = self.top1 {
            // A reported index beyond the vector length is a model bug;
            // fall back to deriving from the vector in that case.
            match probs {
                Some(p) if index >= p.len() => {}
                _ => return Some((index, confidence)),
            }
        }
        let probs = probs?;
        let mut best = 0usize;
        for (i, &p) in probs.iter().enumerate() {
            if p > probs[best] {
                best = i;
            }
        }
        Some((best, probs[best]))
    }
}

/// Error returned when an inference call fails outright.
///
/// This covers hard engine faults (backend errors, device failures), not
/// the softer "no probability output" condition, which is represented in
/// [`RawPrediction`] and handled by the decision policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceError {
    message: String,
}

impl InferenceError {
    /// Create an error with the given backend message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The backend-provided message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for InferenceError {}

/// A loaded classifier the pipeline can run images through.
///
/// Implementations wrap whatever runtime actually executes the model.
/// `Send + Sync` is required so one pipeline instance can be shared across
/// request-handling threads; `predict` takes `&self` and must not mutate
/// shared state.
pub trait InferenceEngine: Send + Sync {
    /// Run inference on an RGB image of arbitrary dimensions.
    fn predict(&self, image: &RgbImage) -> Result<RawPrediction, InferenceError>;

    /// The model's own index-to-name class mapping.
    ///
    /// Read once at pipeline construction to linearize class labels; an
    /// empty map is valid for models that only report indices.
    fn class_names(&self) -> BTreeMap<usize, String>;
}

/// Owned, type-erased engine handle as stored by the pipeline.
pub type BoxedEngine = Box<dyn InferenceEngine>;
