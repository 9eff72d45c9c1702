//! Result types for the gated classification pipeline.
//!
//! Everything a caller can receive is defined here: the gate verdict with
//! its diagnostics, the disease ranking, the composed final decision, and
//! the serializable response envelope.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_LABEL;
use crate::engine::InferenceError;

// ============================================================================
// Gate verdict
// ============================================================================

/// Three-way outcome of the input-validity gate.
///
/// - `Accept`: the image is confidently valid skin; proceed to diagnosis.
/// - `Reject`: the image is confidently not skin; no diagnosis is produced.
/// - `Uncertain`: the gate could not decide; diagnosis proceeds under a
///   stricter acceptance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateVerdict {
    /// Confidently valid skin input.
    Accept,
    /// Confidently non-skin input.
    Reject,
    /// Neither threshold reached, or the gate output was unusable.
    Uncertain,
}

impl fmt::Display for GateVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateVerdict::Accept => write!(f, "accept"),
            GateVerdict::Reject => write!(f, "reject"),
            GateVerdict::Uncertain => write!(f, "uncertain"),
        }
    }
}

/// Reason code attached to every non-`Accept` gate verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateReason {
    /// The gate model produced no usable probability output.
    NoProbabilities,
    /// The top-1 label matched neither semantic gate label.
    UnrecognizedLabel,
    /// The label matched but its confidence missed the relevant threshold.
    BelowThreshold,
    /// The non-skin label cleared the rejection threshold.
    ConfidentNonSkin,
}

impl fmt::Display for GateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateReason::NoProbabilities => write!(f, "no probabilities"),
            GateReason::UnrecognizedLabel => write!(f, "unrecognized label"),
            GateReason::BelowThreshold => write!(f, "below threshold"),
            GateReason::ConfidentNonSkin => write!(f, "confident non-skin"),
        }
    }
}

/// What the gate saw and which thresholds it applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDiagnostics {
    /// Top-1 label observed from the gate model, when any output existed.
    pub label: Option<String>,

    /// Confidence of that top-1 label.
    pub confidence: Option<f64>,

    /// Accept threshold in force for this call.
    pub accept_threshold: f64,

    /// Reject threshold in force for this call.
    pub reject_threshold: f64,

    /// Reason code; `None` only for `Accept`.
    pub reason: Option<GateReason>,
}

/// Gate verdict together with its diagnostics record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateAssessment {
    /// The three-way verdict.
    pub verdict: GateVerdict,
    /// Observed label/confidence and the thresholds applied.
    pub diagnostics: GateDiagnostics,
}

impl GateAssessment {
    /// Observed gate confidence, or 0.0 when the gate had no output.
    pub fn confidence_or_zero(&self) -> f64 {
        self.diagnostics.confidence.unwrap_or(0.0)
    }
}

// ============================================================================
// Disease evaluation
// ============================================================================

/// One labeled class with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScore {
    /// Human-readable class name (or synthetic `class_N`).
    pub label: String,
    /// Model confidence for this class.
    pub confidence: f64,
}

impl ClassScore {
    /// Construct a score.
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Full disease-classifier evaluation for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseResult {
    /// Highest-confidence class.
    pub top1: ClassScore,

    /// Ranked classes, descending by confidence; ties keep ascending
    /// index order.
    pub top_k: Vec<ClassScore>,

    /// Shannon entropy of the probability distribution, in nats.
    ///
    /// 0 for a one-hot distribution, ln(N) for a uniform one over N
    /// classes.
    pub entropy: f64,
}

// ============================================================================
// Final decision
// ============================================================================

/// Why a final decision was a rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The gate confidently classified the input as non-skin.
    GateReject,

    /// The gate was uncertain and the diagnosis did not clear the strict
    /// acceptance policy (`uncertain_gate_strict`): either the top-1
    /// confidence was below the floor or the entropy exceeded the ceiling.
    UncertainGateStrict {
        /// Disease top-1 confidence measured for this image.
        top1_confidence: f64,
        /// Disease distribution entropy (nats) measured for this image.
        entropy: f64,
    },
}

impl RejectReason {
    /// Policy name recorded in diagnostics and rendered output.
    pub fn policy_name(&self) -> &'static str {
        match self {
            RejectReason::GateReject => "gate_reject",
            RejectReason::UncertainGateStrict { .. } => "uncertain_gate_strict",
        }
    }
}

/// Diagnostics attached to every final decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionDiagnostics {
    /// The gate verdict for this image.
    pub gate_verdict: GateVerdict,

    /// Gate observation and thresholds.
    pub gate: GateDiagnostics,

    /// Disease distribution entropy (nats); absent when the disease model
    /// was never invoked.
    pub disease_entropy: Option<f64>,

    /// Present iff the decision was a rejection.
    pub rejection: Option<RejectReason>,
}

/// The externally visible outcome of one classification call.
///
/// Fully derived per request; carries no handles back into the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDecision {
    /// Whether the input was rejected instead of diagnosed.
    pub rejected: bool,

    /// Top-1 disease label, or `"UNKNOWN"` for rejections.
    pub label: String,

    /// Confidence behind `label`: the disease top-1 confidence for
    /// diagnoses, the gate confidence for rejections.
    pub confidence: f64,

    /// Ranked disease classes; empty for rejections.
    pub top_k: Vec<ClassScore>,

    /// Gate and policy diagnostics.
    pub diagnostics: DecisionDiagnostics,
}

impl FinalDecision {
    /// Build a rejection carrying the gate assessment and reason.
    pub(crate) fn rejection(
        gate: GateAssessment,
        reason: RejectReason,
        disease_entropy: Option<f64>,
    ) -> Self {
        let confidence = gate.confidence_or_zero();
        Self {
            rejected: true,
            label: UNKNOWN_LABEL.to_string(),
            confidence,
            top_k: Vec::new(),
            diagnostics: DecisionDiagnostics {
                gate_verdict: gate.verdict,
                gate: gate.diagnostics,
                disease_entropy,
                rejection: Some(reason),
            },
        }
    }

    /// Build an accepted diagnosis from a disease evaluation.
    pub(crate) fn diagnosis(gate: GateAssessment, disease: DiseaseResult) -> Self {
        Self {
            rejected: false,
            label: disease.top1.label,
            confidence: disease.top1.confidence,
            top_k: disease.top_k,
            diagnostics: DecisionDiagnostics {
                gate_verdict: gate.verdict,
                gate: gate.diagnostics,
                disease_entropy: Some(disease.entropy),
                rejection: None,
            },
        }
    }

    /// Top-1 as a [`ClassScore`], mirroring the entries in `top_k`.
    pub fn top1(&self) -> ClassScore {
        ClassScore::new(self.label.clone(), self.confidence)
    }
}

impl fmt::Display for FinalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rejected {
            let policy = self
                .diagnostics
                .rejection
                .as_ref()
                .map(RejectReason::policy_name)
                .unwrap_or("unspecified");
            write!(
                f,
                "REJECTED ({}): gate {} at {:.1}% confidence",
                policy,
                self.diagnostics.gate_verdict,
                self.confidence * 100.0
            )
        } else {
            write!(
                f,
                "{} at {:.1}% confidence ({} ranked classes, gate {})",
                self.label,
                self.confidence * 100.0,
                self.top_k.len(),
                self.diagnostics.gate_verdict
            )
        }
    }
}

// ============================================================================
// Errors and the response envelope
// ============================================================================

/// Error surfaced by a classification call.
#[derive(Debug)]
pub enum ClassifyError {
    /// The gate engine failed outright.
    Gate(InferenceError),

    /// The disease engine failed outright.
    Disease(InferenceError),

    /// The disease model produced no usable probability output, so no
    /// diagnosis is possible.
    NoDiseaseProbabilities,

    /// A fault escaped the composition and was caught at the boundary.
    Internal(String),
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyError::Gate(e) => write!(f, "gate inference: {}", e),
            ClassifyError::Disease(e) => write!(f, "disease inference: {}", e),
            ClassifyError::NoDiseaseProbabilities => {
                write!(f, "disease output: model produced no probability vector")
            }
            ClassifyError::Internal(msg) => write!(f, "internal: {}", msg),
        }
    }
}

impl std::error::Error for ClassifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClassifyError::Gate(e) | ClassifyError::Disease(e) => Some(e),
            _ => None,
        }
    }
}

/// JSON-serializable envelope returned by the infallible classify entry
/// point: either a decision or a typed error string, never a fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassifyResponse {
    /// A well-formed decision (accepted or rejected).
    Decision(FinalDecision),
    /// The call failed; `error` is `"<kind>: <message>"`.
    Error {
        /// Typed error string.
        error: String,
    },
}

impl ClassifyResponse {
    /// Whether this response is the error variant.
    pub fn is_error(&self) -> bool {
        matches!(self, ClassifyResponse::Error { .. })
    }

    /// The decision, if this response carries one.
    pub fn decision(&self) -> Option<&FinalDecision> {
        match self {
            ClassifyResponse::Decision(d) => Some(d),
            ClassifyResponse::Error { .. } => None,
        }
    }

    /// Convert back into a `Result` for callers that prefer `?`.
    pub fn into_result(self) -> Result<FinalDecision, String> {
        match self {
            ClassifyResponse::Decision(d) => Ok(d),
            ClassifyResponse::Error { error } => Err(error),
        }
    }
}

impl From<Result<FinalDecision, ClassifyError>> for ClassifyResponse {
    fn from(result: Result<FinalDecision, ClassifyError>) -> Self {
        match result {
            Ok(decision) => ClassifyResponse::Decision(decision),
            Err(e) => ClassifyResponse::Error {
                error: e.to_string(),
            },
        }
    }
}
