//! Configuration for the gated classification pipeline.

use crate::constants::{
    DEFAULT_GATE_ACCEPT_THRESHOLD, DEFAULT_GATE_REJECT_THRESHOLD, DEFAULT_TOP_K,
    DEFAULT_UNCERTAIN_MAX_ENTROPY, DEFAULT_UNCERTAIN_MIN_CONFIDENCE,
};

/// Decision thresholds and options for [`GatedClassifier`](crate::GatedClassifier).
///
/// All thresholds operate on model confidences in `(0, 1]` except
/// `uncertain_max_entropy`, which is an entropy ceiling in nats.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Gate confidence at or above which a `valid_skin` top-1 accepts the
    /// image. Default: 0.70.
    pub gate_accept_threshold: f64,

    /// Gate confidence at or above which a `nonhuman` top-1 rejects the
    /// image. Default: 0.80.
    ///
    /// Convention: `gate_reject_threshold >= gate_accept_threshold`. The
    /// ordering is documented, not validated; inverting it inverts the
    /// intended gate behavior.
    pub gate_reject_threshold: f64,

    /// Disease top-1 confidence floor applied when the gate verdict is
    /// uncertain. Below it, the image is rejected. Default: 0.65.
    pub uncertain_min_confidence: f64,

    /// Disease entropy ceiling (nats) applied when the gate verdict is
    /// uncertain. Above it, the image is rejected. Default: 2.50.
    pub uncertain_max_entropy: f64,

    /// Number of ranked classes returned with a diagnosis; clamped to the
    /// model's class count at evaluation time. Default: 5.
    pub top_k: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gate_accept_threshold: DEFAULT_GATE_ACCEPT_THRESHOLD,
            gate_reject_threshold: DEFAULT_GATE_REJECT_THRESHOLD,
            uncertain_min_confidence: DEFAULT_UNCERTAIN_MIN_CONFIDENCE,
            uncertain_max_entropy: DEFAULT_UNCERTAIN_MAX_ENTROPY,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl Config {
    /// Create a configuration with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A stricter preset for deployments that prefer false rejections over
    /// false diagnoses: higher gate acceptance bar, tighter uncertain-gate
    /// policy.
    pub fn strict() -> Self {
        Self {
            gate_accept_threshold: 0.80,
            uncertain_min_confidence: 0.75,
            uncertain_max_entropy: 2.00,
            ..Default::default()
        }
    }

    /// A lenient preset for triage settings where a tentative diagnosis is
    /// preferable to a rejection.
    pub fn lenient() -> Self {
        Self {
            gate_accept_threshold: 0.60,
            uncertain_min_confidence: 0.55,
            uncertain_max_entropy: 3.00,
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the gate accept threshold.
    pub fn gate_accept_threshold(mut self, threshold: f64) -> Self {
        assert!(
            threshold > 0.0 && threshold <= 1.0,
            "gate_accept_threshold must be in (0, 1]"
        );
        self.gate_accept_threshold = threshold;
        self
    }

    /// Set the gate reject threshold.
    pub fn gate_reject_threshold(mut self, threshold: f64) -> Self {
        assert!(
            threshold > 0.0 && threshold <= 1.0,
            "gate_reject_threshold must be in (0, 1]"
        );
        self.gate_reject_threshold = threshold;
        self
    }

    /// Set the uncertain-gate confidence floor.
    pub fn uncertain_min_confidence(mut self, floor: f64) -> Self {
        assert!(
            floor > 0.0 && floor <= 1.0,
            "uncertain_min_confidence must be in (0, 1]"
        );
        self.uncertain_min_confidence = floor;
        self
    }

    /// Set the uncertain-gate entropy ceiling in nats.
    pub fn uncertain_max_entropy(mut self, ceiling: f64) -> Self {
        assert!(
            ceiling >= 0.0,
            "uncertain_max_entropy must be >= 0"
        );
        self.uncertain_max_entropy = ceiling;
        self
    }

    /// Set the number of ranked classes to return.
    pub fn top_k(mut self, k: usize) -> Self {
        assert!(k > 0, "top_k must be > 0");
        self.top_k = k;
        self
    }

    // =========================================================================
    // Environment overrides
    // =========================================================================

    /// Apply overrides from `DERMGATE_*` environment variables.
    ///
    /// Recognized: `DERMGATE_GATE_ACCEPT`, `DERMGATE_GATE_REJECT`,
    /// `DERMGATE_MIN_CONFIDENCE`, `DERMGATE_MAX_ENTROPY`, `DERMGATE_TOP_K`.
    /// Unset, malformed, or out-of-range values are ignored and the
    /// current value kept.
    pub fn from_env(mut self) -> Self {
        if let Some(v) = env_f64("DERMGATE_GATE_ACCEPT") {
            if v > 0.0 && v <= 1.0 {
                self.gate_accept_threshold = v;
            }
        }
        if let Some(v) = env_f64("DERMGATE_GATE_REJECT") {
            if v > 0.0 && v <= 1.0 {
                self.gate_reject_threshold = v;
            }
        }
        if let Some(v) = env_f64("DERMGATE_MIN_CONFIDENCE") {
            if v > 0.0 && v <= 1.0 {
                self.uncertain_min_confidence = v;
            }
        }
        if let Some(v) = env_f64("DERMGATE_MAX_ENTROPY") {
            if v >= 0.0 {
                self.uncertain_max_entropy = v;
            }
        }
        if let Some(v) = std::env::var("DERMGATE_TOP_K")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            if v > 0 {
                self.top_k = v;
            }
        }
        self
    }

    /// Check all option ranges without panicking.
    ///
    /// Deliberately does not check the accept/reject ordering convention;
    /// see [`Config::gate_reject_threshold`].
    pub fn validate(&self) -> Result<(), String> {
        if !(self.gate_accept_threshold > 0.0 && self.gate_accept_threshold <= 1.0) {
            return Err("gate_accept_threshold must be in (0, 1]".to_string());
        }
        if !(self.gate_reject_threshold > 0.0 && self.gate_reject_threshold <= 1.0) {
            return Err("gate_reject_threshold must be in (0, 1]".to_string());
        }
        if !(self.uncertain_min_confidence > 0.0 && self.uncertain_min_confidence <= 1.0) {
            return Err("uncertain_min_confidence must be in (0, 1]".to_string());
        }
        if !(self.uncertain_max_entropy >= 0.0) {
            return Err("uncertain_max_entropy must be >= 0".to_string());
        }
        if self.top_k == 0 {
            return Err("top_k must be > 0".to_string());
        }
        Ok(())
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok()?.parse::<f64>().ok()
}
