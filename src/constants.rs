//! Shared constants for gate semantics and decision thresholds.

/// Gate-model label that marks an image as plausible human skin.
///
/// Matching is case-insensitive; the gate model is expected to emit this
/// exact label (modulo case) for its "valid input" class.
pub const VALID_SKIN_LABEL: &str = "valid_skin";

/// Gate-model label that marks an image as confidently not human skin.
pub const NONHUMAN_LABEL: &str = "nonhuman";

/// Label reported for rejected inputs in place of a diagnosis.
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

/// Floor applied to each probability before taking its logarithm.
///
/// Keeps exact-zero entries from producing -inf/NaN in the entropy sum.
pub const ENTROPY_PROB_FLOOR: f64 = 1e-12;

/// Default gate confidence required to accept an image as valid skin.
pub const DEFAULT_GATE_ACCEPT_THRESHOLD: f64 = 0.70;

/// Default gate confidence required to reject an image as non-skin.
pub const DEFAULT_GATE_REJECT_THRESHOLD: f64 = 0.80;

/// Default disease top-1 confidence floor applied when the gate is uncertain.
pub const DEFAULT_UNCERTAIN_MIN_CONFIDENCE: f64 = 0.65;

/// Default disease entropy ceiling (nats) applied when the gate is uncertain.
pub const DEFAULT_UNCERTAIN_MAX_ENTROPY: f64 = 2.50;

/// Default number of ranked classes returned with a diagnosis.
pub const DEFAULT_TOP_K: usize = 5;
