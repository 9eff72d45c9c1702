//! Dual-threshold gate evaluation.

use crate::constants::{NONHUMAN_LABEL, VALID_SKIN_LABEL};
use crate::engine::RawPrediction;
use crate::result::{GateAssessment, GateDiagnostics, GateReason, GateVerdict};

/// Map a gate prediction to a verdict under dual thresholds.
///
/// Thresholds are expected in `(0, 1]` with `reject_threshold >=
/// accept_threshold`; the ordering is a convention, not a checked
/// invariant. Inverting it inverts the intended behavior.
///
/// The top-1 label is matched case-insensitively against the two semantic
/// gate labels. Anything else (including synthetic `class_N` names from a
/// label-set fallback) cannot reach either decisive branch and lands on
/// `Uncertain`.
pub fn evaluate_gate(
    prediction: &RawPrediction,
    gate_labels: &[String],
    accept_threshold: f64,
    reject_threshold: f64,
) -> GateAssessment {
    let diagnostics = |label: Option<String>, confidence: Option<f64>, reason: Option<GateReason>| {
        GateDiagnostics {
            label,
            confidence,
            accept_threshold,
            reject_threshold,
            reason,
        }
    };

    let Some((index, confidence)) = prediction.resolved_top1() else {
        // Soft failure: the pipeline still attempts a diagnosis under the
        // strict uncertain-gate policy.
        return GateAssessment {
            verdict: GateVerdict::Uncertain,
            diagnostics: diagnostics(None, None, Some(GateReason::NoProbabilities)),
        };
    };

    let label = resolve_label(gate_labels, index);

    if label.eq_ignore_ascii_case(VALID_SKIN_LABEL) {
        if confidence >= accept_threshold {
            return GateAssessment {
                verdict: GateVerdict::Accept,
                diagnostics: diagnostics(Some(label), Some(confidence), None),
            };
        }
        return GateAssessment {
            verdict: GateVerdict::Uncertain,
            diagnostics: diagnostics(
                Some(label),
                Some(confidence),
                Some(GateReason::BelowThreshold),
            ),
        };
    }

    if label.eq_ignore_ascii_case(NONHUMAN_LABEL) {
        if confidence >= reject_threshold {
            return GateAssessment {
                verdict: GateVerdict::Reject,
                diagnostics: diagnostics(
                    Some(label),
                    Some(confidence),
                    Some(GateReason::ConfidentNonSkin),
                ),
            };
        }
        return GateAssessment {
            verdict: GateVerdict::Uncertain,
            diagnostics: diagnostics(
                Some(label),
                Some(confidence),
                Some(GateReason::BelowThreshold),
            ),
        };
    }

    GateAssessment {
        verdict: GateVerdict::Uncertain,
        diagnostics: diagnostics(
            Some(label),
            Some(confidence),
            Some(GateReason::UnrecognizedLabel),
        ),
    }
}

/// Name for the top-1 index: the resolved label set when it covers the
/// index, synthetic `class_N` otherwise.
fn resolve_label(gate_labels: &[String], index: usize) -> String {
    gate_labels
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("class_{}", index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate_labels() -> Vec<String> {
        vec!["valid_skin".to_string(), "nonhuman".to_string()]
    }

    fn pred(probs: Vec<f64>) -> RawPrediction {
        RawPrediction::from_probabilities(probs)
    }

    #[test]
    fn confident_skin_accepts() {
        let assessment = evaluate_gate(&pred(vec![0.95, 0.05]), &gate_labels(), 0.70, 0.80);
        assert_eq!(assessment.verdict, GateVerdict::Accept);
        assert_eq!(assessment.diagnostics.reason, None);
        assert_eq!(assessment.diagnostics.confidence, Some(0.95));
    }

    #[test]
    fn confident_nonhuman_rejects() {
        let assessment = evaluate_gate(&pred(vec![0.15, 0.85]), &gate_labels(), 0.70, 0.80);
        assert_eq!(assessment.verdict, GateVerdict::Reject);
        assert_eq!(
            assessment.diagnostics.reason,
            Some(GateReason::ConfidentNonSkin)
        );
    }

    #[test]
    fn weak_skin_confidence_is_uncertain() {
        let assessment = evaluate_gate(&pred(vec![0.60, 0.40]), &gate_labels(), 0.70, 0.80);
        assert_eq!(assessment.verdict, GateVerdict::Uncertain);
        assert_eq!(
            assessment.diagnostics.reason,
            Some(GateReason::BelowThreshold)
        );
    }

    #[test]
    fn weak_nonhuman_confidence_is_uncertain() {
        let assessment = evaluate_gate(&pred(vec![0.25, 0.75]), &gate_labels(), 0.70, 0.80);
        assert_eq!(assessment.verdict, GateVerdict::Uncertain);
        assert_eq!(
            assessment.diagnostics.reason,
            Some(GateReason::BelowThreshold)
        );
    }

    #[test]
    fn label_match_is_case_insensitive() {
        let labels = vec!["VALID_SKIN".to_string(), "NonHuman".to_string()];
        let accept = evaluate_gate(&pred(vec![0.9, 0.1]), &labels, 0.70, 0.80);
        assert_eq!(accept.verdict, GateVerdict::Accept);

        let reject = evaluate_gate(&pred(vec![0.1, 0.9]), &labels, 0.70, 0.80);
        assert_eq!(reject.verdict, GateVerdict::Reject);
    }

    #[test]
    fn unrecognized_label_is_uncertain_even_with_high_confidence() {
        let labels = vec!["cat".to_string(), "dog".to_string()];
        let assessment = evaluate_gate(&pred(vec![0.99, 0.01]), &labels, 0.70, 0.80);
        assert_eq!(assessment.verdict, GateVerdict::Uncertain);
        assert_eq!(
            assessment.diagnostics.reason,
            Some(GateReason::UnrecognizedLabel)
        );
    }

    #[test]
    fn synthetic_fallback_labels_cannot_accept() {
        // Empty label set: the fallback name class_0 matches neither
        // semantic label, so the gate cannot decide.
        let assessment = evaluate_gate(&pred(vec![0.99, 0.01]), &[], 0.70, 0.80);
        assert_eq!(assessment.verdict, GateVerdict::Uncertain);
        assert_eq!(assessment.diagnostics.label.as_deref(), Some("class_0"));
    }

    #[test]
    fn missing_probabilities_is_soft_uncertain() {
        let assessment = evaluate_gate(&RawPrediction::empty(), &gate_labels(), 0.70, 0.80);
        assert_eq!(assessment.verdict, GateVerdict::Uncertain);
        assert_eq!(
            assessment.diagnostics.reason,
            Some(GateReason::NoProbabilities)
        );
        assert_eq!(assessment.diagnostics.label, None);
        assert_eq!(assessment.diagnostics.confidence, None);
    }

    #[test]
    fn exact_threshold_confidence_accepts() {
        let assessment = evaluate_gate(&pred(vec![0.70, 0.30]), &gate_labels(), 0.70, 0.80);
        assert_eq!(assessment.verdict, GateVerdict::Accept);
    }

    #[test]
    fn thresholds_are_recorded_in_diagnostics() {
        let assessment = evaluate_gate(&pred(vec![0.5, 0.5]), &gate_labels(), 0.72, 0.81);
        assert_eq!(assessment.diagnostics.accept_threshold, 0.72);
        assert_eq!(assessment.diagnostics.reject_threshold, 0.81);
    }
}
