//! Disease-distribution evaluation: ranking and entropy.

use std::fmt;

use crate::constants::ENTROPY_PROB_FLOOR;
use crate::engine::RawPrediction;
use crate::labels::synthetic_labels;
use crate::result::{ClassScore, DiseaseResult};

/// Structural failure of the disease evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiseaseError {
    /// The model produced no per-class probability vector, so no diagnosis
    /// can be ranked. Propagated to the caller, never retried.
    NoProbabilities,
}

impl fmt::Display for DiseaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiseaseError::NoProbabilities => {
                write!(f, "disease model produced no probability vector")
            }
        }
    }
}

impl std::error::Error for DiseaseError {}

/// Evaluate a disease prediction into a ranked, labeled result.
///
/// `labels` is used only when its length exactly equals the model's output
/// dimensionality; on any mismatch synthetic `class_N` names are
/// substituted for this call and a warning is logged. `top_k` is clamped to
/// `1..=N`.
pub fn evaluate_disease(
    prediction: &RawPrediction,
    labels: &[String],
    top_k: usize,
) -> Result<DiseaseResult, DiseaseError> {
    let probs = prediction
        .probabilities()
        .ok_or(DiseaseError::NoProbabilities)?;
    let n = probs.len();

    let effective_labels: Vec<String> = if labels.len() == n {
        labels.to_vec()
    } else {
        log::warn!(
            "disease label set has {} entries but model emits {} classes; using synthetic names",
            labels.len(),
            n
        );
        synthetic_labels(n)
    };

    // resolved_top1 cannot fail here: the probability vector is non-empty.
    let (top1_index, top1_confidence) = prediction
        .resolved_top1()
        .ok_or(DiseaseError::NoProbabilities)?;
    let top1 = ClassScore::new(effective_labels[top1_index.min(n - 1)].clone(), top1_confidence);

    let k = top_k.clamp(1, n);
    let top_k = rank_top_k(probs, &effective_labels, k);

    Ok(DiseaseResult {
        top1,
        top_k,
        entropy: shannon_entropy_nats(probs),
    })
}

/// The `k` highest-probability classes, descending by probability.
///
/// Equal probabilities keep ascending index order. The explicit tie rule
/// makes the ranking deterministic across runs; a plain sort on the float
/// alone would leave the order of equal entries unspecified.
fn rank_top_k(probs: &[f64], labels: &[String], k: usize) -> Vec<ClassScore> {
    let mut indices: Vec<usize> = (0..probs.len()).collect();
    indices.sort_by(|&a, &b| {
        probs[b]
            .partial_cmp(&probs[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    indices
        .into_iter()
        .take(k)
        .map(|i| ClassScore::new(labels[i].clone(), probs[i]))
        .collect()
}

/// Shannon entropy of a probability distribution, in nats.
///
/// Each probability is floored at a small positive epsilon before the
/// logarithm so exact-zero entries contribute ~0 instead of NaN. The input
/// is not re-normalized.
pub fn shannon_entropy_nats(probs: &[f64]) -> f64 {
    -probs
        .iter()
        .map(|&p| {
            let p = p.max(ENTROPY_PROB_FLOOR);
            p * p.ln()
        })
        .sum::<f64>()
}
