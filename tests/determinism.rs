//! Determinism and fallback properties of the disease evaluation.

use approx::assert_abs_diff_eq;
use dermgate::analysis::{evaluate_disease, shannon_entropy_nats};
use dermgate::RawPrediction;

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn ranking_is_strictly_descending_with_index_tiebreak() {
    // Crafted duplicates: indices 1 and 3 tie at 0.3, indices 0 and 2 tie
    // at 0.2. Descending probability, ascending index within each tie.
    let pred = RawPrediction::from_probabilities(vec![0.2, 0.3, 0.2, 0.3]);
    let result = evaluate_disease(&pred, &labels(&["a", "b", "c", "d"]), 4).unwrap();

    let ranked: Vec<(&str, f64)> = result
        .top_k
        .iter()
        .map(|s| (s.label.as_str(), s.confidence))
        .collect();
    assert_eq!(
        ranked,
        vec![("b", 0.3), ("d", 0.3), ("a", 0.2), ("c", 0.2)]
    );

    for pair in result.top_k.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence);
    }
}

#[test]
fn repeated_evaluation_is_identical() {
    let pred = RawPrediction::from_probabilities(vec![0.25, 0.25, 0.25, 0.25]);
    let names = labels(&["a", "b", "c", "d"]);

    let first = evaluate_disease(&pred, &names, 4).unwrap();
    for _ in 0..10 {
        let again = evaluate_disease(&pred, &names, 4).unwrap();
        assert_eq!(again, first);
    }
}

#[test]
fn label_length_mismatch_yields_exact_synthetic_names() {
    let pred = RawPrediction::from_probabilities(vec![0.4, 0.3, 0.2, 0.1]);
    let result = evaluate_disease(&pred, &labels(&["too", "short"]), 4).unwrap();

    let ranked: Vec<&str> = result.top_k.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(ranked, vec!["class_0", "class_1", "class_2", "class_3"]);
}

#[test]
fn one_hot_entropy_is_zero_within_tolerance() {
    let mut probs = vec![0.0; 12];
    probs[7] = 1.0;
    assert_abs_diff_eq!(shannon_entropy_nats(&probs), 0.0, epsilon = 1e-6);
}

#[test]
fn uniform_entropy_is_ln_n_within_tolerance() {
    for n in [2usize, 5, 25, 100] {
        let probs = vec![1.0 / n as f64; n];
        assert_abs_diff_eq!(
            shannon_entropy_nats(&probs),
            (n as f64).ln(),
            epsilon = 1e-6
        );
    }
}

#[test]
fn entropy_orders_sharper_distributions_below_flatter_ones() {
    let sharp = shannon_entropy_nats(&[0.9, 0.05, 0.03, 0.02]);
    let flat = shannon_entropy_nats(&[0.25, 0.25, 0.25, 0.25]);
    assert!(sharp < flat);
}
