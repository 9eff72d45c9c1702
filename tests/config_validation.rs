//! Tests for configuration validation.
//!
//! These tests verify that invalid option values are rejected by the
//! builder methods with appropriate panic messages, that presets stay in
//! range, and that environment overrides behave as documented.

use dermgate::Config;

// =============================================================================
// GATE THRESHOLD VALIDATION
// =============================================================================

#[test]
#[should_panic(expected = "gate_accept_threshold must be in (0, 1]")]
fn accept_threshold_zero_panics() {
    let _ = Config::new().gate_accept_threshold(0.0);
}

#[test]
#[should_panic(expected = "gate_accept_threshold must be in (0, 1]")]
fn accept_threshold_above_one_panics() {
    let _ = Config::new().gate_accept_threshold(1.5);
}

#[test]
#[should_panic(expected = "gate_accept_threshold must be in (0, 1]")]
fn accept_threshold_nan_panics() {
    let _ = Config::new().gate_accept_threshold(f64::NAN);
}

#[test]
fn accept_threshold_one_valid() {
    let config = Config::new().gate_accept_threshold(1.0);
    assert_eq!(config.gate_accept_threshold, 1.0);
}

#[test]
#[should_panic(expected = "gate_reject_threshold must be in (0, 1]")]
fn reject_threshold_zero_panics() {
    let _ = Config::new().gate_reject_threshold(0.0);
}

#[test]
#[should_panic(expected = "gate_reject_threshold must be in (0, 1]")]
fn reject_threshold_negative_panics() {
    let _ = Config::new().gate_reject_threshold(-0.2);
}

#[test]
fn threshold_order_convention_is_not_enforced() {
    // reject below accept inverts the intended gate behavior; the pair is
    // documented as a convention and deliberately not validated.
    let config = Config::new()
        .gate_accept_threshold(0.90)
        .gate_reject_threshold(0.50);
    assert!(config.validate().is_ok());
}

// =============================================================================
// UNCERTAIN-GATE POLICY VALIDATION
// =============================================================================

#[test]
#[should_panic(expected = "uncertain_min_confidence must be in (0, 1]")]
fn min_confidence_zero_panics() {
    let _ = Config::new().uncertain_min_confidence(0.0);
}

#[test]
#[should_panic(expected = "uncertain_min_confidence must be in (0, 1]")]
fn min_confidence_above_one_panics() {
    let _ = Config::new().uncertain_min_confidence(1.01);
}

#[test]
#[should_panic(expected = "uncertain_max_entropy must be >= 0")]
fn max_entropy_negative_panics() {
    let _ = Config::new().uncertain_max_entropy(-1.0);
}

#[test]
#[should_panic(expected = "uncertain_max_entropy must be >= 0")]
fn max_entropy_nan_panics() {
    let _ = Config::new().uncertain_max_entropy(f64::NAN);
}

#[test]
fn max_entropy_zero_valid() {
    // A zero ceiling rejects every uncertain-gate image with any spread.
    let config = Config::new().uncertain_max_entropy(0.0);
    assert_eq!(config.uncertain_max_entropy, 0.0);
}

#[test]
#[should_panic(expected = "top_k must be > 0")]
fn top_k_zero_panics() {
    let _ = Config::new().top_k(0);
}

#[test]
fn top_k_one_valid() {
    let config = Config::new().top_k(1);
    assert_eq!(config.top_k, 1);
}

// =============================================================================
// PRESET CONFIGURATIONS
// =============================================================================

#[test]
fn preset_default_is_valid() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn preset_strict_is_valid_and_tighter() {
    let strict = Config::strict();
    assert!(strict.validate().is_ok());
    let default = Config::default();
    assert!(strict.gate_accept_threshold >= default.gate_accept_threshold);
    assert!(strict.uncertain_min_confidence >= default.uncertain_min_confidence);
    assert!(strict.uncertain_max_entropy <= default.uncertain_max_entropy);
}

#[test]
fn preset_lenient_is_valid_and_looser() {
    let lenient = Config::lenient();
    assert!(lenient.validate().is_ok());
    let default = Config::default();
    assert!(lenient.gate_accept_threshold <= default.gate_accept_threshold);
    assert!(lenient.uncertain_max_entropy >= default.uncertain_max_entropy);
}

#[test]
fn presets_keep_the_threshold_order_convention() {
    for config in [Config::default(), Config::strict(), Config::lenient()] {
        assert!(config.gate_reject_threshold >= config.gate_accept_threshold);
    }
}

// =============================================================================
// BUILDER CHAINING
// =============================================================================

#[test]
fn builder_chaining_all_valid() {
    let config = Config::new()
        .gate_accept_threshold(0.65)
        .gate_reject_threshold(0.85)
        .uncertain_min_confidence(0.70)
        .uncertain_max_entropy(1.75)
        .top_k(3);

    assert_eq!(config.gate_accept_threshold, 0.65);
    assert_eq!(config.gate_reject_threshold, 0.85);
    assert_eq!(config.uncertain_min_confidence, 0.70);
    assert_eq!(config.uncertain_max_entropy, 1.75);
    assert_eq!(config.top_k, 3);
}

#[test]
fn builder_override_preset() {
    let config = Config::strict().top_k(10);
    assert_eq!(config.top_k, 10);
    // Other strict settings preserved
    assert_eq!(config.gate_accept_threshold, 0.80);
}

// =============================================================================
// ENVIRONMENT VARIABLE OVERRIDES
// =============================================================================

mod env_tests {
    use super::*;
    use std::env;

    // Helper to run a test with an env var set, then clean up
    fn with_env_var<F: FnOnce()>(key: &str, value: &str, test: F) {
        env::set_var(key, value);
        test();
        env::remove_var(key);
    }

    #[test]
    fn from_env_accept_threshold_valid() {
        with_env_var("DERMGATE_GATE_ACCEPT", "0.72", || {
            let config = Config::new().from_env();
            assert_eq!(config.gate_accept_threshold, 0.72);
        });
    }

    #[test]
    fn from_env_top_k_valid() {
        with_env_var("DERMGATE_TOP_K", "7", || {
            let config = Config::new().from_env();
            assert_eq!(config.top_k, 7);
        });
    }

    #[test]
    fn from_env_malformed_value_ignored() {
        with_env_var("DERMGATE_MAX_ENTROPY", "not_a_number", || {
            let config = Config::new().from_env();
            assert_eq!(config.uncertain_max_entropy, 2.50);
        });
    }

    #[test]
    fn from_env_out_of_range_value_ignored() {
        with_env_var("DERMGATE_MIN_CONFIDENCE", "1.8", || {
            let config = Config::new().from_env();
            assert_eq!(config.uncertain_min_confidence, 0.65);
        });
    }

    #[test]
    fn from_env_missing_uses_defaults() {
        env::remove_var("DERMGATE_GATE_REJECT");
        let config = Config::new().from_env();
        assert_eq!(config.gate_reject_threshold, 0.80);
    }
}
