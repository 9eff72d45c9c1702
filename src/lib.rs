//! # dermgate
//!
//! Two-stage gated skin-image classification.
//!
//! A validity "gate" model first decides whether an image plausibly shows
//! human skin; only then does a disease classifier produce a labeled
//! confidence ranking. The crate's core is the decision policy combining
//! the two model outputs under configurable thresholds:
//!
//! - A confident non-skin gate verdict rejects immediately; the disease
//!   model is never run for such input.
//! - An uncertain gate verdict still gets a diagnosis attempt, but under a
//!   stricter policy: the result is rejected unless the disease model is
//!   both confident (top-1 above a floor) and low-entropy (distribution
//!   below a ceiling).
//!
//! Model execution itself is abstract: implement [`InferenceEngine`] for
//! whatever runtime hosts your weights and hand two instances to the
//! builder.
//!
//! ## Quick Start
//!
//! ```ignore
//! use dermgate::{Config, GatedClassifier};
//!
//! let classifier = GatedClassifier::builder()
//!     .gate_engine(Box::new(gate_model))
//!     .disease_engine(Box::new(disease_model))
//!     .disease_label_file("models/disease_labels.txt")
//!     .config(Config::default())
//!     .build()?;
//!
//! let response = classifier.classify(&image);
//! println!("{}", dermgate::output::to_json(&response)?);
//! ```
//!
//! One built classifier is immutable and safe to share across threads;
//! every call derives its whole result from the image passed in.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod classifier;
mod config;
mod constants;
mod engine;
mod labels;
mod result;

// Functional modules
pub mod analysis;
pub mod output;
pub mod testing;

// Re-exports for the public API
pub use classifier::{BuildError, GatedClassifier, GatedClassifierBuilder};
pub use config::Config;
pub use constants::{NONHUMAN_LABEL, UNKNOWN_LABEL, VALID_SKIN_LABEL};
pub use engine::{BoxedEngine, InferenceEngine, InferenceError, RawPrediction};
pub use labels::{load_label_file, resolve_labels, synthetic_labels, LabelError};
pub use result::{
    ClassScore, ClassifyError, ClassifyResponse, DecisionDiagnostics, DiseaseResult,
    FinalDecision, GateAssessment, GateDiagnostics, GateReason, GateVerdict, RejectReason,
};

// Re-export the image types appearing in the public API
pub use image::{DynamicImage, RgbImage};
