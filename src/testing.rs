//! Deterministic mock engines for tests.
//!
//! The decision policy's observable contract includes *whether* an engine
//! was invoked (a rejected image must never reach the disease model), so
//! the mock counts its calls. Clone a [`MockEngine`] before boxing it into
//! the builder and keep the clone to inspect the count afterwards; clones
//! share state.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::RgbImage;

use crate::engine::{InferenceEngine, InferenceError, RawPrediction};

#[derive(Debug)]
enum Behavior {
    Respond(RawPrediction),
    Fail(String),
    Panic(String),
}

#[derive(Debug)]
struct Inner {
    behavior: Behavior,
    names: BTreeMap<usize, String>,
    calls: AtomicUsize,
}

/// Scripted inference engine with an invocation counter.
#[derive(Debug, Clone)]
pub struct MockEngine {
    inner: Arc<Inner>,
}

impl MockEngine {
    /// An engine that returns the same prediction on every call.
    pub fn returning(prediction: RawPrediction) -> Self {
        Self::with_behavior(Behavior::Respond(prediction))
    }

    /// An engine that returns a prediction built from a probability vector.
    pub fn with_probabilities(probabilities: Vec<f64>) -> Self {
        Self::returning(RawPrediction::from_probabilities(probabilities))
    }

    /// An engine whose every call reports no probability output.
    pub fn without_probabilities() -> Self {
        Self::returning(RawPrediction::empty())
    }

    /// An engine whose every call fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(message.into()))
    }

    /// An engine whose every call panics with the given message.
    ///
    /// Used to verify the classify boundary contains faults from engine
    /// implementations.
    pub fn panicking(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Panic(message.into()))
    }

    /// Attach an index-to-name class mapping.
    pub fn with_names(self, names: &[(usize, &str)]) -> Self {
        let names = names
            .iter()
            .map(|&(i, name)| (i, name.to_string()))
            .collect();
        let inner = Inner {
            behavior: clone_behavior(&self.inner.behavior),
            names,
            calls: AtomicUsize::new(self.inner.calls.load(Ordering::SeqCst)),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Number of `predict` calls observed so far.
    pub fn call_count(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            inner: Arc::new(Inner {
                behavior,
                names: BTreeMap::new(),
                calls: AtomicUsize::new(0),
            }),
        }
    }
}

fn clone_behavior(behavior: &Behavior) -> Behavior {
    match behavior {
        Behavior::Respond(p) => Behavior::Respond(p.clone()),
        Behavior::Fail(m) => Behavior::Fail(m.clone()),
        Behavior::Panic(m) => Behavior::Panic(m.clone()),
    }
}

impl InferenceEngine for MockEngine {
    fn predict(&self, _image: &RgbImage) -> Result<RawPrediction, InferenceError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        match &self.inner.behavior {
            Behavior::Respond(prediction) => Ok(prediction.clone()),
            Behavior::Fail(message) => Err(InferenceError::new(message.clone())),
            Behavior::Panic(message) => panic!("{}", message),
        }
    }

    fn class_names(&self) -> BTreeMap<usize, String> {
        self.inner.names.clone()
    }
}

/// A tiny solid-color RGB image for driving the pipeline in tests.
pub fn test_image() -> image::DynamicImage {
    image::DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, image::Rgb([180, 140, 120])))
}
