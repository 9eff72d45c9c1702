//! Evaluation layers sitting between raw model output and the decision
//! policy.
//!
//! 1. **Gate evaluation** ([`gate`]): dual-threshold mapping of the validity
//!    model's top prediction to an accept/reject/uncertain verdict
//! 2. **Disease evaluation** ([`disease`]): top-1/top-k ranking and Shannon
//!    entropy over the disease model's probability distribution
//!
//! Both layers are pure functions of a [`RawPrediction`](crate::engine::RawPrediction)
//! plus configuration; neither touches an engine directly.

mod disease;
mod gate;

pub use disease::{evaluate_disease, shannon_entropy_nats, DiseaseError};
pub use gate::evaluate_gate;
