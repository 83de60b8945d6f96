//! Food safety rules
//!
//! Temperature classification, method validation, training expiry and
//! delivery acceptance. Pure functions over the shared models; the stores
//! persist whatever these return.

pub mod delivery;
pub mod methods;
pub mod thresholds;
pub mod training;

pub use delivery::{DeliveryAssessment, assess_delivery};
pub use methods::{progress_label, record_batch};
pub use thresholds::{classify, classify_celsius, describe, worst};
