//! Cache-through coverage service.
//!
//! [`CoverageService`] fingerprints a [`CoverageConfig`](crate::coverage::CoverageConfig)
//! into a cache key, serves cached coverage when present and otherwise
//! generates, stores and returns it.

mod error;
mod facade;

pub use error::ServiceError;
pub use facade::{fingerprint, CoverageResponse, CoverageService, FINGERPRINT_PREFIX};
