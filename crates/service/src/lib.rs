//! Service layer: user persistence and the workflows built on it.
//! - `storage` holds the interchangeable backends and the `UserStore` façade.
//! - `user_service` implements id assignment and registration.
//! - `metrics` exposes Prometheus counters for store operations.

pub mod errors;
pub mod metrics;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod user_service;

pub use models::user::{Model as User, NewUser};
