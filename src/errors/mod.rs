//! # Error Handling
//!
//! Error types for the secretgate gateway using `thiserror`.

mod types;

pub use types::{ErrorClass, GatewayError, Result};
