//! Mock implementations for testing
//!
//! This module re-exports mock implementations from their respective modules
//! for convenient access in tests.

// Re-export HTTP mocks
pub use crate::igdb::http::mock::{MockHttpClient, RecordedRequest};

// Re-export clock mocks
pub use crate::time::MockClock;
