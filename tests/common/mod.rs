//! Integration test common infrastructure.
//!
//! Provides a scriptable host that records every capability call in order,
//! so tests can assert on the bootstrap sequence.

pub mod host;

#[allow(unused_imports)]
pub use host::{CallLog, RecordingHost};
