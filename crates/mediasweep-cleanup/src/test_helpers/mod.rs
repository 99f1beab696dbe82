//! Test helpers for cleanup unit tests
//!
//! This module provides an in-memory Storage that records every call, so
//! managers can be tested without a real backend.

pub mod mock_storage;

pub use mock_storage::*;
