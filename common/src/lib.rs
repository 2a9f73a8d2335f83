pub mod config;
pub mod yaml_include;

/// Common utilities shared across the order sync workspace
///
/// This crate provides functionality used by both the generic `processing`
/// engine and the `shopping` domain crate:
///
/// - YAML configuration loading and validation
/// - `!include` resolution for layered config files (used at build time)
/// - Shared test utilities behind the `test-helpers` feature

// Test helpers module - available for both development and test builds
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{generate_unique_id, get_test_database_url};
