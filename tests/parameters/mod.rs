//! Integration tests for the parameter system
//!
//! These tests verify that the parameter system behaves correctly in various scenarios.

// Tests for the Parameter struct and converters
mod parameter_tests;

// Tests for merging declarations along the ancestor chain
mod resolution_tests;


// Tests for the global class registry
mod registry_tests;
