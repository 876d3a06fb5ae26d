//! Integration tests for the UAA Rust client.
//!
//! These tests run the public API against a fake UAA server built with
//! wiremock; no external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # With request logging
//! RUST_LOG=uaa=debug cargo test --test integration -- --nocapture
//! ```

mod common;
mod filter_tests;
mod scim_tests;
mod token_tests;
