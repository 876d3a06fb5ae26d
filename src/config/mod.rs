//! Configuration types for the UAA client.
//!
//! This module provides configuration options for:
//! - [`TokenConfig`]: token endpoint paths and expiry margin
//! - [`TlsConfig`]: TLS/SSL settings

mod tls;
mod token;

pub use tls::TlsConfig;
pub use token::TokenConfig;
