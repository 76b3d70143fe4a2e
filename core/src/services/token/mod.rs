//! Token rotation service module
//!
//! This module handles the refresh credential lifecycle:
//! - Issuing new credential families at login
//! - Rotating a live credential for its successor
//! - Reuse detection and family-wide revocation
//! - Background cleanup of terminal records

mod cleanup;
mod config;
mod hasher;
mod secret;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{TokenCleanupConfig, TokenCleanupService};
pub use config::RotationConfig;
pub use hasher::{BcryptCredentialHasher, CredentialHasher};
pub use secret::{generate_secret, SECRET_BYTES};
pub use service::RotationService;
