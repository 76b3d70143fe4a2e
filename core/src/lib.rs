//! # StoryQuest Session Token Core
//!
//! Core business logic and domain layer for the StoryQuest refresh token
//! service. This crate contains the token entities, the rotation and
//! revocation services, repository interfaces, and error types that the
//! auth endpoints of the backend build on.
//!
//! The crate is storage-agnostic: persistence goes through the
//! [`repositories::TokenRepository`] trait, implemented against MySQL in
//! the `sq_infra` crate and against an in-memory store for tests.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::token::{RefreshToken, REFRESH_TOKEN_EXPIRY_DAYS};
pub use domain::value_objects::{ClientContext, Credential, IssuedCredential};
pub use errors::{DomainError, DomainResult, ErrorResponse, TokenError};
pub use repositories::TokenRepository;
pub use services::token::{
    BcryptCredentialHasher, CredentialHasher, RotationConfig, RotationService,
    TokenCleanupConfig, TokenCleanupService,
};
