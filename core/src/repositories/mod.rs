//! Repository interfaces for persistence operations.

pub mod token;

pub use token::TokenRepository;

#[cfg(test)]
pub use token::MockTokenRepository;
