//! MySQL-specific database implementations
//!
//! This module contains the MySQL implementation of the token repository
//! trait using SQLx for database operations.

pub mod token_repository_impl;

// Re-export the MySQL implementation
pub use token_repository_impl::MySqlTokenRepository;
