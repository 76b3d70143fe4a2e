//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the StoryQuest
//! session token service. It provides the MySQL-backed implementation of
//! the core `TokenRepository` trait together with connection-pool
//! management and environment-driven configuration.
//!
//! The host application builds a [`database::DatabasePool`], wraps its
//! SQLx pool in a [`database::MySqlTokenRepository`], and hands that to
//! the rotation service from `sq_core`.

// Re-export core error types for convenience
pub use sq_core::errors::{DomainError, DomainResult, ErrorResponse, TokenError};

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Configuration module for infrastructure services
pub mod config {
    //! Configuration management for infrastructure services
    //!
    //! Settings are read from the environment, with `.env` files honored
    //! in development.

    /// Database configuration settings
    #[derive(Debug, Clone)]
    pub struct DatabaseConfig {
        /// MySQL connection URL
        pub url: String,
        /// Maximum number of pooled connections
        pub max_connections: u32,
        /// Connection acquire timeout in seconds
        pub connect_timeout: u64,
    }

    impl Default for DatabaseConfig {
        fn default() -> Self {
            Self {
                url: "mysql://localhost:3306/storyquest".to_string(),
                max_connections: 10,
                connect_timeout: 30,
            }
        }
    }

    impl DatabaseConfig {
        /// Load database configuration from the environment
        ///
        /// Reads `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`, and
        /// `DATABASE_CONNECT_TIMEOUT`; unset or unparseable values fall
        /// back to the defaults.
        pub fn from_env() -> Self {
            dotenvy::dotenv().ok();

            let defaults = Self::default();

            Self {
                url: std::env::var("DATABASE_URL").unwrap_or(defaults.url),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_connections),
                connect_timeout: std::env::var("DATABASE_CONNECT_TIMEOUT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.connect_timeout),
            }
        }
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
