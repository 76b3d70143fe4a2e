//! Opaque credential value object handed to and accepted from callers.

use std::fmt;
use std::str::FromStr;

use crate::errors::TokenError;

/// Delimiter between the record id and the secret in the wire format
const DELIMITER: char = '.';

/// Parsed form of the opaque `"<id>.<secret>"` credential string
///
/// The id portion is the token record's handle rendered as decimal text;
/// the secret portion is the URL-safe encoded random value. The credential
/// is handed to callers verbatim and is never persisted in this form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Token record handle
    pub token_id: i64,

    /// Raw single-use secret
    pub secret: String,
}

impl Credential {
    /// Creates a credential from a record id and its raw secret
    pub fn new(token_id: i64, secret: impl Into<String>) -> Self {
        Self {
            token_id,
            secret: secret.into(),
        }
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.token_id, DELIMITER, self.secret)
    }
}

impl FromStr for Credential {
    type Err = TokenError;

    /// Splits a presented credential on the first delimiter
    ///
    /// The id portion must parse as a non-negative decimal integer and the
    /// secret portion must be non-empty; anything else is a format error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id_part, secret) = s.split_once(DELIMITER).ok_or(TokenError::InvalidTokenFormat)?;

        let token_id: i64 = id_part
            .parse()
            .map_err(|_| TokenError::InvalidTokenFormat)?;

        if token_id < 0 || secret.is_empty() {
            return Err(TokenError::InvalidTokenFormat);
        }

        Ok(Self {
            token_id,
            secret: secret.to_string(),
        })
    }
}
