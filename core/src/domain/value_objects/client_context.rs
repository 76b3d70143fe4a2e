//! Client metadata captured when a credential is issued.

use serde::{Deserialize, Serialize};

/// Request metadata recorded on token records for auditing
///
/// Both fields are optional and have no behavioral effect; they exist so
/// that "where is this session signed in" views can show something useful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContext {
    /// Client IP address
    pub ip: Option<String>,

    /// Client user agent string
    pub user_agent: Option<String>,
}

impl ClientContext {
    /// Creates a new client context
    pub fn new(ip: Option<String>, user_agent: Option<String>) -> Self {
        Self { ip, user_agent }
    }
}
