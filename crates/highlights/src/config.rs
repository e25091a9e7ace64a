//! Credential loading for the Readwise API
//!
//! The access token comes from the READWISE_TOKEN environment variable.
//! A missing token is a fatal configuration error, raised before any
//! network call is attempted.

use anyhow::{Context, Result};

/// Environment variable holding the Readwise access token
const TOKEN_ENV_VAR: &str = "READWISE_TOKEN";

/// Access credential for the Readwise API
#[derive(Debug, Clone)]
pub struct ReadwiseCredentials {
    pub token: String,
}

impl ReadwiseCredentials {
    /// Create credentials from a token string
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Load the access token from the environment
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV_VAR)
            .with_context(|| format!("{} environment variable not set", TOKEN_ENV_VAR))?;
        if token.trim().is_empty() {
            anyhow::bail!("{} environment variable is empty", TOKEN_ENV_VAR);
        }
        Ok(Self { token })
    }

    /// Check if a token is available without failing
    pub fn is_available() -> bool {
        std::env::var(TOKEN_ENV_VAR).is_ok_and(|t| !t.trim().is_empty())
    }
}
