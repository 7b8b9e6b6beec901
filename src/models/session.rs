//! Session claims supplied by the identity collaborator
//!
//! Credential verification (login, password, refresh) lives outside
//! this service; callers arrive with a signed JWT whose claims are
//! decoded here and trusted as-is.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Who the session represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    /// Agent handling advertisements (the bookable party)
    Agent,
    /// Account browsing the marketplace (the requesting party)
    Account,
}

impl std::fmt::Display for SessionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionRole::Agent => write!(f, "agent"),
            SessionRole::Account => write!(f, "account"),
        }
    }
}

/// JWT claims for an authenticated session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    /// Agent or account id, depending on `role`
    pub subject_id: i32,
    pub role: SessionRole,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Require an agent session; returns the agent id
    pub fn require_agent(&self) -> Result<i32, AppError> {
        match self.role {
            SessionRole::Agent => Ok(self.subject_id),
            _ => Err(AppError::Forbidden(
                "Agent session required".to_string(),
            )),
        }
    }

    /// Require an account session; returns the account id
    pub fn require_account(&self) -> Result<i32, AppError> {
        match self.role {
            SessionRole::Account => Ok(self.subject_id),
            _ => Err(AppError::Forbidden(
                "Account session required".to_string(),
            )),
        }
    }
}
