//! Advisory authentication context.
//!
//! The bearer token is decoded locally only to decide which actions to
//! offer. Its signature is not checked here; the API is the authorization
//! boundary and rejects anything the token does not actually allow.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::Timestamp;

/// Who the caller is, as far as the client can tell.
///
/// Passed explicitly to anything that gates actions on identity.
pub trait AuthContext: Send + Sync {
    /// Account id (the token's `nameid` claim).
    fn current_user_id(&self) -> Option<&str>;

    fn current_role(&self) -> Option<Role>;

    fn is_authenticated(&self) -> bool {
        self.current_user_id().is_some()
    }

    /// Raw bearer token to attach to requests.
    fn bearer_token(&self) -> Option<&str> {
        None
    }
}

/// No one is logged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousContext;

impl AuthContext for AnonymousContext {
    fn current_user_id(&self) -> Option<&str> {
        None
    }

    fn current_role(&self) -> Option<Role> {
        None
    }
}

/// The `role` claim is a single name or, for multi-role accounts, a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RoleClaim {
    One(String),
    Many(Vec<String>),
}

/// Claims read from the bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Account id.
    pub nameid: String,
    #[serde(default)]
    pub role: Option<RoleClaim>,
    #[serde(default)]
    pub unique_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// First recognised role in the claim.
    pub fn role(&self) -> Option<Role> {
        match self.role.as_ref()? {
            RoleClaim::One(name) => name.parse().ok(),
            RoleClaim::Many(names) => names.iter().find_map(|n| n.parse().ok()),
        }
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.exp.is_some_and(|exp| exp <= now.timestamp())
    }
}

/// Context backed by a bearer token.
#[derive(Debug, Clone)]
pub struct TokenAuthContext {
    token: String,
    claims: TokenClaims,
    role: Option<Role>,
}

impl TokenAuthContext {
    /// Decode `token` without verifying its signature.
    pub fn from_token(token: impl Into<String>) -> Result<Self, CoreError> {
        let token = token.into();
        let claims = decode_claims(&token)?;
        let role = claims.role();
        Ok(Self {
            token,
            claims,
            role,
        })
    }

    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl AuthContext for TokenAuthContext {
    fn current_user_id(&self) -> Option<&str> {
        Some(self.claims.nameid.as_str()).filter(|id| !id.is_empty())
    }

    fn current_role(&self) -> Option<Role> {
        self.role
    }

    fn is_authenticated(&self) -> bool {
        self.current_user_id().is_some() && !self.claims.is_expired_at(chrono::Utc::now())
    }

    fn bearer_token(&self) -> Option<&str> {
        Some(&self.token)
    }
}

/// Read the claims of a JWT without checking signature, expiry, or audience.
pub fn decode_claims(token: &str) -> Result<TokenClaims, CoreError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| CoreError::Unauthorized(format!("Invalid token: {e}")))
}
