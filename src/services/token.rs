//! Access token issuing and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::Config;
use crate::domain::{Account, AccountInfo, AccountRole};
use crate::errors::AppResult;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub role: AccountRole,
    pub iat: i64,
    pub exp: i64,
}

/// Outer envelope around a signed token
#[derive(Debug, Serialize, Deserialize)]
struct Wrapped {
    text: String,
}

/// Token returned by the refresh endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Access token for the `Authorization: Bearer` header
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

/// Token plus the public account info, returned by login and register
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountInfo,
}

/// HS256 token issuer.
///
/// With wrapping enabled the signed token is itself carried as the `text`
/// claim of a second HS256 token. Verification accepts both forms.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiration_minutes: i64,
    wrapping: bool,
}

impl TokenIssuer {
    pub fn new(config: &Config) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret_bytes()),
            expiration_minutes: config.jwt_expiration_minutes,
            wrapping: config.token_wrapping,
        }
    }

    pub fn issue(&self, account: &Account) -> AppResult<String> {
        self.issue_at(account, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, account: &Account, now: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims {
            sub: account.id,
            role: account.role,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.expiration_minutes)).timestamp(),
        };
        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, &claims, &self.encoding)?;

        if !self.wrapping {
            return Ok(token);
        }
        Ok(encode(&header, &Wrapped { text: token }, &self.encoding)?)
    }

    /// Check the signature and expiry and return the claims.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let inner = self.unwrap(token).unwrap_or_else(|| token.to_string());
        let data = decode::<Claims>(&inner, &self.decoding, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }

    /// The inner token when `token` is a validly signed envelope.
    fn unwrap(&self, token: &str) -> Option<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        decode::<Wrapped>(token, &self.decoding, &validation)
            .ok()
            .map(|data| data.claims.text)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("expiration_minutes", &self.expiration_minutes)
            .field("wrapping", &self.wrapping)
            .finish_non_exhaustive()
    }
}
