// ABOUTME: JWT issuance and validation plus password hashing for both principal kinds
// ABOUTME: HS256 against a process-wide secret injected at construction; 24h admin / 7d user expiry
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Authentication
//!
//! Token issuance and verification for the two principal kinds. The signing
//! secret is process-wide configuration handed to [`AuthManager::new`] once at
//! startup; nothing here reads the environment. Tokens are self-contained
//! claim sets and are never persisted.

use crate::errors::{AppError, AppResult};
use crate::models::PrincipalKind;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Admin tokens expire 24 hours after issuance
pub const ADMIN_TOKEN_EXPIRY_HOURS: i64 = 24;
/// User tokens expire 7 days after issuance
pub const USER_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Minimum accepted length for new passwords
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// JWT claim set carried by every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Principal id
    pub sub: String,
    /// Principal role within its collection
    pub role: String,
    /// Which principal collection the token belongs to
    #[serde(rename = "type")]
    pub kind: PrincipalKind,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature is invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => {
                write!(
                    f,
                    "JWT token expired at {}",
                    expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                )
            }
            Self::TokenInvalid { reason } => {
                write!(f, "JWT token signature is invalid: {reason}")
            }
            Self::TokenMalformed { details } => {
                write!(f, "JWT token is malformed: {details}")
            }
        }
    }
}

impl std::error::Error for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(err: JwtValidationError) -> Self {
        match err {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            JwtValidationError::TokenInvalid { reason } => Self::auth_invalid(reason),
            JwtValidationError::TokenMalformed { details } => Self::auth_invalid(details),
        }
    }
}

/// Authentication manager for token issuance and validation
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthManager {
    /// Create a new authentication manager from the process-wide signing secret
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Expiry window for a principal kind
    #[must_use]
    pub fn expiry_for(kind: PrincipalKind) -> Duration {
        match kind {
            PrincipalKind::Admin => Duration::hours(ADMIN_TOKEN_EXPIRY_HOURS),
            PrincipalKind::User => Duration::days(USER_TOKEN_EXPIRY_DAYS),
        }
    }

    /// Issue a signed token for a principal
    ///
    /// Pure function of its inputs, the signing secret, and the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails.
    pub fn issue(
        &self,
        principal_id: uuid::Uuid,
        role: &str,
        kind: PrincipalKind,
    ) -> AppResult<String> {
        let now = Utc::now();
        let expiry = now + Self::expiry_for(kind);

        let claims = Claims {
            sub: principal_id.to_string(),
            role: role.to_owned(),
            kind,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Validate signature and expiry and return the claim set
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] distinguishing expired, invalid and
    /// malformed tokens.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(Self::convert_jwt_error(&e, token)),
        }
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(
        e: &jsonwebtoken::errors::Error,
        token: &str,
    ) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => {
                // Re-decode without expiry validation to recover the timestamp
                let expired_at = decode_expiry_unchecked(token).unwrap_or_else(Utc::now);
                tracing::warn!("JWT token expired at {}", expired_at.to_rfc3339());
                JwtValidationError::TokenExpired { expired_at }
            }
            ErrorKind::InvalidSignature => {
                tracing::warn!("JWT token signature verification failed");
                JwtValidationError::TokenInvalid {
                    reason: "Token signature verification failed".into(),
                }
            }
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }
}

/// Best-effort expiry extraction from a token that failed expiry validation
fn decode_expiry_unchecked(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.insecure_disable_signature_validation();

    let empty_key = DecodingKey::from_secret(&[]);
    decode::<Claims>(token, &empty_key, &validation)
        .ok()
        .and_then(|data| DateTime::from_timestamp(data.claims.exp, 0))
}

/// Hash a plaintext password with bcrypt at the fixed work factor
///
/// # Errors
///
/// Returns an error if bcrypt hashing fails.
pub fn hash_password(plain: &str) -> AppResult<String> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Verify a plaintext password against a stored hash
///
/// Bcrypt verification is CPU-bound, so it runs on the blocking thread pool
/// rather than stalling the async executor.
///
/// # Errors
///
/// Returns an error if the blocking task or bcrypt verification fails.
pub async fn verify_password(plain: &str, hash: &str) -> AppResult<bool> {
    let plain = plain.to_owned();
    let hash = hash.to_owned();

    tokio::task::spawn_blocking(move || bcrypt::verify(&plain, &hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password verification error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn manager() -> AuthManager {
        AuthManager::new(b"test-secret-key-for-unit-tests")
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let auth = manager();
        let id = Uuid::new_v4();

        let token = auth.issue(id, "admin", PrincipalKind::Admin).unwrap();
        let claims = auth.validate(&token).unwrap();

        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.kind, PrincipalKind::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expiry_windows_by_kind() {
        assert_eq!(
            AuthManager::expiry_for(PrincipalKind::Admin),
            Duration::hours(24)
        );
        assert_eq!(
            AuthManager::expiry_for(PrincipalKind::User),
            Duration::days(7)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let auth = manager();
        let other = AuthManager::new(b"a-different-secret-entirely");

        let token = auth
            .issue(Uuid::new_v4(), "user", PrincipalKind::User)
            .unwrap();

        match other.validate(&token) {
            Err(JwtValidationError::TokenInvalid { .. }) => {}
            other => panic!("expected TokenInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let auth = manager();
        match auth.validate("not.a.jwt") {
            Err(JwtValidationError::TokenMalformed { .. })
            | Err(JwtValidationError::TokenInvalid { .. }) => {}
            other => panic!("expected malformed/invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_expired_token_reports_expired_specifically() {
        let auth = manager();

        // Hand-craft an already expired claim set
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: "user".into(),
            kind: PrincipalKind::User,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key-for-unit-tests"),
        )
        .unwrap();

        match auth.validate(&token) {
            Err(JwtValidationError::TokenExpired { expired_at }) => {
                assert!(expired_at <= now);
            }
            other => panic!("expected TokenExpired, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_password_hash_and_verify() {
        let hash = hash_password("secret1").unwrap();
        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1", &hash).await.unwrap());
        assert!(!verify_password("wrong", &hash).await.unwrap());
    }
}
