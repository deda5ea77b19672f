//! JWT token service
//!
//! Issues and validates HS256 access tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared::models::{User, UserRole};

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HMAC secret (at least 32 bytes outside development)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiration_minutes: 720,
            issuer: "ops-server".to_string(),
            audience: "ops-dashboard".to_string(),
        }
    }
}

/// Claims carried in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub username: String,
    /// `admin` or `store`
    pub role: String,
    /// Home store for store accounts
    pub store_id: Option<i64>,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),

    #[error("malformed claims: {0}")]
    MalformedClaims(String),
}

/// JWT token service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a token for `user`; returns the token and its expiry (Unix seconds)
    pub fn generate_token(&self, user: &User) -> Result<(String, i64), JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.as_str().to_string(),
            store_id: user.store_id,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))?;
        Ok((token, claims.exp))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// Authenticated caller, built from validated claims
///
/// Inserted into request extensions by [`require_auth`](super::require_auth).
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
    pub store_id: Option<i64>,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse()
            .map_err(|_| JwtError::MalformedClaims(format!("sub '{}'", claims.sub)))?;
        let role = claims.role.parse().map_err(JwtError::MalformedClaims)?;
        if role == UserRole::Store && claims.store_id.is_none() {
            return Err(JwtError::MalformedClaims("store account without store_id".into()));
        }
        Ok(Self {
            id,
            username: claims.username,
            role,
            store_id: claims.store_id,
        })
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admins reach every store; store accounts only their own
    pub fn can_access_store(&self, store_id: i64) -> bool {
        self.is_admin() || self.store_id == Some(store_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-with-at-least-32-characters!".into(),
            ..JwtConfig::default()
        })
    }

    fn user(role: UserRole, store_id: Option<i64>) -> User {
        User {
            id: 7,
            username: "3201010101900123".into(),
            password_hash: String::new(),
            display_name: "Sari".into(),
            role,
            store_id,
            employee_id: None,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_generate_and_validate() {
        let service = service();
        let (token, exp) = service.generate_token(&user(UserRole::Store, Some(3))).unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.role, "store");
        assert_eq!(claims.store_id, Some(3));
        assert_eq!(claims.exp, exp);

        let current = CurrentUser::try_from(claims).unwrap();
        assert!(current.can_access_store(3));
        assert!(!current.can_access_store(4));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (token, _) = service().generate_token(&user(UserRole::Admin, None)).unwrap();
        let other = JwtService::with_config(JwtConfig {
            secret: "another-secret-with-at-least-32-chars!!".into(),
            ..JwtConfig::default()
        });
        assert!(matches!(other.validate_token(&token), Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_admin_reaches_all_stores() {
        let service = service();
        let (token, _) = service.generate_token(&user(UserRole::Admin, None)).unwrap();
        let current = CurrentUser::try_from(service.validate_token(&token).unwrap()).unwrap();
        assert!(current.is_admin());
        assert!(current.can_access_store(99));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
