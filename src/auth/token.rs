use crate::{config::Config, error::AppError, models::UserRow};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Signs and verifies HS256 tokens with a shared secret.
///
/// Built once from `Config` and shared with handlers and `AuthMiddleware` as app data.
/// Verification checks the signature and `exp` only; there is no issuer or audience.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, Duration::minutes(config.token_ttl_minutes))
    }

    /// Issues a token for `user`, valid from now for the configured lifetime.
    pub fn issue(&self, user: &UserRow) -> Result<String, AppError> {
        self.issue_at(user, Utc::now())
    }

    /// Issues a token as if it were `issued_at`.
    pub fn issue_at(&self, user: &UserRow, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies the signature and expiry of `token` and returns its claims.
    ///
    /// Returns `AppError::Unauthorized` if the token is malformed, its signature does not
    /// match, or it has expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserRow {
        UserRow {
            id: 1,
            name: "Alice Johnson".to_string(),
            email: Some("alice@example.com".to_string()),
        }
    }

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret, Duration::hours(1))
    }

    #[test]
    fn test_token_issue_and_verify() {
        let tokens = service("test_secret_for_issue_verify");
        let token = tokens.issue(&alice()).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, 1);
        assert_eq!(claims.name, "Alice Johnson");
        assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_without_email() {
        let tokens = service("test_secret_without_email");
        let user = UserRow {
            email: None,
            ..alice()
        };
        let claims = tokens.verify(&tokens.issue(&user).unwrap()).unwrap();
        assert_eq!(claims.email, None);
    }

    #[test]
    fn test_token_expiration() {
        let tokens = service("test_secret_for_expiration");
        let two_hours_ago = Utc::now() - Duration::hours(2);
        let expired_token = tokens.issue_at(&alice(), two_hours_ago).unwrap();

        match tokens.verify(&expired_token) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("ExpiredSignature")),
            Ok(_) => panic!("Token should have been invalid due to expiration"),
            Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
        }
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = service("the_signing_secret").issue(&alice()).unwrap();

        match service("a_completely_different_secret").verify(&token) {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("InvalidSignature")),
            Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
            Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
        }
    }

    #[test]
    fn test_malformed_token() {
        let result = service("any_secret").verify("not.a.token");
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_ttl_comes_from_config() {
        let config = Config {
            token_ttl_minutes: 5,
            ..Config::default()
        };
        let tokens = TokenService::from_config(&config);
        let claims = tokens.verify(&tokens.issue(&alice()).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 300);
    }
}
