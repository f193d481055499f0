//! JWT bearer tokens.
//!
//! Tokens are signed with HS256 and carry the user id in `sub`. Every
//! issued token gets a fresh `jti`, so two logins never yield the same token.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cookbook_core::ports::{AuthError, TokenClaims, TokenService};

pub const DEFAULT_ISSUER: &str = "cookbook-api";

/// Longest token lifetime accepted from configuration (one year).
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    roles: Vec<String>,
    exp: i64,
    iat: i64,
    iss: String,
    jti: String,
}

/// HS256 token service.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(
        &self,
        user_id: Uuid,
        email: &str,
        roles: Vec<String>,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = TimeDelta::try_hours(self.config.expiration_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AuthError::InvalidToken(format!(
                    "token lifetime out of range: {} hours",
                    self.config.expiration_hours
                ))
            })?;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            roles,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(TokenClaims {
            user_id,
            email: data.claims.email,
            roles: data.claims.roles,
            exp: data.claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours.saturating_mul(3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(issuer: &str) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: 1,
            issuer: issuer.to_string(),
        })
    }

    #[test]
    fn test_token_roundtrip_carries_user() {
        let service = service(DEFAULT_ISSUER);
        let user_id = Uuid::now_v7();

        let token = service
            .generate_token(user_id, "cook@example.com", vec!["superuser".to_string()])
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "cook@example.com");
        assert_eq!(claims.roles, vec!["superuser".to_string()]);
    }

    #[test]
    fn test_each_login_gets_a_distinct_token() {
        let service = service(DEFAULT_ISSUER);
        let user_id = Uuid::now_v7();

        let first = service.generate_token(user_id, "a@b.com", vec![]).unwrap();
        let second = service.generate_token(user_id, "a@b.com", vec![]).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let result = service(DEFAULT_ISSUER).validate_token("not-a-token");

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_foreign_issuer_is_rejected() {
        let token = service("someone-else")
            .generate_token(Uuid::now_v7(), "a@b.com", vec![])
            .unwrap();

        assert!(service(DEFAULT_ISSUER).validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = JwtTokenService::new(JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: -2,
            issuer: DEFAULT_ISSUER.to_string(),
        });
        let token = service.generate_token(Uuid::now_v7(), "a@b.com", vec![]).unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        let service = JwtTokenService::new(JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: i64::MAX,
            issuer: DEFAULT_ISSUER.to_string(),
        });

        let result = service.generate_token(Uuid::now_v7(), "a@b.com", vec![]);

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
        assert_eq!(service.expiration_seconds(), i64::MAX);
    }

    #[test]
    fn test_expiration_seconds() {
        assert_eq!(service(DEFAULT_ISSUER).expiration_seconds(), 3600);
    }
}
