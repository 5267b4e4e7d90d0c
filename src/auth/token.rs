// JWT token generation and validation service

use crate::auth::error::AuthError;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub iat: i64,    // issued at timestamp
    pub exp: i64,    // expiration timestamp
}

/// Token service for JWT operations
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    expiration: i64, // in seconds
}

impl TokenService {
    pub fn new(secret: String, expiration: i64) -> Self {
        Self { secret, expiration }
    }

    /// Issue a signed token for the given username.
    /// Tokens issued at different seconds differ because iat varies.
    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now + self.expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Parse the subject claim out of a token, validating the signature and
    /// expiration along the way. Error kinds are distinguished so callers can
    /// tell an empty input from a malformed, forged, or expired token.
    pub fn extract_username(&self, token: &str) -> Result<String, AuthError> {
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        self.decode_claims(token).map(|claims| claims.sub)
    }

    /// Check a token against the username it is expected to assert.
    /// Fails closed: true only when the signature validates, the subject
    /// matches exactly and the current time is strictly before expiration.
    pub fn verify(&self, token: &str, expected_username: &str) -> bool {
        match self.decode_claims(token) {
            Ok(claims) => claims.sub == expected_username,
            Err(_) => false,
        }
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        // Default validation allows 60s of clock skew; expiration here is
        // strict, so the leeway is zeroed.
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::MalformedToken,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes".to_string(), 3600)
    }

    #[test]
    fn test_issue_then_extract_round_trip() {
        let service = test_token_service();
        let token = service.issue("alice").unwrap();
        let username = service.extract_username(&token).unwrap();
        assert_eq!(username, "alice");
    }

    #[test]
    fn test_token_expiration_matches_configured_duration() {
        let secret = "test_secret_key_for_testing_purposes";
        let service = TokenService::new(secret.to_string(), 120);
        let token = service.issue("alice").unwrap();

        let mut validation = Validation::default();
        validation.leeway = 0;
        let claims = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .unwrap()
        .claims;

        assert_eq!(claims.exp - claims.iat, 120);
    }

    #[test]
    fn test_tokens_issued_at_different_instants_differ() {
        let service = test_token_service();
        let first = service.issue("alice").unwrap();
        // iat has second granularity, so step past the current second
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let second = service.issue("alice").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_accepts_fresh_token_for_its_owner() {
        let service = test_token_service();
        let token = service.issue("alice").unwrap();
        assert!(service.verify(&token, "alice"));
    }

    #[test]
    fn test_verify_rejects_other_usernames() {
        let service = test_token_service();
        let token = service.issue("alice").unwrap();
        assert!(!service.verify(&token, "bob"));
        // comparison is case-sensitive
        assert!(!service.verify(&token, "Alice"));
    }

    #[test]
    fn test_expired_token_is_classified_as_expired() {
        let secret = "test_secret_key_for_testing_purposes";
        let service = TokenService::new(secret.to_string(), 3600);

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "alice".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.extract_username(&token),
            Err(AuthError::ExpiredToken)
        ));
        assert!(!service.verify(&token, "alice"));
    }

    #[test]
    fn test_forged_token_is_classified_as_invalid_signature() {
        let service1 = TokenService::new("secret1".to_string(), 3600);
        let service2 = TokenService::new("secret2".to_string(), 3600);

        let token = service1.issue("alice").unwrap();
        assert!(matches!(
            service2.extract_username(&token),
            Err(AuthError::InvalidSignature)
        ));
        assert!(!service2.verify(&token, "alice"));
    }

    #[test]
    fn test_empty_token_is_distinct_from_malformed() {
        let service = test_token_service();
        assert!(matches!(
            service.extract_username(""),
            Err(AuthError::EmptyToken)
        ));
        assert!(matches!(
            service.extract_username("not.a.token"),
            Err(AuthError::MalformedToken)
        ));
        assert!(matches!(
            service.extract_username("garbage"),
            Err(AuthError::MalformedToken)
        ));
    }

    proptest! {
        #[test]
        fn prop_round_trip_preserves_username(
            username in "[a-zA-Z][a-zA-Z0-9_]{2,30}"
        ) {
            let service = test_token_service();
            let token = service.issue(&username)?;
            let extracted = service.extract_username(&token)?;
            prop_assert_eq!(extracted, username);
        }

        #[test]
        fn prop_fresh_token_verifies_for_owner_only(
            username in "[a-z]{3,20}",
            other in "[A-Z]{3,20}"
        ) {
            let service = test_token_service();
            let token = service.issue(&username)?;
            prop_assert!(service.verify(&token, &username));
            prop_assert!(!service.verify(&token, &other));
        }

        #[test]
        fn prop_random_strings_are_rejected(
            malformed in "[a-zA-Z0-9]{10,50}"
        ) {
            let service = test_token_service();
            prop_assert!(service.extract_username(&malformed).is_err());
            prop_assert!(!service.verify(&malformed, "anyone"));
        }
    }
}
