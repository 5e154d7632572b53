//! JWT issuing and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use dapur_types::api::Claims;

use crate::{AuthError, AuthResult, TOKEN_VALIDITY_DAYS};

/// Signs and checks bearer tokens with the process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validity: Duration::days(TOKEN_VALIDITY_DAYS),
        }
    }

    /// Issue a token whose only identity claim is the user id.
    pub fn issue_token(&self, user_id: Uuid) -> AuthResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenEncoding(e.to_string()))
    }

    /// Verify signature and expiry and return the subject.
    pub fn verify_token(&self, token: &str) -> AuthResult<Uuid> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.sub)
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-must-be-long-enough-for-security";

    #[test]
    fn test_issue_and_verify() {
        let service = TokenService::new(SECRET);
        let user_id = Uuid::new_v4();

        let token = service.issue_token(user_id).unwrap();
        assert_eq!(service.verify_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_expiry_is_seven_days() {
        let service = TokenService::new(SECRET);
        let token = service.issue_token(Uuid::new_v4()).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let claims = decode::<Claims>(&token, &service.decoding_key, &validation)
            .unwrap()
            .claims;
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_tampered_signature() {
        let service = TokenService::new(SECRET);
        let token = service.issue_token(Uuid::new_v4()).unwrap();

        // Swap one base64url character inside the signature.
        let idx = token.len() - 10;
        let replacement = if &token[idx..idx + 1] == "A" { "B" } else { "A" };
        let token = format!("{}{}{}", &token[..idx], replacement, &token[idx + 1..]);

        assert!(matches!(service.verify_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret() {
        let issuer = TokenService::new("secret-one-must-be-long-enough");
        let verifier = TokenService::new("secret-two-must-be-long-enough");

        let token = issuer.issue_token(Uuid::new_v4()).unwrap();
        assert!(matches!(verifier.verify_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expired_token() {
        let service = TokenService::new(SECRET);
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: (now - Duration::days(8)).timestamp(),
            exp: (now - Duration::seconds(1)).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &service.encoding_key).unwrap();

        assert!(matches!(service.verify_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_token() {
        let service = TokenService::new(SECRET);
        assert!(matches!(service.verify_token(""), Err(AuthError::InvalidToken)));
        assert!(matches!(service.verify_token("not.a.jwt"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_debug_hides_keys() {
        let service = TokenService::new(SECRET);
        let debug = format!("{:?}", service);
        assert!(!debug.contains(SECRET));
    }
}
