/// Authentication service - password hashing and session tokens
use crate::error::{Result, ServerError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use pulse_core::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    session_expiration: Duration,
    bcrypt_cost: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub sid: String, // Server-side session ID
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

impl Claims {
    /// User ID carried in `sub`
    pub fn user_id(&self) -> Result<UserId> {
        self.sub
            .parse()
            .map_err(|_| ServerError::Auth("Invalid token subject".to_string()))
    }
}

impl AuthService {
    pub fn new(secret: String, session_expiration_hours: u64, bcrypt_cost: u32) -> Self {
        Self {
            secret,
            session_expiration: Duration::hours(session_expiration_hours as i64),
            bcrypt_cost,
        }
    }

    /// Lifetime of a session token
    pub fn session_expiration(&self) -> Duration {
        self.session_expiration
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Create a token bound to a server-side session
    pub fn create_session_token(&self, user_id: UserId, session_id: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + self.session_expiration;

        let claims = Claims {
            sub: user_id.to_string(),
            sid: session_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(ServerError::from)
    }

    /// Verify and decode a token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let auth = AuthService::new("secret".to_string(), 24, 4);
        let password = "my_secure_password";

        let hash = auth.hash_password(password).unwrap();
        assert_ne!(hash, password);
        assert!(auth.verify_password(password, &hash).unwrap());
        assert!(!auth.verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_session_token_round_trip() {
        let auth = AuthService::new("secret".to_string(), 24, 4);

        let token = auth.create_session_token(42, "session-abc").unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.sid, "session-abc");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = AuthService::new("secret-a".to_string(), 24, 4);
        let verifier = AuthService::new("secret-b".to_string(), 24, 4);

        let token = issuer.create_session_token(1, "sid").unwrap();
        assert!(verifier.verify_token(&token).is_err());
    }
}
