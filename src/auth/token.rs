//! HS256 bearer tokens carrying a user id in `sub`.
//!
//! Keys are derived once from the process-wide secret when the codec is built
//! and never change afterwards, so a codec can be shared freely across tasks.

use super::AuthError;
use jsonwebtoken::{
    decode, encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec. `ttl = None` mints tokens without an `exp` claim.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Option<Duration>) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is optional; when present it is still enforced.
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
            ttl,
        }
    }

    /// Sign a token for `user_id`.
    ///
    /// # Errors
    /// Returns [`AuthError::Internal`] if signing fails.
    pub fn encode(&self, user_id: &str) -> Result<String, AuthError> {
        let iat = get_current_timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat,
            exp: self.ttl.map(|ttl| iat.saturating_add(ttl.as_secs())),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("failed to sign token: {e}")))
    }

    /// Verify `token` and return its subject.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidToken`] for malformed, tampered, foreign or expired tokens.
    pub fn decode(&self, token: &str) -> Result<String, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| {
                debug!("Token verification failed: {e}");
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn codec(secret: &str, ttl: Option<Duration>) -> TokenCodec {
        TokenCodec::new(&SecretString::from(secret.to_string()), ttl)
    }

    #[test]
    fn round_trip() -> Result<()> {
        let codec = codec("test-secret", None);
        for user_id in ["1", "42", "2147483647", "not-a-number"] {
            let token = codec.encode(user_id)?;
            assert_eq!(codec.decode(&token)?, user_id);
        }
        Ok(())
    }

    #[test]
    fn token_has_three_parts() -> Result<()> {
        let token = codec("test-secret", None).encode("1")?;
        assert_eq!(token.split('.').count(), 3);
        Ok(())
    }

    #[test]
    fn rejects_empty_and_garbage() {
        let codec = codec("test-secret", None);
        assert!(matches!(codec.decode(""), Err(AuthError::InvalidToken)));
        assert!(matches!(
            codec.decode("not a token"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            codec.decode("aaa.bbb.ccc"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn rejects_foreign_secret() -> Result<()> {
        let token = codec("secret-a", None).encode("1")?;
        assert!(matches!(
            codec("secret-b", None).decode(&token),
            Err(AuthError::InvalidToken)
        ));
        Ok(())
    }

    #[test]
    fn rejects_truncated_token() -> Result<()> {
        let codec = codec("test-secret", None);
        let token = codec.encode("1")?;

        let without_signature = token.rsplit_once('.').map_or("", |(head, _)| head);
        assert!(matches!(
            codec.decode(without_signature),
            Err(AuthError::InvalidToken)
        ));

        let shortened = &token[..token.len() - 4];
        assert!(matches!(
            codec.decode(shortened),
            Err(AuthError::InvalidToken)
        ));
        Ok(())
    }

    #[test]
    fn rejects_other_algorithms() -> Result<()> {
        let secret = "test-secret";
        let claims = Claims {
            sub: "1".to_string(),
            iat: get_current_timestamp(),
            exp: None,
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        assert!(matches!(
            codec(secret, None).decode(&token),
            Err(AuthError::InvalidToken)
        ));
        Ok(())
    }

    #[test]
    fn ttl_sets_exp() -> Result<()> {
        let codec = codec("test-secret", Some(Duration::from_secs(60)));
        let token = codec.encode("7")?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &validation,
        )?;
        assert_eq!(data.claims.exp, Some(data.claims.iat + 60));
        Ok(())
    }

    #[test]
    fn no_ttl_omits_exp() -> Result<()> {
        let codec = codec("test-secret", None);
        let token = codec.encode("7")?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &validation,
        )?;
        assert_eq!(data.claims.exp, None);
        Ok(())
    }

    #[test]
    fn rejects_expired_token() -> Result<()> {
        let secret = "test-secret";
        let now = get_current_timestamp();
        let claims = Claims {
            sub: "1".to_string(),
            iat: now - 1000,
            exp: Some(now - 100),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        assert!(matches!(
            codec(secret, None).decode(&token),
            Err(AuthError::InvalidToken)
        ));
        Ok(())
    }
}
