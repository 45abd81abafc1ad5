//! Token decoding and minting.

use crate::claims::ClaimSet;
use crate::error::TokenError;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::collections::HashSet;
use std::fmt;

/// HMAC algorithms accepted in token headers. Anything else is refused
/// before signature verification.
pub const ACCEPTED_ALGORITHMS: &[Algorithm] = &[Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Verifies and mints tokens with a single shared secret.
///
/// Built once at startup from the configured secret and shared read-only
/// between requests.
#[derive(Clone)]
pub struct TokenCodec {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec for the given shared secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        // Expiry is judged by the caller; `exp` presence is enforced by ClaimSet.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            validation,
        })
    }

    /// Verify `credential` and decode its claims.
    ///
    /// Does not check expiry: an expired but otherwise valid token decodes
    /// successfully.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Malformed`] if the token cannot be decoded or the
    ///   account id is absent or not positive
    /// - [`TokenError::InvalidSignature`] if verification fails or the header
    ///   algorithm is not HMAC
    pub fn decode(&self, credential: &str) -> Result<ClaimSet, TokenError> {
        let data = jsonwebtoken::decode::<ClaimSet>(
            credential,
            &self.decoding_key,
            &self.validation,
        )?;

        let claims = data.claims;
        if claims.account_id <= 0 {
            return Err(TokenError::Malformed(format!(
                "uid must be positive, got {}",
                claims.account_id
            )));
        }
        Ok(claims)
    }

    /// Mint an HS256 token for `claims`.
    pub fn encode(&self, claims: &ClaimSet) -> Result<String, TokenError> {
        self.encode_with(Algorithm::HS256, claims)
    }

    /// Mint a token with a specific HMAC algorithm.
    pub fn encode_with(&self, algorithm: Algorithm, claims: &ClaimSet) -> Result<String, TokenError> {
        if !ACCEPTED_ALGORITHMS.contains(&algorithm) {
            return Err(TokenError::CreationFailed(format!(
                "{algorithm:?} is not an HMAC algorithm"
            )));
        }
        jsonwebtoken::encode(&Header::new(algorithm), claims, &self.encoding_key)
            .map_err(|e| TokenError::CreationFailed(e.to_string()))
    }
}

/// Decode `credential` against `secret` in one call.
pub fn decode(credential: &str, secret: impl AsRef<[u8]>) -> Result<ClaimSet, TokenError> {
    TokenCodec::new(secret)?.decode(credential)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::Duration;

    const SECRET: &str = "test_secret";

    fn mock_claims() -> ClaimSet {
        ClaimSet::new(123, "test@example.com", 1, 1, Duration::hours(1))
    }

    /// Build a token by hand so the header can name any algorithm.
    fn forge(header: &str, payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(header);
        let payload = URL_SAFE_NO_PAD.encode(payload.to_string());
        let signature = URL_SAFE_NO_PAD.encode(b"not-a-real-signature");
        format!("{header}.{payload}.{signature}")
    }

    #[test]
    fn test_round_trip() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let claims = mock_claims();
        let token = codec.encode(&claims).unwrap();

        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded.account_id, 123);
        assert_eq!(decoded.email, "test@example.com");
        assert_eq!(decoded.role, 1);
        assert_eq!(decoded.app_id, 1);
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_all_hmac_algorithms_accepted() {
        let codec = TokenCodec::new(SECRET).unwrap();
        for alg in ACCEPTED_ALGORITHMS {
            let token = codec.encode_with(*alg, &mock_claims()).unwrap();
            assert!(codec.decode(&token).is_ok(), "{alg:?} should verify");
        }
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let issuer = TokenCodec::new("another_secret").unwrap();
        let token = issuer.encode(&mock_claims()).unwrap();

        let err = decode(&token, SECRET).unwrap_err();
        assert!(matches!(err, TokenError::InvalidSignature));
    }

    #[test]
    fn test_expired_token_still_decodes() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let claims = ClaimSet::new(123, "test@example.com", 1, 1, Duration::hours(-1));
        let token = codec.encode(&claims).unwrap();

        let decoded = codec.decode(&token).unwrap();
        assert!(decoded.is_expired());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = TokenCodec::new(SECRET).unwrap();
        for credential in ["", "not-a-jwt", "a.b", "a.b.c", "....."] {
            let err = codec.decode(credential).unwrap_err();
            assert!(
                matches!(err, TokenError::Malformed(_)),
                "{credential:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_missing_account_id_is_malformed() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let payload = serde_json::json!({ "email": "x@y.z", "exp": 4_102_444_800i64 });
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = codec.decode(&token).unwrap_err();
        assert!(matches!(err, TokenError::Malformed(_)));
    }

    #[test]
    fn test_missing_expiry_is_malformed() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let payload = serde_json::json!({ "uid": 123 });
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(codec.decode(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_non_positive_account_id_is_malformed() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let mut claims = mock_claims();
        claims.account_id = 0;
        let token = codec.encode(&claims).unwrap();

        assert!(matches!(codec.decode(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_asymmetric_algorithm_rejected() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let payload = serde_json::to_value(mock_claims()).unwrap();
        let token = forge(r#"{"alg":"RS256","typ":"JWT"}"#, &payload);

        let err = codec.decode(&token).unwrap_err();
        assert!(matches!(err, TokenError::InvalidSignature));
    }

    #[test]
    fn test_none_algorithm_rejected() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let payload = serde_json::to_value(mock_claims()).unwrap();
        let token = forge(r#"{"alg":"none","typ":"JWT"}"#, &payload);

        assert!(codec.decode(&token).is_err());
    }

    #[test]
    fn test_empty_secret_refused() {
        assert!(matches!(TokenCodec::new(""), Err(TokenError::EmptySecret)));
    }

    #[test]
    fn test_debug_hides_keys() {
        let codec = TokenCodec::new(SECRET).unwrap();
        assert!(!format!("{codec:?}").contains(SECRET));
    }
}
