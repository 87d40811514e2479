use crate::token::error::Error;
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

/// Claims format version; bumped when the claim set changes shape.
pub const TOKEN_VERSION: u8 = 1;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTokenHeader {
    pub alg: String,
    pub typ: String,
}

impl SessionTokenHeader {
    fn hs256() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Whether a token grants access or only the right to mint new tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTokenClaims {
    pub v: u8,
    /// User id the token was issued to.
    pub sub: String,
    pub username: String,
    pub typ: TokenType,
    pub iat: i64,
    pub exp: i64,
    /// Unique per token; two tokens minted in the same second still differ.
    pub jti: String,
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, Error> {
    let json = serde_json::to_vec(value)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, Error> {
    let bytes = Base64UrlUnpadded::decode_vec(s).map_err(|_| Error::Base64)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Create an HS256 signed session token (JWT).
///
/// # Errors
///
/// Returns an error if claims/header JSON cannot be encoded or the secret is
/// unusable as an HMAC key.
pub fn sign_hs256(secret: &[u8], claims: &SessionTokenClaims) -> Result<String, Error> {
    let header_b64 = b64e_json(&SessionTokenHeader::hs256())?;
    let claims_b64 = b64e_json(claims)?;
    let signing_input = format!("{header_b64}.{claims_b64}");

    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| Error::InvalidKey)?;
    mac.update(signing_input.as_bytes());
    let signature_b64 = Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes());

    Ok(format!("{signing_input}.{signature_b64}"))
}

/// Verify an HS256 session token and return its decoded claims.
///
/// # Errors
///
/// Returns an error if:
/// - the token is malformed or contains invalid base64/json,
/// - the signature is invalid,
/// - the claims fail validation (`v`, `exp`).
pub fn verify_hs256(
    token: &str,
    secret: &[u8],
    now_unix_seconds: i64,
) -> Result<SessionTokenClaims, Error> {
    let mut parts = token.split('.');
    let header_b64 = parts.next().ok_or(Error::TokenFormat)?;
    let claims_b64 = parts.next().ok_or(Error::TokenFormat)?;
    let sig_b64 = parts.next().ok_or(Error::TokenFormat)?;
    if parts.next().is_some() {
        return Err(Error::TokenFormat);
    }

    let header: SessionTokenHeader = b64d_json(header_b64)?;
    if header.alg != "HS256" {
        return Err(Error::UnsupportedAlg(header.alg));
    }

    let signing_input = format!("{header_b64}.{claims_b64}");
    let signature = Base64UrlUnpadded::decode_vec(sig_b64).map_err(|_| Error::Base64)?;
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| Error::InvalidKey)?;
    mac.update(signing_input.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| Error::InvalidSignature)?;

    let claims: SessionTokenClaims = b64d_json(claims_b64)?;
    if claims.v != TOKEN_VERSION {
        return Err(Error::InvalidVersion);
    }
    if claims.exp <= now_unix_seconds {
        return Err(Error::Expired);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"a-test-signing-secret";
    const NOW: i64 = 1_700_000_000;

    fn test_claims(typ: TokenType) -> SessionTokenClaims {
        SessionTokenClaims {
            v: TOKEN_VERSION,
            sub: "6e9c0c53-03e4-4cf1-8cf8-4f1d0f0d2b6e".to_string(),
            username: "alice".to_string(),
            typ,
            iat: NOW,
            exp: NOW + 900,
            jti: "jti-1".to_string(),
        }
    }

    #[test]
    fn sign_and_verify_round_trip() -> Result<(), Error> {
        let token = sign_hs256(SECRET, &test_claims(TokenType::Access))?;
        let verified = verify_hs256(&token, SECRET, NOW)?;
        assert_eq!(verified, test_claims(TokenType::Access));
        Ok(())
    }

    #[test]
    fn signing_is_deterministic() -> Result<(), Error> {
        let first = sign_hs256(SECRET, &test_claims(TokenType::Refresh))?;
        let second = sign_hs256(SECRET, &test_claims(TokenType::Refresh))?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn rejects_wrong_secret() -> Result<(), Error> {
        let token = sign_hs256(SECRET, &test_claims(TokenType::Access))?;
        let result = verify_hs256(&token, b"another secret", NOW);
        assert!(matches!(result, Err(Error::InvalidSignature)));
        Ok(())
    }

    #[test]
    fn rejects_tampered_claims() -> Result<(), Error> {
        let token = sign_hs256(SECRET, &test_claims(TokenType::Access))?;
        let mut parts: Vec<&str> = token.split('.').collect();

        let mut forged = test_claims(TokenType::Access);
        forged.username = "mallory".to_string();
        let forged_b64 = {
            let json = serde_json::to_vec(&forged)?;
            base64ct::Base64UrlUnpadded::encode_string(&json)
        };
        parts[1] = &forged_b64;
        let tampered = parts.join(".");

        let result = verify_hs256(&tampered, SECRET, NOW);
        assert!(matches!(result, Err(Error::InvalidSignature)));
        Ok(())
    }

    #[test]
    fn rejects_expired_token() -> Result<(), Error> {
        let token = sign_hs256(SECRET, &test_claims(TokenType::Access))?;
        let result = verify_hs256(&token, SECRET, NOW + 900);
        assert!(matches!(result, Err(Error::Expired)));
        Ok(())
    }

    #[test]
    fn rejects_wrong_version() -> Result<(), Error> {
        let mut claims = test_claims(TokenType::Access);
        claims.v = TOKEN_VERSION + 1;
        let token = sign_hs256(SECRET, &claims)?;
        let result = verify_hs256(&token, SECRET, NOW);
        assert!(matches!(result, Err(Error::InvalidVersion)));
        Ok(())
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(matches!(
            verify_hs256("only.two", SECRET, NOW),
            Err(Error::TokenFormat)
        ));
        assert!(matches!(
            verify_hs256("a.b.c.d", SECRET, NOW),
            Err(Error::TokenFormat)
        ));
        assert!(matches!(
            verify_hs256("!!!.b.c", SECRET, NOW),
            Err(Error::Base64)
        ));
    }

    #[test]
    fn token_type_serializes_lowercase() -> Result<(), Error> {
        let json = serde_json::to_string(&TokenType::Refresh)?;
        assert_eq!(json, "\"refresh\"");
        let json = serde_json::to_string(&TokenType::Access)?;
        assert_eq!(json, "\"access\"");
        Ok(())
    }
}
