//! Session token claims
//!
//! The bearer token is a JWT issued by backend 1. The client only reads its
//! payload to show who is logged in; the signature is never checked here and
//! nothing in the client treats the claims as authoritative.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors decoding a token payload
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Not three dot-separated segments
    #[error("Malformed token: expected header.payload.signature")]
    Malformed,

    /// Payload is not valid base64url
    #[error("Invalid token encoding: {0}")]
    Encoding(String),

    /// Payload is not a JSON object
    #[error("Invalid token claims: {0}")]
    Claims(String),
}

/// Claims the client cares about
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub email: Option<String>,
    /// Expiry, seconds since the epoch
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub exp: Option<i64>,
    /// Issued-at, seconds since the epoch
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub iat: Option<i64>,
}

/// Integer, fractional or numeric-string seconds; anything else is `None`
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let seconds = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    };
    Ok(seconds)
}

impl TokenClaims {
    /// Decode the payload segment of `token` without verifying it
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let mut parts = token.trim().split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
            _ => return Err(TokenError::Malformed),
        };

        // Accept the standard alphabet and padding as well
        let normalized: String = payload
            .trim_end_matches('=')
            .chars()
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                other => other,
            })
            .collect();

        let bytes = URL_SAFE_NO_PAD
            .decode(normalized.as_bytes())
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| TokenError::Claims(e.to_string()))
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// True only when the token carries an `exp` that is in the past
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|exp| exp <= now).unwrap_or(false)
    }
}

/// Build an unsigned token carrying `claims`, for tests and demos
pub fn encode_unsigned(claims: &TokenClaims) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap_or_default());
    format!("{}.{}.", header, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // {"email":"ana@example.com","iat":1714557600,"exp":1714561200} signed with HS256
    const SAMPLE: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
        eyJlbWFpbCI6ImFuYUBleGFtcGxlLmNvbSIsImlhdCI6MTcxNDU1NzYwMCwiZXhwIjoxNzE0NTYxMjAwfQ.\
        c2lnbmF0dXJl";

    #[test]
    fn test_decode_claims() {
        let claims = TokenClaims::decode(SAMPLE).unwrap();
        assert_eq!(claims.email.as_deref(), Some("ana@example.com"));
        assert_eq!(claims.iat, Some(1714557600));
        assert_eq!(claims.exp, Some(1714561200));
    }

    #[test]
    fn test_expiry() {
        let claims = TokenClaims::decode(SAMPLE).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        assert!(!claims.is_expired(before));
        assert!(claims.is_expired(after));
        assert!(!TokenClaims::default().is_expired(after));
    }

    #[test]
    fn test_malformed_tokens() {
        assert_eq!(TokenClaims::decode("not-a-jwt"), Err(TokenError::Malformed));
        assert_eq!(TokenClaims::decode("a..c"), Err(TokenError::Malformed));
        assert_eq!(TokenClaims::decode("a.b.c.d"), Err(TokenError::Malformed));
        assert!(matches!(
            TokenClaims::decode("a.!!!.c"),
            Err(TokenError::Encoding(_))
        ));
        // "not json" in base64url
        assert!(matches!(
            TokenClaims::decode("a.bm90IGpzb24.c"),
            Err(TokenError::Claims(_))
        ));
    }

    #[test]
    fn test_unsigned_round_trip() {
        let claims = TokenClaims {
            email: Some("ops@example.com".to_string()),
            exp: None,
            iat: Some(1),
        };
        let token = encode_unsigned(&claims);
        assert_eq!(TokenClaims::decode(&token).unwrap(), claims);
    }

    #[test]
    fn test_fractional_expiry_keeps_email() {
        let payload = URL_SAFE_NO_PAD
            .encode(br#"{"email":"ana@example.com","exp":1714561200.75,"iat":"1714557600"}"#);
        let token = format!("h.{}.s", payload);

        let claims = TokenClaims::decode(&token).unwrap();
        assert_eq!(claims.email.as_deref(), Some("ana@example.com"));
        assert_eq!(claims.exp, Some(1714561200));
        assert_eq!(claims.iat, Some(1714557600));
    }

    #[test]
    fn test_unusable_expiry_is_ignored() {
        let payload =
            URL_SAFE_NO_PAD.encode(br#"{"email":"ana@example.com","exp":"soon","iat":null}"#);
        let token = format!("h.{}.s", payload);

        let claims = TokenClaims::decode(&token).unwrap();
        assert_eq!(claims.email.as_deref(), Some("ana@example.com"));
        assert_eq!(claims.exp, None);
        assert_eq!(claims.iat, None);
        assert!(!claims.is_expired(Utc::now()));
    }
}
