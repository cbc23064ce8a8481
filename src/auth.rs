//! Credential validation for the write boundaries

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AuthError;

pub const SLACK_TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SLACK_SIGNATURE_HEADER: &str = "x-slack-signature";
pub const API_TOKEN_HEADER: &str = "x-api-token";

const SIGNATURE_VERSION: &str = "v0";

/// Immutable credential configuration handed to the router
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub api_tokens: Vec<String>,
    pub slack_secrets: Vec<String>,
    pub slack_users: Vec<String>,
    pub max_skew_secs: i64,
}

impl AuthConfig {
    /// Check the structured-API token from `Authorization: Bearer` or `X-Api-Token`
    pub fn check_api_token(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let token = bearer_token(headers)
            .or_else(|| header_str(headers, API_TOKEN_HEADER))
            .ok_or(AuthError::MissingToken)?;

        let presented = token_digest(token).ok_or(AuthError::InvalidToken)?;
        let accepted = self.api_tokens.iter().any(|accepted| {
            token_mac(accepted)
                .map(|mac| mac.verify_slice(&presented).is_ok())
                .unwrap_or(false)
        });
        if accepted {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }

    /// Verify the chat request signature over the raw body against any
    /// configured secret, with the timestamp inside the allowed skew of `now`
    pub fn check_slack_signature(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        now: i64,
    ) -> Result<(), AuthError> {
        let timestamp = header_str(headers, SLACK_TIMESTAMP_HEADER).ok_or(AuthError::MissingSignature)?;
        let signature = header_str(headers, SLACK_SIGNATURE_HEADER).ok_or(AuthError::MissingSignature)?;

        let sent_at: i64 = timestamp.parse().map_err(|_| AuthError::StaleTimestamp)?;
        if now.abs_diff(sent_at) > self.max_skew_secs.unsigned_abs() {
            return Err(AuthError::StaleTimestamp);
        }

        let expected = signature
            .strip_prefix("v0=")
            .and_then(|hex_sig| hex::decode(hex_sig).ok())
            .ok_or(AuthError::InvalidSignature)?;

        let verified = self.slack_secrets.iter().any(|secret| {
            slack_mac(secret, timestamp, body)
                .map(|mac| mac.verify_slice(&expected).is_ok())
                .unwrap_or(false)
        });
        if verified {
            Ok(())
        } else {
            Err(AuthError::InvalidSignature)
        }
    }

    pub fn check_slack_user(&self, user_id: &str) -> Result<(), AuthError> {
        if self.slack_users.iter().any(|u| u == user_id) {
            Ok(())
        } else {
            Err(AuthError::UserNotAllowed(user_id.to_string()))
        }
    }
}

const TOKEN_DIGEST_KEY: &[u8] = b"blind-timer api token";

fn token_mac(token: &str) -> Option<Hmac<Sha256>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(TOKEN_DIGEST_KEY).ok()?;
    mac.update(token.as_bytes());
    Some(mac)
}

/// Fixed-length digest of a token, compared with `verify_slice` so the
/// comparison time does not depend on where the tokens differ
fn token_digest(token: &str) -> Option<Vec<u8>> {
    Some(token_mac(token)?.finalize().into_bytes().to_vec())
}

fn slack_mac(secret: &str, timestamp: &str, body: &[u8]) -> Option<Hmac<Sha256>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(format!("{SIGNATURE_VERSION}:{timestamp}:").as_bytes());
    mac.update(body);
    Some(mac)
}

/// Produce the `v0=<hex>` signature header value for `body`
pub fn sign_slack_body(secret: &str, timestamp: &str, body: &[u8]) -> Option<String> {
    let mac = slack_mac(secret, timestamp, body)?;
    Some(format!(
        "{SIGNATURE_VERSION}={}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, "authorization")?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config() -> AuthConfig {
        AuthConfig {
            api_tokens: vec!["tok-a".to_string(), "tok-b".to_string()],
            slack_secrets: vec!["old-secret".to_string(), "new-secret".to_string()],
            slack_users: vec!["U123".to_string()],
            max_skew_secs: 300,
        }
    }

    fn signed(secret: &str, ts: i64, body: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let ts = ts.to_string();
        headers.insert(SLACK_TIMESTAMP_HEADER, HeaderValue::from_str(&ts).unwrap());
        let sig = sign_slack_body(secret, &ts, body).unwrap();
        headers.insert(SLACK_SIGNATURE_HEADER, HeaderValue::from_str(&sig).unwrap());
        headers
    }

    #[test]
    fn api_token_sources() {
        let cfg = config();
        let mut headers = HeaderMap::new();
        assert!(matches!(cfg.check_api_token(&headers), Err(AuthError::MissingToken)));

        headers.insert("authorization", HeaderValue::from_static("Bearer tok-b"));
        assert!(cfg.check_api_token(&headers).is_ok());

        let mut headers = HeaderMap::new();
        headers.insert(API_TOKEN_HEADER, HeaderValue::from_static("tok-a"));
        assert!(cfg.check_api_token(&headers).is_ok());

        headers.insert(API_TOKEN_HEADER, HeaderValue::from_static("tok-c"));
        assert!(matches!(cfg.check_api_token(&headers), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn empty_token_list_rejects_everything() {
        let cfg = AuthConfig::default();
        let mut headers = HeaderMap::new();
        headers.insert(API_TOKEN_HEADER, HeaderValue::from_static("anything"));
        assert!(cfg.check_api_token(&headers).is_err());
    }

    #[test]
    fn signature_verifies_against_any_secret() {
        let body = b"text=pause&user_id=U123";
        let cfg = config();
        assert!(cfg.check_slack_signature(&signed("old-secret", 1000, body), body, 1000).is_ok());
        assert!(cfg.check_slack_signature(&signed("new-secret", 1000, body), body, 1100).is_ok());
        assert!(matches!(
            cfg.check_slack_signature(&signed("wrong", 1000, body), body, 1000),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn tampered_body_fails() {
        let cfg = config();
        let headers = signed("new-secret", 1000, b"text=pause&user_id=U123");
        assert!(cfg
            .check_slack_signature(&headers, b"text=resume&user_id=U123", 1000)
            .is_err());
    }

    #[test]
    fn stale_or_missing_headers() {
        let body = b"text=pause";
        let cfg = config();
        assert!(matches!(
            cfg.check_slack_signature(&signed("new-secret", 1000, body), body, 1000 + 301),
            Err(AuthError::StaleTimestamp)
        ));
        assert!(matches!(
            cfg.check_slack_signature(&HeaderMap::new(), body, 1000),
            Err(AuthError::MissingSignature)
        ));
    }

    #[test]
    fn extreme_timestamps_are_stale_not_a_panic() {
        let body = b"text=pause";
        let cfg = config();
        for ts in [i64::MIN, i64::MAX] {
            let mut headers = signed("new-secret", 0, body);
            headers.insert(
                SLACK_TIMESTAMP_HEADER,
                HeaderValue::from_str(&ts.to_string()).unwrap(),
            );
            assert!(matches!(
                cfg.check_slack_signature(&headers, body, 1_700_000_000),
                Err(AuthError::StaleTimestamp)
            ));
        }
        let headers = signed("new-secret", i64::MAX, body);
        assert!(matches!(
            cfg.check_slack_signature(&headers, body, i64::MIN),
            Err(AuthError::StaleTimestamp)
        ));
    }

    #[test]
    fn token_prefix_or_extension_is_rejected() {
        let cfg = config();
        for token in ["tok", "tok-a-", "tok-aa", "TOK-A"] {
            let mut headers = HeaderMap::new();
            headers.insert(API_TOKEN_HEADER, HeaderValue::from_str(token).unwrap());
            assert!(
                matches!(cfg.check_api_token(&headers), Err(AuthError::InvalidToken)),
                "{token} should be rejected"
            );
        }
    }

    #[test]
    fn user_allow_list() {
        let cfg = config();
        assert!(cfg.check_slack_user("U123").is_ok());
        assert!(matches!(cfg.check_slack_user("U999"), Err(AuthError::UserNotAllowed(_))));
    }
}
