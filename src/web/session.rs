use crate::db;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap, StatusCode},
};
use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid token format")]
    Invalid,
    #[error("signature mismatch")]
    Signature,
    #[error("expired")]
    Expired,
}

/// HMAC-signed `user_id|exp` token carried in the session cookie.
pub fn sign_session(user_id: Uuid, key: &[u8]) -> Result<String, SessionError> {
    let exp = Utc::now() + Duration::hours(SESSION_TTL_HOURS);
    sign_with_expiry(user_id, exp.timestamp(), key)
}

fn sign_with_expiry(user_id: Uuid, exp: i64, key: &[u8]) -> Result<String, SessionError> {
    let payload = format!("{}|{}", user_id, exp);
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(payload.as_bytes());
    let sig = mac.finalize().into_bytes();
    Ok(format!(
        "{}.{}",
        general_purpose::STANDARD.encode(payload.as_bytes()),
        general_purpose::STANDARD.encode(sig)
    ))
}

pub fn verify_session(token: &str, key: &[u8]) -> Result<SessionClaims, SessionError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 2 {
        return Err(SessionError::Invalid);
    }
    let payload_bytes = general_purpose::STANDARD
        .decode(parts[0])
        .map_err(|_| SessionError::Invalid)?;
    let sig_bytes = general_purpose::STANDARD
        .decode(parts[1])
        .map_err(|_| SessionError::Invalid)?;

    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(&payload_bytes);
    mac.verify_slice(&sig_bytes)
        .map_err(|_| SessionError::Signature)?;

    let payload = String::from_utf8(payload_bytes).map_err(|_| SessionError::Invalid)?;
    let pieces: Vec<&str> = payload.split('|').collect();
    if pieces.len() != 2 {
        return Err(SessionError::Invalid);
    }
    let user_id = Uuid::parse_str(pieces[0]).map_err(|_| SessionError::Invalid)?;
    let exp: i64 = pieces[1].parse().map_err(|_| SessionError::Invalid)?;
    if Utc::now().timestamp() > exp {
        return Err(SessionError::Expired);
    }
    Ok(SessionClaims { user_id, exp })
}

pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers.get(axum::http::header::AUTHORIZATION) {
        if let Ok(val) = auth.to_str() {
            if let Some(bearer) = val.strip_prefix("Bearer ") {
                return Some(bearer.trim().to_string());
            }
        }
    }
    if let Some(cookie) = headers.get(axum::http::header::COOKIE) {
        if let Ok(val) = cookie.to_str() {
            for pair in val.split(';') {
                if let Some(rest) = pair.trim().strip_prefix("session=") {
                    return Some(rest.to_string());
                }
            }
        }
    }
    None
}

pub fn session_cookie(token: &str) -> String {
    format!("session={token}; HttpOnly; SameSite=Lax; Path=/")
}

pub fn clear_session_cookie() -> String {
    "session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0".to_string()
}

/// Axum extractor that validates the session and yields the user id.
pub struct UserSession(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for UserSession
where
    S: Send + Sync,
    crate::state::SharedState: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let shared = crate::state::SharedState::from_ref(state);

        let token = extract_token(&parts.headers).ok_or(StatusCode::UNAUTHORIZED)?;
        let claims = verify_session(&token, &shared.session_key).map_err(|e| {
            tracing::warn!("Session verification failed: {}", e);
            StatusCode::UNAUTHORIZED
        })?;

        db::find_user_by_id(&shared.pool, claims.user_id)
            .await
            .map_err(|e| {
                tracing::warn!("User lookup failed for session: {}", e);
                StatusCode::UNAUTHORIZED
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(UserSession(claims.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn sign_verify_round_trip() {
        let user_id = Uuid::new_v4();
        let token = sign_session(user_id, KEY).unwrap();
        let claims = verify_session(&token, KEY).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = sign_session(Uuid::new_v4(), KEY).unwrap();
        let (_, sig) = token.split_once('.').unwrap();
        let forged_payload =
            general_purpose::STANDARD.encode(format!("{}|{}", Uuid::new_v4(), i64::MAX));
        let forged = format!("{forged_payload}.{sig}");
        assert!(matches!(
            verify_session(&forged, KEY),
            Err(SessionError::Signature)
        ));
    }

    #[test]
    fn wrong_key_is_rejected() {
        let token = sign_session(Uuid::new_v4(), KEY).unwrap();
        assert!(matches!(
            verify_session(&token, b"another-32-byte-key-entirely!!!!"),
            Err(SessionError::Signature)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let past = Utc::now().timestamp() - 60;
        let token = sign_with_expiry(Uuid::new_v4(), past, KEY).unwrap();
        assert!(matches!(
            verify_session(&token, KEY),
            Err(SessionError::Expired)
        ));
    }

    #[test]
    fn garbage_tokens_are_invalid() {
        assert!(matches!(
            verify_session("not-a-token", KEY),
            Err(SessionError::Invalid)
        ));
        assert!(matches!(
            verify_session("a.b.c", KEY),
            Err(SessionError::Invalid)
        ));
    }

    #[test]
    fn cookie_extraction_prefers_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Bearer abc123".parse().unwrap(),
        );
        headers.insert(
            axum::http::header::COOKIE,
            "theme=dark; session=cookie-token".parse().unwrap(),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("abc123"));

        headers.remove(axum::http::header::AUTHORIZATION);
        assert_eq!(extract_token(&headers).as_deref(), Some("cookie-token"));
    }
}
