use super::state::ServerState;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;

/// An admin session attached to a request. When auth enforcement is off the
/// extractor always succeeds with no marker; when it is on, the request must
/// carry a marker issued by a previous login.
#[derive(Debug)]
pub struct AdminSession {
    pub token: Option<String>,
}

pub const COOKIE_SESSION_TOKEN_KEY: &str = "session_token";
pub const HEADER_SESSION_TOKEN_KEY: &str = "Authorization";

pub struct AccessDenied;

impl IntoResponse for AccessDenied {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Access denied" })),
        )
            .into_response()
    }
}

async fn extract_session_token_from_cookies(
    parts: &mut Parts,
    ctx: &ServerState,
) -> Option<String> {
    CookieJar::from_request_parts(parts, &ctx)
        .await
        .expect("Could not read cookies into CookieJar.")
        .get(COOKIE_SESSION_TOKEN_KEY)
        .map(Cookie::value)
        .map(|s| s.to_string())
}

fn extract_session_token_from_headers(parts: &mut Parts) -> Option<String> {
    parts
        .headers
        .get(HEADER_SESSION_TOKEN_KEY)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

impl FromRequestParts<ServerState> for AdminSession {
    type Rejection = AccessDenied;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if !ctx.admin_gate.enforce_auth() {
            return Ok(AdminSession { token: None });
        }

        let token = extract_session_token_from_cookies(parts, ctx)
            .await
            .or_else(|| extract_session_token_from_headers(parts))
            .ok_or(AccessDenied)?;

        if ctx.admin_gate.verify(&token) {
            Ok(AdminSession { token: Some(token) })
        } else {
            Err(AccessDenied)
        }
    }
}
