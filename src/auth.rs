use crate::config::Credentials;
use crate::errors::AppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::warn;

pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = state.credentials.as_deref() {
        if !is_authorized(request.headers(), expected) {
            warn!(path = %request.uri().path(), "rejected request without valid credentials");
            return Err(AppError::unauthorized());
        }
    }
    Ok(next.run(request).await)
}

fn is_authorized(headers: &HeaderMap, expected: &Credentials) -> bool {
    let Some((user, password)) = basic_credentials(headers) else {
        return false;
    };
    user == expected.user && password == expected.password
}

fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}
