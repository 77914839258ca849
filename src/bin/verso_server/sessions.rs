//! Credential check, token issue and the bearer middleware.

use super::*;

pub(super) const TOKEN_HEADER: &str = "x-auth-token";

pub(super) fn now_ts() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "<time>".to_string())
}

pub(super) fn hash_secret(secret: &str) -> String {
    blake3::hash(secret.as_bytes()).to_hex().to_string()
}

/// `len` random bytes, hex-encoded.
pub(super) fn random_hex(len: usize) -> Result<String> {
    let mut bytes = vec![0u8; len];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow::anyhow!("getrandom: {:?}", e))?;
    let mut out = String::with_capacity(len * 2);
    for b in &bytes {
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct LoginRequest {
    username: String,
    password: String,
}

pub(super) async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, Response> {
    if payload.username != state.user || hash_secret(&payload.password) != state.password_hash {
        tracing::info!(user = %payload.username, "login rejected");
        return Err(unauthorized("invalid credentials"));
    }

    let token = random_hex(32).map_err(internal_error)?;
    let expires_at = time::OffsetDateTime::now_utc() + state.token_ttl;
    {
        let mut tokens = state.tokens.write().await;
        prune_expired(&mut tokens, time::OffsetDateTime::now_utc());
        tokens.insert(
            hash_secret(&token),
            IssuedToken {
                user: payload.username.clone(),
                expires_at,
            },
        );
    }
    tracing::info!(user = %payload.username, "issued session token");
    Ok(Json(serde_json::json!({"token": token})))
}

/// The presented token: `Authorization: Bearer ...`, else `X-Auth-Token`.
pub(super) fn presented_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = headers.get(header::AUTHORIZATION)
        && let Ok(value) = value.to_str()
        && let Some(token) = value.strip_prefix("Bearer ")
    {
        return Some(token.trim());
    }
    headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

pub(super) async fn require_token(
    State(state): State<Arc<AppState>>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    let Some(token) = presented_token(req.headers()) else {
        return unauthorized("missing token");
    };
    let token_hash = hash_secret(token);

    let user = {
        let mut tokens = state.tokens.write().await;
        match tokens.get(&token_hash) {
            None => return unauthorized("invalid or expired token"),
            Some(t) if t.expires_at < time::OffsetDateTime::now_utc() => {
                tokens.remove(&token_hash);
                tracing::debug!("expired token presented; removed");
                return unauthorized("invalid or expired token");
            }
            Some(t) => t.user.clone(),
        }
    };

    tracing::trace!(%user, "authorized");
    next.run(req).await
}

fn prune_expired(tokens: &mut HashMap<String, IssuedToken>, now: time::OffsetDateTime) {
    tokens.retain(|_, t| t.expires_at >= now);
}

pub(super) async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

#[cfg(test)]
#[path = "../../tests/bin/verso_server/sessions_tests.rs"]
mod tests;
