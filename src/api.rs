use reqwest::blocking::{Client, Response};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::model::{LoginRequest, LoginResponse};
use crate::session::SessionStore;

mod error;
mod route;

pub use self::error::ApiError;
pub use self::route::Route;

/// Authenticated HTTP access to the storage service.
///
/// Owns the [`SessionStore`]: every request carries its token, and a `401`
/// from any endpoint clears it for all later requests.
pub struct ApiClient {
    base: Url,
    session: SessionStore,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionStore) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical url".to_string(),
            });
        }
        let http = Client::builder()
            .user_agent("verso")
            .build()
            .map_err(|source| ApiError::Transport {
                label: "build http client".to_string(),
                source,
            })?;
        Ok(Self {
            base,
            session,
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    pub fn url(&self, route: &Route) -> Result<Url, ApiError> {
        route.resolve(&self.base)
    }

    /// Exchanges credentials for a token. Sends no token and leaves the
    /// session untouched; storing the token is the caller's decision.
    pub fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let label = "login".to_string();
        let url = self.url(&Route::login())?;
        tracing::debug!(%url, "login");
        let resp = self
            .http
            .post(url)
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .map_err(|source| ApiError::Transport {
                label: label.clone(),
                source,
            })?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::LoginRejected);
        }
        let resp = ensure_success(resp, &label)?;
        let out: LoginResponse = resp
            .json()
            .map_err(|source| ApiError::Decode { label, source })?;
        Ok(out.token)
    }

    /// Sends one authenticated request. A `401` clears the session and yields
    /// [`ApiError::SessionEnded`]; other non-2xx statuses become
    /// [`ApiError::Status`]. Nothing is retried.
    pub fn request(
        &mut self,
        method: Method,
        route: &Route,
        body: Option<Vec<u8>>,
    ) -> Result<Response, ApiError> {
        let label = format!("{} {}", method, route);
        let url = self.url(route)?;
        tracing::debug!(%method, %url, "request");

        let mut req = self.http.request(method, url);
        if let Some(token) = self.session.get() {
            req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(bytes) = body {
            req = req
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(bytes);
        }

        let resp = req.send().map_err(|source| ApiError::Transport {
            label: label.clone(),
            source,
        })?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(%label, "server rejected session token; clearing session");
            if let Err(err) = self.session.clear() {
                tracing::error!("clear session: {:#}", err);
            }
            return Err(ApiError::SessionEnded);
        }

        ensure_success(resp, &label)
    }

    pub fn get_json<T: DeserializeOwned>(&mut self, route: &Route) -> Result<T, ApiError> {
        let label = format!("GET {}", route);
        let resp = self.request(Method::GET, route, None)?;
        resp.json().map_err(|source| ApiError::Decode { label, source })
    }

    /// Fetches the raw bytes behind a storage route.
    pub fn download(&mut self, route: &Route) -> Result<Vec<u8>, ApiError> {
        let label = format!("GET {}", route);
        let resp = self.request(Method::GET, route, None)?;
        let bytes = resp
            .bytes()
            .map_err(|source| ApiError::Decode { label, source })?;
        Ok(bytes.to_vec())
    }
}

fn ensure_success(resp: Response, label: &str) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .text()
        .ok()
        .and_then(|t| error_message(&t));
    Err(ApiError::Status {
        label: label.to_string(),
        status: status.as_u16(),
        message,
    })
}

/// Pulls a human message out of an error body: `{"error": ...}`,
/// `{"detail": ...}`, or short plain text.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        return ["error", "detail"]
            .iter()
            .find_map(|k| v.get(*k).and_then(|x| x.as_str()))
            .map(str::to_string);
    }
    if body.len() <= 200 && !body.starts_with('<') {
        return Some(body.to_string());
    }
    None
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
