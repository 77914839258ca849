/// Failures reported by [`super::ApiClient`].
///
/// `SessionEnded` is not an ordinary failure: the client has already cleared
/// the session, and the caller must drop whatever it was doing with the
/// response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("session ended (token rejected by server; sign in again)")]
    SessionEnded,

    #[error("login rejected (check username and password)")]
    LoginRejected,

    #[error("invalid server url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{label}: network error")]
    Transport {
        label: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{label}: server returned {status}{}", detail_suffix(.message))]
    Status {
        label: String,
        status: u16,
        message: Option<String>,
    },

    #[error("{label}: unreadable response")]
    Decode {
        label: String,
        #[source]
        source: reqwest::Error,
    },
}

fn detail_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(" ({})", m),
        _ => String::new(),
    }
}
