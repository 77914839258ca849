use super::*;

#[test]
fn bearer_header_wins_over_auth_token_header() {
    let mut headers = HeaderMap::new();
    headers.insert(TOKEN_HEADER, HeaderValue::from_static("legacy"));
    assert_eq!(presented_token(&headers), Some("legacy"));

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
    assert_eq!(presented_token(&headers), Some("abc"));
}

#[test]
fn non_bearer_authorization_falls_back() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
    assert_eq!(presented_token(&headers), None);

    headers.insert(TOKEN_HEADER, HeaderValue::from_static("t1"));
    assert_eq!(presented_token(&headers), Some("t1"));
}

#[test]
fn random_hex_has_requested_entropy() {
    let a = random_hex(16).unwrap();
    let b = random_hex(16).unwrap();
    assert_eq!(a.len(), 32);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
}

#[test]
fn secrets_hash_stably() {
    assert_eq!(hash_secret("password"), hash_secret("password"));
    assert_ne!(hash_secret("password"), hash_secret("Password"));
    assert_eq!(hash_secret("x").len(), 64);
}

#[test]
fn prune_drops_only_expired_tokens() {
    let now = time::OffsetDateTime::now_utc();
    let mut tokens = HashMap::new();
    tokens.insert(
        "old".to_string(),
        IssuedToken {
            user: "admin".to_string(),
            expires_at: now - time::Duration::seconds(1),
        },
    );
    tokens.insert(
        "fresh".to_string(),
        IssuedToken {
            user: "admin".to_string(),
            expires_at: now + time::Duration::seconds(60),
        },
    );
    prune_expired(&mut tokens, now);
    assert!(tokens.contains_key("fresh"));
    assert!(!tokens.contains_key("old"));
}
