use super::*;

// Top-level paths the server owns; a bucket with one of these names would be unreachable.
const RESERVED_BUCKET_NAMES: &[&str] = &["api", "login", "healthz"];

pub(super) fn validate_bucket_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow::anyhow!("bucket name cannot be empty"));
    }
    if name.len() > 63 {
        return Err(anyhow::anyhow!("bucket name must be at most 63 chars"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(anyhow::anyhow!(
            "bucket name must be lowercase alnum or '-', '.'"
        ));
    }
    if RESERVED_BUCKET_NAMES.contains(&name) {
        return Err(anyhow::anyhow!("bucket name '{}' is reserved", name));
    }
    Ok(())
}

pub(super) fn validate_object_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(anyhow::anyhow!("object key cannot be empty"));
    }
    if key.len() > 1024 {
        return Err(anyhow::anyhow!("object key must be at most 1024 bytes"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/bin/verso_server/validators_tests.rs"]
mod tests;
