use super::*;

#[test]
fn accepts_ordinary_bucket_names() {
    for name in ["docs", "my-bucket", "logs.2026", "a"] {
        assert!(validate_bucket_name(name).is_ok(), "{}", name);
    }
}

#[test]
fn rejects_bad_bucket_names() {
    assert!(validate_bucket_name("").is_err());
    assert!(validate_bucket_name("Docs").is_err());
    assert!(validate_bucket_name("with space").is_err());
    assert!(validate_bucket_name(&"a".repeat(64)).is_err());
    assert!(validate_bucket_name(&"a".repeat(63)).is_ok());
}

#[test]
fn reserved_route_words_are_not_buckets() {
    for name in ["api", "login", "healthz"] {
        let err = validate_bucket_name(name).unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }
}

#[test]
fn object_keys_must_be_non_empty() {
    assert!(validate_object_key("").is_err());
    assert!(validate_object_key("dir/a b.txt").is_ok());
    assert!(validate_object_key(&"k".repeat(1025)).is_err());
}
