use super::*;

fn sample() -> BucketState {
    let mut b = BucketState::new("docs", "2026-01-01T00:00:00Z".to_string());
    b.put_version(
        "a&b.txt",
        "v1".to_string(),
        5,
        "\"e1\"".to_string(),
        "2026-01-01T00:00:00Z".to_string(),
    );
    b.put_version(
        "gone.txt",
        "v2".to_string(),
        3,
        "\"e2\"".to_string(),
        "2026-01-01T00:00:00Z".to_string(),
    );
    b.put_delete_marker("gone.txt", "m3".to_string(), "2026-01-02T00:00:00Z".to_string());
    b
}

#[test]
fn escape_covers_markup_characters() {
    assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&apos;&amp;&apos;&lt;/a&gt;");
}

#[test]
fn bucket_listing_hides_deleted_keys() {
    let xml = list_bucket_result(&sample(), "admin");
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><ListBucketResult"#));
    assert!(xml.contains("<Name>docs</Name>"));
    assert!(xml.contains("<Key>a&amp;b.txt</Key>"));
    assert!(xml.contains("<Size>5</Size>"));
    assert!(!xml.contains("gone.txt"));
    assert!(xml.ends_with("</ListBucketResult>"));
}

#[test]
fn version_listing_includes_delete_markers() {
    let xml = list_versions_result(&sample(), "admin");
    assert!(xml.contains("<ListVersionsResult"));
    assert!(xml.contains(
        "<DeleteMarker><Key>gone.txt</Key><VersionId>m3</VersionId><IsLatest>true</IsLatest>"
    ));
    assert!(xml.contains("<Version><Key>gone.txt</Key><VersionId>v2</VersionId><IsLatest>false</IsLatest>"));
    assert!(xml.contains("<DisplayName>admin</DisplayName>"));
    // Newest first within a key.
    let m3 = xml.find("m3").unwrap();
    let v2 = xml.find("<VersionId>v2").unwrap();
    assert!(m3 < v2);
}
