//! S3-style XML listings for `GET /{bucket}`.

use std::fmt::Write as _;

use super::BucketState;

const S3_NS: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

pub(super) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn owner(out: &mut String, owner: &str) {
    let o = escape(owner);
    let _ = write!(out, "<Owner><ID>{}</ID><DisplayName>{}</DisplayName></Owner>", o, o);
}

/// Current, non-deleted objects.
pub(super) fn list_bucket_result(bucket: &BucketState, owner_name: &str) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = write!(
        out,
        r#"<ListBucketResult xmlns="{}"><Name>{}</Name><Prefix></Prefix><Marker></Marker><MaxKeys>1000</MaxKeys><IsTruncated>false</IsTruncated>"#,
        S3_NS,
        escape(&bucket.name)
    );
    for (key, versions) in &bucket.objects {
        let Some(v) = versions.iter().find(|v| v.is_latest) else {
            continue;
        };
        if v.is_delete_marker {
            continue;
        }
        let _ = write!(
            out,
            "<Contents><Key>{}</Key><LastModified>{}</LastModified><ETag>{}</ETag><Size>{}</Size>",
            escape(key),
            escape(&v.last_modified),
            escape(v.etag.as_deref().unwrap_or_default()),
            v.size
        );
        owner(&mut out, owner_name);
        out.push_str("<StorageClass>STANDARD</StorageClass></Contents>");
    }
    out.push_str("</ListBucketResult>");
    out
}

/// Every version and delete marker, keys ascending, newest first within a key.
pub(super) fn list_versions_result(bucket: &BucketState, owner_name: &str) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = write!(
        out,
        r#"<ListVersionsResult xmlns="{}"><Name>{}</Name><Prefix></Prefix><KeyMarker></KeyMarker><VersionIdMarker></VersionIdMarker><IsTruncated>false</IsTruncated>"#,
        S3_NS,
        escape(&bucket.name)
    );
    for (key, versions) in &bucket.objects {
        for v in versions {
            let tag = if v.is_delete_marker {
                "DeleteMarker"
            } else {
                "Version"
            };
            let _ = write!(
                out,
                "<{tag}><Key>{}</Key><VersionId>{}</VersionId><IsLatest>{}</IsLatest><LastModified>{}</LastModified>",
                escape(key),
                escape(&v.version_id),
                v.is_latest,
                escape(&v.last_modified)
            );
            if !v.is_delete_marker {
                let _ = write!(
                    out,
                    "<ETag>{}</ETag><Size>{}</Size>",
                    escape(v.etag.as_deref().unwrap_or_default()),
                    v.size
                );
            }
            owner(&mut out, owner_name);
            if !v.is_delete_marker {
                out.push_str("<StorageClass>STANDARD</StorageClass>");
            }
            let _ = write!(out, "</{tag}>");
        }
    }
    out.push_str("</ListVersionsResult>");
    out
}

#[cfg(test)]
#[path = "../../tests/bin/verso_server/xml_tests.rs"]
mod tests;
