use super::*;

fn bucket() -> BucketState {
    BucketState::new("docs", "2026-01-01T00:00:00Z".to_string())
}

fn put(b: &mut BucketState, key: &str, id: &str, size: u64) {
    b.put_version(
        key,
        id.to_string(),
        size,
        format!("\"etag-{}\"", id),
        "2026-01-01T00:00:00Z".to_string(),
    );
}

fn ids(b: &BucketState, key: &str) -> Vec<String> {
    b.versions(key).iter().map(|v| v.version_id.clone()).collect()
}

fn latest_count(b: &BucketState, key: &str) -> usize {
    b.versions(key).iter().filter(|v| v.is_latest).count()
}

#[test]
fn new_version_becomes_sole_latest() {
    let mut b = bucket();
    put(&mut b, "a.txt", "v1", 5);
    put(&mut b, "a.txt", "v2", 10);

    assert_eq!(ids(&b, "a.txt"), vec!["v2", "v1"]);
    assert_eq!(b.latest("a.txt").unwrap().version_id, "v2");
    assert_eq!(latest_count(&b, "a.txt"), 1);
    assert!(b.versions("a.txt")[0].seq > b.versions("a.txt")[1].seq);
}

#[test]
fn delete_marker_hides_but_keeps_history() {
    let mut b = bucket();
    put(&mut b, "a.txt", "v1", 5);
    let m = b.put_delete_marker("a.txt", "m1".to_string(), "2026-01-02T00:00:00Z".to_string());

    assert!(m.is_delete_marker);
    assert_eq!(m.size, 0);
    let latest = b.latest("a.txt").unwrap();
    assert!(latest.is_delete_marker);
    assert_eq!(ids(&b, "a.txt"), vec!["m1", "v1"]);
    assert_eq!(latest_count(&b, "a.txt"), 1);
}

#[test]
fn removing_latest_promotes_next() {
    let mut b = bucket();
    put(&mut b, "a.txt", "v1", 5);
    put(&mut b, "a.txt", "v2", 10);

    let removed = b.remove_version("a.txt", "v2").unwrap();
    assert_eq!(removed.version_id, "v2");
    assert_eq!(b.latest("a.txt").unwrap().version_id, "v1");
    assert_eq!(latest_count(&b, "a.txt"), 1);
}

#[test]
fn removing_older_version_keeps_latest() {
    let mut b = bucket();
    put(&mut b, "a.txt", "v1", 5);
    put(&mut b, "a.txt", "v2", 10);

    b.remove_version("a.txt", "v1").unwrap();
    assert_eq!(ids(&b, "a.txt"), vec!["v2"]);
    assert!(b.latest("a.txt").unwrap().is_latest);
}

#[test]
fn removing_last_version_drops_key() {
    let mut b = bucket();
    put(&mut b, "a.txt", "v1", 5);
    b.remove_version("a.txt", "v1").unwrap();
    assert!(!b.objects.contains_key("a.txt"));
    assert!(b.remove_version("a.txt", "v1").is_none());
}

#[test]
fn rollback_deletes_newer_versions() {
    let mut b = bucket();
    put(&mut b, "a.txt", "v1", 5);
    put(&mut b, "a.txt", "v2", 10);
    b.put_delete_marker("a.txt", "m3".to_string(), "2026-01-03T00:00:00Z".to_string());

    let removed = b.rollback("a.txt", "v1").unwrap();
    let removed_ids: Vec<&str> = removed.iter().map(|v| v.version_id.as_str()).collect();
    assert_eq!(removed_ids, vec!["m3", "v2"]);
    assert_eq!(ids(&b, "a.txt"), vec!["v1"]);
    assert!(b.latest("a.txt").unwrap().is_latest);
    assert_eq!(b.latest("a.txt").unwrap().size, 5);
}

#[test]
fn rollback_to_middle_keeps_older_versions_non_latest() {
    let mut b = bucket();
    put(&mut b, "a.txt", "v1", 1);
    put(&mut b, "a.txt", "v2", 2);
    put(&mut b, "a.txt", "v3", 3);

    b.rollback("a.txt", "v2").unwrap();
    assert_eq!(ids(&b, "a.txt"), vec!["v2", "v1"]);
    assert!(b.versions("a.txt")[0].is_latest);
    assert!(!b.versions("a.txt")[1].is_latest);
}

#[test]
fn rollback_to_unknown_version_changes_nothing() {
    let mut b = bucket();
    put(&mut b, "a.txt", "v1", 5);
    put(&mut b, "a.txt", "v2", 10);
    let before = b.versions("a.txt").to_vec();

    assert!(b.rollback("a.txt", "nope").is_none());
    assert!(b.rollback("other.txt", "v1").is_none());
    assert_eq!(b.versions("a.txt"), before.as_slice());
}

#[test]
fn find_locates_any_version() {
    let mut b = bucket();
    put(&mut b, "a.txt", "v1", 5);
    put(&mut b, "a.txt", "v2", 10);
    assert_eq!(b.find("a.txt", "v1").unwrap().size, 5);
    assert!(b.find("a.txt", "v9").is_none());
}
