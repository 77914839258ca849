use tempfile::tempdir;

use super::*;

fn args_with_data_dir(data_dir: PathBuf) -> Args {
    Args {
        addr: "127.0.0.1:0".parse().expect("parse socket addr"),
        addr_file: None,
        data_dir,
        user: "admin".to_string(),
        password: "password".to_string(),
        token_ttl_secs: 60,
        max_upload_bytes: 1024,
        log_level: tracing::Level::INFO,
    }
}

#[test]
fn build_state_starts_empty() {
    let temp = tempdir().expect("create temp dir");
    let state = build_state(&args_with_data_dir(temp.path().to_path_buf())).expect("build state");

    assert_eq!(state.user, "admin");
    assert_eq!(state.password_hash, hash_secret("password"));
    assert_eq!(state.token_ttl, time::Duration::seconds(60));
    assert!(state.buckets.try_read().expect("read buckets").is_empty());
}

#[test]
fn buckets_survive_restart() {
    let temp = tempdir().expect("create temp dir");
    let args = args_with_data_dir(temp.path().to_path_buf());

    let state = build_state(&args).expect("build state");
    let mut b = BucketState::new("docs", now_ts());
    b.put_version("a.txt", "v1".to_string(), 5, "\"e1\"".to_string(), now_ts());
    b.put_version("a.txt", "v2".to_string(), 10, "\"e2\"".to_string(), now_ts());
    persist_bucket(&state, &b).expect("persist bucket");
    write_blob(&state, "docs", "a.txt", "v2", b"0123456789").expect("write blob");

    let reloaded = build_state(&args).expect("rebuild state");
    let buckets = reloaded.buckets.try_read().expect("read buckets");
    let docs = buckets.get("docs").expect("docs reloaded");
    let ids: Vec<&str> = docs.versions("a.txt").iter().map(|v| v.version_id.as_str()).collect();
    assert_eq!(ids, vec!["v2", "v1"]);
    assert_eq!(docs.next_seq, 2);
    assert_eq!(
        read_blob(&reloaded, "docs", "a.txt", "v2").expect("read blob"),
        b"0123456789"
    );
}

#[test]
fn blobs_live_under_hashed_key_dirs() {
    let temp = tempdir().expect("create temp dir");
    let state = build_state(&args_with_data_dir(temp.path().to_path_buf())).expect("build state");
    let path = blob_path(&state, "docs", "dir/a b.txt", "v1");
    let rel = path.strip_prefix(temp.path()).expect("under data dir");
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    assert_eq!(parts[0], "buckets");
    assert_eq!(parts[1], "docs");
    assert_eq!(parts[2], "blobs");
    assert_eq!(parts[3].len(), 64);
    assert_eq!(parts[4], "v1");
}

#[test]
fn failed_commit_leaves_bucket_untouched() {
    let temp = tempdir().expect("create temp dir");
    let state = build_state(&args_with_data_dir(temp.path().to_path_buf())).expect("build state");

    let mut b = BucketState::new("docs", now_ts());
    b.put_version("a.txt", "v1".to_string(), 5, "\"e1\"".to_string(), now_ts());
    b.put_version("a.txt", "v2".to_string(), 10, "\"e2\"".to_string(), now_ts());
    persist_bucket(&state, &b).expect("persist bucket");

    // A directory where index.json should be makes every write fail.
    let index = bucket_index_path(&state, "docs");
    std::fs::remove_file(&index).expect("remove index");
    std::fs::create_dir(&index).expect("block index");

    let mut next = b.clone();
    next.rollback("a.txt", "v1").expect("v1 in history");
    assert!(commit_bucket(&state, &mut b, next).is_err());
    let ids: Vec<&str> = b.versions("a.txt").iter().map(|v| v.version_id.as_str()).collect();
    assert_eq!(ids, vec!["v2", "v1"]);

    std::fs::remove_dir(&index).expect("unblock index");
    let mut next = b.clone();
    next.rollback("a.txt", "v1").expect("v1 in history");
    commit_bucket(&state, &mut b, next).expect("commit");
    let ids: Vec<&str> = b.versions("a.txt").iter().map(|v| v.version_id.as_str()).collect();
    assert_eq!(ids, vec!["v1"]);
    assert!(b.latest("a.txt").expect("latest").is_latest);
}
