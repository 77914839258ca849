use super::*;

#[test]
fn missing_config_reads_as_default() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let home = ConsoleHome::open(tmp.path())?;
    let cfg = home.read_config()?;
    assert_eq!(cfg.version, 1);
    assert!(cfg.base_url.is_none());
    assert!(cfg.username.is_none());
    Ok(())
}

#[test]
fn config_survives_reopen() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let home = ConsoleHome::open(tmp.path())?;
    let cfg = ConsoleConfig {
        base_url: Some("http://127.0.0.1:9000".to_string()),
        username: Some("admin".to_string()),
        ..ConsoleConfig::default()
    };
    home.write_config(&cfg)?;

    let again = ConsoleHome::resolve(Some(tmp.path().to_path_buf()))?;
    assert_eq!(again.require_base_url()?, "http://127.0.0.1:9000");
    assert_eq!(again.read_config()?.username.as_deref(), Some("admin"));
    Ok(())
}

#[test]
fn unknown_config_version_is_rejected() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let home = ConsoleHome::open(tmp.path())?;
    fs::write(tmp.path().join("config.json"), br#"{"version": 7}"#)?;
    let err = home.read_config().unwrap_err();
    assert!(err.to_string().contains("unsupported console config version 7"));
    Ok(())
}

#[test]
fn require_base_url_explains_how_to_configure() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let home = ConsoleHome::open(tmp.path())?;
    let err = home.require_base_url().unwrap_err();
    assert!(err.to_string().contains("no server configured"));
    Ok(())
}

#[test]
fn open_creates_nested_home() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().join("a").join("b");
    let home = ConsoleHome::open(&root)?;
    assert!(root.is_dir());
    assert_eq!(home.session_path(), root.join("session.json"));
    Ok(())
}

#[test]
fn write_atomic_replaces_contents() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("nested").join("f.json");
    write_atomic(&path, b"one")?;
    write_atomic(&path, b"two")?;
    assert_eq!(fs::read(&path)?, b"two");

    let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains("tmp"))
        .collect();
    assert!(leftovers.is_empty());
    Ok(())
}
