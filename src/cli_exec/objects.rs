use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use verso::confirm::FixedAnswer;
use verso::projector::format_size;
use verso::time_utils::fmt_ts_ui;
use verso::{ActionOutcome, Console, Intent, Row, ViewMode};

use crate::cli_runtime::{Env, check, confirmation_gate, finish};

/// A console with `bucket` selected and its history loaded.
fn console_in(env: &Env, bucket: &str) -> Result<Console> {
    let mut console = env.console()?;
    check(console.dispatch(
        Intent::SelectBucket {
            name: bucket.to_string(),
        },
        &mut FixedAnswer(false),
    ))
    .with_context(|| format!("open bucket {}", bucket))?;
    Ok(console)
}

fn print_rows(rows: &[Row]) {
    if rows.is_empty() {
        println!("No objects");
        return;
    }
    println!(
        "{:<40} {:<34} {:>10}  {:<19}  {}",
        "KEY", "VERSION", "SIZE", "MODIFIED", "FLAGS"
    );
    for r in rows {
        let mut flags = Vec::new();
        if r.is_latest {
            flags.push("latest");
        }
        if r.is_delete_marker {
            flags.push("delete-marker");
        }
        println!(
            "{:<40} {:<34} {:>10}  {:<19}  {}",
            r.key,
            r.version_id,
            r.size_display,
            fmt_ts_ui(&r.last_modified),
            flags.join(",")
        );
    }
}

pub(super) fn handle_ls_command(
    env: &Env,
    bucket: &str,
    all_versions: bool,
    json: bool,
) -> Result<()> {
    let mut console = console_in(env, bucket)?;
    console.set_view_mode(ViewMode::from_show_all(all_versions));
    let rows = console.rows();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).context("serialize rows json")?
        );
    } else {
        print_rows(&rows);
    }
    Ok(())
}

pub(super) fn handle_upload_command(
    env: &Env,
    bucket: &str,
    file: &Path,
    key: Option<String>,
) -> Result<()> {
    let key = match key {
        Some(k) => k,
        None => file
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .with_context(|| format!("cannot derive object key from {}", file.display()))?,
    };
    let bytes = std::fs::read(file).with_context(|| format!("read {}", file.display()))?;
    let size = bytes.len() as u64;

    let mut console = console_in(env, bucket)?;
    let out = console.upload(&key, bytes);
    let version = console.last_uploaded_version().unwrap_or("(not reported)");
    finish(
        out,
        &format!(
            "Uploaded {}/{} ({}) version {}",
            bucket,
            key,
            format_size(size),
            version
        ),
    )
}

pub(super) fn handle_download_command(
    env: &Env,
    bucket: &str,
    key: &str,
    version_id: Option<String>,
    output: Option<PathBuf>,
    url_only: bool,
) -> Result<()> {
    let mut console = console_in(env, bucket)?;
    let out = console.dispatch(
        Intent::Download {
            key: key.to_string(),
            version_id,
        },
        &mut FixedAnswer(false),
    );
    let (url, route) = match out {
        ActionOutcome::DownloadReady { url, route } => (url, route),
        other => {
            check(other)?;
            anyhow::bail!("download did not produce a location");
        }
    };

    if url_only {
        println!("{}", url);
        return Ok(());
    }

    let bytes = console
        .api_mut()
        .download(&route)
        .with_context(|| format!("download {}/{}", bucket, key))?;
    let path = match output {
        Some(p) => p,
        None => PathBuf::from(key.rsplit('/').next().unwrap_or(key)),
    };
    std::fs::write(&path, &bytes).with_context(|| format!("write {}", path.display()))?;
    println!("Saved {} to {}", format_size(bytes.len() as u64), path.display());
    Ok(())
}

pub(super) fn handle_rollback_command(
    env: &Env,
    bucket: &str,
    key: &str,
    version_id: &str,
    yes: bool,
) -> Result<()> {
    let mut console = console_in(env, bucket)?;
    let mut gate = confirmation_gate(yes);
    let out = console.rollback(key, version_id, gate.as_mut());
    finish(
        out,
        &format!("Rolled back {}/{} to version {}", bucket, key, version_id),
    )
}

pub(super) fn handle_rm_command(
    env: &Env,
    bucket: &str,
    key: &str,
    version_id: Option<String>,
    yes: bool,
) -> Result<()> {
    let mut console = console_in(env, bucket)?;
    let mut gate = confirmation_gate(yes);
    let out = console.delete_version(key, version_id.as_deref(), gate.as_mut());
    let done = match &version_id {
        Some(v) => format!("Purged version {} of {}/{}", v, bucket, key),
        None => format!("Deleted {}/{} (delete marker added)", bucket, key),
    };
    finish(out, &done)
}
