use std::process::Command;

use anyhow::{Context, Result};

fn run_verso(args: &[&str]) -> Result<String> {
    let out = Command::new(env!("CARGO_BIN_EXE_verso"))
        .args(args)
        .output()
        .with_context(|| format!("run verso {:?}", args))?;

    if !out.status.success() {
        anyhow::bail!(
            "verso {:?} failed (status {:?})\nstdout:\n{}\nstderr:\n{}",
            args,
            out.status,
            String::from_utf8_lossy(&out.stdout),
            String::from_utf8_lossy(&out.stderr)
        );
    }

    Ok(String::from_utf8_lossy(&out.stdout).to_string())
}

#[test]
fn cli_help_surface_is_stable() -> Result<()> {
    let help = run_verso(&["--help"])?;
    assert!(help.contains("Usage: verso"));
    assert!(help.contains("[COMMAND]"));
    for cmd in [
        "login", "logout", "status", "config", "buckets", "mb", "ls", "upload", "download",
        "rollback", "rm",
    ] {
        assert!(help.contains(cmd), "missing {} in help:\n{}", cmd, help);
    }

    let config_help = run_verso(&["config", "--help"])?;
    assert!(config_help.contains("Usage: verso config"));
    assert!(config_help.contains("set"));
    assert!(config_help.contains("show"));

    let rm_help = run_verso(&["rm", "--help"])?;
    assert!(rm_help.contains("--version-id"));
    assert!(rm_help.contains("--yes"));

    Ok(())
}

#[test]
fn tui_refuses_without_a_terminal() -> Result<()> {
    let home = tempfile::tempdir()?;
    let out = Command::new(env!("CARGO_BIN_EXE_verso"))
        .args(["--home", home.path().to_str().unwrap()])
        .stdin(std::process::Stdio::null())
        .output()
        .context("run verso")?;
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("needs a terminal"));
    Ok(())
}
