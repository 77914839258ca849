use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use verso::{ApiClient, Console, SessionStore};

pub const USER: &str = "admin";
pub const PASSWORD: &str = "password";

pub struct ServerGuard {
    pub base_url: String,
    _data_dir: Option<tempfile::TempDir>,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn spawn_server() -> Result<ServerGuard> {
    spawn_server_with(&[])
}

pub fn spawn_server_with(extra_args: &[&str]) -> Result<ServerGuard> {
    let data_dir = tempfile::tempdir().context("create server tempdir")?;
    let mut guard = spawn_server_at(data_dir.path(), extra_args)?;
    guard._data_dir = Some(data_dir);
    Ok(guard)
}

/// Runs a server over an existing data dir the caller keeps alive.
pub fn spawn_server_at(data_dir: &Path, extra_args: &[&str]) -> Result<ServerGuard> {
    let addr_file = data_dir.join("addr.txt");
    let _ = std::fs::remove_file(&addr_file);

    let child = Command::new(env!("CARGO_BIN_EXE_verso-server"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().unwrap(),
            "--data-dir",
            data_dir.to_str().unwrap(),
            "--user",
            USER,
            "--password",
            PASSWORD,
        ])
        .args(extra_args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn verso-server")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&base_url)?;

    Ok(ServerGuard {
        base_url,
        _data_dir: None,
        child,
    })
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

/// A console against `server` with an in-memory session, not yet signed in.
#[allow(dead_code)]
pub fn console(server: &ServerGuard) -> Result<Console> {
    let api = ApiClient::new(&server.base_url, SessionStore::in_memory())?;
    Ok(Console::new(api))
}

/// A signed-in console.
#[allow(dead_code)]
pub fn signed_in_console(server: &ServerGuard) -> Result<Console> {
    let mut c = console(server)?;
    c.login(USER, PASSWORD)?;
    Ok(c)
}

#[allow(dead_code)]
pub fn login_token(base_url: &str) -> Result<String> {
    let resp = reqwest::blocking::Client::new()
        .post(format!("{}/login", base_url))
        .json(&serde_json::json!({"username": USER, "password": PASSWORD}))
        .send()
        .context("login request")?;
    anyhow::ensure!(resp.status().is_success(), "login failed: {}", resp.status());
    let v: serde_json::Value = resp.json().context("parse login response")?;
    Ok(v["token"].as_str().context("token missing")?.to_string())
}

#[allow(dead_code)]
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
