use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use verso::confirm::FixedAnswer;
use verso::{ActionOutcome, ApiClient, Console, Intent, SessionStore};

use crate::ConfigCommands;
use crate::cli_runtime::Env;

const PASSWORD_ENV: &str = "VERSO_PASSWORD";

fn prompt_line(label: &str) -> Result<String> {
    eprint!("{}", label);
    std::io::stderr().flush().context("flush prompt")?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub(super) fn handle_login_command(
    env: &Env,
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let mut cfg = env.home.read_config()?;
    if let Some(url) = url {
        cfg.base_url = Some(url);
    }
    let base_url = cfg
        .base_url
        .clone()
        .context("no server configured (pass --url)")?;

    let username = match username.or_else(|| cfg.username.clone()) {
        Some(u) => u,
        None => prompt_line("Username: ")?,
    };
    let password = match password.or_else(|| std::env::var(PASSWORD_ENV).ok()) {
        Some(p) => p,
        None => prompt_line("Password: ")?,
    };

    let api = ApiClient::new(&base_url, env.session()?)?;
    let mut console = Console::new(api);
    console.login(&username, &password)?;

    cfg.username = Some(username.clone());
    env.home.write_config(&cfg)?;
    println!("Signed in to {} as {}", base_url, username);
    Ok(())
}

pub(super) fn handle_logout_command(env: &Env) -> Result<()> {
    let mut session = env.session()?;
    let was_active = session.is_active();
    session.clear()?;
    if was_active {
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct StatusReport {
    home: String,
    base_url: Option<String>,
    username: Option<String>,
    signed_in: bool,
    // None when there was nothing to check or the server could not be reached.
    session_valid: Option<bool>,
}

pub(super) fn handle_status_command(env: &Env, json: bool) -> Result<()> {
    let cfg = env.home.read_config()?;
    let session = env.session()?;

    let mut report = StatusReport {
        home: env.home.root().display().to_string(),
        base_url: cfg.base_url.clone(),
        username: cfg.username.clone(),
        signed_in: session.is_active(),
        session_valid: None,
    };
    let mut check_error = None;

    if let Some(base_url) = &cfg.base_url
        && session.is_active()
    {
        let mut console = Console::new(ApiClient::new(base_url, session)?);
        match console.dispatch(Intent::Refresh, &mut FixedAnswer(false)) {
            ActionOutcome::Completed => report.session_valid = Some(true),
            ActionOutcome::SessionEnded => {
                report.session_valid = Some(false);
                report.signed_in = false;
            }
            ActionOutcome::Failed { error, .. } => check_error = Some(error.to_string()),
            _ => {}
        }
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize status json")?
        );
        return Ok(());
    }

    println!("home: {}", report.home);
    println!("server: {}", report.base_url.as_deref().unwrap_or("(not configured)"));
    if let Some(u) = &report.username {
        println!("user: {}", u);
    }
    let session_line = match (report.signed_in, report.session_valid) {
        (true, Some(true)) => "active".to_string(),
        (false, Some(false)) => "expired (cleared; run `verso login`)".to_string(),
        (true, _) => match &check_error {
            Some(e) => format!("stored (could not verify: {})", e),
            None => "stored".to_string(),
        },
        (false, _) => "signed out".to_string(),
    };
    println!("session: {}", session_line);
    Ok(())
}

pub(super) fn handle_config_command(env: &Env, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Set { url, username } => {
            let mut cfg = env.home.read_config()?;
            if let Some(url) = url {
                ApiClient::new(&url, SessionStore::in_memory())?;
                cfg.base_url = Some(url);
            }
            if let Some(username) = username {
                cfg.username = Some(username);
            }
            env.home.write_config(&cfg)?;
            println!("Updated {}", env.home.root().join("config.json").display());
        }
        ConfigCommands::Show { json } => {
            let cfg = env.home.read_config()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&cfg).context("serialize config json")?
                );
            } else {
                println!("server: {}", cfg.base_url.as_deref().unwrap_or("(not configured)"));
                println!("user: {}", cfg.username.as_deref().unwrap_or("(none)"));
            }
        }
    }
    Ok(())
}
