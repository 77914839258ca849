use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use verso::confirm::{ConfirmationGate, FixedAnswer, PromptGate};
use verso::store::ConsoleHome;
use verso::{ActionOutcome, ApiClient, Console, Effect, SessionStore};

use crate::Commands;

#[derive(Parser)]
#[command(name = "verso")]
#[command(about = "Console for a versioned object store", long_about = None)]
pub(crate) struct Cli {
    /// Console home directory (defaults to $VERSO_HOME, else ~/.verso)
    #[arg(long, global = true, value_name = "PATH")]
    home: Option<PathBuf>,

    /// Keep the session token in memory only
    #[arg(long, global = true)]
    no_persist: bool,

    /// Write TUI logs to this file
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// What every subcommand needs: where the console lives and how it keeps its session.
pub(crate) struct Env {
    pub(crate) home: ConsoleHome,
    no_persist: bool,
}

impl Env {
    pub(crate) fn session(&self) -> Result<SessionStore> {
        if self.no_persist {
            Ok(SessionStore::in_memory())
        } else {
            SessionStore::open(&self.home.session_path())
        }
    }

    /// A console against the configured server, carrying any stored token.
    pub(crate) fn console(&self) -> Result<Console> {
        let base_url = self.home.require_base_url()?;
        let api = ApiClient::new(&base_url, self.session()?)?;
        Ok(Console::new(api))
    }
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let home = ConsoleHome::resolve(cli.home)?;

    match cli.command {
        None => {
            verso::tui::run_with_options(verso::tui::TuiRunOptions {
                home,
                log_file: cli.log_file,
                persist_session: !cli.no_persist,
            })?;
        }
        Some(command) => {
            if cli.log_file.is_some() {
                anyhow::bail!("`--log-file` is only supported when running the TUI (no subcommand)");
            }
            verso::logging::init_stderr("warn");
            let env = Env {
                home,
                no_persist: cli.no_persist,
            };
            crate::cli_exec::handle_command(&env, command)?
        }
    }

    Ok(())
}

pub(crate) fn confirmation_gate(yes: bool) -> Box<dyn ConfirmationGate> {
    if yes {
        Box::new(FixedAnswer(true))
    } else {
        Box::new(PromptGate::stdio())
    }
}

/// Fails on outcomes that leave the command with nothing to show.
pub(crate) fn check(outcome: ActionOutcome) -> Result<()> {
    match outcome {
        ActionOutcome::SessionEnded => Err(anyhow!(
            "session ended (token rejected by server); run `verso login`"
        )),
        ActionOutcome::Failed { error, effect } => {
            let err = anyhow::Error::new(error);
            match effect {
                Effect::Unchanged => Err(err),
                Effect::Unknown => Err(err.context(
                    "the request may or may not have been applied; check with `verso ls`",
                )),
            }
        }
        _ => Ok(()),
    }
}

/// Reports a mutation's outcome, printing `done` when it went through.
pub(crate) fn finish(outcome: ActionOutcome, done: &str) -> Result<()> {
    match outcome {
        ActionOutcome::Cancelled => {
            println!("Cancelled");
            Ok(())
        }
        ActionOutcome::RefreshFailed { error } => {
            println!("{}", done);
            eprintln!("warning: could not reload bucket afterwards: {}", error);
            Ok(())
        }
        other => {
            check(other)?;
            println!("{}", done);
            Ok(())
        }
    }
}
