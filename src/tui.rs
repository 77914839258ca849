use std::path::PathBuf;

use anyhow::Result;

use crate::store::ConsoleHome;

#[derive(Clone, Debug)]
pub struct TuiRunOptions {
    pub home: ConsoleHome,

    /// Logs go here while the UI owns the terminal; without it nothing is logged.
    pub log_file: Option<PathBuf>,

    pub persist_session: bool,
}

pub fn run_with_options(opts: TuiRunOptions) -> Result<()> {
    crate::tui_shell::run_with_options(opts)
}
