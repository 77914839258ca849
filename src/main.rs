use std::path::PathBuf;

use clap::Subcommand;

mod cli_exec;
mod cli_runtime;

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        /// Server base URL (saved to config)
        #[arg(long)]
        url: Option<String>,
        /// Username (defaults to the last one used)
        #[arg(long)]
        username: Option<String>,
        /// Password (defaults to $VERSO_PASSWORD, else prompts)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the session token
    Logout,

    /// Show server, session and selected settings
    Status {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Configure or show console settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// List buckets
    Buckets {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a bucket
    Mb { bucket: String },

    /// List objects in a bucket
    Ls {
        bucket: String,
        /// Show every version and delete marker
        #[arg(long)]
        all_versions: bool,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload a file as a new object version
    Upload {
        bucket: String,
        file: PathBuf,
        /// Object key (defaults to the file name)
        #[arg(long)]
        key: Option<String>,
    },

    /// Download an object (the current version unless --version-id is given)
    Download {
        bucket: String,
        key: String,
        #[arg(long)]
        version_id: Option<String>,
        /// Output path (defaults to the key's file name)
        #[arg(short = 'o', long, conflicts_with = "url_only")]
        output: Option<PathBuf>,
        /// Print the download URL instead of fetching it
        #[arg(long)]
        url_only: bool,
    },

    /// Make an older version current, deleting every newer version
    Rollback {
        bucket: String,
        key: String,
        version_id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Delete an object (delete marker) or purge one version
    Rm {
        bucket: String,
        key: String,
        /// Purge this version instead of adding a delete marker
        #[arg(long)]
        version_id: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Update settings
    Set {
        /// Server base URL
        #[arg(long)]
        url: Option<String>,
        /// Default username for sign in
        #[arg(long)]
        username: Option<String>,
    },

    /// Show settings
    Show {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(err) = cli_runtime::run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
