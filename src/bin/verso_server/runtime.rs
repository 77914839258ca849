use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use super::*;

#[derive(Parser)]
#[command(name = "verso-server")]
#[command(about = "Versioned object storage service (development)", long_about = None)]
pub(super) struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub(super) addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    pub(super) addr_file: Option<PathBuf>,

    /// Data directory for bucket indexes and object blobs
    #[arg(long, default_value = "./verso-data")]
    pub(super) data_dir: PathBuf,

    /// User allowed to sign in
    #[arg(long, default_value = "admin")]
    pub(super) user: String,

    /// Password for --user
    #[arg(long, default_value = "password")]
    pub(super) password: String,

    /// Session token lifetime in seconds
    #[arg(long, default_value_t = 3600)]
    pub(super) token_ttl_secs: u64,

    /// Largest accepted upload body
    #[arg(long, default_value_t = 256 * 1024 * 1024)]
    pub(super) max_upload_bytes: usize,

    /// Default log level when VERSO_LOG is not set
    #[arg(long, default_value = "info")]
    pub(super) log_level: tracing::Level,
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level);

    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("create data dir {}", args.data_dir.display()))?;

    let state = build_state(&args)?;
    let app = app_router(state, args.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    tracing::info!(%local_addr, data_dir = %args.data_dir.display(), "verso-server listening");

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

pub(super) fn build_state(args: &Args) -> Result<Arc<AppState>> {
    let buckets = load_buckets_from_disk(&args.data_dir).context("load buckets from disk")?;
    tracing::info!(count = buckets.len(), "loaded buckets");

    let ttl_secs = i64::try_from(args.token_ttl_secs).context("token ttl out of range")?;
    Ok(Arc::new(AppState {
        data_dir: args.data_dir.clone(),
        user: args.user.clone(),
        password_hash: hash_secret(&args.password),
        token_ttl: time::Duration::seconds(ttl_secs),
        buckets: Arc::new(RwLock::new(buckets)),
        tokens: Arc::new(RwLock::new(HashMap::new())),
    }))
}

fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var("VERSO_LOG")
        .from_env_lossy();
    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(filter);
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
#[path = "../../tests/bin/verso_server/runtime_tests.rs"]
mod tests;
