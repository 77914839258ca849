use anyhow::Result;

use crate::Commands;
use crate::cli_runtime::Env;

mod buckets;
mod objects;
mod session;

pub(crate) fn handle_command(env: &Env, command: Commands) -> Result<()> {
    match command {
        Commands::Login {
            url,
            username,
            password,
        } => session::handle_login_command(env, url, username, password),
        Commands::Logout => session::handle_logout_command(env),
        Commands::Status { json } => session::handle_status_command(env, json),
        Commands::Config { command } => session::handle_config_command(env, command),
        Commands::Buckets { json } => buckets::handle_buckets_command(env, json),
        Commands::Mb { bucket } => buckets::handle_mb_command(env, &bucket),
        Commands::Ls {
            bucket,
            all_versions,
            json,
        } => objects::handle_ls_command(env, &bucket, all_versions, json),
        Commands::Upload { bucket, file, key } => {
            objects::handle_upload_command(env, &bucket, &file, key)
        }
        Commands::Download {
            bucket,
            key,
            version_id,
            output,
            url_only,
        } => objects::handle_download_command(env, &bucket, &key, version_id, output, url_only),
        Commands::Rollback {
            bucket,
            key,
            version_id,
            yes,
        } => objects::handle_rollback_command(env, &bucket, &key, &version_id, yes),
        Commands::Rm {
            bucket,
            key,
            version_id,
            yes,
        } => objects::handle_rm_command(env, &bucket, &key, version_id, yes),
    }
}
