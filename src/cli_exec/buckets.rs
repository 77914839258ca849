use anyhow::{Context, Result};

use verso::Intent;
use verso::confirm::FixedAnswer;
use verso::time_utils::fmt_ts_ui;

use crate::cli_runtime::{Env, check, finish};

pub(super) fn handle_buckets_command(env: &Env, json: bool) -> Result<()> {
    let mut console = env.console()?;
    check(console.dispatch(Intent::Refresh, &mut FixedAnswer(false)))?;
    let buckets = console.catalog().buckets();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(buckets).context("serialize buckets json")?
        );
        return Ok(());
    }

    if buckets.is_empty() {
        println!("No buckets");
        return Ok(());
    }
    for b in buckets {
        let created = b.creation_date.as_deref().map(fmt_ts_ui).unwrap_or_default();
        println!("{:<40} {}", b.name, created);
    }
    Ok(())
}

pub(super) fn handle_mb_command(env: &Env, bucket: &str) -> Result<()> {
    let mut console = env.console()?;
    let out = console.dispatch(
        Intent::CreateBucket {
            name: bucket.to_string(),
        },
        &mut FixedAnswer(false),
    );
    finish(out, &format!("Created bucket {}", bucket))
}
