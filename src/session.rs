use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::model::SessionRecord;
use crate::store::write_atomic;

/// Holds the bearer token for the current session.
///
/// `set` and `clear` are the only writers of the durable slot. The token is
/// opaque; nothing here inspects it.
#[derive(Debug, Default)]
pub struct SessionStore {
    token: Option<String>,
    slot: Option<PathBuf>,
}

impl SessionStore {
    /// A session that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the durable slot at `path`, picking up a token persisted by an
    /// earlier process.
    pub fn open(path: &Path) -> Result<Self> {
        let token = if path.exists() {
            let bytes = fs::read(path).context("read session.json")?;
            let rec: SessionRecord = serde_json::from_slice(&bytes).context("parse session.json")?;
            if rec.version != 1 {
                return Err(anyhow!("unsupported session version {}", rec.version));
            }
            rec.token.filter(|t| !t.is_empty())
        } else {
            None
        };
        Ok(Self {
            token,
            slot: Some(path.to_path_buf()),
        })
    }

    pub fn get(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    pub fn set(&mut self, token: String) -> Result<()> {
        if let Some(path) = &self.slot {
            let rec = SessionRecord {
                version: 1,
                token: Some(token.clone()),
            };
            let bytes = serde_json::to_vec_pretty(&rec).context("serialize session")?;
            write_atomic(path, &bytes).context("write session.json")?;
        }
        self.token = Some(token);
        Ok(())
    }

    /// Drops the token and its durable copy. The in-memory token is gone even
    /// if removing the file fails.
    pub fn clear(&mut self) -> Result<()> {
        self.token = None;
        if let Some(path) = &self.slot
            && path.exists()
        {
            fs::remove_file(path)
                .with_context(|| format!("remove session file {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
