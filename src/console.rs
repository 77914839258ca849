use crate::api::{ApiClient, ApiError};
use crate::catalog::BucketCatalog;
use crate::dispatcher::ActionPhase;
use crate::history::VersionHistoryStore;
use crate::projector::{Row, ViewMode, project};

/// Everything the console knows: the session (inside the api client), the
/// bucket catalog, the selected bucket's history, and how it is displayed.
///
/// Front ends own one of these and drive it through
/// [`Console::dispatch`](crate::dispatcher) and friends.
pub struct Console {
    pub(crate) api: ApiClient,
    pub(crate) catalog: BucketCatalog,
    pub(crate) history: VersionHistoryStore,
    pub(crate) view_mode: ViewMode,
    pub(crate) phase: ActionPhase,
    pub(crate) last_upload: Option<String>,
}

impl Console {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            catalog: BucketCatalog::default(),
            history: VersionHistoryStore::default(),
            view_mode: ViewMode::default(),
            phase: ActionPhase::Idle,
            last_upload: None,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut ApiClient {
        &mut self.api
    }

    pub fn catalog(&self) -> &BucketCatalog {
        &self.catalog
    }

    pub fn history(&self) -> &VersionHistoryStore {
        &self.history
    }

    /// Version id the server assigned to the most recent upload, if it
    /// succeeded.
    pub fn last_uploaded_version(&self) -> Option<&str> {
        self.last_upload.as_deref()
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    pub fn is_signed_in(&self) -> bool {
        self.api.session().is_active()
    }

    pub fn selected_bucket(&self) -> Option<&str> {
        self.catalog.selected()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.view_mode = self.view_mode.toggled();
        self.view_mode
    }

    /// Rows for the selected bucket under the current view mode.
    pub fn rows(&self) -> Vec<Row> {
        project(self.history.versions(), self.view_mode)
    }

    /// Signs in and stores the token. A rejected login changes nothing.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), LoginError> {
        let token = self.api.login(username, password)?;
        self.api
            .session_mut()
            .set(token)
            .map_err(LoginError::Persist)?;
        self.forget_view();
        tracing::info!(user = username, "signed in");
        Ok(())
    }

    pub fn logout(&mut self) -> anyhow::Result<()> {
        self.forget_view();
        self.api.session_mut().clear()
    }

    /// Drops everything fetched under the current session.
    pub(crate) fn forget_view(&mut self) {
        self.catalog.clear();
        self.history.clear();
        self.last_upload = None;
        self.phase = ActionPhase::Idle;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("store session token: {0:#}")]
    Persist(anyhow::Error),
}
