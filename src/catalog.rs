use reqwest::Method;

use crate::api::{ApiClient, ApiError, Route};
use crate::history::VersionHistoryStore;
use crate::model::Bucket;

/// Known buckets and the one currently being browsed.
#[derive(Debug, Default)]
pub struct BucketCatalog {
    buckets: Vec<Bucket>,
    selected: Option<String>,
}

impl BucketCatalog {
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn refresh(&mut self, api: &mut ApiClient) -> Result<(), ApiError> {
        match api.get_json::<Vec<Bucket>>(&Route::buckets()) {
            Ok(buckets) => {
                tracing::debug!(count = buckets.len(), "refreshed bucket catalog");
                self.buckets = buckets;
                Ok(())
            }
            Err(ApiError::SessionEnded) => {
                self.clear();
                Err(ApiError::SessionEnded)
            }
            Err(err) => Err(err),
        }
    }

    /// Makes `name` the active bucket and reloads its history. Selecting the
    /// already-active bucket reloads too; that is how mutations refresh.
    pub fn select(
        &mut self,
        api: &mut ApiClient,
        history: &mut VersionHistoryStore,
        name: &str,
    ) -> Result<(), ApiError> {
        if self.selected.as_deref() != Some(name) {
            history.clear();
        }
        self.selected = Some(name.to_string());
        let res = history.load(api, name);
        if matches!(res, Err(ApiError::SessionEnded)) {
            self.clear();
        }
        res
    }

    /// Re-selects the active bucket, if any.
    pub fn reselect(
        &mut self,
        api: &mut ApiClient,
        history: &mut VersionHistoryStore,
    ) -> Result<(), ApiError> {
        match self.selected.clone() {
            Some(name) => self.select(api, history, &name),
            None => Ok(()),
        }
    }

    pub fn create(&mut self, api: &mut ApiClient, name: &str) -> Result<(), ApiError> {
        match api.request(Method::PUT, &Route::bucket(name), None) {
            Ok(_) => {}
            Err(ApiError::SessionEnded) => {
                self.clear();
                return Err(ApiError::SessionEnded);
            }
            Err(err) => return Err(err),
        }
        tracing::info!(bucket = name, "created bucket");
        self.refresh(api)
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.selected = None;
    }
}
