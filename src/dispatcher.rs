//! User intents and the actions they trigger.
//!
//! Destructive intents go through a two-phase flow: [`Console::begin`] hands
//! back a [`PendingAction`] describing what will happen, and nothing is sent
//! until [`Console::confirm`] is called with it. Every successful mutation is
//! followed by a full reload of the selected bucket.

use reqwest::{Method, Url};

use crate::api::{ApiError, Route};
use crate::confirm::{Confirmation, ConfirmationGate, Severity};
use crate::console::Console;

const VERSION_ID_HEADER: &str = "x-amz-version-id";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Reload the bucket list and the selected bucket.
    Refresh,
    SelectBucket { name: String },
    CreateBucket { name: String },
    Upload { key: String, bytes: Vec<u8> },
    Download { key: String, version_id: Option<String> },
    Rollback { key: String, version_id: String },
    Delete { key: String, version_id: Option<String> },
}

impl Intent {
    fn name(&self) -> &'static str {
        match self {
            Intent::Refresh => "refresh",
            Intent::SelectBucket { .. } => "select",
            Intent::CreateBucket { .. } => "create-bucket",
            Intent::Upload { .. } => "upload",
            Intent::Download { .. } => "download",
            Intent::Rollback { .. } => "rollback",
            Intent::Delete { .. } => "delete",
        }
    }

    fn needs_bucket(&self) -> bool {
        matches!(
            self,
            Intent::Upload { .. }
                | Intent::Download { .. }
                | Intent::Rollback { .. }
                | Intent::Delete { .. }
        )
    }

    /// The question to put to the user before this intent may run, if any.
    pub fn confirmation(&self, bucket: &str) -> Option<Confirmation> {
        match self {
            Intent::Rollback { key, version_id } => Some(Confirmation {
                title: format!("Roll back {}/{}?", bucket, key),
                lines: vec![
                    format!("Version {} becomes the current version.", version_id),
                    "Every newer version of this key is deleted permanently.".to_string(),
                    "This cannot be undone.".to_string(),
                ],
                severity: Severity::Irreversible,
            }),
            Intent::Delete {
                key,
                version_id: Some(v),
            } => Some(Confirmation {
                title: format!("Delete version {} of {}/{}?", v, bucket, key),
                lines: vec!["This version is removed permanently.".to_string()],
                severity: Severity::Irreversible,
            }),
            Intent::Delete {
                key,
                version_id: None,
            } => Some(Confirmation {
                title: format!("Delete {}/{}?", bucket, key),
                lines: vec![
                    "A delete marker becomes the current version.".to_string(),
                    "Earlier versions stay in the history.".to_string(),
                ],
                severity: Severity::Caution,
            }),
            _ => None,
        }
    }
}

/// Where an action stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionPhase {
    Idle,
    ConfirmationPending,
    InFlight,
    Refreshing,
}

/// What a failed action may have done on the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// The server refused; assume nothing changed.
    Unchanged,
    /// The request may or may not have been applied; refresh to find out.
    Unknown,
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no bucket selected")]
    NoBucketSelected,

    #[error("object key must not be empty")]
    EmptyKey,
}

#[derive(Debug)]
pub enum ActionOutcome {
    /// The action succeeded and the view was reloaded.
    Completed,
    /// A download location; fetching it is up to the caller.
    DownloadReady { url: Url, route: Route },
    Cancelled,
    /// The server rejected the session; it is cleared and the view discarded.
    SessionEnded,
    Failed { error: ActionError, effect: Effect },
    /// The action succeeded but reloading the view did not.
    RefreshFailed { error: ApiError },
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed)
    }
}

/// A destructive intent waiting for the user's answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAction {
    intent: Intent,
    bucket: String,
    confirmation: Confirmation,
}

impl PendingAction {
    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn confirmation(&self) -> &Confirmation {
        &self.confirmation
    }
}

#[derive(Debug)]
pub enum Step {
    NeedsConfirmation(PendingAction),
    Done(ActionOutcome),
}

impl Console {
    /// Starts handling `intent`. Guarded intents stop at
    /// [`Step::NeedsConfirmation`] without touching the server.
    pub fn begin(&mut self, intent: Intent) -> Step {
        let bucket = match (intent.needs_bucket(), self.catalog.selected()) {
            (true, Some(b)) => b.to_string(),
            (true, None) => {
                return Step::Done(fail(ActionError::NoBucketSelected, Effect::Unchanged));
            }
            (false, _) => String::new(),
        };

        if let Some(confirmation) = intent.confirmation(&bucket) {
            self.set_phase(ActionPhase::ConfirmationPending, &intent);
            return Step::NeedsConfirmation(PendingAction {
                intent,
                bucket,
                confirmation,
            });
        }

        Step::Done(self.run(intent, &bucket))
    }

    /// Runs a confirmed action.
    pub fn confirm(&mut self, pending: PendingAction) -> ActionOutcome {
        tracing::debug!(action = pending.intent.name(), "confirmed");
        self.run(pending.intent, &pending.bucket)
    }

    pub fn cancel(&mut self, pending: PendingAction) -> ActionOutcome {
        tracing::debug!(action = pending.intent.name(), "cancelled");
        self.set_phase(ActionPhase::Idle, &pending.intent);
        ActionOutcome::Cancelled
    }

    /// Runs `intent` start to finish, asking `gate` when confirmation is needed.
    pub fn dispatch(&mut self, intent: Intent, gate: &mut dyn ConfirmationGate) -> ActionOutcome {
        match self.begin(intent) {
            Step::Done(outcome) => outcome,
            Step::NeedsConfirmation(pending) => {
                if gate.request_confirmation(pending.confirmation()) {
                    self.confirm(pending)
                } else {
                    self.cancel(pending)
                }
            }
        }
    }

    pub fn upload(&mut self, key: &str, bytes: Vec<u8>) -> ActionOutcome {
        let intent = Intent::Upload {
            key: key.to_string(),
            bytes,
        };
        match self.begin(intent) {
            Step::Done(outcome) => outcome,
            Step::NeedsConfirmation(pending) => self.confirm(pending),
        }
    }

    pub fn rollback(
        &mut self,
        key: &str,
        version_id: &str,
        gate: &mut dyn ConfirmationGate,
    ) -> ActionOutcome {
        self.dispatch(
            Intent::Rollback {
                key: key.to_string(),
                version_id: version_id.to_string(),
            },
            gate,
        )
    }

    pub fn delete_version(
        &mut self,
        key: &str,
        version_id: Option<&str>,
        gate: &mut dyn ConfirmationGate,
    ) -> ActionOutcome {
        self.dispatch(
            Intent::Delete {
                key: key.to_string(),
                version_id: version_id.map(str::to_string),
            },
            gate,
        )
    }

    /// The retrieval URL for `key`; without a version the server serves the
    /// current one. Never guarded, never sends anything.
    pub fn download_url(&self, key: &str, version_id: Option<&str>) -> Result<Url, ActionError> {
        let bucket = self
            .catalog
            .selected()
            .ok_or(ActionError::NoBucketSelected)?;
        Ok(self
            .api
            .url(&Route::object_version(bucket, key, version_id))?)
    }

    fn run(&mut self, intent: Intent, bucket: &str) -> ActionOutcome {
        self.set_phase(ActionPhase::InFlight, &intent);
        let name = intent.name();

        let sent = match intent {
            Intent::Refresh => {
                let res = match self.catalog.refresh(&mut self.api) {
                    Ok(()) => self.catalog.reselect(&mut self.api, &mut self.history),
                    Err(err) => Err(err),
                };
                return self.finish_read(name, res);
            }
            Intent::SelectBucket { name: bucket_name } => {
                let res = self
                    .catalog
                    .select(&mut self.api, &mut self.history, &bucket_name);
                return self.finish_read(name, res);
            }
            Intent::CreateBucket { name: bucket_name } => {
                let res = self.catalog.create(&mut self.api, &bucket_name);
                return self.finish_read(name, res);
            }
            Intent::Download { key, version_id } => {
                let route = Route::object_version(bucket, &key, version_id.as_deref());
                self.phase = ActionPhase::Idle;
                return match self.api.url(&route) {
                    Ok(url) => ActionOutcome::DownloadReady { url, route },
                    Err(err) => fail(err.into(), Effect::Unchanged),
                };
            }
            Intent::Upload { key, bytes } => {
                if key.is_empty() {
                    self.phase = ActionPhase::Idle;
                    return fail(ActionError::EmptyKey, Effect::Unchanged);
                }
                tracing::info!(bucket, key = %key, size = bytes.len(), "upload");
                self.last_upload = None;
                let sent = self
                    .api
                    .request(Method::PUT, &Route::object(bucket, &key), Some(bytes));
                if let Ok(resp) = &sent {
                    self.last_upload = resp
                        .headers()
                        .get(VERSION_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                }
                sent
            }
            Intent::Rollback { key, version_id } => {
                tracing::info!(bucket, key = %key, version_id = %version_id, "rollback");
                self.api.request(
                    Method::POST,
                    &Route::rollback(bucket, &key, &version_id),
                    None,
                )
            }
            Intent::Delete { key, version_id } => {
                tracing::info!(bucket, key = %key, version_id = ?version_id, "delete");
                self.api.request(
                    Method::DELETE,
                    &Route::object_version(bucket, &key, version_id.as_deref()),
                    None,
                )
            }
        };

        if let Err(err) = sent {
            return self.finish_failed(name, err);
        }

        self.phase = ActionPhase::Refreshing;
        tracing::debug!(action = name, "succeeded; reloading bucket");
        match self.catalog.reselect(&mut self.api, &mut self.history) {
            Ok(()) => {
                self.phase = ActionPhase::Idle;
                ActionOutcome::Completed
            }
            Err(ApiError::SessionEnded) => self.end_session(),
            Err(error) => {
                self.phase = ActionPhase::Idle;
                ActionOutcome::RefreshFailed { error }
            }
        }
    }

    fn finish_read(&mut self, name: &'static str, res: Result<(), ApiError>) -> ActionOutcome {
        match res {
            Ok(()) => {
                self.phase = ActionPhase::Idle;
                ActionOutcome::Completed
            }
            Err(err) => self.finish_failed(name, err),
        }
    }

    fn finish_failed(&mut self, name: &'static str, err: ApiError) -> ActionOutcome {
        if matches!(err, ApiError::SessionEnded) {
            return self.end_session();
        }
        self.phase = ActionPhase::Idle;
        let effect = failure_effect(&err);
        tracing::warn!(action = name, ?effect, "action failed: {}", err);
        fail(err.into(), effect)
    }

    fn end_session(&mut self) -> ActionOutcome {
        self.forget_view();
        ActionOutcome::SessionEnded
    }

    fn set_phase(&mut self, phase: ActionPhase, intent: &Intent) {
        tracing::trace!(action = intent.name(), from = ?self.phase, to = ?phase, "phase");
        self.phase = phase;
    }
}

/// What a failed request says about server state. Only a 4xx rejection
/// means nothing was applied.
fn failure_effect(err: &ApiError) -> Effect {
    match err {
        ApiError::Status { status, .. } if *status < 500 => Effect::Unchanged,
        ApiError::InvalidUrl { .. } | ApiError::LoginRejected => Effect::Unchanged,
        _ => Effect::Unknown,
    }
}

fn fail(error: ActionError, effect: Effect) -> ActionOutcome {
    ActionOutcome::Failed { error, effect }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
