use super::*;

use crate::time_utils::fmt_ts_ui;

const HELP: &[&str] = &[
    "Tab / Left / Right   switch between buckets and versions",
    "Up / Down / j / k    move",
    "Enter                open bucket / show version details",
    "v                    toggle latest / all versions",
    "r                    refresh",
    "n                    create bucket",
    "u                    upload a file",
    "d                    download the selected version",
    "b                    roll back to the selected version",
    "x                    delete the selected key (delete marker)",
    "p                    purge the selected version",
    "L                    sign out",
    "q / Esc              quit",
];

impl App {
    pub(in crate::tui_shell) fn open_selected_bucket(&mut self) {
        let Some(name) = self.bucket_names().into_iter().nth(self.bucket_sel) else {
            return;
        };
        self.row_sel = 0;
        let done = format!("opened {}", name);
        self.run_intent(Intent::SelectBucket { name }, &done);
        if self.screen == Screen::Browser && self.selected_bucket().is_some() {
            self.focus = Focus::Objects;
        }
    }

    pub(in crate::tui_shell) fn selected_bucket(&self) -> Option<&str> {
        self.console.as_ref().and_then(Console::selected_bucket)
    }

    pub(in crate::tui_shell) fn toggle_view(&mut self) {
        let Some(console) = self.console.as_mut() else {
            return;
        };
        let mode = console.toggle_view_mode();
        self.row_sel = 0;
        self.set_status(format!("showing {}", mode.label()));
    }

    pub(in crate::tui_shell) fn show_help(&mut self) {
        let lines = HELP.iter().map(|s| s.to_string()).collect();
        self.open_modal("Keys", lines, ModalKind::Viewer);
    }

    pub(in crate::tui_shell) fn show_row_details(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let mut lines = vec![
            format!("key:            {}", row.key),
            format!("version:        {}", row.version_id),
            format!("size:           {} ({} bytes)", row.size_display, row.size),
            format!("last modified:  {}", fmt_ts_ui(&row.last_modified)),
            format!("latest:         {}", if row.is_latest { "yes" } else { "no" }),
        ];
        if row.is_delete_marker {
            lines.push("delete marker:  yes".to_string());
        }
        if let Some(console) = self.console.as_ref() {
            if let Ok(url) = console.download_url(&row.key, Some(&row.version_id)) {
                lines.push(String::new());
                lines.push(format!("url: {}", url));
            }
        }
        self.open_modal(row.key.clone(), lines, ModalKind::Viewer);
    }

    pub(in crate::tui_shell) fn start_create_bucket(&mut self) {
        self.open_text_input(
            "Create bucket",
            "Bucket name (lowercase letters, digits, '.' and '-'):",
            "",
            TextInputAction::CreateBucket,
        );
    }

    pub(in crate::tui_shell) fn start_upload(&mut self) {
        let Some(bucket) = self.selected_bucket().map(str::to_string) else {
            self.set_error("open a bucket first");
            return;
        };
        self.open_text_input(
            format!("Upload to {}", bucket),
            "File to upload; the key is its file name:",
            "",
            TextInputAction::UploadFile,
        );
    }

    pub(in crate::tui_shell) fn start_download(&mut self) {
        let Some(row) = self.selected_row() else {
            self.set_error("no version selected");
            return;
        };
        if row.is_delete_marker {
            self.set_error("a delete marker has no content");
            return;
        }
        let default = default_download_path(&row.key);
        self.open_text_input(
            format!("Download {}", row.key),
            format!("Save version {} to:", row.version_id),
            &default.display().to_string(),
            TextInputAction::DownloadTo {
                key: row.key,
                version_id: Some(row.version_id),
            },
        );
    }

    pub(in crate::tui_shell) fn start_rollback(&mut self) {
        let Some(row) = self.selected_row() else {
            self.set_error("no version selected");
            return;
        };
        self.run_intent(
            Intent::Rollback {
                key: row.key.clone(),
                version_id: row.version_id,
            },
            &format!("rolled back {}", row.key),
        );
    }

    /// Without `purge` the key gets a delete marker; with it the selected
    /// version is removed for good.
    pub(in crate::tui_shell) fn start_delete(&mut self, purge: bool) {
        let Some(row) = self.selected_row() else {
            self.set_error("no version selected");
            return;
        };
        let version_id = purge.then(|| row.version_id.clone());
        let done = if purge {
            format!("purged version {} of {}", row.version_id, row.key)
        } else {
            format!("deleted {}", row.key)
        };
        self.run_intent(
            Intent::Delete {
                key: row.key,
                version_id,
            },
            &done,
        );
    }

    pub(in crate::tui_shell) fn submit_text_input(
        &mut self,
        action: TextInputAction,
        value: String,
    ) {
        let value = value.trim().to_string();
        if value.is_empty() {
            self.set_status("cancelled");
            return;
        }
        match action {
            TextInputAction::CreateBucket => {
                self.run_intent(
                    Intent::CreateBucket {
                        name: value.clone(),
                    },
                    &format!("created bucket {}", value),
                );
            }
            TextInputAction::UploadFile => self.upload_file(PathBuf::from(value)),
            TextInputAction::DownloadTo { key, version_id } => {
                self.download_to(&key, version_id, PathBuf::from(value))
            }
        }
    }

    fn upload_file(&mut self, path: PathBuf) {
        let key = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => {
                self.set_error(format!("not a file: {}", path.display()));
                return;
            }
        };
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.set_error(format!("read {}: {}", path.display(), err));
                return;
            }
        };
        let size = bytes.len();
        let Some(console) = self.console.as_mut() else {
            return;
        };
        let outcome = console.upload(&key, bytes);
        self.apply_outcome(outcome, &format!("uploaded {} ({} bytes)", key, size));
    }

    fn download_to(&mut self, key: &str, version_id: Option<String>, path: PathBuf) {
        let Some(console) = self.console.as_mut() else {
            return;
        };
        let intent = Intent::Download {
            key: key.to_string(),
            version_id,
        };
        let route = match console.begin(intent) {
            Step::Done(ActionOutcome::DownloadReady { route, .. }) => route,
            Step::Done(outcome) => {
                self.apply_outcome(outcome, "");
                return;
            }
            Step::NeedsConfirmation(pending) => {
                let outcome = console.cancel(pending);
                self.apply_outcome(outcome, "");
                return;
            }
        };

        match console.api_mut().download(&route) {
            Ok(bytes) => match std::fs::write(&path, &bytes) {
                Ok(()) => self.set_status(format!(
                    "saved {} ({} bytes) to {}",
                    key,
                    bytes.len(),
                    path.display()
                )),
                Err(err) => self.set_error(format!("write {}: {}", path.display(), err)),
            },
            Err(ApiError::SessionEnded) => {
                console.forget_view();
                self.session_ended();
            }
            Err(err) => self.set_error(format!("download {}: {}", key, err)),
        }
    }
}
