use std::path::PathBuf;

use url::Url;

use crate::view_model::{
    format_megabytes, AppViewModel, DownloadLinkView, FileInfoView, PhaseKind, STATUS_CONVERTING,
    STATUS_DONE,
};

pub type RequestId = u64;
pub type DownloadId = u64;

/// The file the user intends to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            size,
            path: path.into(),
        }
    }
}

/// Locally materialized conversion result, offered for saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadHandle {
    pub id: DownloadId,
    pub suggested_name: String,
    pub url: Url,
    pub byte_len: u64,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    FileChosen,
    Submitting,
    Success(DownloadHandle),
    Failed(String),
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::FileChosen => PhaseKind::FileChosen,
            Phase::Submitting => PhaseKind::Submitting,
            Phase::Success(_) => PhaseKind::Success,
            Phase::Failed(_) => PhaseKind::Failed,
        }
    }
}

pub(crate) struct SubmitTicket {
    pub(crate) request_id: RequestId,
    pub(crate) file: SelectedFile,
    pub(crate) displaced: Option<DownloadHandle>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    phase: Phase,
    selected: Option<SelectedFile>,
    next_request_id: RequestId,
    latest_request: Option<RequestId>,
    drop_highlighted: bool,
    last_save: Option<Result<PathBuf, String>>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            selected: None,
            next_request_id: 1,
            latest_request: None,
            drop_highlighted: false,
            last_save: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    /// Request whose response is still expected, if any.
    pub fn latest_request(&self) -> Option<RequestId> {
        self.latest_request
    }

    pub fn current_download(&self) -> Option<&DownloadHandle> {
        match &self.phase {
            Phase::Success(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let kind = self.phase.kind();
        let submit_enabled = self.selected.is_some()
            && matches!(
                kind,
                PhaseKind::FileChosen | PhaseKind::Success | PhaseKind::Failed
            );
        let status_text = match kind {
            PhaseKind::Submitting => STATUS_CONVERTING.to_string(),
            PhaseKind::Success => STATUS_DONE.to_string(),
            PhaseKind::Idle | PhaseKind::FileChosen | PhaseKind::Failed => String::new(),
        };
        let error_text = match &self.phase {
            Phase::Failed(message) => message.clone(),
            _ => String::new(),
        };

        AppViewModel {
            phase: kind,
            file: self.selected.as_ref().map(|file| FileInfoView {
                name: file.name.clone(),
                size_text: format_megabytes(file.size),
            }),
            submit_enabled,
            status_text,
            busy: kind == PhaseKind::Submitting,
            result_visible: kind == PhaseKind::Success,
            error_visible: kind == PhaseKind::Failed,
            error_text,
            download: self.current_download().map(|handle| DownloadLinkView {
                name: handle.suggested_name.clone(),
                url: handle.url.to_string(),
            }),
            drop_highlighted: self.drop_highlighted,
            save_outcome: self.last_save.clone().map(Into::into),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_highlight(&mut self, highlighted: bool) {
        if self.drop_highlighted != highlighted {
            self.drop_highlighted = highlighted;
            self.dirty = true;
        }
    }

    /// Adopts `file` and returns the download it displaced, if any.
    pub(crate) fn select(&mut self, file: SelectedFile) -> Option<DownloadHandle> {
        self.selected = Some(file);
        self.last_save = None;
        self.dirty = true;
        match std::mem::replace(&mut self.phase, Phase::FileChosen) {
            Phase::Success(handle) => Some(handle),
            _ => None,
        }
    }

    /// Moves to `Submitting` and hands back the request to issue.
    ///
    /// The selected file is cloned into the request so a later selection
    /// cannot change what is being uploaded.
    pub(crate) fn begin_submit(&mut self) -> Option<SubmitTicket> {
        let file = self.selected.clone()?;
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.latest_request = Some(request_id);
        self.last_save = None;
        self.dirty = true;
        let displaced = match std::mem::replace(&mut self.phase, Phase::Submitting) {
            Phase::Success(handle) => Some(handle),
            _ => None,
        };
        Some(SubmitTicket {
            request_id,
            file,
            displaced,
        })
    }

    /// Applies an outcome; returns the download handle it displaced, if any.
    pub(crate) fn finish(&mut self, outcome: Phase) -> Option<DownloadHandle> {
        self.latest_request = None;
        self.dirty = true;
        match std::mem::replace(&mut self.phase, outcome) {
            Phase::Success(handle) => Some(handle),
            _ => None,
        }
    }

    pub(crate) fn record_save(&mut self, result: Result<PathBuf, String>) {
        self.last_save = Some(result);
        self.dirty = true;
    }

    /// Drops the current download, leaving the selection in place.
    pub(crate) fn release_download(&mut self) -> Option<DownloadHandle> {
        if !matches!(self.phase, Phase::Success(_)) {
            return None;
        }
        self.dirty = true;
        match std::mem::replace(&mut self.phase, Phase::FileChosen) {
            Phase::Success(handle) => Some(handle),
            _ => None,
        }
    }
}
