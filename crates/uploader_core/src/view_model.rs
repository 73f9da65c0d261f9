use std::path::PathBuf;

/// Shown in the error panel when the endpoint only reports a failed status.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Server error or OCR failed";
pub const STATUS_CONVERTING: &str = "Converting... this can take a few minutes.";
pub const STATUS_DONE: &str = "Conversion complete.";

/// Interaction phase without its payload, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseKind {
    #[default]
    Idle,
    FileChosen,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfoView {
    pub name: String,
    pub size_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLinkView {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    Failed(String),
}

impl From<Result<PathBuf, String>> for SaveOutcome {
    fn from(result: Result<PathBuf, String>) -> Self {
        match result {
            Ok(path) => SaveOutcome::Saved(path),
            Err(message) => SaveOutcome::Failed(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: PhaseKind,
    pub file: Option<FileInfoView>,
    pub submit_enabled: bool,
    pub status_text: String,
    /// Indeterminate progress indicator.
    pub busy: bool,
    pub result_visible: bool,
    pub error_visible: bool,
    pub error_text: String,
    pub download: Option<DownloadLinkView>,
    pub drop_highlighted: bool,
    pub save_outcome: Option<SaveOutcome>,
    pub dirty: bool,
}

/// Formats a byte count as mebibytes with two decimals, e.g. `"2.00 MB"`.
///
/// Halves round up, so 128 KiB reads `"0.13 MB"`.
pub fn format_megabytes(bytes: u64) -> String {
    const MIB: u128 = 1024 * 1024;
    let hundredths = (u128::from(bytes) * 100 + MIB / 2) / MIB;
    format!("{}.{:02} MB", hundredths / 100, hundredths % 100)
}
