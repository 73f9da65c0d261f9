use std::path::PathBuf;

use crate::{DownloadId, RequestId, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand over to the platform's native file selection.
    OpenFilePicker,
    /// Keep the platform from opening a dragged file on its own.
    SuppressDefaultAction,
    /// POST the captured file to the conversion endpoint.
    Upload {
        request_id: RequestId,
        file: SelectedFile,
    },
    /// Drop the local copy behind a download handle.
    ReleaseDownload { download_id: DownloadId },
    SaveDownload {
        download_id: DownloadId,
        destination: PathBuf,
    },
}
