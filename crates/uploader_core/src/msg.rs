use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Primary gesture on the drop surface.
    DropSurfaceActivated,
    /// Pointer carrying draggable data entered the drop surface.
    DragEntered,
    /// Pointer carrying draggable data left the drop surface.
    DragLeft,
    /// Files released over the drop surface.
    FilesDropped(Vec<crate::SelectedFile>),
    /// The file picker returned. Empty when the dialog was cancelled.
    FilesChosen(Vec<crate::SelectedFile>),
    /// User activated the convert affordance.
    ConvertClicked,
    /// Engine completion for an upload.
    UploadFinished {
        request_id: crate::RequestId,
        result: Result<crate::DownloadHandle, UploadFailure>,
    },
    /// User asked to save the current download.
    SaveDownloadClicked { destination: PathBuf },
    /// Engine finished copying a download.
    DownloadSaved {
        download_id: crate::DownloadId,
        result: Result<PathBuf, String>,
    },
    /// Controller is going away; release anything still held.
    Teardown,
}

/// Why an upload did not produce a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFailure {
    /// Endpoint answered with a non-success status.
    Status(u16),
    /// The request or the payload could not be completed.
    Transport(String),
}
