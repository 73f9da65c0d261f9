//! Uploader core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Msg, UploadFailure};
pub use state::{AppState, DownloadHandle, DownloadId, Phase, RequestId, SelectedFile};
pub use update::update;
pub use view_model::{
    format_megabytes, AppViewModel, DownloadLinkView, FileInfoView, PhaseKind, SaveOutcome,
    DEFAULT_FAILURE_MESSAGE, STATUS_CONVERTING, STATUS_DONE,
};
