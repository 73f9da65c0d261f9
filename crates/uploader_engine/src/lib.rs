//! Uploader engine: multipart upload, download materialization and effect execution.
mod engine;
mod settings;
mod store;
mod types;
mod upload;

pub use engine::{ChannelEventSink, EngineError, EngineHandle, EventSink};
pub use settings::UploadSettings;
pub use store::{DownloadStore, StoreError, StoredDownload};
pub use types::{
    DownloadId, EngineEvent, FailureKind, RequestId, UploadError, UploadOutput, UploadRequest,
    SERVER_FAILURE_MESSAGE,
};
pub use upload::{ReqwestUploader, Uploader};
