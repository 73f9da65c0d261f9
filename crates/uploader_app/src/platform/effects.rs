use std::sync::{mpsc, Arc};

use uploader_core::{DownloadHandle, Effect, Msg, UploadFailure};
use uploader_engine::{
    EngineError, EngineEvent, EngineHandle, EventSink, FailureKind, StoredDownload, UploadError,
    UploadSettings,
};
use uploader_logging::{uploader_info, uploader_trace, uploader_warn};

use super::app::Input;

/// Forwards engine events into the app's input queue.
pub(crate) struct AppEventSink {
    tx: mpsc::Sender<Input>,
}

impl AppEventSink {
    pub(crate) fn new(tx: mpsc::Sender<Input>) -> Self {
        Self { tx }
    }
}

impl EventSink for AppEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(Input::Engine(map_event(event)));
    }
}

pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new(
        settings: UploadSettings,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings, sink)?;
        uploader_info!("Downloads are kept under {:?}", engine.store().root());
        Ok(Self { engine })
    }

    /// Executes engine-bound effects. Surface effects belong to the caller.
    pub(crate) fn enqueue(&self, effect: Effect) {
        match effect {
            Effect::Upload { request_id, file } => {
                uploader_info!(
                    "Upload request_id={} name={} size={}",
                    request_id,
                    file.name,
                    file.size
                );
                self.engine.upload(request_id, file.name, file.path);
            }
            Effect::ReleaseDownload { download_id } => self.engine.release(download_id),
            Effect::SaveDownload {
                download_id,
                destination,
            } => self.engine.save(download_id, destination),
            Effect::OpenFilePicker | Effect::SuppressDefaultAction => {
                uploader_trace!("Surface effect {:?} reached the engine runner", effect);
            }
        }
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::UploadCompleted { request_id, result } => Msg::UploadFinished {
            request_id,
            result: result.map(to_handle).map_err(to_failure),
        },
        EngineEvent::DownloadSaved {
            download_id,
            result,
        } => {
            if let Err(err) = &result {
                uploader_warn!("Saving download {} failed: {}", download_id, err);
            }
            Msg::DownloadSaved {
                download_id,
                result,
            }
        }
    }
}

fn to_handle(stored: StoredDownload) -> DownloadHandle {
    DownloadHandle {
        id: stored.id,
        suggested_name: stored.suggested_name,
        url: stored.url,
        byte_len: stored.byte_len,
        content_type: stored.content_type,
    }
}

fn to_failure(err: UploadError) -> UploadFailure {
    match err.kind {
        FailureKind::HttpStatus(code) => UploadFailure::Status(code),
        _ => UploadFailure::Transport(err.message),
    }
}
