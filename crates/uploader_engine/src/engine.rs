use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use thiserror::Error;
use uploader_logging::{uploader_info, uploader_warn};

use crate::store::{DownloadStore, StoreError, StoredDownload};
use crate::upload::{ReqwestUploader, Uploader};
use crate::{
    DownloadId, EngineEvent, FailureKind, RequestId, UploadError, UploadRequest, UploadSettings,
};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Receives engine events on whichever thread produced them.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Upload(UploadRequest),
    Release { download_id: DownloadId },
    Save {
        download_id: DownloadId,
        destination: PathBuf,
    },
}

/// Runs uploads on a background runtime and reports back through an [`EventSink`].
///
/// Dropping the handle stops the worker and removes the download store.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    store: Arc<DownloadStore>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: UploadSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let uploader: Arc<dyn Uploader> = Arc::new(ReqwestUploader::new(settings.clone()));
        Self::with_uploader(settings, uploader, sink)
    }

    pub fn with_uploader(
        settings: UploadSettings,
        uploader: Arc<dyn Uploader>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let store = Arc::new(DownloadStore::new(settings.download_dir.as_deref())?);
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let download_name = settings.download_name;
        let worker_store = store.clone();

        let worker = thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Upload(request) => {
                        let uploader = uploader.clone();
                        let store = worker_store.clone();
                        let sink = sink.clone();
                        let download_name = download_name.clone();
                        runtime.spawn(async move {
                            let request_id = request.request_id;
                            let result = upload_and_store(
                                uploader.as_ref(),
                                store.as_ref(),
                                &download_name,
                                &request,
                            )
                            .await;
                            sink.emit(EngineEvent::UploadCompleted { request_id, result });
                        });
                    }
                    EngineCommand::Release { download_id } => {
                        if let Err(err) = worker_store.revoke(download_id) {
                            uploader_warn!("Release of download {} failed: {}", download_id, err);
                        }
                    }
                    EngineCommand::Save {
                        download_id,
                        destination,
                    } => {
                        let result = worker_store
                            .save_to(download_id, &destination)
                            .map_err(|err| err.to_string());
                        sink.emit(EngineEvent::DownloadSaved {
                            download_id,
                            result,
                        });
                    }
                }
            }
        });

        Ok(Self {
            cmd_tx,
            store,
            worker: Some(worker),
        })
    }

    pub fn upload(&self, request_id: RequestId, file_name: impl Into<String>, path: PathBuf) {
        let _ = self.cmd_tx.send(EngineCommand::Upload(UploadRequest {
            request_id,
            file_name: file_name.into(),
            path,
        }));
    }

    pub fn release(&self, download_id: DownloadId) {
        let _ = self.cmd_tx.send(EngineCommand::Release { download_id });
    }

    pub fn save(&self, download_id: DownloadId, destination: PathBuf) {
        let _ = self.cmd_tx.send(EngineCommand::Save {
            download_id,
            destination,
        });
    }

    pub fn store(&self) -> &DownloadStore {
        &self.store
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        // Closing the command channel lets the worker finish queued releases
        // and exit; uploads still in flight are dropped with the runtime.
        let (closed_tx, _) = mpsc::channel();
        drop(std::mem::replace(&mut self.cmd_tx, closed_tx));
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                uploader_warn!("Engine worker panicked during shutdown");
            }
        }
    }
}

async fn upload_and_store(
    uploader: &dyn Uploader,
    store: &DownloadStore,
    download_name: &str,
    request: &UploadRequest,
) -> Result<StoredDownload, UploadError> {
    uploader_info!(
        "Uploading request_id={} file={}",
        request.request_id,
        request.file_name
    );
    let output = uploader.upload(request).await?;
    let stored = store
        .materialize(download_name, &output.bytes, output.content_type)
        .map_err(|err| UploadError::new(FailureKind::Storage, err.to_string()))?;
    uploader_info!(
        "request_id={} stored {} bytes as {}",
        request.request_id,
        stored.byte_len,
        stored.suggested_name
    );
    Ok(stored)
}
