use uploader_logging::{uploader_debug, uploader_info, uploader_warn};

use crate::{
    AppState, DownloadHandle, Effect, Msg, Phase, SelectedFile, UploadFailure,
    DEFAULT_FAILURE_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DropSurfaceActivated => vec![Effect::OpenFilePicker],
        Msg::DragEntered => {
            state.set_highlight(true);
            vec![Effect::SuppressDefaultAction]
        }
        Msg::DragLeft => {
            state.set_highlight(false);
            vec![Effect::SuppressDefaultAction]
        }
        Msg::FilesDropped(files) => {
            state.set_highlight(false);
            let mut effects = vec![Effect::SuppressDefaultAction];
            effects.extend(select_first(&mut state, files));
            effects
        }
        Msg::FilesChosen(files) => select_first(&mut state, files),
        Msg::ConvertClicked => {
            // Re-entry while a request is outstanding is blocked here as well as
            // by the disabled affordance.
            if matches!(state.phase(), Phase::Submitting) {
                uploader_debug!("Convert ignored: upload already in flight");
                return (state, Vec::new());
            }
            match state.begin_submit() {
                Some(ticket) => {
                    uploader_info!(
                        "Submitting request_id={} file={} size={}",
                        ticket.request_id,
                        ticket.file.name,
                        ticket.file.size
                    );
                    let mut effects = release(ticket.displaced);
                    effects.push(Effect::Upload {
                        request_id: ticket.request_id,
                        file: ticket.file,
                    });
                    effects
                }
                None => {
                    uploader_debug!("Convert ignored: no file selected");
                    Vec::new()
                }
            }
        }
        Msg::UploadFinished { request_id, result } => {
            finish_upload(&mut state, request_id, result)
        }
        Msg::SaveDownloadClicked { destination } => match state.current_download() {
            Some(handle) => vec![Effect::SaveDownload {
                download_id: handle.id,
                destination,
            }],
            None => Vec::new(),
        },
        Msg::DownloadSaved {
            download_id,
            result,
        } => {
            // A save that lands after the download was replaced is stale.
            if state.current_download().map(|handle| handle.id) == Some(download_id) {
                state.record_save(result);
            } else {
                uploader_debug!("Ignoring save result for stale download {}", download_id);
            }
            Vec::new()
        }
        Msg::Teardown => release(state.release_download()),
    };

    (state, effects)
}

/// Adopts the first file of a picker/drop collection. Empty collections
/// leave everything as it was.
fn select_first(state: &mut AppState, files: Vec<SelectedFile>) -> Vec<Effect> {
    let total = files.len();
    let Some(file) = files.into_iter().next() else {
        uploader_debug!("Empty file collection; keeping current selection");
        return Vec::new();
    };
    if total > 1 {
        uploader_debug!("{} extra file(s) ignored", total - 1);
    }
    uploader_debug!("Selected {} ({} bytes)", file.name, file.size);
    release(state.select(file))
}

fn finish_upload(
    state: &mut AppState,
    request_id: crate::RequestId,
    result: Result<DownloadHandle, UploadFailure>,
) -> Vec<Effect> {
    if state.latest_request() != Some(request_id) {
        uploader_warn!("Discarding response for superseded request_id={}", request_id);
        return match result {
            Ok(handle) => release(Some(handle)),
            Err(_) => Vec::new(),
        };
    }

    let outcome = match result {
        Ok(handle) => {
            uploader_info!(
                "request_id={} succeeded: {} bytes at {}",
                request_id,
                handle.byte_len,
                handle.url
            );
            Phase::Success(handle)
        }
        Err(failure) => {
            let message = failure_message(failure);
            uploader_warn!("request_id={} failed: {}", request_id, message);
            Phase::Failed(message)
        }
    };
    release(state.finish(outcome))
}

fn failure_message(failure: UploadFailure) -> String {
    match failure {
        UploadFailure::Status(_) => DEFAULT_FAILURE_MESSAGE.to_string(),
        UploadFailure::Transport(message) if message.trim().is_empty() => {
            DEFAULT_FAILURE_MESSAGE.to_string()
        }
        UploadFailure::Transport(message) => message,
    }
}

fn release(handle: Option<DownloadHandle>) -> Vec<Effect> {
    handle
        .map(|handle| Effect::ReleaseDownload {
            download_id: handle.id,
        })
        .into_iter()
        .collect()
}
