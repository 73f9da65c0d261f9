use std::path::PathBuf;
use std::sync::Once;

use pretty_assertions::assert_eq;
use uploader_core::{
    update, AppState, DownloadHandle, DownloadLinkView, Effect, Msg, PhaseKind, SaveOutcome,
    SelectedFile, UploadFailure, DEFAULT_FAILURE_MESSAGE, STATUS_CONVERTING, STATUS_DONE,
};
use url::Url;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(uploader_logging::initialize_for_tests);
}

fn file(name: &str, size: u64) -> SelectedFile {
    SelectedFile::new(name, size, format!("/tmp/{name}"))
}

fn download(id: u64) -> DownloadHandle {
    DownloadHandle {
        id,
        suggested_name: "output.xlsx".to_string(),
        url: Url::parse(&format!("file:///tmp/downloads/{id}/output.xlsx")).unwrap(),
        byte_len: 4,
        content_type: None,
    }
}

fn chosen(name: &str) -> AppState {
    let (state, _) = update(AppState::new(), Msg::FilesChosen(vec![file(name, 1024)]));
    state
}

fn submitted(state: AppState) -> (AppState, u64) {
    let (state, effects) = update(state, Msg::ConvertClicked);
    let request_id = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Upload { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("upload effect");
    (state, request_id)
}

#[test]
fn convert_without_selection_is_noop() {
    init_logging();
    let state = AppState::new();

    let (next, effects) = update(state.clone(), Msg::ConvertClicked);

    assert_eq!(next, state);
    assert_eq!(next.view().phase, PhaseKind::Idle);
    assert!(effects.is_empty());
}

#[test]
fn convert_moves_to_submitting_and_emits_upload() {
    init_logging();
    let (state, effects) = update(chosen("scan.pdf"), Msg::ConvertClicked);
    let view = state.view();

    assert_eq!(
        effects,
        vec![Effect::Upload {
            request_id: 1,
            file: file("scan.pdf", 1024),
        }]
    );
    assert_eq!(view.phase, PhaseKind::Submitting);
    assert!(!view.submit_enabled);
    assert!(view.busy);
    assert_eq!(view.status_text, STATUS_CONVERTING);
}

#[test]
fn second_convert_while_submitting_is_ignored() {
    init_logging();
    let (state, _) = submitted(chosen("scan.pdf"));

    let (next, effects) = update(state.clone(), Msg::ConvertClicked);

    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn success_shows_result_panel_with_download() {
    init_logging();
    let (state, request_id) = submitted(chosen("scan.pdf"));

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            request_id,
            result: Ok(download(1)),
        },
    );
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.phase, PhaseKind::Success);
    assert!(view.result_visible);
    assert!(!view.error_visible);
    assert!(view.submit_enabled);
    assert!(!view.busy);
    assert_eq!(view.status_text, STATUS_DONE);
    assert_eq!(
        view.download,
        Some(DownloadLinkView {
            name: "output.xlsx".to_string(),
            url: "file:///tmp/downloads/1/output.xlsx".to_string(),
        })
    );
}

#[test]
fn status_failure_uses_generic_message() {
    init_logging();
    let (state, request_id) = submitted(chosen("scan.pdf"));

    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request_id,
            result: Err(UploadFailure::Status(500)),
        },
    );
    let view = state.view();

    assert_eq!(view.phase, PhaseKind::Failed);
    assert!(view.error_visible);
    assert!(!view.result_visible);
    assert_eq!(view.error_text, DEFAULT_FAILURE_MESSAGE);
    assert!(view.status_text.is_empty());
    assert!(view.submit_enabled);
    assert!(view.download.is_none());
}

#[test]
fn transport_failure_keeps_its_message() {
    init_logging();
    let (state, request_id) = submitted(chosen("scan.pdf"));

    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request_id,
            result: Err(UploadFailure::Transport("connection refused".to_string())),
        },
    );

    assert_eq!(state.view().error_text, "connection refused");
}

#[test]
fn failed_state_can_resubmit_same_file() {
    init_logging();
    let (state, request_id) = submitted(chosen("scan.pdf"));
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request_id,
            result: Err(UploadFailure::Status(502)),
        },
    );

    let (state, effects) = update(state, Msg::ConvertClicked);

    assert_eq!(
        effects,
        vec![Effect::Upload {
            request_id: 2,
            file: file("scan.pdf", 1024),
        }]
    );
    assert_eq!(state.view().phase, PhaseKind::Submitting);
    assert!(!state.view().error_visible);
}

#[test]
fn resubmitting_after_success_releases_previous_download() {
    init_logging();
    let (state, request_id) = submitted(chosen("scan.pdf"));
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request_id,
            result: Ok(download(7)),
        },
    );

    let (state, effects) = update(state, Msg::ConvertClicked);

    assert_eq!(
        effects,
        vec![
            Effect::ReleaseDownload { download_id: 7 },
            Effect::Upload {
                request_id: 2,
                file: file("scan.pdf", 1024),
            },
        ]
    );
    assert!(state.current_download().is_none());
}

#[test]
fn selecting_after_success_hides_result_and_releases_download() {
    init_logging();
    let (state, request_id) = submitted(chosen("scan.pdf"));
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request_id,
            result: Ok(download(3)),
        },
    );

    let (state, effects) = update(state, Msg::FilesChosen(vec![file("next.pdf", 2048)]));
    let view = state.view();

    assert_eq!(effects, vec![Effect::ReleaseDownload { download_id: 3 }]);
    assert_eq!(view.phase, PhaseKind::FileChosen);
    assert!(!view.result_visible);
    assert!(!view.error_visible);
    assert!(view.status_text.is_empty());
}

#[test]
fn late_response_resolves_against_submitted_request() {
    init_logging();
    let (state, effects) = update(chosen("first.pdf"), Msg::ConvertClicked);
    assert_eq!(
        effects,
        vec![Effect::Upload {
            request_id: 1,
            file: file("first.pdf", 1024),
        }]
    );

    // New selection while the upload is outstanding.
    let (state, effects) = update(state, Msg::FilesChosen(vec![file("second.pdf", 4096)]));
    assert!(effects.is_empty());
    assert_eq!(state.view().phase, PhaseKind::FileChosen);
    assert!(state.view().submit_enabled);

    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request_id: 1,
            result: Ok(download(1)),
        },
    );

    assert_eq!(state.view().phase, PhaseKind::Success);
    assert_eq!(state.selected(), Some(&file("second.pdf", 4096)));

    // The next submit carries the newly selected file.
    let (_state, effects) = update(state, Msg::ConvertClicked);
    assert_eq!(
        effects,
        vec![
            Effect::ReleaseDownload { download_id: 1 },
            Effect::Upload {
                request_id: 2,
                file: file("second.pdf", 4096),
            },
        ]
    );
}

#[test]
fn superseded_response_is_discarded_and_released() {
    init_logging();
    let (state, first) = submitted(chosen("first.pdf"));
    let (state, _) = update(state, Msg::FilesChosen(vec![file("second.pdf", 10)]));
    let (state, second) = submitted(state);
    assert_ne!(first, second);

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            request_id: first,
            result: Ok(download(1)),
        },
    );

    assert_eq!(effects, vec![Effect::ReleaseDownload { download_id: 1 }]);
    assert_eq!(state.view().phase, PhaseKind::Submitting);

    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request_id: second,
            result: Ok(download(2)),
        },
    );
    assert_eq!(state.current_download().map(|d| d.id), Some(2));
}

#[test]
fn save_requests_copy_of_current_download() {
    init_logging();
    let (state, request_id) = submitted(chosen("scan.pdf"));
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request_id,
            result: Ok(download(5)),
        },
    );
    let destination = PathBuf::from("/home/user/output.xlsx");

    let (state, effects) = update(
        state,
        Msg::SaveDownloadClicked {
            destination: destination.clone(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::SaveDownload {
            download_id: 5,
            destination: destination.clone(),
        }]
    );

    let (state, _) = update(
        state,
        Msg::DownloadSaved {
            download_id: 5,
            result: Ok(destination.clone()),
        },
    );
    assert_eq!(state.view().save_outcome, Some(SaveOutcome::Saved(destination)));
}

#[test]
fn save_result_for_replaced_download_is_ignored() {
    init_logging();
    let (state, request_id) = submitted(chosen("scan.pdf"));
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request_id,
            result: Ok(download(5)),
        },
    );
    let (state, request_id) = submitted(state);
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request_id,
            result: Ok(download(6)),
        },
    );

    // The copy of download 5 finishes after download 6 took its place.
    let (mut state, effects) = update(
        state,
        Msg::DownloadSaved {
            download_id: 5,
            result: Ok(PathBuf::from("/home/user/output.xlsx")),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.view().save_outcome, None);
    assert_eq!(state.current_download().map(|d| d.id), Some(6));
    state.consume_dirty();
    let (mut state, _) = update(
        state,
        Msg::DownloadSaved {
            download_id: 6,
            result: Err("disk full".to_string()),
        },
    );
    assert!(state.consume_dirty());
    assert_eq!(
        state.view().save_outcome,
        Some(SaveOutcome::Failed("disk full".to_string()))
    );
}

#[test]
fn save_without_download_is_noop() {
    init_logging();
    let (_state, effects) = update(
        chosen("scan.pdf"),
        Msg::SaveDownloadClicked {
            destination: PathBuf::from("out.xlsx"),
        },
    );

    assert!(effects.is_empty());
}

#[test]
fn teardown_releases_current_download() {
    init_logging();
    let (state, request_id) = submitted(chosen("scan.pdf"));
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request_id,
            result: Ok(download(9)),
        },
    );

    let (state, effects) = update(state, Msg::Teardown);

    assert_eq!(effects, vec![Effect::ReleaseDownload { download_id: 9 }]);
    assert!(state.current_download().is_none());
    assert!(!state.view().result_visible);
}
