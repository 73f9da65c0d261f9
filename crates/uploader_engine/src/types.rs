use std::fmt;
use std::path::PathBuf;

use bytes::Bytes;

use crate::StoredDownload;

pub type RequestId = u64;
pub type DownloadId = u64;

/// User-facing message for any non-success status from the endpoint.
pub const SERVER_FAILURE_MESSAGE: &str = "Server error or OCR failed";

/// One file to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub request_id: RequestId,
    pub file_name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutput {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    UploadCompleted {
        request_id: RequestId,
        result: Result<StoredDownload, UploadError>,
    },
    DownloadSaved {
        download_id: DownloadId,
        result: Result<PathBuf, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadError {
    pub kind: FailureKind,
    pub message: String,
}

impl UploadError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for UploadError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    FileRead,
    HttpStatus(u16),
    Timeout,
    Network,
    Body,
    Storage,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::FileRead => write!(f, "file read error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Body => write!(f, "response body error"),
            FailureKind::Storage => write!(f, "download storage error"),
        }
    }
}
