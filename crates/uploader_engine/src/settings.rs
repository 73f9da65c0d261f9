use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    /// Conversion endpoint receiving the multipart POST.
    pub endpoint: String,
    /// Multipart field carrying the file.
    pub field_name: String,
    /// Name suggested for the converted download.
    pub download_name: String,
    /// `None` leaves connection setup to the transport defaults.
    pub connect_timeout: Option<Duration>,
    /// `None` means the request may run for as long as the server takes.
    pub request_timeout: Option<Duration>,
    /// Parent directory for materialized downloads; system temp dir when `None`.
    pub download_dir: Option<PathBuf>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000/upload".to_string(),
            field_name: "pdf_file".to_string(),
            download_name: "output.xlsx".to_string(),
            connect_timeout: None,
            request_timeout: None,
            download_dir: None,
        }
    }
}
