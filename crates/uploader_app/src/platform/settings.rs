use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;
use uploader_engine::UploadSettings;

use super::logging::LogDestination;

pub(crate) const SETTINGS_FILENAME: &str = "uploader.ron";

#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid endpoint {endpoint:?}: {source}")]
    Endpoint {
        endpoint: String,
        source: url::ParseError,
    },
}

/// On-disk overrides. Every field is optional; absent fields keep defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
struct PersistedSettings {
    endpoint: Option<String>,
    field_name: Option<String>,
    download_name: Option<String>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    download_dir: Option<PathBuf>,
    log_destination: Option<LogDestination>,
    log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AppSettings {
    pub upload: UploadSettings,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            upload: UploadSettings::default(),
            log_destination: LogDestination::File,
            log_level: LevelFilter::Info,
        }
    }
}

/// Loads `{dir}/uploader.ron`. A missing file yields `Ok(None)`.
pub(crate) fn load_settings(dir: &Path) -> Result<Option<AppSettings>, SettingsError> {
    let path = dir.join(SETTINGS_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(SettingsError::Read { path, source }),
    };
    let persisted: PersistedSettings =
        ron::from_str(&content).map_err(|source| SettingsError::Parse { path, source })?;
    apply(persisted).map(Some)
}

fn apply(persisted: PersistedSettings) -> Result<AppSettings, SettingsError> {
    let mut settings = AppSettings::default();
    let upload = &mut settings.upload;

    if let Some(endpoint) = persisted.endpoint {
        url::Url::parse(&endpoint).map_err(|source| SettingsError::Endpoint {
            endpoint: endpoint.clone(),
            source,
        })?;
        upload.endpoint = endpoint;
    }
    if let Some(field_name) = persisted.field_name {
        upload.field_name = field_name;
    }
    if let Some(download_name) = persisted.download_name {
        upload.download_name = download_name;
    }
    upload.connect_timeout = persisted.connect_timeout_secs.map(Duration::from_secs);
    upload.request_timeout = persisted.request_timeout_secs.map(Duration::from_secs);
    upload.download_dir = persisted.download_dir;

    if let Some(destination) = persisted.log_destination {
        settings.log_destination = destination;
    }
    if let Some(level) = persisted.log_level.and_then(|level| level.parse().ok()) {
        settings.log_level = level;
    }
    Ok(settings)
}
