//! Wire types of the backend endpoints the UI consumes.
//!
//! The backend reports application failures as `success: false` with an
//! optional `message` (listings) or `error` (date preview). `into_result`
//! folds those into [`FetchError::Server`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::selection::DateRange;

pub mod endpoints {
    pub const FOLDERS: &str = "/api/folders";
    pub const FOLDER_FILES: &str = "/api/folder-files";
    pub const DATA_ALL_FILES: &str = "/api/get_data_all_files";
    pub const PREVIEW_DATE_RANGE: &str = "/api/preview-date-range";
    pub const UI_CONFIG: &str = "/ui-config.json";
}

/// Field names of the main processing form.
pub mod fields {
    pub const OPERATION: &str = "operation";
    pub const FUNCTION: &str = "func_name";
    pub const INPUT_METHOD: &str = "inputMethod";
    pub const INPUT_FILES: &str = "input_files";
    pub const SELECTED_FOLDER: &str = "selected_folder";
    pub const SELECTED_FILES: &str = "selected_files";
    pub const DATA_ALL_FILES: &str = "data_all_files";
    pub const START_DATE: &str = "start_date";
    pub const END_DATE: &str = "end_date";
    pub const USE_ALL_DATES: &str = "use_all_dates";
    pub const SHOW_TABLE: &str = "show_table";
    /// Multipart field of the date preview request.
    pub const PREVIEW_FILE: &str = "file";
    /// Single file field of the lookup form.
    pub const LOOKUP_FILE: &str = "file";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("server error: {0}")]
    Server(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderFile {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoldersResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub folders: Vec<FolderEntry>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FoldersResponse {
    pub fn into_result(self) -> Result<Vec<FolderEntry>, FetchError> {
        if self.success {
            Ok(self.folders)
        } else {
            Err(FetchError::Server(self.message.unwrap_or_default()))
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderFilesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub files: Vec<FolderFile>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FolderFilesResponse {
    pub fn into_result(self) -> Result<Vec<FolderFile>, FetchError> {
        if self.success {
            Ok(self.files)
        } else {
            Err(FetchError::Server(self.message.unwrap_or_default()))
        }
    }
}

/// `/api/get_data_all_files` has no success flag; a missing list reads as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataAllFilesResponse {
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangePreview {
    pub min_date: String,
    pub max_date: String,
    #[serde(default)]
    pub total_days: i64,
    #[serde(default)]
    pub valid_records: i64,
}

impl DateRangePreview {
    pub fn min(&self) -> Option<NaiveDate> {
        DateRange::parse_input(&self.min_date)
    }

    pub fn max(&self) -> Option<NaiveDate> {
        DateRange::parse_input(&self.max_date)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRangePreviewResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<DateRangePreview>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DateRangePreviewResponse {
    pub fn into_result(self) -> Result<DateRangePreview, FetchError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(FetchError::Decode("missing preview data".to_string())),
            (false, _) => Err(FetchError::Server(self.error.unwrap_or_default())),
        }
    }
}
