use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::allow_list::{extension_of, AllowList, SPREADSHEET_EXTENSIONS};
use crate::api::{FolderEntry, FolderFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    #[default]
    Upload,
    Folder,
}

impl InputMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMethod::Upload => "upload",
            InputMethod::Folder => "folder",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "upload" => Some(InputMethod::Upload),
            "folder" => Some(InputMethod::Folder),
            _ => None,
        }
    }
}

/// A file chosen through the file input or dropped onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub size: u64,
}

impl PickedFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self { name: name.into(), size }
    }

    pub fn is_spreadsheet(&self) -> bool {
        extension_of(&self.name)
            .map(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }
}

/// Load state of a server-side listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Listing<T> {
    #[default]
    Hidden,
    Loading,
    Loaded(Vec<T>),
    Failed(String),
}

impl<T> Listing<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Listing::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Listing::Loading)
    }
}

pub type FileListing = Listing<FolderFile>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Accepts `YYYY-MM-DD` (date inputs) and `YYYY/MM/DD`. Blank input is `None`.
    pub fn parse_input(value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(value, "%Y/%m/%d"))
            .ok()
    }

    pub fn is_ordered(&self) -> bool {
        match (self.start, self.end) {
            (Some(s), Some(e)) => s <= e,
            _ => true,
        }
    }
}

/// Date preview lifecycle for date-range functions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DatePreview {
    #[default]
    Idle,
    Loading,
    Ready(crate::api::DateRangePreview),
    Failed(String),
}

/// Everything the index page has picked so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub operation: Option<String>,
    pub function: Option<String>,
    pub input_method: InputMethod,
    pub uploads: Vec<PickedFile>,
    pub folders: Vec<FolderEntry>,
    pub selected_folder: Option<String>,
    pub listing: FileListing,
    pub selected_files: BTreeSet<String>,
    pub data_all: Listing<String>,
    pub data_all_selected: BTreeSet<String>,
    pub date_range: DateRange,
    pub date_preview: DatePreview,
    pub use_all_dates: bool,
    pub show_table: bool,
    /// Allow-list of the active function; empty while no function is chosen.
    pub allow_list: AllowList,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            operation: None,
            function: None,
            input_method: InputMethod::Upload,
            uploads: Vec::new(),
            folders: Vec::new(),
            selected_folder: None,
            listing: Listing::Hidden,
            selected_files: BTreeSet::new(),
            data_all: Listing::Hidden,
            data_all_selected: BTreeSet::new(),
            date_range: DateRange::default(),
            date_preview: DatePreview::Idle,
            use_all_dates: false,
            show_table: true,
            allow_list: AllowList::accept_all(),
        }
    }
}

impl SelectionState {
    pub fn listed_files(&self) -> &[FolderFile] {
        self.listing.items()
    }

    pub fn is_supported(&self, filename: &str) -> bool {
        self.allow_list.is_supported(filename)
    }

    /// Comma-joined value of the `selected_files` hidden field.
    pub fn selected_files_value(&self) -> String {
        self.selected_files.iter().map(String::as_str).collect::<Vec<_>>().join(",")
    }

    pub fn folder_name(&self, path: &str) -> Option<&str> {
        self.folders.iter().find(|f| f.path == path).map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_method_round_trips_through_str() {
        for m in [InputMethod::Upload, InputMethod::Folder] {
            assert_eq!(InputMethod::parse(m.as_str()), Some(m));
        }
        assert_eq!(InputMethod::parse("drive"), None);
    }

    #[test]
    fn date_inputs() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(DateRange::parse_input("2024-05-01"), d);
        assert_eq!(DateRange::parse_input(" 2024/05/01 "), d);
        assert_eq!(DateRange::parse_input(""), None);
        assert_eq!(DateRange::parse_input("01.05.2024"), None);
    }

    #[test]
    fn ordering_only_checked_when_both_present() {
        let may = NaiveDate::from_ymd_opt(2024, 5, 1);
        let april = NaiveDate::from_ymd_opt(2024, 4, 1);
        assert!(!DateRange::new(may, april).is_ordered());
        assert!(DateRange::new(april, may).is_ordered());
        assert!(DateRange::new(may, None).is_ordered());
    }

    #[test]
    fn spreadsheet_detection() {
        assert!(PickedFile::new("a.XLSX", 1).is_spreadsheet());
        assert!(PickedFile::new("a.csv", 1).is_spreadsheet());
        assert!(!PickedFile::new("a.txt", 1).is_spreadsheet());
    }

    #[test]
    fn defaults_show_table_and_upload() {
        let s = SelectionState::default();
        assert!(s.show_table);
        assert_eq!(s.input_method, InputMethod::Upload);
        assert_eq!(s.selected_files_value(), "");
    }
}
