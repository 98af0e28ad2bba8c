//! The index-page form controller.
//!
//! Every user interaction maps to one method here. The UI renders from
//! [`FormController::state`] after each call and persists
//! [`FormController::snapshot`] after each mutating one.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::allow_list::AllowList;
use crate::api::{DateRangePreview, FetchError, FolderEntry, FolderFile};
use crate::folder_browser::{FileEntry, FolderBrowser, ListingOutcome, RequestSequence, RequestToken};
use crate::guidance::{self, FunctionGuidance};
use crate::messages::{self, Notice};
use crate::persist::PersistedFormState;
use crate::selection::{DatePreview, DateRange, InputMethod, PickedFile, SelectionState};
use crate::settings::ClientSettings;
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    #[error("function {function} does not belong to operation {operation}")]
    UnknownFunction { operation: String, function: String },
    #[error("no operation selected")]
    NoOperation,
}

/// What the page shows for the current function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FunctionView {
    pub guidance: Option<&'static FunctionGuidance>,
    pub show_lookup: bool,
    pub show_date_range: bool,
    pub show_data_all: bool,
    pub wants_date_preview: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub result: Result<usize, ValidationError>,
    pub wants_date_preview: bool,
}

impl UploadOutcome {
    /// Toast for the file-change event.
    pub fn notice(&self) -> Notice {
        match &self.result {
            Ok(0) => Notice::info(messages::upload_cancelled()),
            Ok(n) => Notice::success(messages::files_chosen(*n)),
            Err(e) => Notice::error(e.localized()),
        }
    }
}

/// Summary of a validated submission, logged before the native POST proceeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub operation: String,
    pub function: String,
    pub method: InputMethod,
    pub file_count: usize,
}

#[derive(Debug, Default)]
pub struct FormController {
    state: SelectionState,
    settings: ClientSettings,
    browser: FolderBrowser,
    preview: RequestSequence,
    submitting: bool,
}

impl FormController {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings, ..Default::default() }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn browser(&self) -> &FolderBrowser {
        &self.browser
    }

    pub fn select_operation(&mut self, operation: &str) -> Result<&'static [FunctionGuidance], ControllerError> {
        let op = guidance::operation(operation).ok_or_else(|| ControllerError::UnknownOperation(operation.to_string()))?;
        debug!(operation = op.name, "operation selected");
        self.state.operation = Some(op.name.to_string());
        self.apply_function(None);
        Ok(op.functions)
    }

    /// Records the function; an empty name clears it.
    pub fn select_function(&mut self, name: &str) -> Result<FunctionView, ControllerError> {
        let name = name.trim();
        if name.is_empty() {
            self.apply_function(None);
            return Ok(self.function_view());
        }
        let operation = self.state.operation.clone().ok_or(ControllerError::NoOperation)?;
        let entry = guidance::find(&operation, name).ok_or_else(|| ControllerError::UnknownFunction {
            operation: operation.clone(),
            function: name.to_string(),
        })?;
        debug!(operation = %operation, function = entry.name, "function selected");
        self.apply_function(Some(entry));
        Ok(self.function_view())
    }

    fn apply_function(&mut self, entry: Option<&'static FunctionGuidance>) {
        self.state.function = entry.map(|g| g.name.to_string());
        let allow = entry.map(AllowList::for_function).unwrap_or_default();
        self.browser.reevaluate(&mut self.state, &allow);
        if entry.map(|g| g.name) != Some(guidance::DATA_ALL_FUNCTION) {
            self.browser.reset_data_all(&mut self.state);
        }
        self.reset_preview();
    }

    pub fn function_view(&self) -> FunctionView {
        let Some(entry) = self.current_guidance() else {
            return FunctionView::default();
        };
        let show_date_range = guidance::requires_date_range(entry.name);
        FunctionView {
            guidance: Some(entry),
            show_lookup: guidance::requires_lookup(entry.name),
            show_date_range,
            show_data_all: entry.name == guidance::DATA_ALL_FUNCTION,
            wants_date_preview: show_date_range && self.preview_candidate().is_some(),
        }
    }

    fn current_guidance(&self) -> Option<&'static FunctionGuidance> {
        guidance::find(self.state.operation.as_deref()?, self.state.function.as_deref()?)
    }

    /// Global defaults narrowed to the active function's extensions.
    pub fn effective_allow_list(&self) -> AllowList {
        self.settings.default_allow_list().restrict_to(&self.state.allow_list)
    }

    pub fn set_input_method(&mut self, method: InputMethod) {
        if self.state.input_method == method {
            return;
        }
        debug!(method = method.as_str(), "input method changed");
        self.state.input_method = method;
        match method {
            InputMethod::Upload => self.browser.forget_folder(&mut self.state),
            InputMethod::Folder => {
                self.state.uploads.clear();
                self.reset_preview();
            }
        }
    }

    /// Stores the files of the file input (or a drop onto it) and validates them.
    pub fn set_uploads(&mut self, files: Vec<PickedFile>) -> UploadOutcome {
        let result = validation::validate_files(&files, self.settings.max_file_size, &self.effective_allow_list());
        if let Err(e) = &result {
            debug!(code = e.code(), "upload rejected");
        }
        self.state.uploads = files;
        self.reset_preview();
        let wants_date_preview = self.function_view().wants_date_preview;
        UploadOutcome { result, wants_date_preview }
    }

    /// Removes one upload from the preview list.
    pub fn remove_upload(&mut self, index: usize) -> Option<PickedFile> {
        if index >= self.state.uploads.len() {
            return None;
        }
        let removed = self.state.uploads.remove(index);
        self.reset_preview();
        Some(removed)
    }

    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.state.date_range = DateRange::new(start, end);
    }

    pub fn set_start_date(&mut self, value: &str) {
        self.state.date_range.start = DateRange::parse_input(value);
    }

    pub fn set_end_date(&mut self, value: &str) {
        self.state.date_range.end = DateRange::parse_input(value);
    }

    pub fn set_use_all_dates(&mut self, value: bool) {
        self.state.use_all_dates = value;
    }

    pub fn set_show_table(&mut self, value: bool) {
        self.state.show_table = value;
    }

    pub fn begin_load_folders(&mut self) -> RequestToken {
        self.browser.begin_load_folders()
    }

    pub fn finish_load_folders(&mut self, token: RequestToken, result: Result<Vec<FolderEntry>, FetchError>) -> ListingOutcome {
        self.browser.finish_load_folders(&mut self.state, token, result)
    }

    pub fn begin_select_folder(&mut self, path: &str) -> Option<RequestToken> {
        self.browser.begin_select_folder(&mut self.state, path)
    }

    pub fn finish_select_folder(&mut self, token: RequestToken, result: Result<Vec<FolderFile>, FetchError>) -> ListingOutcome {
        self.browser.finish_select_folder(&mut self.state, token, result)
    }

    pub fn file_entries(&self) -> Vec<FileEntry> {
        self.browser.entries(&self.state)
    }

    pub fn toggle_file(&mut self, name: &str) -> bool {
        self.browser.toggle_file(&mut self.state, name)
    }

    pub fn select_all_supported(&mut self) -> usize {
        self.browser.select_all_supported(&mut self.state)
    }

    pub fn clear_selection(&mut self) {
        self.browser.clear_selection(&mut self.state)
    }

    /// Starts the data_all listing; only the LOGVIEW function has one.
    pub fn begin_load_data_all(&mut self) -> Option<RequestToken> {
        if !self.function_view().show_data_all {
            return None;
        }
        Some(self.browser.begin_load_data_all(&mut self.state))
    }

    pub fn finish_load_data_all(&mut self, token: RequestToken, result: Result<Vec<String>, FetchError>) -> ListingOutcome {
        self.browser.finish_load_data_all(&mut self.state, token, result)
    }

    pub fn toggle_data_all_file(&mut self, name: &str) -> bool {
        self.browser.toggle_data_all_file(&mut self.state, name)
    }

    /// First spreadsheet upload; the date preview reads its date column.
    /// Uploads that fail validation never leave the browser, previews included.
    pub fn preview_candidate(&self) -> Option<&PickedFile> {
        if self.state.input_method != InputMethod::Upload {
            return None;
        }
        let uploads = &self.state.uploads;
        if validation::validate_files(uploads, self.settings.max_file_size, &self.effective_allow_list()).is_err() {
            return None;
        }
        uploads.iter().find(|f| f.is_spreadsheet())
    }

    pub fn begin_date_preview(&mut self) -> Option<RequestToken> {
        if !self.function_view().wants_date_preview {
            return None;
        }
        self.state.date_preview = DatePreview::Loading;
        Some(self.preview.next())
    }

    /// Applies a preview response and fills still-empty date inputs from it.
    pub fn finish_date_preview(&mut self, token: RequestToken, result: Result<DateRangePreview, FetchError>) -> ListingOutcome {
        if !self.preview.is_current(token) {
            debug!(?token, "dropping stale date preview");
            return ListingOutcome::Stale;
        }
        match result {
            Ok(preview) => {
                if self.state.date_range.start.is_none() {
                    self.state.date_range.start = preview.min();
                }
                if self.state.date_range.end.is_none() {
                    self.state.date_range.end = preview.max();
                }
                self.state.date_preview = DatePreview::Ready(preview);
                ListingOutcome::Applied
            }
            Err(e) => {
                let detail = match e {
                    FetchError::Server(m) if !m.is_empty() => m,
                    other => other.to_string(),
                };
                let message = messages::preview_failed(&detail);
                self.state.date_preview = DatePreview::Failed(message.clone());
                ListingOutcome::Failed(Notice::error(message))
            }
        }
    }

    fn reset_preview(&mut self) {
        self.preview.next();
        self.state.date_preview = DatePreview::Idle;
    }

    pub fn validate_submission(&self) -> Result<Submission, ValidationError> {
        let operation = self.state.operation.clone().ok_or(ValidationError::MissingOperation)?;
        let function = self.state.function.clone().ok_or(ValidationError::MissingFunction)?;
        let file_count = match self.state.input_method {
            InputMethod::Folder => {
                if self.state.selected_folder.is_none() {
                    return Err(ValidationError::MissingFolder);
                }
                if self.state.selected_files.is_empty() {
                    return Err(ValidationError::NoFilesSelected);
                }
                self.state.selected_files.len()
            }
            InputMethod::Upload => {
                if self.state.uploads.is_empty() {
                    return Err(ValidationError::MissingFile);
                }
                validation::validate_files(&self.state.uploads, self.settings.max_file_size, &self.effective_allow_list())?
            }
        };
        if guidance::requires_date_range(&function) && !self.state.use_all_dates {
            validation::validate_date_range(&self.state.date_range)?;
        }
        Ok(Submission { operation, function, method: self.state.input_method, file_count })
    }

    /// Validates and marks the form as submitting. A second call while submitting is refused.
    pub fn begin_submit(&mut self) -> Option<Result<Submission, ValidationError>> {
        if self.submitting {
            return None;
        }
        let result = self.validate_submission();
        match &result {
            Ok(s) => {
                info!(function = %s.function, method = s.method.as_str(), files = s.file_count, "submitting");
                self.submitting = true;
            }
            Err(e) => debug!(code = e.code(), "submission blocked"),
        }
        Some(result)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Clears the submitting flag after a page error or a back navigation.
    pub fn reset_submitting(&mut self) {
        self.submitting = false;
    }

    pub fn snapshot(&self, now_ms: i64) -> PersistedFormState {
        PersistedFormState {
            selected_operation: self.state.operation.clone().unwrap_or_default(),
            selected_function: self.state.function.clone().unwrap_or_default(),
            input_method: self.state.input_method,
            show_table: self.state.show_table,
            timestamp: Some(now_ms),
        }
    }

    /// Replays a saved state through the regular transitions. Unknown names are skipped.
    pub fn restore(&mut self, saved: &PersistedFormState) {
        if !saved.selected_operation.is_empty() {
            match self.select_operation(&saved.selected_operation) {
                Ok(_) if !saved.selected_function.is_empty() => {
                    if let Err(e) = self.select_function(&saved.selected_function) {
                        debug!(error = %e, "saved function skipped");
                    }
                }
                Ok(_) => {}
                Err(e) => debug!(error = %e, "saved operation skipped"),
            }
        }
        self.set_input_method(saved.input_method);
        self.set_show_table(saved.show_table);
    }
}
