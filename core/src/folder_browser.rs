//! Server folder browsing.
//!
//! Listing requests are asynchronous and may resolve out of order. Every
//! `begin_*` call hands out a [`RequestToken`]; a `finish_*` call with a token
//! that is no longer the latest of its kind is dropped as [`ListingOutcome::Stale`].

use tracing::{debug, warn};

use crate::allow_list::AllowList;
use crate::api::{FetchError, FolderEntry, FolderFile};
use crate::format::{file_icon_class, format_file_size};
use crate::messages::{self, Notice};
use crate::selection::{Listing, SelectionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Monotonic generation counter for one kind of request.
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    current: u64,
}

impl RequestSequence {
    pub fn next(&mut self) -> RequestToken {
        self.current += 1;
        RequestToken(self.current)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.current
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingOutcome {
    Applied,
    Failed(Notice),
    Stale,
}

/// One row of the folder file list as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    pub size_label: String,
    pub icon: &'static str,
    pub supported: bool,
    pub selected: bool,
}

#[derive(Debug, Default)]
pub struct FolderBrowser {
    folders: RequestSequence,
    files: RequestSequence,
    data_all: RequestSequence,
    loading_folders: bool,
}

impl FolderBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the folder list request is in flight; the refresh button is disabled meanwhile.
    pub fn is_loading_folders(&self) -> bool {
        self.loading_folders
    }

    pub fn begin_load_folders(&mut self) -> RequestToken {
        self.loading_folders = true;
        self.folders.next()
    }

    pub fn finish_load_folders(
        &mut self,
        state: &mut SelectionState,
        token: RequestToken,
        result: Result<Vec<FolderEntry>, FetchError>,
    ) -> ListingOutcome {
        if !self.folders.is_current(token) {
            debug!(?token, "dropping stale folder list response");
            return ListingOutcome::Stale;
        }
        self.loading_folders = false;
        match result {
            Ok(folders) => {
                debug!(count = folders.len(), "folder list loaded");
                state.folders = folders;
                let still_listed = state
                    .selected_folder
                    .as_deref()
                    .map(|p| state.folders.iter().any(|f| f.path == p))
                    .unwrap_or(true);
                if !still_listed {
                    self.forget_folder(state);
                }
                ListingOutcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "folder list request failed");
                state.folders.clear();
                self.forget_folder(state);
                let message = match e {
                    FetchError::Server(m) if !m.is_empty() => m,
                    _ => messages::folders_load_failed(),
                };
                ListingOutcome::Failed(Notice::error(message))
            }
        }
    }

    /// Chooses a folder. An empty path hides the list; otherwise the list goes to
    /// `Loading` and the returned token must accompany the response.
    pub fn begin_select_folder(&mut self, state: &mut SelectionState, path: &str) -> Option<RequestToken> {
        let token = self.files.next();
        let path = path.trim();
        if path.is_empty() {
            state.selected_folder = None;
            state.listing = Listing::Hidden;
            state.selected_files.clear();
            return None;
        }
        state.selected_folder = Some(path.to_string());
        state.listing = Listing::Loading;
        Some(token)
    }

    pub fn finish_select_folder(
        &mut self,
        state: &mut SelectionState,
        token: RequestToken,
        result: Result<Vec<FolderFile>, FetchError>,
    ) -> ListingOutcome {
        if !self.files.is_current(token) {
            debug!(?token, "dropping stale folder files response");
            return ListingOutcome::Stale;
        }
        match result {
            Ok(files) => {
                debug!(count = files.len(), folder = ?state.selected_folder, "folder files loaded");
                state.listing = Listing::Loaded(files);
                prune_selection(state);
                ListingOutcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "folder files request failed");
                let message = match e {
                    FetchError::Server(m) if !m.is_empty() => m,
                    FetchError::Server(_) => messages::folder_files_failed(),
                    _ => messages::folder_files_error(),
                };
                state.listing = Listing::Failed(message.clone());
                state.selected_files.clear();
                ListingOutcome::Failed(Notice::error(message))
            }
        }
    }

    pub fn entries(&self, state: &SelectionState) -> Vec<FileEntry> {
        state
            .listed_files()
            .iter()
            .map(|f| FileEntry {
                name: f.name.clone(),
                size: f.size,
                size_label: format_file_size(f.size),
                icon: file_icon_class(&f.name),
                supported: state.is_supported(&f.name),
                selected: state.selected_files.contains(&f.name),
            })
            .collect()
    }

    /// Flips one file. Unknown and unsupported names are ignored; returns whether the set changed.
    pub fn toggle_file(&self, state: &mut SelectionState, name: &str) -> bool {
        let listed = state.listed_files().iter().any(|f| f.name == name);
        if !listed || !state.is_supported(name) {
            return false;
        }
        if !state.selected_files.remove(name) {
            state.selected_files.insert(name.to_string());
        }
        true
    }

    pub fn select_all_supported(&self, state: &mut SelectionState) -> usize {
        let supported: Vec<String> = state
            .listed_files()
            .iter()
            .filter(|f| state.is_supported(&f.name))
            .map(|f| f.name.clone())
            .collect();
        state.selected_files.extend(supported);
        state.selected_files.len()
    }

    pub fn clear_selection(&self, state: &mut SelectionState) {
        state.selected_files.clear();
    }

    pub fn selection_count(&self, state: &SelectionState) -> usize {
        state.selected_files.len()
    }

    pub fn hidden_field_value(&self, state: &SelectionState) -> String {
        state.selected_files_value()
    }

    /// Applies a new allow-list to the already listed files without re-fetching.
    pub fn reevaluate(&self, state: &mut SelectionState, allow_list: &AllowList) {
        state.allow_list = allow_list.clone();
        prune_selection(state);
    }

    pub fn begin_load_data_all(&mut self, state: &mut SelectionState) -> RequestToken {
        state.data_all = Listing::Loading;
        self.data_all.next()
    }

    pub fn finish_load_data_all(
        &mut self,
        state: &mut SelectionState,
        token: RequestToken,
        result: Result<Vec<String>, FetchError>,
    ) -> ListingOutcome {
        if !self.data_all.is_current(token) {
            debug!(?token, "dropping stale data_all response");
            return ListingOutcome::Stale;
        }
        match result {
            Ok(files) => {
                state.data_all_selected.retain(|n| files.contains(n));
                state.data_all = Listing::Loaded(files);
                ListingOutcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "data_all listing failed");
                let message = messages::data_all_failed();
                state.data_all = Listing::Failed(message.clone());
                state.data_all_selected.clear();
                ListingOutcome::Failed(Notice::error(message))
            }
        }
    }

    /// Hides the data_all helper and invalidates any pending listing.
    pub fn reset_data_all(&mut self, state: &mut SelectionState) {
        self.data_all.next();
        state.data_all = Listing::Hidden;
        state.data_all_selected.clear();
    }

    pub fn toggle_data_all_file(&self, state: &mut SelectionState, name: &str) -> bool {
        if !state.data_all.items().iter().any(|n| n == name) {
            return false;
        }
        if !state.data_all_selected.remove(name) {
            state.data_all_selected.insert(name.to_string());
        }
        true
    }

    /// Drops the chosen folder and invalidates its pending listing.
    pub fn forget_folder(&mut self, state: &mut SelectionState) {
        self.files.next();
        state.selected_folder = None;
        state.listing = Listing::Hidden;
        state.selected_files.clear();
    }
}

fn prune_selection(state: &mut SelectionState) {
    let SelectionState { listing, selected_files, allow_list, .. } = state;
    let listed = listing.items();
    selected_files.retain(|name| listed.iter().any(|f| &f.name == name) && allow_list.is_supported(name));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64) -> FolderFile {
        FolderFile { name: name.to_string(), size }
    }

    fn loaded(state: &mut SelectionState, browser: &mut FolderBrowser, files: Vec<FolderFile>) {
        let token = browser.begin_select_folder(state, "/data/A").unwrap();
        assert_eq!(browser.finish_select_folder(state, token, Ok(files)), ListingOutcome::Applied);
    }

    #[test]
    fn folder_list_failure_leaves_placeholder_only() {
        let mut state = SelectionState::default();
        let mut browser = FolderBrowser::new();
        let token = browser.begin_load_folders();
        assert!(browser.is_loading_folders());
        let out = browser.finish_load_folders(&mut state, token, Err(FetchError::Network("offline".into())));
        assert!(matches!(out, ListingOutcome::Failed(n) if n.message == messages::folders_load_failed()));
        assert!(state.folders.is_empty());
        assert!(!browser.is_loading_folders());
    }

    #[test]
    fn empty_path_hides_listing() {
        let mut state = SelectionState::default();
        let mut browser = FolderBrowser::new();
        loaded(&mut state, &mut browser, vec![file("a.csv", 1)]);
        browser.toggle_file(&mut state, "a.csv");
        assert!(browser.begin_select_folder(&mut state, "  ").is_none());
        assert_eq!(state.listing, Listing::Hidden);
        assert!(state.selected_files.is_empty());
    }

    #[test]
    fn stale_files_response_is_ignored() {
        let mut state = SelectionState::default();
        let mut browser = FolderBrowser::new();
        let first = browser.begin_select_folder(&mut state, "/data/A").unwrap();
        let second = browser.begin_select_folder(&mut state, "/data/B").unwrap();
        assert_eq!(browser.finish_select_folder(&mut state, second, Ok(vec![file("b.csv", 2)])), ListingOutcome::Applied);
        assert_eq!(browser.finish_select_folder(&mut state, first, Ok(vec![file("a.csv", 1)])), ListingOutcome::Stale);
        assert_eq!(state.listed_files(), &[file("b.csv", 2)]);
        assert_eq!(state.selected_folder.as_deref(), Some("/data/B"));
    }

    #[test]
    fn unsupported_files_cannot_be_toggled() {
        let mut state = SelectionState { allow_list: AllowList::from_extensions([".txt"]), ..Default::default() };
        let mut browser = FolderBrowser::new();
        loaded(&mut state, &mut browser, vec![file("a.csv", 1), file("MC 12.txt", 3)]);
        assert!(!browser.toggle_file(&mut state, "a.csv"));
        assert!(browser.toggle_file(&mut state, "MC 12.txt"));
        let entries = browser.entries(&state);
        assert!(!entries[0].supported);
        assert!(entries[1].selected);
        assert!(browser.toggle_file(&mut state, "MC 12.txt"));
        assert_eq!(browser.selection_count(&state), 0);
    }

    #[test]
    fn select_all_and_clear_are_idempotent() {
        let mut state = SelectionState { allow_list: AllowList::from_extensions([".csv"]), ..Default::default() };
        let mut browser = FolderBrowser::new();
        loaded(&mut state, &mut browser, vec![file("a.csv", 1), file("b.csv", 1), file("c.pdf", 1)]);
        browser.select_all_supported(&mut state);
        let once = state.selected_files.clone();
        browser.select_all_supported(&mut state);
        assert_eq!(state.selected_files, once);
        assert_eq!(browser.hidden_field_value(&state), "a.csv,b.csv");
        browser.clear_selection(&mut state);
        assert!(state.selected_files.is_empty());
        browser.clear_selection(&mut state);
        assert!(state.selected_files.is_empty());
    }

    #[test]
    fn reload_prunes_missing_names() {
        let mut state = SelectionState::default();
        let mut browser = FolderBrowser::new();
        loaded(&mut state, &mut browser, vec![file("a.csv", 1), file("b.csv", 1)]);
        browser.select_all_supported(&mut state);
        let token = browser.begin_select_folder(&mut state, "/data/A").unwrap();
        browser.finish_select_folder(&mut state, token, Ok(vec![file("b.csv", 1)]));
        assert_eq!(browser.hidden_field_value(&state), "b.csv");
    }

    #[test]
    fn reevaluate_drops_newly_unsupported() {
        let mut state = SelectionState::default();
        let mut browser = FolderBrowser::new();
        loaded(&mut state, &mut browser, vec![file("a.csv", 1), file("log.txt", 1)]);
        browser.select_all_supported(&mut state);
        browser.reevaluate(&mut state, &AllowList::from_extensions([".txt"]));
        assert_eq!(browser.hidden_field_value(&state), "log.txt");
        assert!(!browser.entries(&state)[0].supported);
    }

    #[test]
    fn files_failure_uses_server_message() {
        let mut state = SelectionState::default();
        let mut browser = FolderBrowser::new();
        let token = browser.begin_select_folder(&mut state, "/x").unwrap();
        let out = browser.finish_select_folder(&mut state, token, Err(FetchError::Server("no access".into())));
        assert_eq!(out, ListingOutcome::Failed(Notice::error("no access")));
        assert_eq!(state.listing, Listing::Failed("no access".into()));
    }

    #[test]
    fn data_all_listing_and_reset() {
        let mut state = SelectionState::default();
        let mut browser = FolderBrowser::new();
        let token = browser.begin_load_data_all(&mut state);
        browser.finish_load_data_all(&mut state, token, Ok(vec!["MC 12.txt".into()]));
        assert!(browser.toggle_data_all_file(&mut state, "MC 12.txt"));
        assert!(!browser.toggle_data_all_file(&mut state, "missing.txt"));
        let pending = browser.begin_load_data_all(&mut state);
        browser.reset_data_all(&mut state);
        assert_eq!(browser.finish_load_data_all(&mut state, pending, Ok(vec![])), ListingOutcome::Stale);
        assert_eq!(state.data_all, Listing::Hidden);
    }
}
