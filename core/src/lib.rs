//! # Executor Portal Core
//!
//! Platform-free logic behind the upload pages of the Python executor. Nothing in
//! this crate touches the DOM or the network: the web UI feeds user interactions
//! and HTTP results in, and renders whatever state comes out.
//!
//! ## Core Components
//!
//! - [`guidance`]: Static operation → function table with accepted-file hints
//! - [`allow_list`]: Extension allow-lists derived from guidance entries
//! - [`settings`]: Client settings (limits, URLs, timings) shared with the host
//! - [`selection`]: The per-page selection state
//! - [`validation`]: Submission and per-file validation errors
//! - [`controller`]: The form controller driving operation/function/input changes
//! - [`folder_browser`]: Server folder listing with request sequencing
//! - [`api`]: Wire types of the consumed endpoints and fetch errors
//! - [`persist`]: Form state persisted across reloads
//! - [`result_table`]: Search, filter, sort and row details for the results table
//! - [`lookup`]: The single-file "lookup last type" upload form
//! - [`format`]: Display helpers (file sizes, icons)
//! - [`messages`]: Localized user-facing notices

pub mod allow_list;
pub mod api;
pub mod controller;
pub mod folder_browser;
pub mod format;
pub mod guidance;
pub mod lookup;
pub mod messages;
pub mod persist;
pub mod result_table;
pub mod selection;
pub mod settings;
pub mod validation;

pub use allow_list::AllowList;
pub use controller::{FormController, FunctionView};
pub use folder_browser::{FolderBrowser, ListingOutcome, RequestToken};
pub use lookup::LookupForm;
pub use messages::{Level, Notice};
pub use result_table::ResultTable;
pub use selection::{InputMethod, PickedFile, SelectionState};
pub use settings::ClientSettings;
pub use validation::ValidationError;
