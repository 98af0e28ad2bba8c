use chrono::NaiveDate;
use executor_portal_core::api::{FetchError, FolderEntry, FolderFile};
use executor_portal_core::controller::FormController;
use executor_portal_core::persist::{self, MemoryStore};
use executor_portal_core::selection::{InputMethod, Listing, PickedFile};
use executor_portal_core::validation::{DateRangeProblem, ValidationError};
use executor_portal_core::{messages, ClientSettings, Level, ListingOutcome};

const HOUR_MS: i64 = 3_600_000;

fn controller() -> FormController {
    FormController::new(ClientSettings::default())
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[test]
fn pick_and_place_functions_and_panels() {
    let mut c = controller();
    let names: Vec<_> = c.select_operation("Pick & Place").unwrap().iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["PNP_CHANG_TYPE", "PNP_AUTO_UPH"]);

    let view = c.select_function("PNP_CHANG_TYPE").unwrap();
    assert!(view.show_lookup);
    assert!(!view.show_date_range);
    assert_eq!(view.guidance.unwrap().accepted_files, &["Excel (.xlsx, .xls)", "CSV (.csv)"]);

    let view = c.select_function("PNP_AUTO_UPH").unwrap();
    assert!(!view.show_lookup);
    assert!(view.show_date_range);
}

#[test]
fn upload_file_checks() {
    let mut c = controller();
    c.select_operation("DA").unwrap();
    c.select_function("DIE_ATTACK_AUTO_UPH").unwrap();

    let too_big = c.set_uploads(vec![PickedFile::new("big.csv", 52_428_801)]);
    assert!(matches!(too_big.result, Err(ValidationError::FileTooLarge { .. })));

    let empty = c.set_uploads(vec![PickedFile::new("empty.csv", 0)]);
    assert!(matches!(empty.result, Err(ValidationError::EmptyFile { .. })));

    let pdf = c.set_uploads(vec![PickedFile::new("report.pdf", 100)]);
    assert!(matches!(pdf.result, Err(ValidationError::UnsupportedType { .. })));

    let ok = c.set_uploads(vec![PickedFile::new("die_attack_data.csv", 100)]);
    assert_eq!(ok.result, Ok(1));
    assert_eq!(c.validate_submission().unwrap().file_count, 1);
}

#[test]
fn folder_list_network_failure() {
    let mut c = controller();
    let token = c.begin_load_folders();
    match c.finish_load_folders(token, Err(FetchError::Network("connection refused".into()))) {
        ListingOutcome::Failed(notice) => {
            assert_eq!(notice.level, Level::Error);
            assert_eq!(notice.message, messages::folders_load_failed());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(c.state().folders.is_empty());
    assert!(!c.browser().is_loading_folders());
}

#[test]
fn wb_date_range_rules() {
    let mut c = controller();
    c.select_operation("WB").unwrap();
    c.select_function("WB_AUTO_UPH").unwrap();
    c.set_uploads(vec![PickedFile::new("wb_data.xlsx", 4096)]);
    c.set_date_range(date(2024, 5, 1), date(2024, 4, 1));
    assert_eq!(
        c.validate_submission(),
        Err(ValidationError::InvalidDateRange(DateRangeProblem::StartAfterEnd))
    );

    c.set_use_all_dates(true);
    assert!(c.validate_submission().is_ok());
    c.set_date_range(None, None);
    assert!(c.validate_submission().is_ok());
}

#[test]
fn folder_submission_flow() {
    let mut c = controller();
    c.select_operation("Singulation").unwrap();
    c.select_function("LOGVIEW").unwrap();
    c.set_input_method(InputMethod::Folder);

    let token = c.begin_load_folders();
    let folders = vec![FolderEntry { name: "MC".into(), path: "/data/MC".into() }];
    assert_eq!(c.finish_load_folders(token, Ok(folders)), ListingOutcome::Applied);

    let token = c.begin_select_folder("/data/MC").unwrap();
    assert!(c.state().listing.is_loading());
    let files = vec![
        FolderFile { name: "MC 12.txt".into(), size: 2048 },
        FolderFile { name: "MC 13.txt".into(), size: 1024 },
        FolderFile { name: "summary.xlsx".into(), size: 4096 },
    ];
    c.finish_select_folder(token, Ok(files));

    assert_eq!(c.select_all_supported(), 2);
    let entries = c.file_entries();
    assert!(!entries[2].supported);
    assert_eq!(entries[0].size_label, "2 KB");
    assert_eq!(c.browser().hidden_field_value(c.state()), "MC 12.txt,MC 13.txt");

    let submission = c.validate_submission().unwrap();
    assert_eq!(submission.method, InputMethod::Folder);
    assert_eq!(submission.file_count, 2);
}

#[test]
fn late_response_for_previous_folder_is_dropped() {
    let mut c = controller();
    c.select_operation("DA").unwrap();
    c.select_function("DIE_ATTACK_AUTO_UPH").unwrap();
    c.set_input_method(InputMethod::Folder);

    let old = c.begin_select_folder("/data/old").unwrap();
    let new = c.begin_select_folder("/data/new").unwrap();
    c.finish_select_folder(new, Ok(vec![FolderFile { name: "new.xlsx".into(), size: 1 }]));
    c.toggle_file("new.xlsx");

    let out = c.finish_select_folder(old, Ok(vec![FolderFile { name: "old.xlsx".into(), size: 1 }]));
    assert_eq!(out, ListingOutcome::Stale);
    assert_eq!(c.state().selected_files_value(), "new.xlsx");
    assert_eq!(c.state().selected_folder.as_deref(), Some("/data/new"));
}

#[test]
fn function_change_reevaluates_listed_files() {
    let mut c = controller();
    c.select_operation("Pick & Place").unwrap();
    c.select_function("PNP_AUTO_UPH").unwrap();
    c.set_input_method(InputMethod::Folder);
    let token = c.begin_select_folder("/data/pnp").unwrap();
    c.finish_select_folder(
        token,
        Ok(vec![FolderFile { name: "a.xlsx".into(), size: 1 }, FolderFile { name: "b.csv".into(), size: 1 }]),
    );
    c.select_all_supported();

    c.select_operation("Singulation").unwrap();
    c.select_function("LOGVIEW").unwrap();
    assert!(c.state().selected_files.is_empty());
    assert!(c.file_entries().iter().all(|e| !e.supported));
    assert!(matches!(c.state().listing, Listing::Loaded(_)));
}

#[test]
fn state_survives_reload() {
    let store = MemoryStore::new();
    let settings = ClientSettings::default();

    let mut first = FormController::new(settings.clone());
    first.select_operation("WB").unwrap();
    first.select_function("WB_AUTO_UPH").unwrap();
    first.set_input_method(InputMethod::Folder);
    first.set_show_table(false);
    persist::save(&store, &first.snapshot(10 * HOUR_MS)).unwrap();

    let saved = persist::load(&store, 11 * HOUR_MS, settings.state_max_age()).unwrap();
    let mut second = FormController::new(settings);
    second.restore(&saved);
    assert_eq!(second.state().operation.as_deref(), Some("WB"));
    assert_eq!(second.state().function.as_deref(), Some("WB_AUTO_UPH"));
    assert_eq!(second.state().input_method, InputMethod::Folder);
    assert!(!second.state().show_table);
    assert!(second.function_view().show_date_range);
}

#[test]
fn day_old_state_is_discarded() {
    let store = MemoryStore::new();
    let settings = ClientSettings::default();
    let mut c = FormController::new(settings.clone());
    c.select_operation("DA").unwrap();
    persist::save(&store, &c.snapshot(0)).unwrap();
    assert!(persist::load(&store, 24 * HOUR_MS + 1, settings.state_max_age()).is_none());
}

#[test]
fn restore_skips_unknown_names() {
    let mut c = controller();
    let saved = persist::PersistedFormState {
        selected_operation: "Pick & Place".into(),
        selected_function: "RETIRED_FUNCTION".into(),
        input_method: InputMethod::Upload,
        show_table: true,
        timestamp: None,
    };
    c.restore(&saved);
    assert_eq!(c.state().operation.as_deref(), Some("Pick & Place"));
    assert!(c.state().function.is_none());
}
