use std::cell::Cell;
use std::rc::Rc;

use dioxus::prelude::*;
use executor_portal_core::api::fields;
use executor_portal_core::format::{file_icon_class, format_file_size};
use executor_portal_core::messages::{self, Notice};
use executor_portal_core::persist;
use executor_portal_core::selection::{DatePreview, Listing};
use executor_portal_core::{guidance, ClientSettings, FormController, InputMethod, ListingOutcome};
use wasm_bindgen_futures::spawn_local;
use web_sys::console;

use crate::api;
use crate::dom::{self, FormHandles};
use crate::storage::{log_store_error, now_ms, LocalStore};
use crate::ui_utils::notify;

// ----- Zustandsübergänge außerhalb des Renderings -----

fn restored_controller(settings: ClientSettings) -> FormController {
    let max_age = settings.state_max_age();
    let mut ctrl = FormController::new(settings);
    if let Some(store) = LocalStore::open() {
        if let Some(saved) = persist::load(&store, now_ms(), max_age) {
            ctrl.restore(&saved);
        }
    }
    ctrl
}

fn save_state(ctrl: &FormController) {
    let Some(store) = LocalStore::open() else { return };
    if let Err(e) = persist::save(&store, &ctrl.snapshot(now_ms())) {
        log_store_error(e);
    }
}

fn report(outcome: ListingOutcome) {
    if let ListingOutcome::Failed(notice) = outcome {
        notify(notice);
    }
}

fn load_folders(mut ctrl: Signal<FormController>) {
    let token = ctrl.write().begin_load_folders();
    spawn_local(async move {
        let result = api::list_folders().await;
        let outcome = ctrl.write().finish_load_folders(token, result);
        report(outcome);
    });
}

fn open_folder(mut ctrl: Signal<FormController>, path: String) {
    let Some(token) = ctrl.write().begin_select_folder(&path) else { return };
    spawn_local(async move {
        let result = api::list_folder_files(&path).await;
        let outcome = ctrl.write().finish_select_folder(token, result);
        report(outcome);
    });
}

fn load_data_all(mut ctrl: Signal<FormController>) {
    let Some(token) = ctrl.write().begin_load_data_all() else { return };
    spawn_local(async move {
        let result = api::list_data_all_files().await;
        let outcome = ctrl.write().finish_load_data_all(token, result);
        report(outcome);
    });
}

fn start_date_preview(mut ctrl: Signal<FormController>) {
    let candidate = ctrl.peek().preview_candidate().map(|f| f.name.clone());
    let Some(name) = candidate else { return };
    let Some(file) = dom::input_by_id(dom::FILE_INPUT_ID).and_then(|input| dom::file_named(&input, &name)) else {
        return;
    };
    let Some(token) = ctrl.write().begin_date_preview() else { return };
    spawn_local(async move {
        let result = api::preview_date_range(&file).await;
        let outcome = ctrl.write().finish_date_preview(token, result);
        report(outcome);
    });
}

fn files_changed(mut ctrl: Signal<FormController>) {
    let Some(input) = dom::input_by_id(dom::FILE_INPUT_ID) else { return };
    let outcome = ctrl.write().set_uploads(dom::picked_files(&input));
    notify(outcome.notice());
    if outcome.wants_date_preview {
        start_date_preview(ctrl);
    }
}

fn remove_upload(mut ctrl: Signal<FormController>, index: usize) {
    if let Some(input) = dom::input_by_id(dom::FILE_INPUT_ID) {
        dom::remove_file_at(&input, index);
    }
    let removed = ctrl.write().remove_upload(index).is_some();
    let wants_preview = ctrl.peek().function_view().wants_date_preview;
    if removed && wants_preview {
        start_date_preview(ctrl);
    }
}

fn choose_operation(mut ctrl: Signal<FormController>, name: &'static str) {
    let result = ctrl.write().select_operation(name).map(|_| ());
    match result {
        Ok(()) => save_state(&ctrl.peek()),
        Err(e) => notify(Notice::error(e.to_string())),
    }
}

fn choose_function(mut ctrl: Signal<FormController>, name: String) {
    let result = ctrl.write().select_function(&name);
    match result {
        Ok(view) => {
            save_state(&ctrl.peek());
            if let Some(g) = view.guidance {
                notify(Notice::info(messages::function_selected(g.name)));
            }
            if view.show_data_all {
                load_data_all(ctrl);
            }
            if view.wants_date_preview {
                start_date_preview(ctrl);
            }
        }
        Err(e) => notify(Notice::error(e.to_string())),
    }
}

fn change_method(mut ctrl: Signal<FormController>, method: InputMethod) {
    ctrl.write().set_input_method(method);
    save_state(&ctrl.peek());
    if method == InputMethod::Folder {
        if let Some(input) = dom::input_by_id(dom::FILE_INPUT_ID) {
            dom::clear_file_input(&input);
        }
        let needs_folders = {
            let c = ctrl.peek();
            c.state().folders.is_empty() && !c.browser().is_loading_folders()
        };
        if needs_folders {
            load_folders(ctrl);
        }
    }
}

fn wire_form(ctrl: Signal<FormController>, handles: &FormHandles) {
    let mut guard = ctrl;
    dom::on_submit(&handles.form, move |ev| {
        let verdict = guard.write().begin_submit();
        match verdict {
            None => ev.prevent_default(),
            Some(Err(e)) => {
                ev.prevent_default();
                notify(Notice::error(e.localized()));
            }
            Some(Ok(sub)) => {
                console::log_1(
                    &format!("Sende {} / {} ({} Dateien via {})", sub.operation, sub.function, sub.file_count, sub.method.as_str())
                        .into(),
                );
                save_state(&guard.peek());
                notify(Notice::info(messages::processing()));
            }
        }
    });
    dom::install_drop_zone(&handles.drop_zone, &handles.file_input, move || files_changed(ctrl));
    let mut reset = ctrl;
    dom::on_page_reset(move |failed| {
        let was_submitting = reset.peek().is_submitting();
        reset.write().reset_submitting();
        if failed && was_submitting {
            notify(Notice::error(messages::processing_failed()));
        }
    });
}

// ----- Seite -----

#[component]
pub fn Index() -> Element {
    let settings = use_context::<ClientSettings>();
    let ctrl = use_signal({
        let settings = settings.clone();
        move || restored_controller(settings)
    });
    let mut dom_error = use_signal(|| None as Option<String>);
    let wired = use_hook(|| Rc::new(Cell::new(false)));

    // Nach dem ersten Rendern: DOM-Handles auflösen, native Listener, Folgeladen des wiederhergestellten Zustands
    use_effect(move || {
        if wired.replace(true) {
            return;
        }
        match FormHandles::resolve(dom::FORM_ID, dom::FILE_INPUT_ID, dom::DROP_ZONE_ID) {
            Ok(handles) => wire_form(ctrl, &handles),
            Err(e) => {
                console::error_1(&e.clone().into());
                dom_error.set(Some(e));
            }
        }
        let (method, data_all) = {
            let c = ctrl.peek();
            (c.state().input_method, c.function_view().show_data_all)
        };
        if method == InputMethod::Folder {
            load_folders(ctrl);
        }
        if data_all {
            load_data_all(ctrl);
        }
    });

    let c = ctrl.read();
    let state = c.state().clone();
    let view = c.function_view();
    let allow = c.effective_allow_list();
    let entries = c.file_entries();
    let submitting = c.is_submitting();
    let loading_folders = c.browser().is_loading_folders();
    let selected_files = c.browser().hidden_field_value(c.state());
    let selection_count = c.browser().selection_count(c.state());
    drop(c);

    let operation = state.operation.clone().unwrap_or_default();
    let function = state.function.clone().unwrap_or_default();
    let functions = state.operation.as_deref().and_then(guidance::functions_for).unwrap_or(&[]);
    let method = state.input_method;
    let accept = allow.accept_attr();
    let accept_label = allow.extensions().join(", ");
    let accepted = view.guidance.map(|g| g.accepted_files.join(", ")).unwrap_or_default();
    let max_label = format_file_size(settings.max_file_size);
    let uploads: Vec<(usize, String, String, &'static str)> = state
        .uploads
        .iter()
        .enumerate()
        .map(|(i, f)| (i, f.name.clone(), format_file_size(f.size), file_icon_class(&f.name)))
        .collect();
    let selected_folder = state.selected_folder.clone().unwrap_or_default();
    let folder_label = state.folder_name(&selected_folder).map(str::to_string);
    let supported_count = entries.iter().filter(|e| e.supported).count();
    let start = state.date_range.start.map(|d| d.to_string()).unwrap_or_default();
    let end = state.date_range.end.map(|d| d.to_string()).unwrap_or_default();
    let use_all_dates = state.use_all_dates;
    let show_table = state.show_table;

    rsx! {
        div { class: "container",
            if let Some(err) = dom_error() {
                div { class: "alert alert-error", "Formular konnte nicht initialisiert werden: {err}" }
            }
            form { id: dom::FORM_ID, action: "{settings.submit_url}", method: "post", enctype: "multipart/form-data",
                input { r#type: "hidden", name: fields::OPERATION, value: "{operation}" }

                // 1. Operation
                section { class: "step",
                    h2 { "1. เลือก Operation" }
                    div { class: "operation-grid",
                        for op in guidance::operations() {
                            button {
                                key: "{op.name}",
                                r#type: "button",
                                class: if operation == op.name { "operation-card active" } else { "operation-card" },
                                onclick: move |_| choose_operation(ctrl, op.name),
                                i { class: "{op.icon}" }
                                span { "{op.name}" }
                            }
                        }
                    }
                }

                // 2. Funktion + Hinweise
                if !functions.is_empty() {
                    section { class: "step",
                        h2 { "2. เลือกฟังก์ชัน" }
                        select {
                            name: fields::FUNCTION,
                            class: "function-select",
                            onchange: move |e| choose_function(ctrl, e.value()),
                            option { value: "", selected: function.is_empty(), "-- เลือกฟังก์ชัน --" }
                            for f in functions.iter() {
                                option { key: "{f.name}", value: "{f.name}", selected: function == f.name, "{f.name}" }
                            }
                        }
                        if let Some(g) = view.guidance {
                            div { class: "guidance-panel",
                                h3 { i { class: "fas fa-info-circle" } " {g.name}" }
                                p { "{g.description}" }
                                p { class: "accepted", "ไฟล์ที่รองรับ: {accepted}" }
                                p { class: "example", "{g.example}" }
                                if view.show_lookup {
                                    a { class: "btn btn-secondary", href: "{settings.lookup_url}",
                                        i { class: "fas fa-search" } " Lookup Last Type"
                                    }
                                }
                            }
                        }
                    }
                }

                // 3. Eingabemethode
                section { class: "step",
                    h2 { "3. เลือกวิธีนำเข้าไฟล์" }
                    div { class: "method-toggle",
                        label {
                            input {
                                r#type: "radio",
                                name: fields::INPUT_METHOD,
                                value: "upload",
                                checked: method == InputMethod::Upload,
                                onchange: move |_| change_method(ctrl, InputMethod::Upload),
                            }
                            " อัปโหลดไฟล์"
                        }
                        label {
                            input {
                                r#type: "radio",
                                name: fields::INPUT_METHOD,
                                value: "folder",
                                checked: method == InputMethod::Folder,
                                onchange: move |_| change_method(ctrl, InputMethod::Folder),
                            }
                            " เลือกจากโฟลเดอร์"
                        }
                    }

                    div { class: "upload-panel", hidden: method != InputMethod::Upload,
                        div { id: dom::DROP_ZONE_ID, class: "drop-zone",
                            i { class: "fas fa-cloud-upload-alt" }
                            p { "ลากไฟล์มาวางที่นี่ หรือคลิกเพื่อเลือกไฟล์" }
                            small { "ชนิดไฟล์: {accept_label} | สูงสุด {max_label} ต่อไฟล์" }
                        }
                        input {
                            id: dom::FILE_INPUT_ID,
                            r#type: "file",
                            name: fields::INPUT_FILES,
                            multiple: true,
                            hidden: true,
                            accept: "{accept}",
                            disabled: method != InputMethod::Upload,
                            onchange: move |_| files_changed(ctrl),
                        }
                        if !uploads.is_empty() {
                            ul { class: "file-preview",
                                for (idx, name, size, icon) in uploads.into_iter() {
                                    li { key: "{idx}-{name}",
                                        i { class: "{icon}" }
                                        span { class: "file-name", "{name}" }
                                        small { class: "file-size", "{size}" }
                                        button { r#type: "button", class: "btn-remove", title: "ลบไฟล์",
                                            onclick: move |_| remove_upload(ctrl, idx),
                                            "×"
                                        }
                                    }
                                }
                            }
                        }
                    }

                    div { class: "folder-panel", hidden: method != InputMethod::Folder,
                        input { r#type: "hidden", name: fields::SELECTED_FOLDER, value: "{selected_folder}" }
                        input { r#type: "hidden", name: fields::SELECTED_FILES, value: "{selected_files}" }
                        div { class: "folder-toolbar",
                            select {
                                class: "folder-select",
                                disabled: loading_folders,
                                onchange: move |e| open_folder(ctrl, e.value()),
                                option { value: "",
                                    if loading_folders { "กำลังโหลดโฟลเดอร์..." } else { "-- เลือกโฟลเดอร์ --" }
                                }
                                for f in state.folders.iter() {
                                    option { key: "{f.path}", value: "{f.path}", selected: selected_folder == f.path, "{f.name}" }
                                }
                            }
                            button { r#type: "button", class: "btn", disabled: loading_folders,
                                onclick: move |_| load_folders(ctrl),
                                i { class: "fas fa-sync-alt" } " รีเฟรช"
                            }
                        }
                        if let Some(name) = folder_label {
                            p { class: "folder-current", i { class: "fas fa-folder-open" } " {name}" }
                        }
                        {match &state.listing {
                            Listing::Hidden => rsx! {},
                            Listing::Loading => rsx! {
                                div { class: "folder-files loading", i { class: "fas fa-spinner fa-spin" } " กำลังโหลดไฟล์..." }
                            },
                            Listing::Failed(msg) => rsx! {
                                div { class: "folder-files error", i { class: "fas fa-exclamation-triangle" } " {msg}" }
                            },
                            Listing::Loaded(_) if entries.is_empty() => rsx! {
                                div { class: "folder-files empty", {messages::folder_empty()} }
                            },
                            Listing::Loaded(_) => rsx! {
                                div { class: "folder-files",
                                    div { class: "selection-toolbar",
                                        span { {messages::selected_count(selection_count)} }
                                        button { r#type: "button", class: "btn btn-small", disabled: supported_count == 0,
                                            onclick: move |_| {
                                                let mut ctrl = ctrl;
                                                let n = ctrl.write().select_all_supported();
                                                notify(Notice::info(messages::selected_count(n)));
                                            },
                                            "เลือกทั้งหมด"
                                        }
                                        button { r#type: "button", class: "btn btn-small", disabled: selection_count == 0,
                                            onclick: move |_| {
                                                let mut ctrl = ctrl;
                                                ctrl.write().clear_selection();
                                            },
                                            "ล้างการเลือก"
                                        }
                                    }
                                    ul { class: "file-list",
                                        for entry in entries.into_iter() {
                                            li {
                                                key: "{entry.name}",
                                                class: if entry.supported { "file-item" } else { "file-item unsupported" },
                                                label {
                                                    input {
                                                        r#type: "checkbox",
                                                        checked: entry.selected,
                                                        disabled: !entry.supported,
                                                        onchange: {
                                                            let name = entry.name.clone();
                                                            move |_| {
                                                                let mut ctrl = ctrl;
                                                                ctrl.write().toggle_file(&name);
                                                            }
                                                        },
                                                    }
                                                    i { class: "{entry.icon}" }
                                                    span { class: "file-name", "{entry.name}" }
                                                    small { class: "file-size", "{entry.size_label}" }
                                                    if !entry.supported {
                                                        small { class: "badge", "ไม่รองรับ" }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            },
                        }}
                    }
                }

                // LOGVIEW: Dateien aus data_all
                if view.show_data_all {
                    section { class: "step data-all",
                        h2 { "ไฟล์ใน data_all" }
                        {match &state.data_all {
                            Listing::Hidden => rsx! {},
                            Listing::Loading => rsx! { div { class: "loading", "กำลังโหลด..." } },
                            Listing::Failed(msg) => rsx! { div { class: "error", "{msg}" } },
                            Listing::Loaded(files) if files.is_empty() => rsx! {
                                div { class: "empty", {messages::folder_empty()} }
                            },
                            Listing::Loaded(files) => rsx! {
                                ul { class: "file-list",
                                    for name in files.iter().cloned() {
                                        li { key: "{name}",
                                            label {
                                                input {
                                                    r#type: "checkbox",
                                                    name: fields::DATA_ALL_FILES,
                                                    value: "{name}",
                                                    checked: state.data_all_selected.contains(&name),
                                                    onchange: {
                                                        let name = name.clone();
                                                        move |_| {
                                                            let mut ctrl = ctrl;
                                                            ctrl.write().toggle_data_all_file(&name);
                                                        }
                                                    },
                                                }
                                                " {name}"
                                            }
                                        }
                                    }
                                }
                            },
                        }}
                    }
                }

                // Datumsbereich für *_AUTO_UPH
                if view.show_date_range {
                    section { class: "step date-range",
                        h2 { "ช่วงวันที่" }
                        {match &state.date_preview {
                            DatePreview::Idle => rsx! {},
                            DatePreview::Loading => rsx! {
                                div { class: "date-preview loading", i { class: "fas fa-spinner fa-spin" } " กำลังอ่านช่วงวันที่จากไฟล์..." }
                            },
                            DatePreview::Ready(p) => rsx! {
                                div { class: "date-preview",
                                    "ข้อมูลตั้งแต่ {p.min_date} ถึง {p.max_date} ({p.total_days} วัน, {p.valid_records} รายการ)"
                                }
                            },
                            DatePreview::Failed(msg) => rsx! { div { class: "date-preview error", "{msg}" } },
                        }}
                        div { class: "date-inputs",
                            label { "วันที่เริ่มต้น"
                                input {
                                    r#type: "date",
                                    name: fields::START_DATE,
                                    value: "{start}",
                                    disabled: use_all_dates,
                                    oninput: move |e| {
                                        let mut ctrl = ctrl;
                                        ctrl.write().set_start_date(&e.value());
                                    },
                                }
                            }
                            label { "วันที่สิ้นสุด"
                                input {
                                    r#type: "date",
                                    name: fields::END_DATE,
                                    value: "{end}",
                                    disabled: use_all_dates,
                                    oninput: move |e| {
                                        let mut ctrl = ctrl;
                                        ctrl.write().set_end_date(&e.value());
                                    },
                                }
                            }
                        }
                        label { class: "checkbox",
                            input {
                                r#type: "checkbox",
                                name: fields::USE_ALL_DATES,
                                value: "true",
                                checked: use_all_dates,
                                onchange: move |_| {
                                    let mut ctrl = ctrl;
                                    ctrl.write().set_use_all_dates(!use_all_dates);
                                },
                            }
                            " ใช้ข้อมูลทุกวัน"
                        }
                    }
                }

                section { class: "step submit",
                    label { class: "checkbox",
                        input {
                            r#type: "checkbox",
                            name: fields::SHOW_TABLE,
                            value: "true",
                            checked: show_table,
                            onchange: move |_| {
                                let mut ctrl = ctrl;
                                ctrl.write().set_show_table(!show_table);
                                save_state(&ctrl.peek());
                            },
                        }
                        " แสดงตารางผลลัพธ์"
                    }
                    button { r#type: "submit", class: "btn btn-primary btn-large", disabled: submitting,
                        i { class: "fas fa-play" } " ประมวลผล"
                    }
                }
            }

            if submitting {
                div { class: "loading-overlay",
                    div { class: "spinner" }
                    p { {messages::processing()} }
                }
            }
        }
    }
}
