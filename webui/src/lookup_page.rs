use std::cell::Cell;
use std::rc::Rc;

use dioxus::prelude::*;
use executor_portal_core::api::fields;
use executor_portal_core::format::{file_icon_class, format_file_size};
use executor_portal_core::lookup::LookupForm;
use executor_portal_core::messages::{self, Notice};
use executor_portal_core::ClientSettings;
use web_sys::console;

use crate::dom::{self, FormHandles};
use crate::ui_utils::notify;

fn file_chosen(mut form: Signal<LookupForm>) {
    let Some(input) = dom::input_by_id(dom::LOOKUP_INPUT_ID) else { return };
    let first = dom::picked_files(&input).into_iter().next();
    let outcome = form.write().choose(first).map(|f| f.cloned());
    match outcome {
        Ok(Some(file)) => notify(Notice::success(format!("{}: {}", messages::ready_to_upload(), file.name))),
        Ok(None) => {}
        Err(e) => {
            dom::clear_file_input(&input);
            notify(Notice::error(e.localized()));
        }
    }
}

fn wire_form(form: Signal<LookupForm>, handles: &FormHandles) {
    let mut guard = form;
    dom::on_submit(&handles.form, move |ev| {
        let verdict = guard.write().begin_submit();
        match verdict {
            None => ev.prevent_default(),
            Some(Err(e)) => {
                ev.prevent_default();
                notify(Notice::error(e.localized()));
            }
            Some(Ok(())) => notify(Notice::info(messages::processing())),
        }
    });
    dom::install_drop_zone(&handles.drop_zone, &handles.file_input, move || file_chosen(form));
    let mut reset = form;
    dom::on_page_reset(move |_| reset.write().reset_submitting());
}

/// Lookup Last Type: single spreadsheet upload to the lookup endpoint.
#[component]
pub fn Lookup() -> Element {
    let settings = use_context::<ClientSettings>();
    let form = use_signal(|| LookupForm::new(settings.max_file_size));
    let mut dom_error = use_signal(|| None as Option<String>);
    let wired = use_hook(|| Rc::new(Cell::new(false)));

    use_effect(move || {
        if wired.replace(true) {
            return;
        }
        match FormHandles::resolve(dom::LOOKUP_FORM_ID, dom::LOOKUP_INPUT_ID, dom::LOOKUP_DROP_ZONE_ID) {
            Ok(handles) => wire_form(form, &handles),
            Err(e) => {
                console::error_1(&e.clone().into());
                dom_error.set(Some(e));
            }
        }
    });

    let f = form.read();
    let accept = f.accept_attr();
    let chosen = f.file().map(|p| (p.name.clone(), format_file_size(p.size), file_icon_class(&p.name)));
    let can_submit = f.can_submit();
    let submitting = f.is_submitting();
    drop(f);
    let max_label = format_file_size(settings.max_file_size);

    rsx! {
        div { class: "container lookup-page",
            if let Some(err) = dom_error() {
                div { class: "alert alert-error", "Formular konnte nicht initialisiert werden: {err}" }
            }
            h1 { i { class: "fas fa-search" } " Lookup Last Type" }
            p { class: "subtitle", "อัปโหลดไฟล์ Excel เพื่อค้นหา Last Type ของแต่ละ BOM" }
            form { id: dom::LOOKUP_FORM_ID, action: "{settings.lookup_url}", method: "post", enctype: "multipart/form-data",
                div { id: dom::LOOKUP_DROP_ZONE_ID, class: "drop-zone",
                    i { class: "fas fa-file-excel" }
                    p { "ลากไฟล์ Excel มาวางที่นี่ หรือคลิกเพื่อเลือกไฟล์" }
                    small { "{accept} | สูงสุด {max_label}" }
                }
                input {
                    id: dom::LOOKUP_INPUT_ID,
                    r#type: "file",
                    name: fields::LOOKUP_FILE,
                    hidden: true,
                    accept: "{accept}",
                    onchange: move |_| file_chosen(form),
                }
                if let Some((name, size, icon)) = chosen {
                    div { class: "file-info",
                        i { class: "{icon}" }
                        span { class: "file-name", "{name}" }
                        small { class: "file-size", "{size}" }
                    }
                }
                div { class: "form-actions",
                    a { class: "btn btn-secondary", href: "/", i { class: "fas fa-arrow-left" } " กลับ" }
                    button { r#type: "submit", class: "btn btn-primary", disabled: !can_submit,
                        if submitting {
                            i { class: "fas fa-spinner fa-spin" }
                            " กำลังประมวลผล..."
                        } else {
                            i { class: "fas fa-upload" }
                            " อัปโหลด"
                        }
                    }
                }
            }
        }
    }
}
