//! Native DOM plumbing the Dioxus tree cannot express: the submit guard,
//! drag-and-drop onto file inputs, window-level listeners and scraping the
//! server-rendered result table.

use executor_portal_core::{PickedFile, ResultTable};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, Element, EventTarget, HtmlElement, HtmlFormElement, HtmlInputElement};

pub const FORM_ID: &str = "uploadForm";
pub const FILE_INPUT_ID: &str = "fileInput";
pub const DROP_ZONE_ID: &str = "dropZone";
pub const LOOKUP_FORM_ID: &str = "lookupForm";
pub const LOOKUP_INPUT_ID: &str = "lookupFile";
pub const LOOKUP_DROP_ZONE_ID: &str = "lookupDropZone";

const RESULT_TABLE_SELECTOR: &str = "table.result-table";
const DRAG_CLASS: &str = "dragover";

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

/// Form, file input and drop zone of one upload form, looked up once after mount.
#[derive(Clone)]
pub struct FormHandles {
    pub form: HtmlFormElement,
    pub file_input: HtmlInputElement,
    pub drop_zone: HtmlElement,
}

impl FormHandles {
    /// Fails with every missing id listed, not just the first one.
    pub fn resolve(form_id: &str, input_id: &str, drop_zone_id: &str) -> Result<Self, String> {
        let doc = document().ok_or_else(|| "kein document verfügbar".to_string())?;
        let form = doc.get_element_by_id(form_id).and_then(|e| e.dyn_into::<HtmlFormElement>().ok());
        let file_input = doc.get_element_by_id(input_id).and_then(|e| e.dyn_into::<HtmlInputElement>().ok());
        let drop_zone = doc.get_element_by_id(drop_zone_id).and_then(|e| e.dyn_into::<HtmlElement>().ok());
        match (form, file_input, drop_zone) {
            (Some(form), Some(file_input), Some(drop_zone)) => Ok(Self { form, file_input, drop_zone }),
            (form, file_input, drop_zone) => {
                let missing: Vec<&str> = [
                    (form.is_none(), form_id),
                    (file_input.is_none(), input_id),
                    (drop_zone.is_none(), drop_zone_id),
                ]
                .into_iter()
                .filter_map(|(absent, id)| absent.then_some(id))
                .collect();
                Err(format!("fehlende Elemente: #{}", missing.join(", #")))
            }
        }
    }
}

pub fn input_by_id(id: &str) -> Option<HtmlInputElement> {
    document()?.get_element_by_id(id)?.dyn_into::<HtmlInputElement>().ok()
}

/// Name and size of every file currently held by the input.
pub fn picked_files(input: &HtmlInputElement) -> Vec<PickedFile> {
    let Some(list) = input.files() else { return Vec::new() };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|f| PickedFile::new(f.name(), f.size() as u64))
        .collect()
}

pub fn file_named(input: &HtmlInputElement, name: &str) -> Option<web_sys::File> {
    let list = input.files()?;
    (0..list.length()).filter_map(|i| list.get(i)).find(|f| f.name() == name)
}

pub fn clear_file_input(input: &HtmlInputElement) {
    input.set_value("");
}

/// Rebuilds the input's FileList without the file at `index`.
pub fn remove_file_at(input: &HtmlInputElement, index: usize) {
    let Some(list) = input.files() else { return };
    let Ok(transfer) = web_sys::DataTransfer::new() else {
        console::warn_1(&"DataTransfer nicht verfügbar".into());
        return;
    };
    let items = transfer.items();
    for (i, file) in (0..list.length()).filter_map(|i| list.get(i)).enumerate() {
        if i != index {
            let _ = items.add_with_file(&file);
        }
    }
    input.set_files(transfer.files().as_ref());
}

fn listen<E, F>(target: &EventTarget, event: &str, mut handler: F)
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let cb = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    });
    if let Err(e) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
        console::error_1(&e);
    }
    // Listener lebt so lange wie die Seite
    cb.forget();
}

/// Native submit listener; the handler calls `prevent_default` to keep the page.
pub fn on_submit<F>(form: &HtmlFormElement, handler: F)
where
    F: FnMut(web_sys::Event) + 'static,
{
    listen::<web_sys::Event, _>(form, "submit", handler);
}

/// Drag-and-drop onto `zone` fills `input`; a click on the zone opens the picker.
pub fn install_drop_zone<F>(zone: &HtmlElement, input: &HtmlInputElement, mut on_files: F)
where
    F: FnMut() + 'static,
{
    let over = zone.clone();
    listen::<web_sys::DragEvent, _>(zone, "dragover", move |ev| {
        ev.prevent_default();
        let _ = over.class_list().add_1(DRAG_CLASS);
    });
    let leave = zone.clone();
    listen::<web_sys::DragEvent, _>(zone, "dragleave", move |_| {
        let _ = leave.class_list().remove_1(DRAG_CLASS);
    });
    let dropped = zone.clone();
    let target = input.clone();
    listen::<web_sys::DragEvent, _>(zone, "drop", move |ev| {
        ev.prevent_default();
        let _ = dropped.class_list().remove_1(DRAG_CLASS);
        let files = ev.data_transfer().and_then(|dt| dt.files());
        if let Some(files) = files {
            target.set_files(Some(&files));
            on_files();
        }
    });
    let picker = input.clone();
    listen::<web_sys::MouseEvent, _>(zone, "click", move |_| picker.click());
}

/// Window `error` events (script failures, `true`) and `pageshow` (back navigation, `false`).
pub fn on_page_reset<F>(handler: F)
where
    F: FnMut(bool) + Clone + 'static,
{
    let Some(win) = web_sys::window() else { return };
    let mut on_error = handler.clone();
    listen::<web_sys::ErrorEvent, _>(&win, "error", move |ev| {
        console::error_1(&ev.message().into());
        on_error(true);
    });
    let mut on_show = handler;
    listen::<web_sys::Event, _>(&win, "pageshow", move |_| on_show(false));
}

fn cell_texts(row: &Element, selector: &str) -> Vec<String> {
    let Ok(cells) = row.query_selector_all(selector) else { return Vec::new() };
    (0..cells.length())
        .filter_map(|i| cells.item(i))
        .map(|n| n.text_content().unwrap_or_default().trim().to_string())
        .collect()
}

/// Reads the server-rendered result table into a model and hides the original.
/// Headers come from the last `thead` row, or from a leading row of `th` cells.
pub fn take_result_table() -> Option<ResultTable> {
    let doc = document()?;
    let table = doc.query_selector(RESULT_TABLE_SELECTOR).ok()??;
    let rows = table.query_selector_all("tr").ok()?;

    let mut headers = Vec::new();
    let mut body = Vec::new();
    for row in (0..rows.length()).filter_map(|i| rows.item(i)).filter_map(|n| n.dyn_into::<Element>().ok()) {
        let in_head = row.parent_element().map(|p| p.tag_name().eq_ignore_ascii_case("thead")).unwrap_or(false);
        let ths = cell_texts(&row, "th");
        let tds = cell_texts(&row, "td");
        if in_head || (body.is_empty() && tds.is_empty() && !ths.is_empty()) {
            headers = ths;
        } else if !tds.is_empty() {
            body.push(tds);
        }
    }

    let _ = table.set_attribute("hidden", "");
    console::log_1(&format!("Ergebnistabelle: {} Zeilen, {} Spalten", body.len(), headers.len()).into());
    Some(ResultTable::new(headers, body))
}
