use std::cell::Cell;

use executor_portal_core::messages::{self, Notice};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::console;

thread_local! {
    static TOAST_MS: Cell<i32> = const { Cell::new(5000) };
}

pub fn set_toast_duration(ms: u32) {
    TOAST_MS.with(|t| t.set(i32::try_from(ms).unwrap_or(i32::MAX)));
}

// Show a transient toast in the #toasts container
pub fn show_toast(notice: &Notice, duration_ms: i32) {
    let Some(win) = web_sys::window() else { return };
    let Some(doc) = win.document() else { return };
    let Some(container) = doc.get_element_by_id("toasts") else {
        console::log_1(&notice.to_string().into());
        return;
    };
    let Ok(toast) = doc.create_element("div") else { return };
    toast.set_class_name(&format!("toast toast-{} fade-in", notice.level.as_str()));
    toast.set_attribute("role", "alert").ok();
    if let (Ok(icon), Ok(text)) = (doc.create_element("i"), doc.create_element("span")) {
        icon.set_class_name(notice.level.icon());
        text.set_text_content(Some(&notice.message));
        let _ = toast.append_child(&icon);
        let _ = toast.append_child(&text);
    }
    if container.append_child(&toast).is_err() {
        return; // Failed to append, exit early
    }

    // Auto-remove after timeout
    let container_clone = container.clone();
    let toast_clone = toast.clone();
    let cb = Closure::wrap(Box::new(move || {
        let _ = container_clone.remove_child(&toast_clone);
    }) as Box<dyn FnMut()>);
    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), duration_ms);
    cb.forget();
}

pub fn notify(notice: Notice) {
    show_toast(&notice, TOAST_MS.with(Cell::get));
}

fn clipboard_available(nav: &web_sys::Navigator) -> bool {
    js_sys::Reflect::get(nav, &"clipboard".into())
        .map(|v| !v.is_undefined() && !v.is_null())
        .unwrap_or(false)
}

// Copy text to clipboard and show a toast; falls back to execCommand outside secure contexts
pub fn copy_to_clipboard(text: String) {
    let Some(win) = web_sys::window() else { return };
    let nav = win.navigator();
    if !clipboard_available(&nav) {
        report_copy(copy_with_textarea(&text));
        return;
    }
    let promise = nav.clipboard().write_text(&text);
    wasm_bindgen_futures::spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(_) => report_copy(true),
            Err(e) => {
                console::warn_1(&e);
                report_copy(copy_with_textarea(&text));
            }
        }
    });
}

fn report_copy(ok: bool) {
    if ok {
        notify(Notice::success(messages::copied()));
    } else {
        notify(Notice::error(messages::copy_failed()));
    }
}

fn copy_with_textarea(text: &str) -> bool {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else { return false };
    let Some(body) = doc.body() else { return false };
    let Ok(area) = doc.create_element("textarea") else { return false };
    let Ok(area) = area.dyn_into::<web_sys::HtmlTextAreaElement>() else { return false };
    area.set_value(text);
    area.set_attribute("readonly", "").ok();
    area.set_attribute("style", "position:fixed;top:-1000px;opacity:0").ok();
    if body.append_child(&area).is_err() {
        return false;
    }
    area.select();
    let copied = doc
        .dyn_ref::<web_sys::HtmlDocument>()
        .map(|d| d.exec_command("copy").unwrap_or(false))
        .unwrap_or(false);
    let _ = body.remove_child(&area);
    copied
}

// Trigger a CSV download using a data URI; the BOM keeps Excel on UTF-8 for Thai text
pub fn download_csv(filename: &str, content: &str) {
    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            if let Ok(a) = doc.create_element("a") {
                let href = format!(
                    "data:text/csv;charset=utf-8,{}",
                    urlencoding::encode(&format!("\u{feff}{}", content))
                );
                let _ = a.set_attribute("href", &href);
                let _ = a.set_attribute("download", filename);
                if let Some(body) = doc.body() {
                    let _ = body.append_child(&a);
                    if let Some(ae) = a.dyn_ref::<web_sys::HtmlElement>() {
                        ae.click();
                    }
                    let _ = body.remove_child(&a);
                }
            }
        }
    }
}
