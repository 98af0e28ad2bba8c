use dioxus::prelude::*;

use dioxus_router::prelude::*;
use executor_portal_core::{ClientSettings, ResultTable};

mod api;
mod dom;
mod index_page;
mod lookup_page;
mod result_page;
mod storage;
mod ui_utils;

use index_page::Index;
use lookup_page::Lookup;
use result_page::ResultView;

// ----- Routing -----
#[derive(Routable, Clone, Debug, PartialEq)]
pub enum Route {
    #[route("/")]
    Index {},
    #[route("/lookup_last_type")]
    Lookup {},
    #[route("/:..segments")]
    Fallback { segments: Vec<String> },
}

pub fn main() {
    console_error_panic_hook::set_once();
    dioxus_web::launch::launch(app, vec![], Default::default());
}

fn app() -> Element {
    let mut settings = use_signal(|| None as Option<ClientSettings>);
    // Ergebnisseite: der Server liefert die Tabelle im HTML, sie wird einmalig übernommen
    let scraped = use_hook(dom::take_result_table);

    use_effect(move || {
        spawn(async move {
            let loaded = api::load_client_settings().await;
            ui_utils::set_toast_duration(loaded.toast_ms);
            settings.set(Some(loaded));
        });
    });

    rsx! {
        div { // root wrapper
            // App Header
            div { class: "app-header",
                div { class: "container",
                    div { class: "brand",
                        i { class: "fas fa-cogs" }
                        span { " Python Executor" }
                    }
                    nav {
                        a { href: "/", "หน้าหลัก" }
                        a { href: "/lookup_last_type", "Lookup Last Type" }
                    }
                }
            }
            if let Some(s) = settings() {
                Shell { settings: s, result: scraped.clone() }
            } else {
                div { class: "container loading", i { class: "fas fa-spinner fa-spin" } " กำลังโหลด..." }
            }
            // Toast container for notifications
            div { id: "toasts", class: "toast-container" }
        }
    }
}

#[component]
fn Shell(settings: ClientSettings, #[props(!optional)] result: Option<ResultTable>) -> Element {
    use_context_provider(|| settings.clone());
    match result {
        Some(table) => rsx! { ResultView { table } },
        None => rsx! { Router::<Route> {} },
    }
}

// Unbekannte Pfade (z.B. das Formularziel nach einem Fehler) zeigen das Formular
#[component]
fn Fallback(segments: Vec<String>) -> Element {
    let _ = segments;
    rsx! { Index {} }
}
