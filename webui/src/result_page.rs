use dioxus::prelude::*;
use executor_portal_core::messages::{self, Notice};
use executor_portal_core::persist;
use executor_portal_core::result_table::{SearchSummary, Segment, FILTER_COLUMNS};
use executor_portal_core::{ClientSettings, ResultTable};
use gloo_timers::future::TimeoutFuture;
use web_sys::console;

use crate::storage::{log_store_error, LocalStore};
use crate::ui_utils::{copy_to_clipboard, download_csv, notify};

const EXPORT_FILENAME: &str = "result.csv";

struct RenderedRow {
    index: usize,
    selected: bool,
    cells: Vec<(String, Vec<Segment>)>,
}

struct FilterColumn {
    col: usize,
    label: String,
    current: String,
    options: Vec<String>,
}

fn summary_text(summary: SearchSummary) -> String {
    match summary {
        SearchSummary::Prompt => messages::search_prompt(),
        SearchSummary::NoMatch(term) => messages::search_no_match(&term),
        SearchSummary::Found { visible, total } => messages::search_found(visible, total),
    }
}

fn export_csv(table: &ResultTable) {
    match table.to_csv() {
        Ok(csv) => {
            download_csv(EXPORT_FILENAME, &csv);
            notify(Notice::success(messages::downloading()));
        }
        Err(e) => {
            console::error_1(&format!("CSV-Export fehlgeschlagen: {}", e).into());
            notify(Notice::error(messages::export_failed()));
        }
    }
}

/// Enhanced view of the server-rendered `table.result-table`.
#[component]
pub fn ResultView(table: ResultTable) -> Element {
    let settings = use_context::<ClientSettings>();
    let mut model = use_signal(move || table);
    let mut query = use_signal(String::new);
    // Suchgeneration: nur die letzte Eingabe nach Ablauf der Wartezeit wird angewendet
    let mut generation = use_signal(|| 0u64);
    let mut table_visible = use_signal(|| LocalStore::open().map(|s| persist::load_table_visible(&s)).unwrap_or(true));
    let debounce = settings.search_debounce_ms;

    let mut search_now = move || {
        generation += 1;
        let term = query.peek().clone();
        model.write().search(&term);
    };
    let mut clear = move || {
        generation += 1;
        query.set(String::new());
        model.write().clear_search();
        notify(Notice::info(messages::search_cleared()));
    };

    let m = model.read();
    let headers = m.headers().to_vec();
    let stats = m.stats();
    let sort = m.sort_state();
    let summary = summary_text(m.search_summary());
    let details = m.selected().and_then(|r| m.row_details(r));
    let filters: Vec<FilterColumn> = FILTER_COLUMNS
        .iter()
        .filter_map(|&col| {
            let options = m.filter_options(col)?;
            let header = headers.get(col)?;
            Some(FilterColumn {
                col,
                label: messages::filter_all(header),
                current: m.column_filter(col).unwrap_or_default().to_string(),
                options,
            })
        })
        .collect();
    let rows: Vec<RenderedRow> = m
        .visible_rows()
        .into_iter()
        .map(|r| RenderedRow {
            index: r,
            selected: m.selected() == Some(r),
            cells: (0..m.cells(r).len()).map(|c| (m.cells(r)[c].clone(), m.highlight_cell(r, c))).collect(),
        })
        .collect();
    drop(m);
    let filter_count = filters.len();
    let sort_icon = move |col: usize| match sort {
        Some((c, dir)) if c == col => dir.icon(),
        _ => "fas fa-sort",
    };

    rsx! {
        div { class: "container result-page",
            div { class: "stats-grid",
                div { class: "stat-card", span { class: "stat-value", "{stats.rows}" } span { class: "stat-label", "แถว" } }
                div { class: "stat-card", span { class: "stat-value", "{stats.columns}" } span { class: "stat-label", "คอลัมน์" } }
                div { class: "stat-card", span { class: "stat-value", "{stats.visible}" } span { class: "stat-label", "แสดงอยู่" } }
            }

            div { class: "table-toolbar",
                div { class: "search-box",
                    i { class: "fas fa-search" }
                    input {
                        r#type: "text",
                        placeholder: "ค้นหาในตาราง...",
                        value: "{query}",
                        oninput: move |e| {
                            let value = e.value();
                            query.set(value.clone());
                            generation += 1;
                            let mine = *generation.peek();
                            spawn(async move {
                                TimeoutFuture::new(debounce).await;
                                if *generation.peek() == mine {
                                    model.write().search(&value);
                                }
                            });
                        },
                        onkeydown: move |e| {
                            if e.key() == Key::Enter {
                                e.prevent_default();
                                search_now();
                            } else if e.key() == Key::Escape {
                                clear();
                            }
                        },
                    }
                    button { class: "btn btn-small", title: "ล้างการค้นหา", onclick: move |_| clear(), "×" }
                }
                span { class: "search-summary", "{summary}" }

                for f in filters.into_iter() {
                    select {
                        key: "{f.col}",
                        class: "column-filter",
                        onchange: move |e| {
                            let value = e.value();
                            let visible = model.write().set_column_filter(f.col, Some(value));
                            let active = model.peek().active_filters();
                            notify(Notice::info(messages::filter_summary(active, filter_count, visible)));
                        },
                        option { value: "", selected: f.current.is_empty(), "{f.label}" }
                        for opt in f.options.iter() {
                            option { key: "{opt}", value: "{opt}", selected: f.current == *opt, "{opt}" }
                        }
                    }
                }

                button { class: "btn", onclick: move |_| export_csv(&model.peek()),
                    i { class: "fas fa-file-csv" } " ส่งออก CSV"
                }
                button { class: "btn",
                    onclick: move |_| {
                        let next = !*table_visible.peek();
                        table_visible.set(next);
                        if let Some(store) = LocalStore::open() {
                            if let Err(e) = persist::save_table_visible(&store, next) {
                                log_store_error(e);
                            }
                        }
                    },
                    if table_visible() { "ซ่อนตาราง" } else { "แสดงตาราง" }
                }
            }

            if table_visible() {
                div { class: "table-container",
                    table { class: "result-table enhanced",
                        thead {
                            tr {
                                for (col, header) in headers.iter().enumerate() {
                                    th {
                                        key: "{col}",
                                        class: "sortable",
                                        onclick: move |_| {
                                            model.write().sort_by(col);
                                        },
                                        "{header} "
                                        i { class: sort_icon(col) }
                                    }
                                }
                            }
                        }
                        tbody {
                            for row in rows.into_iter() {
                                tr {
                                    key: "{row.index}",
                                    class: if row.selected { "selected" } else { "" },
                                    onclick: move |_| {
                                        model.write().select_row(row.index);
                                    },
                                    for (col, (text, segments)) in row.cells.into_iter().enumerate() {
                                        td {
                                            key: "{col}",
                                            title: "ดับเบิลคลิกเพื่อคัดลอก",
                                            ondoubleclick: move |_| copy_to_clipboard(text.clone()),
                                            for (i, seg) in segments.into_iter().enumerate() {
                                                if seg.marked {
                                                    mark { key: "{i}", class: "search-highlight", "{seg.text}" }
                                                } else {
                                                    span { key: "{i}", "{seg.text}" }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            if let Some(d) = details {
                div { class: "row-details",
                    div { class: "row-details-header",
                        h3 { {messages::row_details_title()} }
                        button { class: "btn btn-small",
                            onclick: move |_| {
                                model.write().select_row(d.row);
                            },
                            "×"
                        }
                    }
                    dl {
                        for (name, value) in d.fields.iter() {
                            dt { "{name}" }
                            dd { "{value}" }
                        }
                    }
                }
            }
        }
    }
}
