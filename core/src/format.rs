//! Display helpers shared by the file lists.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size with up to two decimals (`1536` → `"1.5 KB"`).
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Font Awesome icon class for a file name.
pub fn file_icon_class(filename: &str) -> &'static str {
    match crate::allow_list::extension_of(filename).as_deref() {
        Some(".txt") => "fas fa-file-alt",
        Some(".xlsx") | Some(".xls") => "fas fa-file-excel",
        Some(".csv") => "fas fa-file-csv",
        _ => "fas fa-file",
    }
}
