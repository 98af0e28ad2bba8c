use serde::{Deserialize, Serialize};

use crate::guidance::FunctionGuidance;

/// Extensions every upload must fall into, whatever function is active.
pub const DEFAULT_EXTENSIONS: [&str; 4] = [".xlsx", ".xls", ".csv", ".txt"];

/// Spreadsheet extensions; a chosen upload of one of these triggers the date preview.
pub const SPREADSHEET_EXTENSIONS: [&str; 3] = [".xlsx", ".xls", ".csv"];

/// Lowercased extension of `filename` including the leading dot.
///
/// Returns `None` for names without a dot, so they never match a non-empty list.
pub fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    Some(format!(".{}", ext.to_lowercase()))
}

/// Ordered set of lowercase extensions (".csv"). Empty means accept all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList(Vec<String>);

impl AllowList {
    pub fn accept_all() -> Self {
        Self(Vec::new())
    }

    pub fn defaults() -> Self {
        Self::from_extensions(DEFAULT_EXTENSIONS)
    }

    /// Normalizes to lowercase with a leading dot and drops duplicates, keeping first-seen order.
    pub fn from_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim().to_lowercase();
            if ext.is_empty() || ext == "." {
                continue;
            }
            let ext = if ext.starts_with('.') { ext } else { format!(".{ext}") };
            if !out.contains(&ext) {
                out.push(ext);
            }
        }
        Self(out)
    }

    /// Derives extensions from human-readable labels.
    ///
    /// `"Excel (.xlsx, .xls)"` yields `.xlsx` and `.xls`; a label without any
    /// dotted token is taken as a bare extension word (`"TXT"` → `.txt`).
    pub fn from_labels(labels: &[&str]) -> Self {
        let mut found: Vec<String> = Vec::new();
        for label in labels {
            let tokens = dotted_tokens(label);
            if tokens.is_empty() {
                let word = label.trim();
                if !word.is_empty() && word.chars().all(|c| c.is_ascii_alphanumeric()) {
                    found.push(word.to_string());
                }
            } else {
                found.extend(tokens);
            }
        }
        Self::from_extensions(found)
    }

    pub fn for_function(guidance: &FunctionGuidance) -> Self {
        Self::from_labels(guidance.accepted_files)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extensions(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, extension: &str) -> bool {
        let ext = extension.to_lowercase();
        self.0.iter().any(|e| *e == ext)
    }

    /// Whether `filename` may be picked under this list. Empty lists accept everything.
    pub fn is_supported(&self, filename: &str) -> bool {
        if self.is_empty() {
            return true;
        }
        extension_of(filename).map(|ext| self.contains(&ext)).unwrap_or(false)
    }

    /// Entries of `self` also present in `other`. An empty `other` leaves `self` unchanged.
    pub fn restrict_to(&self, other: &AllowList) -> AllowList {
        if other.is_empty() {
            return self.clone();
        }
        AllowList(self.0.iter().filter(|e| other.contains(e)).cloned().collect())
    }

    /// Value for an `<input type="file" accept=…>` attribute.
    pub fn accept_attr(&self) -> String {
        self.0.join(",")
    }
}

fn dotted_tokens(label: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = label.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '.' {
            continue;
        }
        let start = i + 1;
        let mut end = start;
        while let Some(&(j, next)) = chars.peek() {
            if !next.is_ascii_alphanumeric() {
                break;
            }
            end = j + next.len_utf8();
            chars.next();
        }
        if end > start {
            tokens.push(format!(".{}", &label[start..end]));
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidance;

    #[test]
    fn spreadsheet_labels_expand_to_three_extensions() {
        let list = AllowList::from_labels(&["Excel (.xlsx, .xls)", "CSV (.csv)"]);
        assert_eq!(list.extensions(), &[".xlsx", ".xls", ".csv"]);
    }

    #[test]
    fn bare_words_become_extensions() {
        let list = AllowList::from_labels(&["TXT", "txt"]);
        assert_eq!(list.extensions(), &[".txt"]);
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        let list = AllowList::defaults();
        assert!(list.is_supported("REPORT.XLSX"));
        assert!(list.is_supported("data.Csv"));
        assert!(!list.is_supported("notes.pdf"));
        assert!(!list.is_supported("README"));
    }

    #[test]
    fn empty_list_accepts_everything() {
        let list = AllowList::accept_all();
        assert!(list.is_supported("anything.pdf"));
        assert!(list.is_supported("no_extension"));
    }

    #[test]
    fn restrict_keeps_order_of_left_side() {
        let logview = AllowList::for_function(guidance::find("Singulation", "LOGVIEW").unwrap());
        let effective = AllowList::defaults().restrict_to(&logview);
        assert_eq!(effective.extensions(), &[".txt"]);
        assert_eq!(AllowList::defaults().restrict_to(&AllowList::accept_all()), AllowList::defaults());
    }

    #[test]
    fn extension_of_uses_last_dot() {
        assert_eq!(extension_of("MC 12.log.TXT").as_deref(), Some(".txt"));
        assert_eq!(extension_of("plain"), None);
    }

    #[test]
    fn accept_attr_is_comma_joined() {
        assert_eq!(AllowList::from_extensions(["xlsx", ".XLS"]).accept_attr(), ".xlsx,.xls");
    }
}
