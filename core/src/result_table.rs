//! Model behind the enhanced results table.
//!
//! Built once from the headers and cell texts of the server-rendered
//! `table.result-table`. Visibility is recomputed from the search term and
//! the column filters on every change; highlights are derived on demand.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::debug;

/// Columns that get a dropdown filter when their values qualify.
pub const FILTER_COLUMNS: [usize; 3] = [1, 2, 3];

/// Distinct-value bounds for a column to get a filter dropdown (inclusive).
const MIN_FILTER_VALUES: usize = 2;
const MAX_FILTER_VALUES: usize = 49;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn icon(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "fas fa-sort-up",
            SortDirection::Descending => "fas fa-sort-down",
        }
    }
}

/// A run of cell text, marked when it matches the search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub marked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDetails {
    pub row: usize,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchSummary {
    Prompt,
    NoMatch(String),
    Found { visible: usize, total: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    pub rows: usize,
    pub columns: usize,
    pub visible: usize,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("export buffer: {0}")]
    Buffer(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Row indices in display order.
    order: Vec<usize>,
    visible: Vec<bool>,
    term: String,
    filters: BTreeMap<usize, String>,
    selected: Option<usize>,
    sort: Option<(usize, SortDirection)>,
}

impl ResultTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let n = rows.len();
        Self {
            headers,
            rows,
            order: (0..n).collect(),
            visible: vec![true; n],
            ..Default::default()
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cells(&self, row: usize) -> &[String] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Applies a search term and returns the number of visible rows.
    pub fn search(&mut self, term: &str) -> usize {
        self.term = term.trim().to_string();
        self.recompute();
        let visible = self.visible_count();
        debug!(term = %self.term, visible, "table search");
        visible
    }

    pub fn clear_search(&mut self) {
        self.term.clear();
        self.selected = None;
        self.recompute();
    }

    pub fn is_visible(&self, row: usize) -> bool {
        self.visible.get(row).copied().unwrap_or(false)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }

    /// Visible row indices in display order.
    pub fn visible_rows(&self) -> Vec<usize> {
        self.order.iter().copied().filter(|&r| self.is_visible(r)).collect()
    }

    /// Cell text split into matched and unmatched runs for the current term.
    pub fn highlight_cell(&self, row: usize, col: usize) -> Vec<Segment> {
        let text = self.cells(row).get(col).map(String::as_str).unwrap_or("");
        highlight(text, &self.term)
    }

    /// Toggles the selection. Returns the details of a newly selected row.
    pub fn select_row(&mut self, row: usize) -> Option<RowDetails> {
        if row >= self.rows.len() {
            return None;
        }
        if self.selected == Some(row) {
            self.selected = None;
            return None;
        }
        self.selected = Some(row);
        self.row_details(row)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// `header: value` pairs by position; cells past the last header are skipped.
    pub fn row_details(&self, row: usize) -> Option<RowDetails> {
        let cells = self.rows.get(row)?;
        let fields = self
            .headers
            .iter()
            .zip(cells.iter())
            .map(|(h, v)| (h.clone(), v.clone()))
            .collect();
        Some(RowDetails { row, fields })
    }

    pub fn search_summary(&self) -> SearchSummary {
        if self.term.is_empty() {
            return SearchSummary::Prompt;
        }
        match self.visible_count() {
            0 => SearchSummary::NoMatch(self.term.clone()),
            visible => SearchSummary::Found { visible, total: self.rows.len() },
        }
    }

    pub fn stats(&self) -> TableStats {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0).max(self.headers.len());
        TableStats { rows: self.rows.len(), columns, visible: self.visible_count() }
    }

    /// Sorted distinct non-blank values of `col`, if it has a usable number of them.
    pub fn filter_options(&self, col: usize) -> Option<Vec<String>> {
        let values: BTreeSet<&str> = self
            .rows
            .iter()
            .filter_map(|r| r.get(col))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .collect();
        if (MIN_FILTER_VALUES..=MAX_FILTER_VALUES).contains(&values.len()) {
            Some(values.into_iter().map(str::to_string).collect())
        } else {
            None
        }
    }

    /// Sets or clears (`None` or blank) the exact-match filter of one column.
    pub fn set_column_filter(&mut self, col: usize, value: Option<String>) -> usize {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(v) => {
                self.filters.insert(col, v.trim().to_string());
            }
            None => {
                self.filters.remove(&col);
            }
        }
        self.recompute();
        self.visible_count()
    }

    pub fn column_filter(&self, col: usize) -> Option<&str> {
        self.filters.get(&col).map(String::as_str)
    }

    pub fn active_filters(&self) -> usize {
        self.filters.len()
    }

    /// Sorts by `col`; repeating the same column flips the direction.
    pub fn sort_by(&mut self, col: usize) -> SortDirection {
        let direction = match self.sort {
            Some((c, SortDirection::Ascending)) if c == col => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        let rows = &self.rows;
        let key = |r: usize| rows[r].get(col).map(String::as_str).unwrap_or("");
        self.order.sort_by(|&a, &b| {
            let ord = compare_values(key(a), key(b));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        self.sort = Some((col, direction));
        direction
    }

    pub fn sort_state(&self) -> Option<(usize, SortDirection)> {
        self.sort
    }

    /// CSV of the visible rows in display order, headers first.
    pub fn to_csv(&self) -> Result<String, ExportError> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in self.visible_rows() {
            writer.write_record(&self.rows[row])?;
        }
        let bytes = writer.into_inner().map_err(|e| ExportError::Buffer(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
    }

    fn recompute(&mut self) {
        for (i, row) in self.rows.iter().enumerate() {
            let matches_term = self.term.is_empty() || contains_ci(&row.join("\n"), &self.term);
            let matches_filters = self
                .filters
                .iter()
                .all(|(col, value)| row.get(*col).map(|c| c.trim() == value).unwrap_or(false));
            self.visible[i] = matches_term && matches_filters;
        }
    }
}

/// Numbers compare numerically and sort before text; text compares case-insensitively.
fn compare_values(a: &str, b: &str) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

fn parse_number(value: &str) -> Option<f64> {
    let cleaned = value.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Lowercased text plus, per source char, its start offset in the folded text
/// and in the source.
fn fold(text: &str) -> (String, Vec<(usize, usize)>) {
    let mut folded = String::with_capacity(text.len());
    let mut map = Vec::with_capacity(text.len());
    for (start, c) in text.char_indices() {
        map.push((folded.len(), start));
        folded.extend(c.to_lowercase());
    }
    (folded, map)
}

/// Byte ranges in `text` where `term` occurs, case-insensitively and non-overlapping.
/// A match starting or ending inside a char whose lowercase form is longer
/// (`İ` folds to `i̇`) covers that whole source char.
pub fn find_ci(text: &str, term: &str) -> Vec<(usize, usize)> {
    let needle: String = term.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Vec::new();
    }
    let (folded, map) = fold(text);
    // Source char containing the folded position
    let source_start = |folded_pos: usize| -> usize {
        let i = map.partition_point(|m| m.0 <= folded_pos);
        map[i.saturating_sub(1)].1
    };
    // End of the source char containing the last folded byte before `folded_end`
    let source_end = |folded_end: usize| -> usize {
        let i = map.partition_point(|m| m.0 < folded_end);
        map.get(i).map(|m| m.1).unwrap_or(text.len())
    };
    let mut out: Vec<(usize, usize)> = Vec::new();
    for (pos, m) in folded.match_indices(needle.as_str()) {
        let range = (source_start(pos), source_end(pos + m.len()));
        match out.last_mut() {
            Some(last) if range.0 < last.1 => last.1 = last.1.max(range.1),
            _ => out.push(range),
        }
    }
    out
}

pub fn contains_ci(text: &str, term: &str) -> bool {
    term.is_empty() || !find_ci(text, term).is_empty()
}

/// Splits `text` into segments, marking every occurrence of the trimmed `term`.
pub fn highlight(text: &str, term: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut cursor = 0;
    for (start, end) in find_ci(text, term.trim()) {
        if start > cursor {
            out.push(Segment { text: text[cursor..start].to_string(), marked: false });
        }
        out.push(Segment { text: text[start..end].to_string(), marked: true });
        cursor = end;
    }
    if cursor < text.len() {
        out.push(Segment { text: text[cursor..].to_string(), marked: false });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ResultTable {
        let headers = vec!["Machine".to_string(), "Line".to_string(), "UPH".to_string()];
        let rows = vec![
            vec!["MC-01".to_string(), "A".to_string(), "1,200".to_string()],
            vec!["MC-02".to_string(), "B".to_string(), "950".to_string()],
            vec!["Bonder".to_string(), "A".to_string(), "n/a".to_string()],
        ];
        ResultTable::new(headers, rows)
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut t = table();
        assert_eq!(t.search("  mc-0 "), 2);
        assert!(!t.is_visible(2));
        assert_eq!(t.term(), "mc-0");
    }

    #[test]
    fn empty_search_shows_all_without_marks() {
        let mut t = table();
        t.search("bonder");
        assert_eq!(t.search(""), 3);
        assert!(t.highlight_cell(2, 0).iter().all(|s| !s.marked));
    }

    #[test]
    fn search_does_not_match_across_cells() {
        let mut t = table();
        assert_eq!(t.search("MC-01A"), 0);
        assert_eq!(t.search_summary(), SearchSummary::NoMatch("MC-01A".into()));
    }

    #[test]
    fn highlight_marks_every_occurrence() {
        let segs = highlight("Abc abc", "ABC");
        assert_eq!(
            segs,
            vec![
                Segment { text: "Abc".into(), marked: true },
                Segment { text: " ".into(), marked: false },
                Segment { text: "abc".into(), marked: true },
            ]
        );
    }

    #[test]
    fn match_inside_expanded_lowercase_covers_whole_char() {
        // "İ" lowercases to "i" plus a combining dot
        assert!(contains_ci("İstanbul", "i"));
        assert_eq!(find_ci("İstanbul", "i"), vec![(0, "İ".len())]);
        assert_eq!(find_ci("İstanbul", "İs"), vec![(0, "İs".len())]);
        assert_eq!(find_ci("xİ", "x"), vec![(0, 1)]);
        let segments = highlight("Groß İzmir", "i");
        let marked: Vec<&str> = segments.iter().filter(|s| s.marked).map(|s| s.text.as_str()).collect();
        assert_eq!(marked, vec!["İ", "i"]);
        assert_eq!(segments.iter().map(|s| s.text.as_str()).collect::<String>(), "Groß İzmir");
    }

    #[test]
    fn highlight_keeps_thai_text_intact() {
        let segs = highlight("ไฟล์ข้อมูล WB", "wb");
        assert_eq!(segs[0].text, "ไฟล์ข้อมูล ");
        assert_eq!(segs[1], Segment { text: "WB".into(), marked: true });
    }

    #[test]
    fn selecting_twice_deselects() {
        let mut t = table();
        let details = t.select_row(1).unwrap();
        assert_eq!(details.fields[0], ("Machine".to_string(), "MC-02".to_string()));
        assert_eq!(t.select_row(1), None);
        assert_eq!(t.selected(), None);
        t.select_row(0);
        t.select_row(2);
        assert_eq!(t.selected(), Some(2));
    }

    #[test]
    fn details_skip_cells_without_header() {
        let mut t = ResultTable::new(vec!["A".into()], vec![vec!["1".into(), "extra".into()]]);
        assert_eq!(t.select_row(0).unwrap().fields, vec![("A".to_string(), "1".to_string())]);
    }

    #[test]
    fn clear_search_resets_selection() {
        let mut t = table();
        t.search("MC");
        t.select_row(0);
        t.clear_search();
        assert_eq!(t.visible_count(), 3);
        assert_eq!(t.selected(), None);
        assert_eq!(t.search_summary(), SearchSummary::Prompt);
    }

    #[test]
    fn filters_combine_with_search() {
        let mut t = table();
        assert_eq!(t.filter_options(1), Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(t.set_column_filter(1, Some("A".into())), 2);
        assert_eq!(t.search("mc"), 1);
        assert_eq!(t.visible_rows(), vec![0]);
        assert_eq!(t.set_column_filter(1, None), 2);
    }

    #[test]
    fn single_value_column_has_no_filter() {
        let t = ResultTable::new(vec!["X".into()], vec![vec!["same".into()], vec!["same".into()]]);
        assert_eq!(t.filter_options(0), None);
    }

    #[test]
    fn numeric_sort_and_toggle() {
        let mut t = table();
        assert_eq!(t.sort_by(2), SortDirection::Ascending);
        assert_eq!(t.visible_rows(), vec![1, 0, 2]);
        assert_eq!(t.sort_by(2), SortDirection::Descending);
        assert_eq!(t.visible_rows(), vec![2, 0, 1]);
    }

    #[test]
    fn sort_is_stable_and_keeps_selection() {
        let mut t = table();
        t.select_row(2);
        t.sort_by(1);
        assert_eq!(t.visible_rows(), vec![0, 2, 1]);
        assert_eq!(t.selected(), Some(2));
    }

    #[test]
    fn csv_exports_visible_rows_in_order() {
        let mut t = table();
        t.sort_by(2);
        t.search("mc");
        let csv = t.to_csv().unwrap();
        assert_eq!(csv, "Machine,Line,UPH\nMC-02,B,950\nMC-01,A,\"1,200\"\n");
    }

    #[test]
    fn stats_count_rows_and_columns() {
        let mut t = table();
        t.search("bonder");
        assert_eq!(t.stats(), TableStats { rows: 3, columns: 3, visible: 1 });
    }
}
