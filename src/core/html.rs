// src/core/html.rs
//! Tolerant, case-insensitive tag scanning over raw HTML. No DOM: callers slice
//! known blocks (`<table>…</table>`, `<tr>…</tr>`) and read cell text out of them.

use super::sanitize::{normalize_entities, normalize_ws, strip_brackets};

/// Lowercased copy of `s` built once; ASCII-only, so byte offsets match the source.
pub struct Scanner<'a> {
    src: &'a str,
    lc: String,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, lc: src.to_ascii_lowercase() }
    }

    /// Byte range of the next `<open …>…close` block at or after `from`.
    /// `open`/`close` must be lowercase, e.g. `"<td"`, `"</td>"`.
    pub fn next_block(&self, open: &str, close: &str, from: usize) -> Option<(usize, usize)> {
        let start = find_tag(&self.lc, open, from)?;
        let open_end = self.src[start..].find('>')? + start + 1;
        let end_rel = self.lc[open_end..].find(close)?;
        Some((start, open_end + end_rel + close.len()))
    }

    /// Opening tag text (`<table class="…">`) of a block starting at `start`.
    pub fn open_tag_lc(&self, start: usize) -> &str {
        let end = self.lc[start..].find('>').map(|e| start + e + 1).unwrap_or(self.lc.len());
        &self.lc[start..end]
    }
}

/// `<name` followed by whitespace, `>` or `/`, so `<th` never matches `<thead>`.
fn find_tag(lc: &str, open: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    loop {
        let at = lc.get(pos..)?.find(open)? + pos;
        match lc.as_bytes().get(at + open.len()) {
            Some(b' ' | b'\t' | b'\r' | b'\n' | b'>' | b'/') | None => return Some(at),
            _ => pos = at + open.len(),
        }
    }
}

pub fn inner_after_open_tag(block: &str) -> &str {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return &block[oe + 1..cs];
            }
        }
    }
    ""
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}

/// Visible text of a `<td>`/`<th>` block, footnote markers removed.
pub fn cell_text(block: &str) -> String {
    let inner = drop_hidden(inner_after_open_tag(block));
    strip_brackets(&strip_tags(normalize_entities(&inner)))
}

/// Remove `<style>…</style>` and `display:none` spans (sort keys, templates).
fn drop_hidden(s: &str) -> String {
    let sc = Scanner::new(s);
    let mut out = String::with_capacity(s.len());
    let mut pos = 0usize;
    while pos < s.len() {
        let style = sc.next_block("<style", "</style>", pos);
        let span = next_hidden_span(&sc, pos);
        let next = match (style, span) {
            (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
            (a, b) => a.or(b),
        };
        match next {
            Some((s0, e0)) => {
                out.push_str(&s[pos..s0]);
                pos = e0;
            }
            None => {
                out.push_str(&s[pos..]);
                break;
            }
        }
    }
    out
}

fn next_hidden_span(sc: &Scanner<'_>, from: usize) -> Option<(usize, usize)> {
    let mut pos = from;
    while let Some((s0, e0)) = sc.next_block("<span", "</span>", pos) {
        if sc.open_tag_lc(s0).replace(' ', "").contains("display:none") {
            return Some((s0, e0));
        }
        pos = s0 + 1;
    }
    None
}

/// Every `<table>` block whose opening tag mentions `class_sub` (e.g. `"wikitable"`).
pub fn tables_with_class<'a>(doc: &'a str, class_sub: &str) -> Vec<&'a str> {
    let sc = Scanner::new(doc);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((s0, e0)) = sc.next_block("<table", "</table>", pos) {
        if sc.open_tag_lc(s0).contains(class_sub) {
            out.push(&doc[s0..e0]);
        }
        pos = e0;
    }
    out
}

/// Cell texts of one `<tr>` block, `<th>` and `<td>` in document order.
pub fn row_cells(tr: &str) -> Vec<String> {
    let sc = Scanner::new(tr);
    let mut cells = Vec::new();
    let mut pos = 0usize;
    loop {
        let td = sc.next_block("<td", "</td>", pos);
        let th = sc.next_block("<th", "</th>", pos);
        let (s0, e0) = match (td, th) {
            (Some(a), Some(b)) => if a.0 <= b.0 { a } else { b },
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => break,
        };
        cells.push(cell_text(&tr[s0..e0]));
        pos = e0;
    }
    cells
}

/// All rows of a table block as cell texts. Rows without cells are skipped.
pub fn table_rows(table: &str) -> Vec<Vec<String>> {
    collect_rows(table, false)
}

/// Like [`table_rows`] minus header rows: anything inside `<thead>`, and rows made
/// only of `<th>` cells unless one of them is a `scope="row"` label.
pub fn data_rows(table: &str) -> Vec<Vec<String>> {
    collect_rows(table, true)
}

fn collect_rows(table: &str, skip_headers: bool) -> Vec<Vec<String>> {
    let sc = Scanner::new(table);
    let head = sc.next_block("<thead", "</thead>", 0);
    let mut rows = Vec::new();
    let mut pos = 0usize;
    while let Some((s0, e0)) = sc.next_block("<tr", "</tr>", pos) {
        pos = e0;
        if skip_headers && (head.is_some_and(|(h0, h1)| s0 >= h0 && s0 < h1) || is_header_row(&sc.lc[s0..e0])) {
            continue;
        }
        let cells = row_cells(&table[s0..e0]);
        if !cells.is_empty() {
            rows.push(cells);
        }
    }
    rows
}

fn is_header_row(tr_lc: &str) -> bool {
    let row_label = tr_lc.contains("scope=\"row\"") || tr_lc.contains("scope='row'") || tr_lc.contains("scope=row");
    find_tag(tr_lc, "<td", 0).is_none() && !row_label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn th_does_not_match_thead() {
        let tr = "<tr><thead></thead><TH scope=row>Label</TH><td>1</td></tr>";
        assert_eq!(row_cells(tr), vec!["Label", "1"]);
    }

    #[test]
    fn cell_text_drops_footnotes_and_hidden_keys() {
        let td = r#"<td><span style="display: none">7000123</span><a href="/x">1,234</a><sup class="reference"><a>[5]</a></sup></td>"#;
        assert_eq!(cell_text(td), "1,234");
    }

    #[test]
    fn picks_classed_tables_only() {
        let doc = r#"
            <table class="infobox"><tr><td>x</td></tr></table>
            <TABLE class="wikitable sortable"><tr><th>A</th><th>B</th></tr>
              <tr><td>United&nbsp;States[a]</td><td>877</td></tr></TABLE>
        "#;
        let tables = tables_with_class(doc, "wikitable");
        assert_eq!(tables.len(), 1);
        let rows = table_rows(tables[0]);
        assert_eq!(rows, vec![vec!["A", "B"], vec!["United States", "877"]]);
        assert_eq!(data_rows(tables[0]), vec![vec!["United States", "877"]]);
    }

    #[test]
    fn data_rows_skip_thead_and_all_th_rows() {
        let table = r#"<table class="wikitable">
            <thead><tr><td>Rank</td><td>Country</td></tr></thead>
            <tr><th>Country</th><th>Spending 2023</th></tr>
            <tr><th scope="row">World</th><th>2,443</th></tr>
            <tr><td>Malta</td><td>0.1</td></tr>
        </table>"#;
        assert_eq!(data_rows(table), vec![vec!["World", "2,443"], vec!["Malta", "0.1"]]);
        assert_eq!(table_rows(table).len(), 4);
    }
}
