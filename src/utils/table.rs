//! Table rendering utilities for CLI outputs.

use unicode_width::UnicodeWidthStr;

pub struct Column {
    pub header: String,
    pub width: usize,
}

impl Column {
    pub fn new(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Grow column widths to fit the rows (display width, not byte length).
    pub fn autosize(&mut self) {
        for row in &self.rows {
            for (i, col) in self.columns.iter_mut().enumerate() {
                if let Some(cell) = row.get(i) {
                    col.width = col.width.max(UnicodeWidthStr::width(cell.as_str()));
                }
            }
        }
        for col in &mut self.columns {
            col.width = col.width.max(UnicodeWidthStr::width(col.header.as_str()));
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        // Header
        for col in &self.columns {
            out.push_str(&pad(&col.header, col.width));
            out.push(' ');
        }
        out.push('\n');

        for col in &self.columns {
            out.push_str(&"-".repeat(col.width));
            out.push(' ');
        }
        out.push('\n');

        // Rows
        for row in &self.rows {
            for (i, col) in self.columns.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                out.push_str(&pad(cell, col.width));
                out.push(' ');
            }
            out.push('\n');
        }

        out
    }
}

fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    let fill = width.saturating_sub(w);
    format!("{}{}", s, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autosize_grows_to_content() {
        let mut t = Table::new(vec![Column::new("Name", 2), Column::new("Company", 2)]);
        t.add_row(vec!["Kantoor Noord".into(), "The Global".into()]);
        t.autosize();
        assert_eq!(t.columns[0].width, "Kantoor Noord".len());

        let rendered = t.render();
        assert!(rendered.contains("Kantoor Noord"));
        assert!(rendered.starts_with("Name"));
    }
}
