//! Text dashboard
//!
//! Collects the values of a render pass and writes the whole dashboard to a
//! writer when the pass is refreshed.

use bmshv_core::display::{DisplaySink, FieldId, TableId};
use bmshv_core::Matrix;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::{self, Stdout, Write};

const TITLE: &str = "BMS HV Monitor";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// [`DisplaySink`] that prints a text dashboard
pub struct ConsoleSink<W: Write> {
    out: W,
    clear_screen: bool,
    fields: BTreeMap<FieldId, String>,
    tables: BTreeMap<TableId, Matrix<String>>,
}

impl ConsoleSink<Stdout> {
    /// Dashboard on standard output, redrawn in place
    pub fn stdout() -> Self {
        let mut sink = Self::new(io::stdout());
        sink.clear_screen = true;
        sink
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            clear_screen: false,
            fields: BTreeMap::new(),
            tables: BTreeMap::new(),
        }
    }

    pub fn field(&self, field: FieldId) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn table(&self, table: TableId) -> Option<&Matrix<String>> {
        self.tables.get(&table)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// The dashboard as it would be printed
    pub fn render_text(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "=== {} ===", TITLE);

        for (field, value) in &self.fields {
            let caption = format!("{}:", field.caption());
            match field.unit() {
                Some(unit) if value != "-" => {
                    let _ = writeln!(text, "{:<20}{} {}", caption, value, unit);
                }
                _ => {
                    let _ = writeln!(text, "{:<20}{}", caption, value);
                }
            }
        }

        for (table, rows) in &self.tables {
            text.push('\n');
            text.push_str(&format_table(*table, rows));
        }

        text
    }
}

impl<W: Write> DisplaySink for ConsoleSink<W> {
    fn set_status(&mut self, field: FieldId, text: &str) {
        self.fields.insert(field, text.to_string());
    }

    fn set_table(&mut self, table: TableId, rows: &Matrix<String>) {
        self.tables.insert(table, rows.clone());
    }

    fn refresh(&mut self) {
        let mut frame = String::new();
        if self.clear_screen {
            frame.push_str(CLEAR_SCREEN);
        }
        frame.push_str(&self.render_text());

        if let Err(e) = self
            .out
            .write_all(frame.as_bytes())
            .and_then(|_| self.out.flush())
        {
            tracing::warn!(error = %e, "Failed to draw dashboard");
        }
    }
}

/// Lay out a table with its headings and right-aligned columns
pub fn format_table(table: TableId, rows: &Matrix<String>) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut header = table.headings(columns);
    let mut body: Matrix<String> = rows.clone();

    if table.numbered_rows() {
        header.insert(0, String::new());
        for (index, row) in body.iter_mut().enumerate() {
            row.insert(0, index.to_string());
        }
    }

    let width = |column: usize| {
        std::iter::once(&header)
            .chain(body.iter())
            .filter_map(|row| row.get(column))
            .map(|cell| cell.chars().count())
            .max()
            .unwrap_or(0)
    };
    let widths: Vec<usize> = (0..header.len()).map(width).collect();

    let mut text = format!("-- {} --\n", table.title());
    for row in std::iter::once(&header).chain(body.iter()) {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:>w$}", cell, w = widths.get(i).copied().unwrap_or(0)))
            .collect();
        text.push_str(line.join("  ").trim_end());
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(rows: &[&[&str]]) -> Matrix<String> {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_format_numbered_table() {
        let text = format_table(
            TableId::CellVoltage,
            &cells(&[&["3.9000", "#4.0100#"], &["3.8800", "3.9500"]]),
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "-- Cell Voltages --");
        assert_eq!(lines[1], "    LTC 0     LTC 1");
        assert_eq!(lines[2], "0  3.9000  #4.0100#");
        assert_eq!(lines[3], "1  3.8800    3.9500");
    }

    #[test]
    fn test_refresh_writes_frame() {
        let mut sink = ConsoleSink::new(Vec::new());
        sink.set_status(FieldId::ConnectionStatus, "Connected");
        sink.set_status(FieldId::Current, "1.5000");
        sink.refresh();

        let printed = String::from_utf8(sink.into_inner()).unwrap();
        assert!(printed.starts_with("=== BMS HV Monitor ==="));
        assert!(printed.contains("Connection Status:  Connected"));
        assert!(printed.contains("Current:            1.5000 A"));
    }
}
