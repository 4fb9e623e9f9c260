//! Fixed-width, pipe-delimited text tables.
//!
//! ```text
//! +======+======+
//! | Name | Mail |
//! +======+======+
//! | Anna |  a@x |
//! +------+------+
//! ```
//!
//! Every other line carries data: line 1 is the header, lines 3, 5, ... are
//! records. Cells are right-justified to the widest value of their column.
//! Values must not contain `|` or line breaks.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table has no header row")]
    MissingHeader,
    #[error("line {line}: missing column '{column}'")]
    MissingColumn { column: String, line: usize },
    #[error("line {line}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        column: String,
        value: String,
        line: usize,
    },
}

/// One parsed record, keyed by header name.
#[derive(Debug, Clone, Default)]
pub struct Row {
    line: usize,
    cells: HashMap<String, String>,
}

impl Row {
    pub fn get(&self, column: &str) -> Result<&str, TableError> {
        self.cells
            .get(column)
            .map(String::as_str)
            .ok_or_else(|| TableError::MissingColumn {
                column: column.to_string(),
                line: self.line,
            })
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Like [`Row::get`], but an empty cell is an error.
    pub fn get_non_empty(&self, column: &str) -> Result<&str, TableError> {
        let value = self.get(column)?;
        if value.is_empty() {
            return Err(TableError::InvalidValue {
                column: column.to_string(),
                value: value.to_string(),
                line: self.line(),
            });
        }
        Ok(value)
    }
}

/// A value that can be stored as one table row.
pub trait TableRecord: Sized {
    fn columns() -> Vec<&'static str>;
    /// Cells in `columns()` order.
    fn to_row(&self) -> Vec<String>;
    fn from_row(row: &Row) -> Result<Self, TableError>;
}

pub fn render<R: TableRecord>(records: &[R]) -> String {
    let header: Vec<String> = R::columns().iter().map(|c| c.to_string()).collect();
    let rows: Vec<Vec<String>> = records.iter().map(TableRecord::to_row).collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let divider = |fill: char| {
        let parts: Vec<String> = widths
            .iter()
            .map(|w| fill.to_string().repeat(w + 2))
            .collect();
        format!("+{}+\n", parts.join("+"))
    };
    let line = |cells: &[String]| {
        let parts: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!(" {:>width$} ", cell, width = width))
            .collect();
        format!("|{}|\n", parts.join("|"))
    };

    let mut out = String::new();
    out.push_str(&divider('='));
    out.push_str(&line(&header));
    out.push_str(&divider('='));
    for row in &rows {
        out.push_str(&line(row));
        out.push_str(&divider('-'));
    }
    out
}

fn split_cells(line: &str) -> Vec<String> {
    line.split('|').map(|s| s.trim().to_string()).collect()
}

pub fn parse_rows(text: &str) -> Result<Vec<Row>, TableError> {
    let mut data_lines = text.lines().enumerate().filter(|(i, _)| i % 2 == 1);
    let (_, header_line) = data_lines.next().ok_or(TableError::MissingHeader)?;
    let keys = split_cells(header_line);
    if keys.iter().all(|k| k.is_empty()) {
        return Err(TableError::MissingHeader);
    }

    let mut rows = Vec::new();
    for (index, line) in data_lines {
        let cells: HashMap<String, String> = keys
            .iter()
            .zip(split_cells(line))
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.clone(), value))
            .collect();
        if cells.is_empty() {
            continue;
        }
        rows.push(Row {
            line: index + 1,
            cells,
        });
    }
    Ok(rows)
}

pub fn parse<R: TableRecord>(text: &str) -> Result<Vec<R>, TableError> {
    parse_rows(text)?.iter().map(R::from_row).collect()
}

pub fn read_file<R: TableRecord>(path: &Path) -> Result<Vec<R>> {
    let text = fs::read_to_string(path).with_context(|| format!("Reading table {:?}", path))?;
    parse(&text).with_context(|| format!("Parsing table {:?}", path))
}

pub fn write_file<R: TableRecord>(path: &Path, records: &[R]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Creating folder {:?}", parent))?;
    }
    fs::write(path, render(records)).with_context(|| format!("Writing table {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pair {
        id: String,
        name: String,
    }

    impl TableRecord for Pair {
        fn columns() -> Vec<&'static str> {
            vec!["ID", "Name"]
        }

        fn to_row(&self) -> Vec<String> {
            vec![self.id.clone(), self.name.clone()]
        }

        fn from_row(row: &Row) -> Result<Self, TableError> {
            Ok(Pair {
                id: row.get("ID")?.to_string(),
                name: row.get("Name")?.to_string(),
            })
        }
    }

    fn pair(id: &str, name: &str) -> Pair {
        Pair {
            id: id.into(),
            name: name.into(),
        }
    }

    #[test]
    fn renders_documented_layout() {
        let text = render(&[pair("01", "Jürgen"), pair("02", "Johannes")]);
        let expected = "\
+====+==========+
| ID |     Name |
+====+==========+
| 01 |   Jürgen |
+----+----------+
| 02 | Johannes |
+----+----------+
";
        assert_eq!(text, expected);
    }

    #[test]
    fn parses_what_it_renders() {
        let records = vec![pair("01", "Jürgen"), pair("02", "Anna Schmidt")];
        let parsed: Vec<Pair> = parse(&render(&records)).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn empty_table_has_header_only() {
        let parsed: Vec<Pair> = parse(&render::<Pair>(&[])).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn missing_header_is_reported() {
        assert_eq!(parse_rows("").unwrap_err(), TableError::MissingHeader);
    }

    #[test]
    fn missing_column_names_line() {
        let text = "+==+\n| ID |\n+==+\n| 01 |\n+--+\n";
        let err = parse::<Pair>(text).unwrap_err();
        assert_eq!(
            err,
            TableError::MissingColumn {
                column: "Name".into(),
                line: 4
            }
        );
    }

    #[test]
    fn empty_required_cell_is_invalid() {
        let text = render(&[pair("01", "")]);
        let row = &parse_rows(&text).unwrap()[0];
        assert_eq!(row.get("Name"), Ok(""));
        assert_eq!(
            row.get_non_empty("Name"),
            Err(TableError::InvalidValue {
                column: "Name".into(),
                value: "".into(),
                line: row.line(),
            })
        );
        assert_eq!(row.line(), 4);
    }

    #[test]
    fn tolerates_crlf() {
        let text = render(&[pair("01", "Anna")]).replace('\n', "\r\n");
        let parsed: Vec<Pair> = parse(&text).unwrap();
        assert_eq!(parsed, vec![pair("01", "Anna")]);
    }
}
