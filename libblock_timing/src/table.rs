use calamine::{open_workbook_auto, Data, Reader};
use csv::{ReaderBuilder, Trim};
use fxhash::FxHashMap;
use std::path::{Path, PathBuf};

use super::error::TableError;

const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];
const CSV_EXTENSION: &str = "csv";

/// A single spreadsheet cell, reduced to the kinds of values a trial log holds
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
    Error,
    Empty,
}

impl Cell {
    /// Interpret the cell as a number. Text holding a number (as in CSV files) is parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Render the cell as text. Empty and error cells have no text.
    ///
    /// Booleans render as `True`/`False`, so a boolean cell never equals the `FALSE` marker.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Number(value) => Some(value.to_string()),
            Self::Text(text) => Some(text.clone()),
            Self::Bool(true) => Some(String::from("True")),
            Self::Bool(false) => Some(String::from("False")),
            Self::Error | Self::Empty => None,
        }
    }

    fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Int(i) => Self::Number(*i as f64),
            Data::Float(f) => Self::Number(*f),
            Data::String(s) => Self::from_text(s),
            Data::Bool(b) => Self::Bool(*b),
            Data::Error(_) => Self::Error,
            Data::Empty => Self::Empty,
            other => Self::from_text(&other.to_string()),
        }
    }
}

/// An in-memory table: named columns over rows of cells, in file order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    path: PathBuf,
    column_map: FxHashMap<String, usize>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a table from a header row and data rows
    pub fn new(path: &Path, headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut column_map = FxHashMap::default();
        for (idx, name) in headers.into_iter().enumerate() {
            // First occurrence wins for duplicated headers
            column_map.entry(name).or_insert(idx);
        }
        Self {
            path: path.to_path_buf(),
            column_map,
            rows,
        }
    }

    /// Read a table from a spreadsheet or CSV file, picking the reader from the extension
    pub fn read(path: &Path) -> Result<Self, TableError> {
        if !path.exists() {
            return Err(TableError::BadFilePath(path.to_path_buf()));
        }
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if extension == CSV_EXTENSION {
            Self::read_csv(path)
        } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            Self::read_workbook(path)
        } else {
            Err(TableError::UnsupportedFormat(path.to_path_buf()))
        }
    }

    /// Check whether a file is something `Table::read` understands
    pub fn is_supported(path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let ext = ext.to_string_lossy().to_lowercase();
                ext == CSV_EXTENSION || WORKBOOK_EXTENSIONS.contains(&ext.as_str())
            }
            None => false,
        }
    }

    /// Read the first worksheet of a workbook. The first row is the header.
    fn read_workbook(path: &Path) -> Result<Self, TableError> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| TableError::NoWorksheet(path.to_path_buf()))??;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header) => header.iter().map(|h| h.to_string().trim().to_string()).collect(),
            None => return Err(TableError::NoHeader(path.to_path_buf())),
        };
        let data: Vec<Vec<Cell>> = rows
            .map(|row| row.iter().map(Cell::from).collect::<Vec<Cell>>())
            .collect();

        Ok(Self::new(path, headers, data))
    }

    /// Read a comma separated file with a header row
    fn read_csv(path: &Path) -> Result<Self, TableError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(TableError::NoHeader(path.to_path_buf()));
        }

        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(Cell::from_text).collect());
        }

        Ok(Self::new(path, headers, rows))
    }

    /// Position of the column with exactly this header, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_map.get(name).copied()
    }

    /// Cell at a row and column. Short rows read as empty.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(EMPTY)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
