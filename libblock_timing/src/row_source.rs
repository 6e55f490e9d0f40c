use super::config::ColumnNames;
use super::error::SchemaError;
use super::table::{Cell, Table};
use super::trial::{Condition, TrialRow};

/// RowSource pulls TrialRows for one material type out of a Table.
///
/// The required columns are resolved once when the source is created, so a table missing
/// any of them fails before any row is looked at.
#[derive(Debug)]
pub struct RowSource<'a> {
    table: &'a Table,
    columns: &'a ColumnNames,
    none_marker: &'a str,
    onset_col: usize,
    duration_col: usize,
    condition_col: usize,
    material_col: usize,
}

impl<'a> RowSource<'a> {
    /// Create a new RowSource.
    ///
    /// Requires the column names to read and the text which marks a trial with no condition
    pub fn new(
        table: &'a Table,
        columns: &'a ColumnNames,
        none_marker: &'a str,
    ) -> Result<Self, SchemaError> {
        let find = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            table,
            columns,
            none_marker,
            onset_col: find(columns.onset.as_str())?,
            duration_col: find(columns.duration.as_str())?,
            condition_col: find(columns.condition.as_str())?,
            material_col: find(columns.material.as_str())?,
        })
    }

    /// Get the rows of one material type, in table order and indexed from 0.
    ///
    /// An empty Vec means the material type does not appear in the table.
    pub fn rows_for_material(&self, label: &str) -> Result<Vec<TrialRow>, SchemaError> {
        let mut rows = Vec::new();
        for table_row in 0..self.table.n_rows() {
            if !self.is_material(table_row, label) {
                continue;
            }
            rows.push(TrialRow::new(
                rows.len(),
                self.number(table_row, self.onset_col, &self.columns.onset)?,
                self.number(table_row, self.duration_col, &self.columns.duration)?,
                self.condition(table_row),
                label,
            ));
        }
        Ok(rows)
    }

    /// Number of rows carrying each label, in the order given
    pub fn material_counts<'l>(&self, labels: &[&'l str]) -> Vec<(&'l str, usize)> {
        labels
            .iter()
            .map(|label| {
                let count = (0..self.table.n_rows())
                    .filter(|row| self.is_material(*row, label))
                    .count();
                (*label, count)
            })
            .collect()
    }

    fn is_material(&self, row: usize, label: &str) -> bool {
        match self.table.cell(row, self.material_col) {
            Cell::Text(text) => text == label,
            _ => false,
        }
    }

    /// Blank cells, error cells and the marker text all mean "no condition"
    fn condition(&self, row: usize) -> Condition {
        match self.table.cell(row, self.condition_col).as_text() {
            Some(text) if text != self.none_marker => Condition::Active(text),
            _ => Condition::NoneMarker,
        }
    }

    fn number(&self, row: usize, column: usize, name: &str) -> Result<f64, SchemaError> {
        let cell = self.table.cell(row, column);
        match cell.as_f64() {
            Some(value) => Ok(value),
            None => match cell.as_text() {
                // Table rows are reported 1-based with the header as row 1, as a spreadsheet shows them
                Some(value) => Err(SchemaError::NotNumeric {
                    column: name.to_string(),
                    row: row + 2,
                    value,
                }),
                None => Err(SchemaError::MissingValue {
                    column: name.to_string(),
                    row: row + 2,
                }),
            },
        }
    }
}

//Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn headers() -> Vec<String> {
        ["Onset_Time", "Duration", "Condition", "Material_T"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn sample_table() -> Table {
        let rows = vec![
            vec![Cell::Number(0.0), Cell::Number(1.0), text("Old"), text("Object")],
            vec![Cell::Number(1.0), Cell::Number(1.0), text("Old"), text("Scene")],
            vec![Cell::Number(2.0), Cell::Number(1.0), Cell::Empty, text("Object")],
            vec![Cell::Number(3.0), Cell::Number(1.0), text("FALSE"), text("Scene")],
            vec![Cell::Number(4.0), Cell::Number(1.0), Cell::Bool(false), text("Object")],
            vec![Cell::Number(5.0), Cell::Number(1.0), Cell::Number(2.0), text("Object")],
            vec![Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty],
        ];
        Table::new(Path::new("Run1_Recognition.xlsx"), headers(), rows)
    }

    #[test]
    fn test_rows_for_material() {
        let table = sample_table();
        let columns = ColumnNames::default();
        let source = RowSource::new(&table, &columns, "FALSE").unwrap();
        let rows = source.rows_for_material("Object").unwrap();

        assert_eq!(rows.len(), 4);
        let indices: Vec<usize> = rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        let onsets: Vec<f64> = rows.iter().map(|r| r.onset_time).collect();
        assert_eq!(onsets, vec![0.0, 2.0, 4.0, 5.0]);
        assert_eq!(rows[0].condition, Condition::Active(String::from("Old")));
        assert_eq!(rows[1].condition, Condition::NoneMarker);
        assert_eq!(rows[2].condition, Condition::Active(String::from("False")));
        assert_eq!(rows[3].condition, Condition::Active(String::from("2")));
        assert!(rows.iter().all(|r| r.material_type == "Object"));
    }

    #[test]
    fn test_marker_text_is_sentinel() {
        let table = sample_table();
        let columns = ColumnNames::default();
        let source = RowSource::new(&table, &columns, "FALSE").unwrap();
        let rows = source.rows_for_material("Scene").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].condition, Condition::NoneMarker);
    }

    #[test]
    fn test_unknown_material_is_empty() {
        let table = sample_table();
        let columns = ColumnNames::default();
        let source = RowSource::new(&table, &columns, "FALSE").unwrap();
        assert!(source.rows_for_material("Pair").unwrap().is_empty());
        assert_eq!(
            source.material_counts(&["Object", "Scene", "Pair"]),
            vec![("Object", 4), ("Scene", 2), ("Pair", 0)]
        );
    }

    #[test]
    fn test_missing_column() {
        let mut cols = headers();
        cols.remove(2);
        let table = Table::new(Path::new("bad.csv"), cols, vec![]);
        let columns = ColumnNames::default();
        match RowSource::new(&table, &columns, "FALSE") {
            Err(SchemaError::MissingColumn(name)) => assert_eq!(name, "Condition"),
            _ => panic!(),
        }
    }

    #[test]
    fn test_non_numeric_onset() {
        let rows = vec![vec![text("soon"), Cell::Number(1.0), text("Old"), text("Pair")]];
        let table = Table::new(Path::new("bad.csv"), headers(), rows);
        let columns = ColumnNames::default();
        let source = RowSource::new(&table, &columns, "FALSE").unwrap();
        match source.rows_for_material("Pair") {
            Err(SchemaError::NotNumeric { column, row, value }) => {
                assert_eq!(column, "Onset_Time");
                assert_eq!(row, 2);
                assert_eq!(value, "soon");
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_missing_duration() {
        let rows = vec![vec![Cell::Number(0.0), Cell::Empty, text("Old"), text("Pair")]];
        let table = Table::new(Path::new("bad.csv"), headers(), rows);
        let columns = ColumnNames::default();
        let source = RowSource::new(&table, &columns, "FALSE").unwrap();
        assert!(matches!(
            source.rows_for_material("Pair"),
            Err(SchemaError::MissingValue { .. })
        ));
    }
}
