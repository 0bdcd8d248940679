use crate::models::{CellValue, DataTable, Row};

/// Entry mode for a cell, fixed at render time from the original value's
/// type. Editing never changes the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Numeric,
    Text,
}

/// One edit buffer, tagged with its originating row index and column name
/// so collection never has to rely on layout order.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub kind: CellKind,
    pub buffer: String,
    pub row: usize,
    pub column: String,
}

/// An editable rendition of a [`DataTable`]. Once rendered, the grid (not
/// the table it came from) is the single source of truth for current edits:
/// collection reads the buffers, never the original rows.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableGrid {
    pub columns: Vec<String>,
    cells: Vec<Vec<GridCell>>,
}

impl EditableGrid {
    /// Build one cell per (row, column) pair. A row missing a column
    /// renders as an empty text cell.
    pub fn render(table: &DataTable) -> EditableGrid {
        let cells = table
            .rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                table
                    .columns
                    .iter()
                    .map(|column| match row.get(column) {
                        Some(value) => GridCell {
                            kind: if value.is_number() {
                                CellKind::Numeric
                            } else {
                                CellKind::Text
                            },
                            buffer: value.display(),
                            row: row_index,
                            column: column.clone(),
                        },
                        None => GridCell {
                            kind: CellKind::Text,
                            buffer: String::new(),
                            row: row_index,
                            column: column.clone(),
                        },
                    })
                    .collect()
            })
            .collect();

        EditableGrid {
            columns: table.columns.clone(),
            cells,
        }
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.iter().map(|row| row.as_slice())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&GridCell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    /// Commit an edit to one buffer. Out-of-range coordinates are ignored.
    pub fn set_cell(&mut self, row: usize, col: usize, value: String) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            cell.buffer = value;
        }
    }

    /// Rebuild rows from the tagged buffers alone, in ascending order of
    /// original row index. Numeric buffers that fail to parse collect as
    /// `NaN` rather than an error, so one bad cell never blocks submission.
    pub fn collect(&self) -> Vec<Row> {
        // distinct row tags, ascending; row index is the only identity a row has
        let indices: std::collections::BTreeSet<usize> =
            self.cells.iter().flatten().map(|cell| cell.row).collect();

        indices
            .into_iter()
            .map(|index| {
                self.cells
                    .iter()
                    .flatten()
                    .filter(|cell| cell.row == index)
                    .map(|cell| {
                        let value = match cell.kind {
                            CellKind::Numeric => CellValue::Number(
                                cell.buffer.trim().parse::<f64>().unwrap_or(f64::NAN),
                            ),
                            CellKind::Text => CellValue::Text(cell.buffer.clone()),
                        };
                        (cell.column.clone(), value)
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;
    use std::collections::HashMap;

    fn iris_like_table() -> DataTable {
        let mut first = HashMap::new();
        first.insert("sepal_length".to_string(), CellValue::Number(5.1));
        first.insert("species".to_string(), CellValue::Text("setosa".to_string()));
        let mut second = HashMap::new();
        second.insert("sepal_length".to_string(), CellValue::Number(6.0));
        second.insert(
            "species".to_string(),
            CellValue::Text("virginica".to_string()),
        );
        DataTable {
            rows: vec![first, second],
            columns: vec!["sepal_length".to_string(), "species".to_string()],
        }
    }

    #[test]
    fn render_produces_one_cell_per_row_column_pair() {
        let table = iris_like_table();
        let grid = EditableGrid::render(&table);
        assert_eq!(grid.row_count(), 2);
        for (row_index, row) in grid.rows().enumerate() {
            assert_eq!(row.len(), 2);
            for (col_index, cell) in row.iter().enumerate() {
                assert_eq!(cell.row, row_index);
                assert_eq!(cell.column, table.columns[col_index]);
            }
        }
    }

    #[test]
    fn cell_kinds_follow_original_value_types() {
        let grid = EditableGrid::render(&iris_like_table());
        assert_eq!(grid.cell(0, 0).unwrap().kind, CellKind::Numeric);
        assert_eq!(grid.cell(0, 1).unwrap().kind, CellKind::Text);
    }

    #[test]
    fn integral_numbers_render_without_trailing_zero() {
        let grid = EditableGrid::render(&iris_like_table());
        assert_eq!(grid.cell(1, 0).unwrap().buffer, "6");
    }

    #[test]
    fn collect_without_edits_round_trips() {
        let table = iris_like_table();
        let collected = EditableGrid::render(&table).collect();
        assert_eq!(collected, table.rows);
    }

    #[test]
    fn collect_reads_edited_buffers_not_original_rows() {
        let table = iris_like_table();
        let mut grid = EditableGrid::render(&table);
        grid.set_cell(0, 0, "2.5".to_string());
        grid.set_cell(1, 1, "versicolor".to_string());
        let collected = grid.collect();
        assert_eq!(collected[0]["sepal_length"], CellValue::Number(2.5));
        assert_eq!(
            collected[1]["species"],
            CellValue::Text("versicolor".to_string())
        );
        // untouched cells keep their values
        assert_eq!(
            collected[0]["species"],
            CellValue::Text("setosa".to_string())
        );
    }

    #[test]
    fn bad_numeric_entry_collects_as_nan() {
        let mut grid = EditableGrid::render(&iris_like_table());
        grid.set_cell(0, 0, "not a number".to_string());
        let collected = grid.collect();
        match &collected[0]["sepal_length"] {
            CellValue::Number(n) => assert!(n.is_nan()),
            other => panic!("expected numeric cell, got {:?}", other),
        }
        // the neighbouring cells still collect
        assert_eq!(collected[1]["sepal_length"], CellValue::Number(6.0));
    }

    #[test]
    fn missing_column_renders_as_empty_text_cell() {
        let mut row = HashMap::new();
        row.insert("a".to_string(), CellValue::Number(1.0));
        let table = DataTable {
            rows: vec![row],
            columns: vec!["a".to_string(), "b".to_string()],
        };
        let grid = EditableGrid::render(&table);
        let cell = grid.cell(0, 1).unwrap();
        assert_eq!(cell.kind, CellKind::Text);
        assert_eq!(cell.buffer, "");
    }

    #[test]
    fn collect_orders_rows_by_original_index() {
        let table = iris_like_table();
        let grid = EditableGrid::render(&table);
        let collected = grid.collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0]["sepal_length"], CellValue::Number(5.1));
        assert_eq!(collected[1]["sepal_length"], CellValue::Number(6.0));
    }

    #[test]
    fn out_of_range_edit_is_ignored() {
        let table = iris_like_table();
        let mut grid = EditableGrid::render(&table);
        grid.set_cell(10, 0, "9.9".to_string());
        assert_eq!(grid.collect(), table.rows);
    }
}
