use crate::dom::Table;
use crate::numeric::NumberInterpreter;

/// Column sum vector: one slot per column, `None` for columns in which no
/// numeric cell was ever seen. Built fresh on every pass, never persisted.
pub type ColumnSums = Vec<Option<f64>>;

/// Walks a table's data rows and accumulates per-column sums.
pub struct ColumnAggregator {
    interpreter: NumberInterpreter,
}

impl ColumnAggregator {
    pub fn new() -> Self {
        Self {
            interpreter: NumberInterpreter::new(),
        }
    }

    /// Sum every column of the table's body rows.
    ///
    /// Only body rows are enumerated, never the footer. Within a row every
    /// cell counts, header or data, in document order. Non-numeric cells
    /// are skipped without touching their slot. Ragged rows are tolerated;
    /// the vector grows to the widest row encountered. Read-only.
    pub fn column_sums(&self, table: &Table) -> ColumnSums {
        let mut sums: ColumnSums = Vec::new();

        for row in &table.body {
            if row.cells.len() > sums.len() {
                sums.resize(row.cells.len(), None);
            }
            for (idx, cell) in row.cells.iter().enumerate() {
                if let Some(value) = self.interpreter.interpret(&cell.text) {
                    sums[idx] = Some(sums[idx].unwrap_or(0.0) + value);
                }
            }
        }

        sums
    }
}

impl Default for ColumnAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Cell, Row, Table};

    #[test]
    fn test_basic_sums() {
        let table = Table::from_rows(&[&["10", "2.5"], &["20", "1,5"]]);
        let sums = ColumnAggregator::new().column_sums(&table);
        assert_eq!(sums, vec![Some(30.0), Some(4.0)]);
    }

    #[test]
    fn test_non_numeric_cells_leave_slot_absent() {
        let table = Table::from_rows(&[&["Alice", "10"], &["Bob", "20"]]);
        let sums = ColumnAggregator::new().column_sums(&table);
        assert_eq!(sums, vec![None, Some(30.0)]);
    }

    #[test]
    fn test_mixed_column_skips_garbage() {
        let table = Table::from_rows(&[&["10"], &["n/a"], &["5"]]);
        let sums = ColumnAggregator::new().column_sums(&table);
        assert_eq!(sums, vec![Some(15.0)]);
    }

    #[test]
    fn test_ragged_rows_grow_vector() {
        let table = Table::from_rows(&[&["1"], &["2", "3", "note"]]);
        let sums = ColumnAggregator::new().column_sums(&table);
        assert_eq!(sums, vec![Some(3.0), Some(3.0), None]);
    }

    #[test]
    fn test_header_cells_in_body_rows_count() {
        let table = Table {
            body: vec![Row {
                cells: vec![Cell::header("5"), Cell::data("7")],
            }],
            footer: None,
        };
        let sums = ColumnAggregator::new().column_sums(&table);
        assert_eq!(sums, vec![Some(5.0), Some(7.0)]);
    }

    #[test]
    fn test_footer_row_is_ignored() {
        let mut table = Table::from_rows(&[&["10"]]);
        table.footer = Some(Row::from_texts(&["10.00"]));
        let sums = ColumnAggregator::new().column_sums(&table);
        assert_eq!(sums, vec![Some(10.0)]);
    }

    #[test]
    fn test_empty_table_yields_empty_vector() {
        let table = Table::default();
        assert!(ColumnAggregator::new().column_sums(&table).is_empty());
    }
}
