// Transaction batch entity
// A parsed CSV upload: one header row plus typed cells, column-major typing

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single cell of an uploaded batch.
///
/// Typing is decided per column, not per cell: a column is integer only if
/// every cell parses as an integer, numeric if every cell parses as a finite
/// number, and raw text otherwise. Mixed int/float columns are promoted to
/// float so a column never holds both variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(value) => Some(*value as f64),
            CellValue::Float(value) => Some(*value),
            CellValue::Text(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, CellValue::Text(_))
    }

    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Int(value) => Value::from(*value),
            CellValue::Float(value) => {
                serde_json::Number::from_f64(*value).map(Value::Number).unwrap_or(Value::Null)
            }
            CellValue::Text(value) => Value::String(value.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    Float,
    Text,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BatchError {
    #[error("row {row} has {got} fields, expected {expected}")]
    RaggedRow { row: usize, expected: usize, got: usize },
}

/// An uploaded batch of transactions: ordered column names plus one typed
/// cell vector per row. Within a column every cell holds the same variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionBatch {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TransactionBatch {
    /// Build a batch from raw string records, inferring one type per column.
    ///
    /// A cell counts as integer when it parses as `i64` and as numeric when
    /// it parses as a finite `f64`; `NaN`/`inf` spellings and empty cells
    /// demote the whole column to text, which keeps every raw string intact.
    pub fn from_rows(columns: Vec<String>, raw_rows: Vec<Vec<String>>) -> Result<Self, BatchError> {
        let expected = columns.len();
        for (index, row) in raw_rows.iter().enumerate() {
            if row.len() != expected {
                return Err(BatchError::RaggedRow {
                    row: index + 1,
                    expected,
                    got: row.len(),
                });
            }
        }

        let mut kinds = vec![ColumnKind::Int; expected];
        for row in &raw_rows {
            for (col, raw) in row.iter().enumerate() {
                if kinds[col] == ColumnKind::Text {
                    continue;
                }
                let trimmed = raw.trim();
                if trimmed.parse::<i64>().is_ok() {
                    continue;
                }
                match trimmed.parse::<f64>() {
                    Ok(value) if value.is_finite() => kinds[col] = ColumnKind::Float,
                    _ => kinds[col] = ColumnKind::Text,
                }
            }
        }

        let rows = raw_rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .enumerate()
                    .map(|(col, raw)| match kinds[col] {
                        ColumnKind::Int => CellValue::Int(raw.trim().parse().unwrap_or_default()),
                        ColumnKind::Float => CellValue::Float(raw.trim().parse().unwrap_or_default()),
                        ColumnKind::Text => CellValue::Text(raw),
                    })
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Indices of columns whose cells are all numeric. Empty batches have no
    /// numeric columns.
    pub fn numeric_columns(&self) -> Vec<usize> {
        let Some(first) = self.rows.first() else {
            return Vec::new();
        };
        (0..self.columns.len()).filter(|&col| first[col].is_numeric()).collect()
    }

    /// Values of one column as `f64`, or `None` when the column is not
    /// numeric.
    pub fn numeric_column(&self, index: usize) -> Option<Vec<f64>> {
        self.rows.iter().map(|row| row[index].as_f64()).collect()
    }

    /// Overwrite one column with float values, e.g. after rescaling.
    pub fn replace_column(&mut self, index: usize, values: Vec<f64>) {
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[index] = CellValue::Float(value);
        }
    }

    /// Drop a column by name. Returns whether the column existed.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(index) = self.column_index(name) else {
            return false;
        };
        self.columns.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
        true
    }

    /// One row as a JSON object keyed by column name.
    pub fn row_object(&self, index: usize) -> serde_json::Map<String, Value> {
        let mut object = serde_json::Map::new();
        if let Some(row) = self.rows.get(index) {
            for (column, cell) in self.columns.iter().zip(row) {
                object.insert(column.clone(), cell.to_json());
            }
        }
        object
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter().map(|row| row.iter().map(|s| s.to_string()).collect()).collect()
    }

    #[test]
    fn integer_column_keeps_integer_cells() {
        let batch = TransactionBatch::from_rows(
            vec!["Amount".into()],
            raw(&[&["10"], &["1000000"], &["12"]]),
        )
        .unwrap();
        assert_eq!(batch.rows[1][0], CellValue::Int(1_000_000));
    }

    #[test]
    fn mixed_numeric_column_promotes_to_float() {
        let batch =
            TransactionBatch::from_rows(vec!["Amount".into()], raw(&[&["10"], &["3.5"]])).unwrap();
        assert_eq!(batch.rows[0][0], CellValue::Float(10.0));
        assert_eq!(batch.rows[1][0], CellValue::Float(3.5));
    }

    #[test]
    fn non_numeric_cell_demotes_whole_column_to_text() {
        let batch =
            TransactionBatch::from_rows(vec!["type".into()], raw(&[&["17"], &["CASH_OUT"]]))
                .unwrap();
        assert_eq!(batch.rows[0][0], CellValue::Text("17".into()));
        assert!(batch.numeric_columns().is_empty());
    }

    #[test]
    fn nan_and_empty_cells_count_as_text() {
        let batch = TransactionBatch::from_rows(
            vec!["a".into(), "b".into()],
            raw(&[&["NaN", ""], &["1.0", "2"]]),
        )
        .unwrap();
        assert!(batch.numeric_columns().is_empty());
    }

    #[test]
    fn ragged_row_is_rejected() {
        let err = TransactionBatch::from_rows(
            vec!["a".into(), "b".into()],
            raw(&[&["1", "2"], &["3"]]),
        )
        .unwrap_err();
        assert!(matches!(err, BatchError::RaggedRow { row: 2, .. }));
    }

    #[test]
    fn drop_column_removes_cells_in_every_row() {
        let mut batch = TransactionBatch::from_rows(
            vec!["Time".into(), "Amount".into()],
            raw(&[&["0", "10"], &["1", "12"]]),
        )
        .unwrap();
        assert!(batch.drop_column("Time"));
        assert_eq!(batch.columns, vec!["Amount".to_string()]);
        assert_eq!(batch.rows[0], vec![CellValue::Int(10)]);
        assert!(!batch.drop_column("Time"));
    }

    #[test]
    fn row_object_keys_cells_by_column_name() {
        let batch = TransactionBatch::from_rows(
            vec!["Amount".into(), "type".into()],
            raw(&[&["10", "TRANSFER"]]),
        )
        .unwrap();
        let object = batch.row_object(0);
        assert_eq!(object["Amount"], serde_json::json!(10));
        assert_eq!(object["type"], serde_json::json!("TRANSFER"));
    }
}
