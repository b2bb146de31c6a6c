// Batch preprocessing
// Rescales the amount column into [0, 1] and drops the raw time column
// before the batch reaches the detector.

use thiserror::Error;

use crate::entities::TransactionBatch;

pub const AMOUNT_COLUMN: &str = "Amount";
pub const TIME_COLUMN: &str = "Time";

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("column 'Amount' contains non-numeric values")]
    AmountNotNumeric,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PreprocessSummary {
    pub dropped_time: bool,
    pub rescaled_amount: bool,
}

/// Min-max scaling to [0, 1]. A constant series maps to 0.5 everywhere so a
/// degenerate column stays neutral instead of dividing by zero.
pub fn min_max_scale(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range.abs() < 1e-10 {
        return vec![0.5; values.len()];
    }

    values.iter().map(|x| (x - min) / range).collect()
}

/// Apply the upload preprocessing contract in place: drop `Time` when
/// present, then fit a min-max scaler on `Amount` and replace the column
/// with its rescaled values. Batches without an `Amount` column pass
/// through untouched; a non-numeric `Amount` column is a caller error.
pub fn prepare_batch(batch: &mut TransactionBatch) -> Result<PreprocessSummary, PreprocessError> {
    let mut summary = PreprocessSummary::default();

    summary.dropped_time = batch.drop_column(TIME_COLUMN);

    if let Some(index) = batch.column_index(AMOUNT_COLUMN) {
        if batch.row_count() > 0 {
            let values = batch
                .numeric_column(index)
                .ok_or(PreprocessError::AmountNotNumeric)?;
            batch.replace_column(index, min_max_scale(&values));
            summary.rescaled_amount = true;
        }
    }

    Ok(summary)
}
