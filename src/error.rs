use thiserror::Error;

/// Errors raised by [`crate::solver::MultiTsp`] operations.
///
/// Index-range violations are programmer errors and abort the single call;
/// "already visited" and "no candidate pair" are normal outcomes and are not
/// represented here.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("salesman index {index} out of bounds ({len} salesmen)")]
    SalesmanIndex { index: usize, len: usize },

    #[error("city index {index} out of bounds ({len} cities)")]
    CityIndex { index: usize, len: usize },
}

/// Errors raised while loading cities or salesmen from CSV.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("header row {0} not found in input")]
    MissingHeader(usize),

    #[error("column {0:?} not found in header row")]
    MissingColumn(String),

    #[error("row {row}: invalid {field} value {value:?}")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },
}
