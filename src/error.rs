use std::path::PathBuf;
use thiserror::Error;

/// Failures of the load + derive pipeline and of the exports built on it.
///
/// Anything here aborts the run before a chart is built; degenerate
/// normalization and unmapped codes are reported through `LoadReport`
/// instead.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Source file missing or unreadable.
    #[error("data unavailable: {}: {source}", path.display())]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Required column(s) absent from the header row.
    #[error("schema error in {}: missing column(s) {}", path.display(), missing.join(", "))]
    Schema { path: PathBuf, missing: Vec<String> },

    /// Broken CSV framing (unterminated quotes, bad UTF-8 in the header, ...).
    #[error("csv error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("write error: {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type MetricsResult<T> = Result<T, MetricsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_missing_columns() {
        let err = MetricsError::Schema {
            path: PathBuf::from("countries.csv"),
            missing: vec!["In Need".to_string(), "Targeted".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "schema error in countries.csv: missing column(s) In Need, Targeted"
        );
    }
}
