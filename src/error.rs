use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Dashboard errors
// ---------------------------------------------------------------------------

/// Errors raised by the data layer.
///
/// Undefined metric values are not errors; they travel as `Option<f64>` and
/// render as "N/A".
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The dataset could not be read or is structurally broken.
    /// Fatal for the session: no partial dataset is ever returned.
    #[error("Data unavailable ({}): {reason}", path.display())]
    DataUnavailable { path: PathBuf, reason: String },
}

impl DashboardError {
    pub fn data_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DashboardError::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_path_and_reason() {
        let err = DashboardError::data_unavailable("data/missing.csv", "file not found");
        assert_eq!(
            err.to_string(),
            "Data unavailable (data/missing.csv): file not found"
        );
    }
}
