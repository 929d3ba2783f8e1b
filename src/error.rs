use std::any::Any;
use std::ops::Range;
use thiserror::Error;

/// Result type for grid construction and search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while building a grid or running a search
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Task failed on rows {}..{}: {message}", .row_range.start, .row_range.end)]
    TaskFailure {
        row_range: Range<usize>,
        message: String,
    },
    #[error("Failed to build worker pool: {0}")]
    PoolBuild(String),
}

impl SearchError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        SearchError::InvalidArgument(msg.into())
    }

    /// Builds a `TaskFailure` from a payload caught with `catch_unwind`.
    pub fn from_panic(row_range: Range<usize>, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        SearchError::TaskFailure { row_range, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payload_messages() {
        let err = SearchError::from_panic(2..3, Box::new("boom"));
        assert_eq!(
            err,
            SearchError::TaskFailure {
                row_range: 2..3,
                message: "boom".to_string()
            }
        );

        let err = SearchError::from_panic(0..4, Box::new(String::from("owned")));
        assert_eq!(err.to_string(), "Task failed on rows 0..4: owned");

        let err = SearchError::from_panic(1..2, Box::new(42u8));
        assert!(err.to_string().contains("unknown panic payload"));
    }
}
