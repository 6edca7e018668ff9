//! Error types for point cloud I/O.

use thiserror::Error;

/// Result type for point cloud I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while loading or saving a point cloud.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IoError {
    /// Unknown file format (unrecognized extension).
    #[error("unsupported point cloud format: .{extension}")]
    UnsupportedFormat {
        /// The unrecognized extension.
        extension: String,
    },

    /// A record could not be parsed; the whole load is aborted.
    #[error("could not read point {index} from line {line}: {reason}")]
    Parse {
        /// 1-based line number in the input.
        line: usize,
        /// Index the point would have had in the cloud.
        index: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// The file holds more points than a cloud can address.
    #[error(transparent)]
    Cloud(#[from] cloud_types::CloudError),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = IoError::Parse {
            line: 3,
            index: 1,
            reason: "expected 3 or 6 values, found 2".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "could not read point 1 from line 3: expected 3 or 6 values, found 2"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: IoError = io_err.into();
        assert!(matches!(err, IoError::Io(_)));
    }
}
