//! Error types for the SOM posterization engine.

use thiserror::Error;

/// The main error type for somposter operations.
#[derive(Error, Debug)]
pub enum SomError {
    /// A caller-supplied argument violates the input contract.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A temporary or output buffer could not be obtained.
    #[error("Allocation failure: could not reserve {requested} elements for {what}")]
    AllocationFailure {
        /// What the buffer was for.
        what: &'static str,
        /// Number of elements requested.
        requested: usize,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for somposter operations.
pub type Result<T> = std::result::Result<T, SomError>;

impl From<serde_json::Error> for SomError {
    fn from(err: serde_json::Error) -> Self {
        SomError::Config(err.to_string())
    }
}

/// Allocates a buffer of `len` elements pre-filled with `fill`, reporting failure instead of aborting.
pub(crate) fn try_buffer<T: Clone>(what: &'static str, len: usize, fill: T) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| SomError::AllocationFailure { what, requested: len })?;
    buf.resize(len, fill);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_buffer() {
        let buf = try_buffer("test", 16, 0.0f32).unwrap();
        assert_eq!(buf.len(), 16);
        assert!(buf.iter().all(|&v| v == 0.0));

        let filled = try_buffer("test", 3, [1.0f32, 2.0, 3.0]).unwrap();
        assert_eq!(filled, vec![[1.0, 2.0, 3.0]; 3]);
    }

    #[test]
    fn test_try_buffer_overflow() {
        let err = try_buffer("huge", usize::MAX, 0u64).unwrap_err();
        assert!(matches!(
            err,
            SomError::AllocationFailure { what: "huge", requested: usize::MAX }
        ));
    }

    #[test]
    fn test_error_display() {
        let err = SomError::InvalidArgument("empty pixel collection".to_string());
        assert_eq!(err.to_string(), "Invalid argument: empty pixel collection");
    }
}
