//! Error types for the swing analysis engine
//!
//! Only [`AnalysisError::FatalInput`] ever reaches the caller of
//! [`crate::analyze_swing`]. The remaining variants are produced inside
//! individual components and converted into zero-confidence results plus
//! warnings, so a single failing heuristic never aborts the pipeline.

use thiserror::Error;

/// Errors that can occur during swing analysis
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Empty or malformed input (the only caller-visible failure)
    #[error("Fatal input: {0}")]
    FatalInput(String),

    /// Fewer frames or samples than a component requires
    #[error("Insufficient data for {component}: need at least {required}, got {actual}")]
    InsufficientData {
        /// Component reporting the shortfall
        component: &'static str,
        /// Minimum number of frames/samples required
        required: usize,
        /// Number actually available
        actual: usize,
    },

    /// Required landmarks are missing or below the visibility threshold
    #[error("Invalid landmarks: {0}")]
    InvalidLandmarks(String),

    /// Numerical error (non-finite intermediate, degenerate geometry, etc.)
    #[error("Numerical error: {0}")]
    NumericalError(String),
}

impl AnalysisError {
    /// Shorthand for an [`AnalysisError::InsufficientData`] value
    pub fn insufficient(component: &'static str, required: usize, actual: usize) -> Self {
        AnalysisError::InsufficientData {
            component,
            required,
            actual,
        }
    }

    /// Whether this error must be surfaced to the caller
    pub fn is_fatal(&self) -> bool {
        matches!(self, AnalysisError::FatalInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = AnalysisError::insufficient("phase segmenter", 10, 3);
        let msg = err.to_string();
        assert!(msg.contains("Insufficient data"));
        assert!(msg.contains("phase segmenter"));
        assert!(msg.contains("10"));
        assert!(msg.contains('3'));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_fatal_input() {
        let err = AnalysisError::FatalInput("empty pose sequence".to_string());
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "Fatal input: empty pose sequence");
    }
}
