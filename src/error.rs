//! Error types for the scan_quality library

use thiserror::Error;

/// Result type alias for scan_quality operations
pub type Result<T> = std::result::Result<T, MeasureError>;

/// Errors raised while measuring and evaluating a calibration target.
///
/// Every variant except [`MeasureError::ConfigError`] and
/// [`MeasureError::InvalidParameter`] aborts the run it was raised in.
/// Nothing is retried internally.
#[derive(Error, Debug)]
pub enum MeasureError {
    /// The source image could not be classified as LAB or RGB
    #[error("Color space undetermined: probe reported {label:?}")]
    ColorSpaceUndetermined { label: String },

    /// The external pixel extractor failed for a patch
    #[error("Pixel samples unavailable for patch {patch}: {reason}")]
    SamplingUnavailable { patch: usize, reason: String },

    /// The external locator could not place the target or its patches
    #[error("Target locator failed: {reason}")]
    LocatorFailure { reason: String },

    /// Target geometry cannot yield a resolution
    #[error("Degenerate target geometry: {reason}")]
    GeometryDegenerate { reason: String },

    /// Reference data violates one of its invariants
    #[error("Invalid reference data: {reason}")]
    InvalidReference { reason: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// A configuration or data file could not be read or parsed
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl MeasureError {
    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-reference error
    pub fn invalid_reference(reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            reason: reason.into(),
        }
    }

    /// Whether this error aborts a measurement run.
    ///
    /// Configuration and parameter errors happen before a run starts and are
    /// reported to the caller as setup problems instead.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            MeasureError::ConfigError { .. } | MeasureError::InvalidParameter { .. }
        )
    }

    /// Get user-friendly error description for operator display
    pub fn user_message(&self) -> String {
        match self {
            MeasureError::ColorSpaceUndetermined { .. } => {
                "The image color space is not supported. Only LAB and RGB images can be measured."
                    .to_string()
            }
            MeasureError::SamplingUnavailable { patch, .. } => {
                format!(
                    "Could not read pixel values for patch {}. Please check the image file.",
                    patch + 1
                )
            }
            MeasureError::LocatorFailure { .. } => {
                "Unable to find the target in the supplied image.".to_string()
            }
            MeasureError::GeometryDegenerate { .. } => {
                "The target corners could not be used to compute a resolution.".to_string()
            }
            MeasureError::InvalidReference { reason } => {
                format!("The target description is invalid: {}", reason)
            }
            MeasureError::InvalidParameter { parameter, value } => {
                format!("Setting {} has an unusable value ({}).", parameter, value)
            }
            MeasureError::ConfigError { message, .. } => {
                format!("Could not load settings: {}", message)
            }
        }
    }
}

/// Failure reported by an external collaborator (locator, pixel extractor,
/// color-space probe).
///
/// Collaborators either fully succeed for a unit of work or return this; the
/// engine turns it into the matching fatal [`MeasureError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CollaboratorError {
    pub message: String,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_errors_are_fatal() {
        let errors = [
            MeasureError::ColorSpaceUndetermined { label: "Gray".into() },
            MeasureError::SamplingUnavailable { patch: 3, reason: "no output".into() },
            MeasureError::LocatorFailure { reason: "no match".into() },
            MeasureError::GeometryDegenerate { reason: "corners coincide".into() },
            MeasureError::invalid_reference("no patches"),
        ];
        assert!(errors.iter().all(MeasureError::is_fatal));
    }

    #[test]
    fn test_config_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = MeasureError::config("reading tolerances.json", io);
        assert!(!err.is_fatal());
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "Configuration error: reading tolerances.json");
    }

    #[test]
    fn test_user_message_is_one_based() {
        let err = MeasureError::SamplingUnavailable { patch: 0, reason: "x".into() };
        assert!(err.user_message().contains("patch 1"));
    }
}
