use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    /// Bad or conflicting input, or a payload missing required geometry.
    #[error("Validation error: {0}")]
    Validation(String),
    /// Malformed provider data (duration string, encoded polyline).
    #[error("Format error: {0}")]
    Format(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_validation() {
        let err = RouteError::Validation("origin must not be empty".into());
        assert_eq!(err.to_string(), "Validation error: origin must not be empty");
    }

    #[test]
    fn error_display_format() {
        let err = RouteError::Format("truncated polyline".into());
        assert_eq!(err.to_string(), "Format error: truncated polyline");
    }
}
