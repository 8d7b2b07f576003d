use profile_update_core::validation::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileUpdateError {
    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),
    #[error("failed to construct downstream client: {0}")]
    ClientConfig(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("no valid fields provided to update")]
    NoFieldsToUpdate,
    #[error("record service write failed: {description}")]
    RecordService {
        status: Option<u16>,
        description: String,
    },
    #[error("failed to update user in store: {0}")]
    StoreWrite(String),
}

impl ProfileUpdateError {
    /// Stable identifier used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationFailed(_) => "validation_failed",
            Self::ClientConfig(_) => "client_config_error",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::NoFieldsToUpdate => "no_fields_to_update",
            Self::RecordService { .. } => "record_service_failure",
            Self::StoreWrite(_) => "store_write_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_service_error_renders_description() {
        let error = ProfileUpdateError::RecordService {
            status: Some(500),
            description: "500 Internal Server Error".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "record service write failed: 500 Internal Server Error"
        );
        assert_eq!(error.code(), "record_service_failure");
    }

    #[test]
    fn validation_error_is_transparent() {
        let error = ProfileUpdateError::from(ValidationError::new(vec![
            "updatedAt is required".to_string(),
        ]));

        assert_eq!(
            error.to_string(),
            "profile validation failed: updatedAt is required"
        );
        assert_eq!(error.code(), "validation_failed");
    }
}
