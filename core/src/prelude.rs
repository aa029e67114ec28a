use std::collections::BTreeMap;
use std::fmt;

/// Broad category of a failure, used for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Network,
    NotFound,
    Storage,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Network => "network",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Storage => "storage",
        };
        f.write_str(label)
    }
}

/// Common error type for every remote call and local operation.
#[derive(thiserror::Error, Debug)]
pub enum FireError {
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        /// Field-level messages, shown to the user verbatim.
        fields: BTreeMap<String, String>,
    },
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("network failure: {0}")]
    Network(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

pub type FireResult<T> = Result<T, FireError>;

impl FireError {
    pub fn validation(message: impl Into<String>) -> Self {
        FireError::Validation {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), message.clone());
        FireError::Validation { message, fields }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FireError::Validation { .. } => ErrorKind::Validation,
            FireError::Authentication(_) => ErrorKind::Authentication,
            FireError::Network(_) => ErrorKind::Network,
            FireError::NotFound(_) => ErrorKind::NotFound,
            FireError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Message suitable for showing to an end user.
    ///
    /// Validation failures list the field messages one per line when the
    /// server supplied any.
    pub fn user_message(&self) -> String {
        match self {
            FireError::Validation { message, fields } if fields.is_empty() => message.clone(),
            FireError::Validation { fields, .. } => fields
                .values()
                .cloned()
                .collect::<Vec<_>>()
                .join("\n"),
            FireError::Authentication(message) => message.clone(),
            FireError::Network(_) => {
                "The service could not be reached. Please try again later.".to_string()
            }
            FireError::NotFound(what) => format!("Nothing found for {what}."),
            FireError::Storage(_) => "Local data could not be read or saved.".to_string(),
        }
    }
}

impl From<serde_json::Error> for FireError {
    fn from(err: serde_json::Error) -> Self {
        FireError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for FireError {
    fn from(err: std::io::Error) -> Self {
        FireError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_surface_server_messages() {
        let mut fields = BTreeMap::new();
        fields.insert("password".to_string(), "too short".to_string());
        fields.insert("username".to_string(), "already taken".to_string());
        let err = FireError::Validation {
            message: "bad request".into(),
            fields,
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.user_message(), "too short\nalready taken");
    }

    #[test]
    fn plain_validation_uses_message() {
        let err = FireError::validation("radius must be a number");
        assert_eq!(err.user_message(), "radius must be a number");
    }

    #[test]
    fn io_errors_become_storage_errors() {
        let err: FireError = std::io::Error::other("disk full").into();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }
}
