use atria_model::ValidationError;
use std::fmt::{Display, Formatter};

/// Stable machine-readable failure kinds surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    Validation,
    NotFound,
    Forbidden,
    Conflict,
    InvalidState,
    Dependency,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Conflict => "conflict",
            Self::InvalidState => "invalid_state",
            Self::Dependency => "dependency_error",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Business-rule and collaborator failures.
///
/// The first five variants are expected, typed outcomes; `Dependency`
/// wraps persistence faults and is logged with context at the point it
/// is raised.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoreError {
    Validation(String),
    NotFound { entity: &'static str, id: String },
    Forbidden(String),
    Conflict(String),
    InvalidState(String),
    Dependency(String),
}

impl CoreError {
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    #[must_use]
    pub fn dependency(message: impl Into<String>) -> Self {
        Self::Dependency(message.into())
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::Dependency(_) => ErrorKind::Dependency,
        }
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(msg)
            | Self::Forbidden(msg)
            | Self::Conflict(msg)
            | Self::InvalidState(msg)
            | Self::Dependency(msg) => write!(f, "{msg}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_have_stable_wire_strings() {
        assert_eq!(CoreError::validation("x").kind().as_str(), "validation_error");
        assert_eq!(CoreError::not_found("property", "p-1").kind().as_str(), "not_found");
        assert_eq!(CoreError::forbidden("x").kind().as_str(), "forbidden");
        assert_eq!(CoreError::conflict("x").kind().as_str(), "conflict");
        assert_eq!(CoreError::invalid_state("x").kind().as_str(), "invalid_state");
        assert_eq!(CoreError::dependency("x").kind().as_str(), "dependency_error");
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = CoreError::not_found("contract", "c-9");
        assert_eq!(err.to_string(), "contract not found: c-9");
    }
}
