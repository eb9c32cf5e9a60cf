use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub const ID_MAX_LEN: usize = 64;

/// Listing owner id used for platform-sourced properties.
pub const PLATFORM_IDENTITY: &str = "atria-platform";

fn validate_id(kind: &str, input: &str) -> Result<String, ValidationError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ValidationError(format!("{kind} must not be empty")));
    }
    if s.len() > ID_MAX_LEN {
        return Err(ValidationError(format!(
            "{kind} exceeds max length {ID_MAX_LEN}"
        )));
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ValidationError(format!(
            "{kind} must match [A-Za-z0-9._-]+"
        )));
    }
    Ok(s.to_string())
}

pub fn parse_property_id(input: &str) -> Result<PropertyId, ValidationError> {
    PropertyId::parse(input)
}

pub fn parse_user_id(input: &str) -> Result<UserId, ValidationError> {
    UserId::parse(input)
}

pub fn parse_request_id(input: &str) -> Result<RequestId, ValidationError> {
    RequestId::parse(input)
}

pub fn parse_contract_id(input: &str) -> Result<ContractId, ValidationError> {
    ContractId::parse(input)
}

pub fn parse_repayment_id(input: &str) -> Result<RepaymentId, ValidationError> {
    RepaymentId::parse(input)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct PropertyId(String);

impl PropertyId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        validate_id("property id", input).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for PropertyId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct UserId(String);

impl UserId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        validate_id("user id", input).map(Self)
    }

    /// Whether this id is the distinguished platform identity.
    #[must_use]
    pub fn is_platform(&self) -> bool {
        self.0 == PLATFORM_IDENTITY
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct RequestId(String);

impl RequestId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        validate_id("request id", input).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct ContractId(String);

impl ContractId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        validate_id("contract id", input).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ContractId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct RepaymentId(String);

impl RepaymentId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        validate_id("repayment id", input).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for RepaymentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_padded_input() {
        assert!(PropertyId::parse("").is_err());
        assert!(PropertyId::parse("   ").is_err());
        assert_eq!(
            UserId::parse("  u-1  ").expect("trimmed id").as_str(),
            "u-1"
        );
    }

    #[test]
    fn rejects_disallowed_characters() {
        assert!(UserId::parse("user one").is_err());
        assert!(UserId::parse("user/1").is_err());
        assert!(ContractId::parse(&"x".repeat(ID_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn platform_identity_is_recognized() {
        let platform = UserId::parse(PLATFORM_IDENTITY).expect("platform id");
        assert!(platform.is_platform());
        assert!(!UserId::parse("captador-1").expect("user id").is_platform());
    }
}
