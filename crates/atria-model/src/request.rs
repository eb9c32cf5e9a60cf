// SPDX-License-Identifier: Apache-2.0

use crate::ids::{PropertyId, RequestId, UserId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a contract request. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(ValidationError(format!("unknown request status: {other}"))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// A partner's proposal to sell a property under commission terms.
///
/// The owner id is copied from the property at creation so authorization
/// checks never need a second lookup. At most one `pending` row may exist
/// per `(property_id, requester_id)` pair; the store enforces that
/// atomically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractRequest {
    pub id: RequestId,
    pub property_id: PropertyId,
    pub requester_id: UserId,
    pub owner_id: UserId,
    pub message: String,
    pub experience: Option<String>,
    pub references: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl ContractRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.message.trim().is_empty() {
            return Err(ValidationError("request message must not be empty".to_string()));
        }
        if self.requester_id == self.owner_id {
            return Err(ValidationError(
                "requester must be distinct from the property owner".to_string(),
            ));
        }
        if self.status == RequestStatus::Pending && self.decided_at.is_some() {
            return Err(ValidationError(
                "pending request must not carry a decision timestamp".to_string(),
            ));
        }
        if self.status.is_terminal() && self.decided_at.is_none() {
            return Err(ValidationError(
                "decided request must carry a decision timestamp".to_string(),
            ));
        }
        Ok(())
    }
}
