// SPDX-License-Identifier: Apache-2.0

use crate::ids::{PropertyId, UserId, ValidationError};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a listing entered the platform. Immutable once the property exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyOrigin {
    /// Listed by the platform itself; no external captador is owed a share.
    Platform,
    /// Captured by an external captador who owns the listing.
    Captured,
}

impl PropertyOrigin {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "platform" => Ok(Self::Platform),
            "captured" => Ok(Self::Captured),
            other => Err(ValidationError(format!("unknown property origin: {other}"))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Captured => "captured",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Property {
    pub id: PropertyId,
    pub owner_id: UserId,
    pub origin: PropertyOrigin,
    pub price: Money,
    pub created_at: DateTime<Utc>,
}

impl Property {
    pub fn new(
        id: PropertyId,
        owner_id: UserId,
        origin: PropertyOrigin,
        price: Money,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let property = Self {
            id,
            owner_id,
            origin,
            price,
            created_at,
        };
        property.validate()?;
        Ok(property)
    }

    /// Origin must agree with the owner: the platform identity owns exactly
    /// the platform-sourced listings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.price.is_positive() {
            return Err(ValidationError("property price must be positive".to_string()));
        }
        match self.origin {
            PropertyOrigin::Platform if !self.owner_id.is_platform() => Err(ValidationError(
                "platform-sourced property must be owned by the platform identity".to_string(),
            )),
            PropertyOrigin::Captured if self.owner_id.is_platform() => Err(ValidationError(
                "captured property must be owned by a captador, not the platform".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
