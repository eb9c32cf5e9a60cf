// SPDX-License-Identifier: Apache-2.0

use crate::ids::{ContractId, PropertyId, UserId, ValidationError};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed total commission on a contract: 5.0% of the property value,
/// expressed in basis points.
pub const TOTAL_COMMISSION_BP: u16 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    /// The property is platform-sourced; the platform absorbs the
    /// captador's share.
    Platform,
    /// An external captador sourced the property and is owed a share.
    External,
}

impl ContractType {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "platform" => Ok(Self::Platform),
            "external" => Ok(Self::External),
            other => Err(ValidationError(format!("unknown contract type: {other}"))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::External => "external",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Pending,
    Signed,
    Active,
    Completed,
    Rejected,
}

impl ContractStatus {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "pending" => Ok(Self::Pending),
            "signed" => Ok(Self::Signed),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            other => Err(ValidationError(format!("unknown contract status: {other}"))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Signed => "signed",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    /// States a contract can only reach by having been signed first.
    #[must_use]
    pub const fn requires_signature(self) -> bool {
        matches!(self, Self::Signed | Self::Active | Self::Completed)
    }
}

/// A binding commission-split agreement between the platform, an optional
/// captador, and the selling partner.
///
/// Never deleted; only the status (and terms text) may change after
/// creation. The percentage and monetary fields are immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Contract {
    pub id: ContractId,
    pub property_id: PropertyId,
    pub captador_id: Option<UserId>,
    pub partner_id: UserId,
    pub contract_type: ContractType,
    pub captador_percentage: u8,
    pub partner_percentage: u8,
    pub platform_percentage: u8,
    pub total_commission_bp: u16,
    pub property_value: Money,
    pub terms_and_conditions: Option<String>,
    pub status: ContractStatus,
    pub signed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Contract {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let sum =
            u16::from(self.captador_percentage) + u16::from(self.partner_percentage)
                + u16::from(self.platform_percentage);
        if sum != 100 {
            return Err(ValidationError(format!(
                "contract percentages must sum to 100, got {sum}"
            )));
        }
        match self.contract_type {
            ContractType::Platform if self.captador_id.is_some() => {
                return Err(ValidationError(
                    "platform contract must not name a captador".to_string(),
                ));
            }
            ContractType::External if self.captador_id.is_none() => {
                return Err(ValidationError(
                    "external contract must name a captador".to_string(),
                ));
            }
            _ => {}
        }
        if self.total_commission_bp == 0 || self.total_commission_bp > 10_000 {
            return Err(ValidationError(format!(
                "total commission out of range: {} bp",
                self.total_commission_bp
            )));
        }
        if !self.property_value.is_positive() {
            return Err(ValidationError(
                "contract property value must be positive".to_string(),
            ));
        }
        if self.status.requires_signature() && self.signed_at.is_none() {
            return Err(ValidationError(format!(
                "{} contract must carry a signature timestamp",
                self.status.as_str()
            )));
        }
        Ok(())
    }

    /// Total commission owed on this contract, in exact cents.
    #[must_use]
    pub fn commission_value(&self) -> Money {
        self.property_value
            .percent_bp_half_up(u32::from(self.total_commission_bp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    fn external_contract() -> Contract {
        Contract {
            id: ContractId::parse("c-1").expect("id"),
            property_id: PropertyId::parse("p-1").expect("property"),
            captador_id: Some(UserId::parse("captador-1").expect("captador")),
            partner_id: UserId::parse("partner-1").expect("partner"),
            contract_type: ContractType::External,
            captador_percentage: 30,
            partner_percentage: 50,
            platform_percentage: 20,
            total_commission_bp: TOTAL_COMMISSION_BP,
            property_value: Money::from_cents(30_000_000),
            terms_and_conditions: None,
            status: ContractStatus::Signed,
            signed_at: Some(ts()),
            created_at: ts(),
        }
    }

    #[test]
    fn percentages_must_sum_to_one_hundred() {
        let mut contract = external_contract();
        assert!(contract.validate().is_ok());
        contract.platform_percentage = 21;
        assert!(contract.validate().is_err());
    }

    #[test]
    fn captador_presence_must_match_contract_type() {
        let mut contract = external_contract();
        contract.captador_id = None;
        assert!(contract.validate().is_err());

        contract.contract_type = ContractType::Platform;
        contract.captador_percentage = 0;
        contract.platform_percentage = 50;
        assert!(contract.validate().is_ok());

        contract.captador_id = Some(UserId::parse("captador-1").expect("captador"));
        assert!(contract.validate().is_err());
    }

    #[test]
    fn signed_states_require_a_signature_timestamp() {
        let mut contract = external_contract();
        contract.signed_at = None;
        assert!(contract.validate().is_err());
        contract.status = ContractStatus::Pending;
        assert!(contract.validate().is_ok());
    }

    #[test]
    fn commission_value_is_five_percent_of_property_value() {
        let contract = external_contract();
        assert_eq!(contract.commission_value(), Money::from_cents(1_500_000));
    }
}
