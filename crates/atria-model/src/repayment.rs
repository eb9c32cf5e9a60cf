use crate::ids::{ContractId, PropertyId, RepaymentId, UserId, ValidationError};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepaymentStatus {
    Outstanding,
    Paid,
}

impl RepaymentStatus {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "outstanding" => Ok(Self::Outstanding),
            "paid" => Ok(Self::Paid),
            other => Err(ValidationError(format!("unknown repayment status: {other}"))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outstanding => "outstanding",
            Self::Paid => "paid",
        }
    }
}

/// A scheduled amount owed to a captador against a signed contract.
///
/// The contract id and payee are copied at creation and never change. No
/// overdue computation happens here; due-date comparison is a read-side
/// concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommissionRepayment {
    pub id: RepaymentId,
    pub contract_id: ContractId,
    pub property_id: PropertyId,
    pub captador_id: Option<UserId>,
    pub amount_due: Money,
    pub due_date: DateTime<Utc>,
    pub status: RepaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl CommissionRepayment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.amount_due.is_positive() {
            return Err(ValidationError(
                "repayment amount must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_must_be_positive() {
        let ts = DateTime::parse_from_rfc3339("2024-06-01T00:00:00Z")
            .expect("timestamp")
            .with_timezone(&Utc);
        let repayment = CommissionRepayment {
            id: RepaymentId::parse("rp-1").expect("id"),
            contract_id: ContractId::parse("c-1").expect("contract"),
            property_id: PropertyId::parse("p-1").expect("property"),
            captador_id: Some(UserId::parse("captador-1").expect("captador")),
            amount_due: Money::ZERO,
            due_date: ts,
            status: RepaymentStatus::Outstanding,
            created_at: ts,
        };
        assert!(repayment.validate().is_err());
    }
}
