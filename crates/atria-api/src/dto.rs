// SPDX-License-Identifier: Apache-2.0

//! Wire DTOs. Request bodies are camelCase and reject unknown fields;
//! monetary amounts arrive as JSON numbers and leave as decimal strings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateContractRequestDto {
    pub property_id: String,
    pub message: String,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub references: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct DecideRequestDto {
    pub action: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateContractDto {
    pub property_id: String,
    pub partner_id: String,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub terms: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateRepaymentDto {
    pub contract_id: String,
    pub property_id: String,
    pub amount_due: serde_json::Number,
    #[serde(default)]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreatePropertyDto {
    #[serde(default)]
    pub id: Option<String>,
    pub owner_id: String,
    pub price: serde_json::Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDto {
    pub id: String,
    pub owner_id: String,
    pub origin: String,
    pub price: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRequestDto {
    pub id: String,
    pub property_id: String,
    pub requester_id: String,
    pub owner_id: String,
    pub message: String,
    pub experience: Option<String>,
    pub references: Option<String>,
    pub status: String,
    pub created_at: String,
    pub decided_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDto {
    pub id: String,
    pub property_id: String,
    pub captador_id: Option<String>,
    pub partner_id: String,
    pub contract_type: String,
    pub captador_percentage: u8,
    pub partner_percentage: u8,
    pub platform_percentage: u8,
    /// Total commission rate as a percentage, e.g. `5.0`.
    pub total_commission: f64,
    pub property_value: String,
    pub terms_and_conditions: Option<String>,
    pub status: String,
    pub signed_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepaymentDto {
    pub id: String,
    pub contract_id: String,
    pub property_id: String,
    pub captador_id: Option<String>,
    pub amount_due: String,
    pub due_date: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    pub total: u64,
    pub pending: u64,
    pub signed: u64,
    pub active: u64,
    pub completed: u64,
    pub rejected: u64,
    pub total_commission: String,
    pub average_property_value: String,
}
