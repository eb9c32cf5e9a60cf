//! Conversions between wire DTOs and domain types.

use crate::dto::{
    ContractDto, ContractRequestDto, CreateContractDto, CreateContractRequestDto,
    CreatePropertyDto, CreateRepaymentDto, PropertyDto, RepaymentDto, StatsDto,
};
use atria_contracts::{NewContract, NewContractRequest, NewRepayment};
use atria_core::{ContractStats, CoreError};
use atria_model::{
    CommissionRepayment, Contract, ContractId, ContractRequest, ContractType, Money, Property,
    PropertyId, UserId,
};
use chrono::{DateTime, NaiveDate, Utc};

pub fn parse_money(raw: &serde_json::Number) -> Result<Money, CoreError> {
    let money = Money::parse(&raw.to_string())?;
    if !money.is_positive() {
        return Err(CoreError::validation("amount must be positive"));
    }
    Ok(money)
}

/// Accepts either an RFC 3339 timestamp or a plain `YYYY-MM-DD` date
/// (taken as midnight UTC).
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CoreError::validation(format!("invalid due date: {raw}")))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| CoreError::validation(format!("invalid due date: {raw}")))?;
    Ok(DateTime::from_naive_utc_and_offset(midnight, Utc))
}

pub fn new_contract_request(dto: CreateContractRequestDto) -> Result<NewContractRequest, CoreError> {
    Ok(NewContractRequest {
        property_id: PropertyId::parse(&dto.property_id)?,
        message: dto.message,
        experience: dto.experience,
        references: dto.references,
    })
}

pub fn new_contract(dto: CreateContractDto) -> Result<NewContract, CoreError> {
    let contract_type = dto
        .contract_type
        .as_deref()
        .map(ContractType::parse)
        .transpose()?;
    Ok(NewContract {
        property_id: PropertyId::parse(&dto.property_id)?,
        partner_id: UserId::parse(&dto.partner_id)?,
        contract_type,
        terms_and_conditions: dto.terms,
    })
}

pub fn new_repayment(dto: CreateRepaymentDto) -> Result<NewRepayment, CoreError> {
    Ok(NewRepayment {
        contract_id: ContractId::parse(&dto.contract_id)?,
        property_id: PropertyId::parse(&dto.property_id)?,
        amount_due: parse_money(&dto.amount_due)?,
        due_date: dto.due_date.as_deref().map(parse_due_date).transpose()?,
    })
}

pub fn property_parts(
    dto: CreatePropertyDto,
) -> Result<(Option<PropertyId>, UserId, Money), CoreError> {
    let id = dto.id.as_deref().map(PropertyId::parse).transpose()?;
    Ok((
        id,
        UserId::parse(&dto.owner_id)?,
        parse_money(&dto.price)?,
    ))
}

pub fn property_dto(property: &Property) -> PropertyDto {
    PropertyDto {
        id: property.id.as_str().to_string(),
        owner_id: property.owner_id.as_str().to_string(),
        origin: property.origin.as_str().to_string(),
        price: property.price.to_string(),
        created_at: property.created_at.to_rfc3339(),
    }
}

pub fn request_dto(request: &ContractRequest) -> ContractRequestDto {
    ContractRequestDto {
        id: request.id.as_str().to_string(),
        property_id: request.property_id.as_str().to_string(),
        requester_id: request.requester_id.as_str().to_string(),
        owner_id: request.owner_id.as_str().to_string(),
        message: request.message.clone(),
        experience: request.experience.clone(),
        references: request.references.clone(),
        status: request.status.as_str().to_string(),
        created_at: request.created_at.to_rfc3339(),
        decided_at: request.decided_at.map(|t| t.to_rfc3339()),
    }
}

pub fn contract_dto(contract: &Contract) -> ContractDto {
    ContractDto {
        id: contract.id.as_str().to_string(),
        property_id: contract.property_id.as_str().to_string(),
        captador_id: contract.captador_id.as_ref().map(|c| c.as_str().to_string()),
        partner_id: contract.partner_id.as_str().to_string(),
        contract_type: contract.contract_type.as_str().to_string(),
        captador_percentage: contract.captador_percentage,
        partner_percentage: contract.partner_percentage,
        platform_percentage: contract.platform_percentage,
        total_commission: f64::from(contract.total_commission_bp) / 100.0,
        property_value: contract.property_value.to_string(),
        terms_and_conditions: contract.terms_and_conditions.clone(),
        status: contract.status.as_str().to_string(),
        signed_at: contract.signed_at.map(|t| t.to_rfc3339()),
        created_at: contract.created_at.to_rfc3339(),
    }
}

pub fn repayment_dto(repayment: &CommissionRepayment) -> RepaymentDto {
    RepaymentDto {
        id: repayment.id.as_str().to_string(),
        contract_id: repayment.contract_id.as_str().to_string(),
        property_id: repayment.property_id.as_str().to_string(),
        captador_id: repayment
            .captador_id
            .as_ref()
            .map(|c| c.as_str().to_string()),
        amount_due: repayment.amount_due.to_string(),
        due_date: repayment.due_date.to_rfc3339(),
        status: repayment.status.as_str().to_string(),
        created_at: repayment.created_at.to_rfc3339(),
    }
}

pub fn stats_dto(stats: &ContractStats) -> StatsDto {
    StatsDto {
        total: stats.total,
        pending: stats.pending,
        signed: stats.signed,
        active: stats.active,
        completed: stats.completed,
        rejected: stats.rejected,
        total_commission: stats.total_commission.to_string(),
        average_property_value: stats.average_property_value.to_string(),
    }
}
