//! Query-parameter parsing for the list endpoints.

use crate::dto::DecideRequestDto;
use atria_contracts::Decision;
use atria_core::{ContractFilter, CoreError, Page, RepaymentFilter, RequestFilter};
use atria_model::{ContractStatus, PropertyId, RepaymentStatus, RequestStatus, UserId};
use std::collections::HashMap;

fn invalid_param(name: &str, value: &str) -> CoreError {
    CoreError::validation(format!("invalid query parameter {name}: {value}"))
}

pub fn parse_page(
    query: &HashMap<String, String>,
    default_limit: usize,
    max_limit: usize,
) -> Result<Page, CoreError> {
    let page = match query.get("page") {
        Some(raw) => {
            let value: usize = raw.parse().map_err(|_| invalid_param("page", raw))?;
            if value == 0 {
                return Err(invalid_param("page", raw));
            }
            value
        }
        None => 1,
    };
    let limit = match query.get("limit") {
        Some(raw) => {
            let value: usize = raw.parse().map_err(|_| invalid_param("limit", raw))?;
            if value == 0 || value > max_limit {
                return Err(invalid_param("limit", raw));
            }
            value
        }
        None => default_limit,
    };
    Ok(Page { page, limit })
}

pub fn parse_request_filter(
    query: &HashMap<String, String>,
) -> Result<RequestFilter, CoreError> {
    let status = query
        .get("status")
        .map(|raw| RequestStatus::parse(raw).map_err(|_| invalid_param("status", raw)))
        .transpose()?;
    let property_id = query
        .get("propertyId")
        .map(|raw| PropertyId::parse(raw).map_err(|_| invalid_param("propertyId", raw)))
        .transpose()?;
    let user_id = query
        .get("userId")
        .map(|raw| UserId::parse(raw).map_err(|_| invalid_param("userId", raw)))
        .transpose()?;
    Ok(RequestFilter {
        status,
        property_id,
        user_id,
    })
}

pub fn parse_contract_filter(
    query: &HashMap<String, String>,
) -> Result<ContractFilter, CoreError> {
    let status = query
        .get("status")
        .map(|raw| ContractStatus::parse(raw).map_err(|_| invalid_param("status", raw)))
        .transpose()?;
    let property_id = query
        .get("propertyId")
        .map(|raw| PropertyId::parse(raw).map_err(|_| invalid_param("propertyId", raw)))
        .transpose()?;
    let party = query
        .get("userId")
        .map(|raw| UserId::parse(raw).map_err(|_| invalid_param("userId", raw)))
        .transpose()?;
    Ok(ContractFilter {
        status,
        property_id,
        party,
    })
}

pub fn parse_repayment_filter(
    query: &HashMap<String, String>,
) -> Result<RepaymentFilter, CoreError> {
    let status = query
        .get("status")
        .map(|raw| RepaymentStatus::parse(raw).map_err(|_| invalid_param("status", raw)))
        .transpose()?;
    let captador_id = query
        .get("captadorId")
        .map(|raw| UserId::parse(raw).map_err(|_| invalid_param("captadorId", raw)))
        .transpose()?;
    Ok(RepaymentFilter {
        status,
        captador_id,
    })
}

/// Maps the decision body onto a lifecycle transition. Any action other
/// than the two literals is a validation failure.
pub fn parse_decision(dto: DecideRequestDto) -> Result<Decision, CoreError> {
    match dto.action.as_str() {
        "approve" => Ok(Decision::Approve),
        "reject" => Ok(Decision::Reject { reason: dto.reason }),
        other => Err(CoreError::validation(format!(
            "invalid action: {other} (expected approve or reject)"
        ))),
    }
}
