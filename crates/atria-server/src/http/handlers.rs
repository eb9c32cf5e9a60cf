// SPDX-License-Identifier: Apache-2.0

use crate::{actor_from_headers, AppState};
use atria_api::convert;
use atria_api::dto::{
    CreateContractDto, CreateContractRequestDto, CreatePropertyDto, CreateRepaymentDto,
    DecideRequestDto,
};
use atria_api::params::{
    parse_contract_filter, parse_decision, parse_page, parse_repayment_filter,
    parse_request_filter,
};
use atria_api::{failure, status_for, success};
use atria_contracts::DecisionOutcome;
use atria_core::CoreError;
use atria_model::{ContractId, Property, PropertyId, PropertyOrigin, RequestId};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

fn json_response(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn error_response(err: &CoreError) -> Response {
    let status = StatusCode::from_u16(status_for(err.kind()))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_response(status, failure(err))
}

pub(crate) async fn healthz_handler() -> Response {
    (StatusCode::OK, "ok").into_response()
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> Response {
    // Ready once the store answers; any reply, including "no such row",
    // proves the connection works.
    let probe = PropertyId::parse("readyz-probe");
    match probe {
        Ok(id) => match state.store.get_property(&id).await {
            Ok(_) => (StatusCode::OK, "ready").into_response(),
            Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not-ready").into_response(),
        },
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not-ready").into_response(),
    }
}

/// Minimal seeding surface for the properties table. The listing origin
/// is derived from the owner: the platform identity owns platform-sourced
/// listings, everyone else is a captador.
pub(crate) async fn create_property_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreatePropertyDto>,
) -> Response {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(&err),
    };
    if !actor.is_admin() {
        return error_response(&CoreError::forbidden("only admins may create properties"));
    }
    let (id, owner_id, price) = match convert::property_parts(body) {
        Ok(parts) => parts,
        Err(err) => return error_response(&err),
    };
    let id = match id {
        Some(id) => id,
        None => match PropertyId::parse(&format!("prop-{}", Uuid::new_v4())) {
            Ok(id) => id,
            Err(err) => return error_response(&err.into()),
        },
    };
    let origin = if owner_id.is_platform() {
        PropertyOrigin::Platform
    } else {
        PropertyOrigin::Captured
    };
    let property = match Property::new(id, owner_id, origin, price, state.clock.now()) {
        Ok(property) => property,
        Err(err) => return error_response(&err.into()),
    };
    match state.store.insert_property(&property).await {
        Ok(()) => json_response(
            StatusCode::CREATED,
            success(json!(convert::property_dto(&property))),
        ),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn create_request_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateContractRequestDto>,
) -> Response {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(&err),
    };
    let input = match convert::new_contract_request(body) {
        Ok(input) => input,
        Err(err) => return error_response(&err),
    };
    match state.contracts.create_request(&actor, input).await {
        Ok(request) => json_response(
            StatusCode::CREATED,
            success(json!(convert::request_dto(&request))),
        ),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn get_request_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(&err),
    };
    let id = match RequestId::parse(&id) {
        Ok(id) => id,
        Err(err) => return error_response(&err.into()),
    };
    match state.contracts.get_request(&actor, &id).await {
        Ok(request) => json_response(
            StatusCode::OK,
            success(json!(convert::request_dto(&request))),
        ),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn list_requests_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(&err),
    };
    let filter = match parse_request_filter(&query) {
        Ok(filter) => filter,
        Err(err) => return error_response(&err),
    };
    let page = match parse_page(
        &query,
        state.config.default_page_limit,
        state.config.max_page_limit,
    ) {
        Ok(page) => page,
        Err(err) => return error_response(&err),
    };
    match state.contracts.list_requests(&actor, filter, &page).await {
        Ok(rows) => {
            let rows: Vec<_> = rows.iter().map(convert::request_dto).collect();
            json_response(StatusCode::OK, success(json!(rows)))
        }
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn decide_request_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<DecideRequestDto>,
) -> Response {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(&err),
    };
    let id = match RequestId::parse(&id) {
        Ok(id) => id,
        Err(err) => return error_response(&err.into()),
    };
    let decision = match parse_decision(body) {
        Ok(decision) => decision,
        Err(err) => return error_response(&err),
    };
    match state.contracts.decide(&actor, &id, decision).await {
        Ok(DecisionOutcome::Approved { request, contract }) => json_response(
            StatusCode::OK,
            success(json!({
                "request": convert::request_dto(&request),
                "contract": convert::contract_dto(&contract),
            })),
        ),
        Ok(DecisionOutcome::Rejected { request }) => json_response(
            StatusCode::OK,
            success(json!({"request": convert::request_dto(&request)})),
        ),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn create_contract_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateContractDto>,
) -> Response {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(&err),
    };
    let input = match convert::new_contract(body) {
        Ok(input) => input,
        Err(err) => return error_response(&err),
    };
    match state.contracts.create_contract(&actor, input).await {
        Ok(contract) => json_response(
            StatusCode::CREATED,
            success(json!(convert::contract_dto(&contract))),
        ),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn get_contract_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(&err),
    };
    let id = match ContractId::parse(&id) {
        Ok(id) => id,
        Err(err) => return error_response(&err.into()),
    };
    match state.contracts.get_contract(&actor, &id).await {
        Ok(contract) => json_response(
            StatusCode::OK,
            success(json!(convert::contract_dto(&contract))),
        ),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn list_contracts_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(&err),
    };
    let filter = match parse_contract_filter(&query) {
        Ok(filter) => filter,
        Err(err) => return error_response(&err),
    };
    let page = match parse_page(
        &query,
        state.config.default_page_limit,
        state.config.max_page_limit,
    ) {
        Ok(page) => page,
        Err(err) => return error_response(&err),
    };
    match state.contracts.list_contracts(&actor, filter, &page).await {
        Ok(rows) => {
            let rows: Vec<_> = rows.iter().map(convert::contract_dto).collect();
            json_response(StatusCode::OK, success(json!(rows)))
        }
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn contract_stats_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(&err),
    };
    match state.contracts.stats(&actor).await {
        Ok(stats) => json_response(StatusCode::OK, success(json!(convert::stats_dto(&stats)))),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn create_repayment_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateRepaymentDto>,
) -> Response {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(&err),
    };
    let input = match convert::new_repayment(body) {
        Ok(input) => input,
        Err(err) => return error_response(&err),
    };
    match state.repayments.create_repayment(&actor, input).await {
        Ok(repayment) => json_response(
            StatusCode::CREATED,
            success(json!(convert::repayment_dto(&repayment))),
        ),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn list_repayments_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(&err),
    };
    let filter = match parse_repayment_filter(&query) {
        Ok(filter) => filter,
        Err(err) => return error_response(&err),
    };
    let page = match parse_page(
        &query,
        state.config.default_page_limit,
        state.config.max_page_limit,
    ) {
        Ok(page) => page,
        Err(err) => return error_response(&err),
    };
    match state.repayments.list_repayments(&actor, filter, &page).await {
        Ok(rows) => {
            let rows: Vec<_> = rows.iter().map(convert::repayment_dto).collect();
            json_response(StatusCode::OK, success(json!(rows)))
        }
        Err(err) => error_response(&err),
    }
}
