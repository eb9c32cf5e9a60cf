#![forbid(unsafe_code)]

use atria_contracts::{ContractService, RepaymentService};
use atria_core::{Clock, ContractStore, NotificationSink};
use atria_model::{Actor, Role, UserId};
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

mod config;
mod http;
mod middleware;
mod notify;

pub const CRATE_NAME: &str = "atria-server";

pub use config::ServerConfig;
pub use notify::LogNotificationSink;

#[derive(Clone)]
pub struct AppState {
    pub contracts: Arc<ContractService>,
    pub repayments: Arc<RepaymentService>,
    pub store: Arc<dyn ContractStore>,
    pub clock: Arc<dyn Clock>,
    pub config: ServerConfig,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn ContractStore>,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        config: ServerConfig,
    ) -> Self {
        Self {
            contracts: Arc::new(ContractService::new(
                store.clone(),
                notifier,
                clock.clone(),
            )),
            repayments: Arc::new(RepaymentService::new(store.clone(), clock.clone())),
            store,
            clock,
            config,
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

/// Actor records arrive from the upstream identity collaborator as a pair
/// of headers. Anything missing or malformed is a 403, not a 400: an
/// unidentified caller has no permissions at all.
pub(crate) fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, atria_core::CoreError> {
    let id = headers
        .get("x-actor-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| atria_core::CoreError::forbidden("missing x-actor-id header"))?;
    let role = headers
        .get("x-actor-role")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| atria_core::CoreError::forbidden("missing x-actor-role header"))?;
    let id = UserId::parse(id)
        .map_err(|_| atria_core::CoreError::forbidden("invalid actor id"))?;
    let role =
        Role::parse(role).map_err(|_| atria_core::CoreError::forbidden("unknown actor role"))?;
    Ok(Actor::new(id, role))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/readyz", get(http::handlers::readyz_handler))
        .route(
            "/api/properties",
            post(http::handlers::create_property_handler),
        )
        .route(
            "/api/contracts/requests",
            post(http::handlers::create_request_handler)
                .get(http::handlers::list_requests_handler),
        )
        .route(
            "/api/contracts/requests/:id",
            get(http::handlers::get_request_handler),
        )
        .route(
            "/api/contracts/requests/:id/approve",
            post(http::handlers::decide_request_handler),
        )
        .route(
            "/api/contracts",
            post(http::handlers::create_contract_handler)
                .get(http::handlers::list_contracts_handler),
        )
        .route(
            "/api/contracts/stats",
            get(http::handlers::contract_stats_handler),
        )
        .route(
            "/api/contracts/:id",
            get(http::handlers::get_contract_handler),
        )
        .route(
            "/api/contracts/repayments",
            post(http::handlers::create_repayment_handler)
                .get(http::handlers::list_repayments_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}
