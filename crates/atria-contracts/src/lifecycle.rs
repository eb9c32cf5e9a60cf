// SPDX-License-Identifier: Apache-2.0

//! Contract-request lifecycle and contract creation.
//!
//! A request moves `pending -> approved | rejected`; both decisions are
//! terminal. Approval derives the contract type from the property origin,
//! applies `ContractCommissionPolicy`, and creates the contract already
//! signed. The request-status write and the contract insert happen in one
//! store transaction so an approved request can never exist without its
//! contract.

use crate::notify;
use atria_core::{
    Clock, ContractCommissionPolicy, ContractFilter, ContractStats, ContractStore, CoreError,
    Notification, NotificationSink, Page, RequestFilter,
};
use atria_model::{
    Actor, Contract, ContractId, ContractRequest, ContractStatus, ContractType, Property,
    PropertyId, PropertyOrigin, RequestId, RequestStatus, UserId, TOTAL_COMMISSION_BP,
};
use atria_policies::{
    can_decide_request, can_request_contract, can_view_contract, can_view_request,
    contract_list_scope, ContractScope,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContractRequest {
    pub property_id: PropertyId,
    pub message: String,
    pub experience: Option<String>,
    pub references: Option<String>,
}

/// Input for the direct contract-creation path, bypassing the request
/// flow. The contract type is derived from the property; a declared type
/// is only accepted when it agrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContract {
    pub property_id: PropertyId,
    pub partner_id: UserId,
    pub contract_type: Option<ContractType>,
    pub terms_and_conditions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject { reason: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    Approved {
        request: ContractRequest,
        contract: Contract,
    },
    Rejected {
        request: ContractRequest,
    },
}

pub struct ContractService {
    store: Arc<dyn ContractStore>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl ContractService {
    #[must_use]
    pub fn new(
        store: Arc<dyn ContractStore>,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
        }
    }

    pub async fn create_request(
        &self,
        actor: &Actor,
        input: NewContractRequest,
    ) -> Result<ContractRequest, CoreError> {
        if input.message.trim().is_empty() {
            return Err(CoreError::validation("request message must not be empty"));
        }
        let property = self
            .store
            .get_property(&input.property_id)
            .await?
            .ok_or_else(|| CoreError::not_found("property", input.property_id.as_str()))?;
        if !can_request_contract(actor, &property) {
            return Err(CoreError::forbidden(
                "property owner cannot request a contract on their own property",
            ));
        }

        let now = self.clock.now();
        let request = ContractRequest {
            id: RequestId::parse(&format!("req-{}", Uuid::new_v4()))?,
            property_id: property.id.clone(),
            requester_id: actor.id.clone(),
            owner_id: property.owner_id.clone(),
            message: input.message,
            experience: input.experience,
            references: input.references,
            status: RequestStatus::Pending,
            created_at: now,
            decided_at: None,
        };
        request.validate()?;

        // The store runs the duplicate-pending check atomically; a second
        // pending request for the same pair surfaces as Conflict here.
        self.store.insert_pending_request(&request).await?;
        info!(
            request = request.id.as_str(),
            property = request.property_id.as_str(),
            requester = request.requester_id.as_str(),
            "contract request created"
        );
        self.notify_best_effort(notify::request_received(&request))
            .await;
        Ok(request)
    }

    pub async fn decide(
        &self,
        actor: &Actor,
        request_id: &RequestId,
        decision: Decision,
    ) -> Result<DecisionOutcome, CoreError> {
        let request = self
            .store
            .get_request(request_id)
            .await?
            .ok_or_else(|| CoreError::not_found("contract request", request_id.as_str()))?;
        if request.status != RequestStatus::Pending {
            return Err(CoreError::invalid_state(format!(
                "request {} is already {}",
                request.id.as_str(),
                request.status.as_str()
            )));
        }
        let property = self
            .store
            .get_property(&request.property_id)
            .await?
            .ok_or_else(|| CoreError::not_found("property", request.property_id.as_str()))?;
        if !can_decide_request(actor, &property) {
            return Err(CoreError::forbidden(
                "only the property owner or an admin may decide a contract request",
            ));
        }

        let now = self.clock.now();
        match decision {
            Decision::Reject { reason } => {
                self.store.reject_request(&request.id, now).await?;
                let request = ContractRequest {
                    status: RequestStatus::Rejected,
                    decided_at: Some(now),
                    ..request
                };
                info!(
                    request = request.id.as_str(),
                    actor = actor.id.as_str(),
                    "contract request rejected"
                );
                self.notify_best_effort(notify::request_rejected(&request, reason.as_deref()))
                    .await;
                Ok(DecisionOutcome::Rejected { request })
            }
            Decision::Approve => {
                let contract = self.build_contract(
                    &property,
                    request.requester_id.clone(),
                    None,
                )?;
                self.store
                    .approve_request_and_insert_contract(&request.id, now, &contract)
                    .await?;
                let request = ContractRequest {
                    status: RequestStatus::Approved,
                    decided_at: Some(now),
                    ..request
                };
                info!(
                    request = request.id.as_str(),
                    contract = contract.id.as_str(),
                    contract_type = contract.contract_type.as_str(),
                    actor = actor.id.as_str(),
                    "contract request approved"
                );
                self.notify_best_effort(notify::request_approved(&request, &contract))
                    .await;
                Ok(DecisionOutcome::Approved { request, contract })
            }
        }
    }

    /// Direct contract creation, restricted to the property owner or an
    /// admin. Applies the same split policy as the approval path.
    pub async fn create_contract(
        &self,
        actor: &Actor,
        input: NewContract,
    ) -> Result<Contract, CoreError> {
        let property = self
            .store
            .get_property(&input.property_id)
            .await?
            .ok_or_else(|| CoreError::not_found("property", input.property_id.as_str()))?;
        if !can_decide_request(actor, &property) {
            return Err(CoreError::forbidden(
                "only the property owner or an admin may create a contract directly",
            ));
        }
        if input.partner_id == property.owner_id {
            return Err(CoreError::validation(
                "partner must be distinct from the property owner",
            ));
        }

        let contract =
            self.build_contract(&property, input.partner_id, input.terms_and_conditions)?;
        if let Some(declared) = input.contract_type {
            if declared != contract.contract_type {
                return Err(CoreError::validation(format!(
                    "declared contract type {} does not match the property origin",
                    declared.as_str()
                )));
            }
        }
        self.store.insert_contract(&contract).await?;
        info!(
            contract = contract.id.as_str(),
            property = contract.property_id.as_str(),
            contract_type = contract.contract_type.as_str(),
            "contract created directly"
        );
        Ok(contract)
    }

    pub async fn get_request(
        &self,
        actor: &Actor,
        id: &RequestId,
    ) -> Result<ContractRequest, CoreError> {
        let request = self
            .store
            .get_request(id)
            .await?
            .ok_or_else(|| CoreError::not_found("contract request", id.as_str()))?;
        if !can_view_request(actor, &request) {
            return Err(CoreError::forbidden("not a party to this contract request"));
        }
        Ok(request)
    }

    /// Non-admins only ever see requests they made or own, regardless of
    /// the filter they pass.
    pub async fn list_requests(
        &self,
        actor: &Actor,
        mut filter: RequestFilter,
        page: &Page,
    ) -> Result<Vec<ContractRequest>, CoreError> {
        if !actor.is_admin() {
            filter.user_id = Some(actor.id.clone());
        }
        self.store.list_requests(&filter, page).await
    }

    pub async fn get_contract(
        &self,
        actor: &Actor,
        id: &ContractId,
    ) -> Result<Contract, CoreError> {
        let contract = self
            .store
            .get_contract(id)
            .await?
            .ok_or_else(|| CoreError::not_found("contract", id.as_str()))?;
        if !can_view_contract(actor, &contract) {
            return Err(CoreError::forbidden("not a party to this contract"));
        }
        Ok(contract)
    }

    pub async fn list_contracts(
        &self,
        actor: &Actor,
        mut filter: ContractFilter,
        page: &Page,
    ) -> Result<Vec<Contract>, CoreError> {
        if let ContractScope::PartyOnly(id) = contract_list_scope(actor) {
            filter.party = Some(id);
        }
        self.store.list_contracts(&filter, page).await
    }

    pub async fn stats(&self, actor: &Actor) -> Result<ContractStats, CoreError> {
        let scope = match contract_list_scope(actor) {
            ContractScope::All => ContractFilter::default(),
            ContractScope::PartyOnly(id) => ContractFilter {
                party: Some(id),
                ..ContractFilter::default()
            },
        };
        self.store.contract_stats(&scope).await
    }

    fn build_contract(
        &self,
        property: &Property,
        partner_id: UserId,
        terms_and_conditions: Option<String>,
    ) -> Result<Contract, CoreError> {
        let contract_type = match property.origin {
            PropertyOrigin::Platform => ContractType::Platform,
            PropertyOrigin::Captured => ContractType::External,
        };
        let split = ContractCommissionPolicy::split(contract_type);
        let captador_id = match contract_type {
            ContractType::Platform => None,
            ContractType::External => Some(property.owner_id.clone()),
        };
        let now = self.clock.now();
        let contract = Contract {
            id: ContractId::parse(&format!("con-{}", Uuid::new_v4()))?,
            property_id: property.id.clone(),
            captador_id,
            partner_id,
            contract_type,
            captador_percentage: split.captador,
            partner_percentage: split.partner,
            platform_percentage: split.platform,
            total_commission_bp: TOTAL_COMMISSION_BP,
            property_value: property.price,
            terms_and_conditions,
            status: ContractStatus::Signed,
            signed_at: Some(now),
            created_at: now,
        };
        contract.validate()?;
        Ok(contract)
    }

    async fn notify_best_effort(&self, notification: Notification) {
        if let Err(err) = self.notifier.enqueue(&notification).await {
            warn!(
                user = notification.user_id.as_str(),
                kind = notification.kind.as_str(),
                error = %err,
                "notification enqueue failed"
            );
        }
    }
}
