use crate::sqlite::fold_stats;
use async_trait::async_trait;
use atria_core::{
    ContractFilter, ContractStats, ContractStore, CoreError, Page, RepaymentFilter, RequestFilter,
};
use atria_model::{
    CommissionRepayment, Contract, ContractId, ContractRequest, Property, PropertyId, RepaymentId,
    RequestId, RequestStatus,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// In-memory `ContractStore` for tests and demos.
///
/// Mirrors the sqlite backend's semantics: the duplicate-pending check
/// and the approve transaction are atomic under one lock. The
/// `fail_contract_inserts` knob simulates a storage fault on the next
/// contract write so callers can exercise the rollback path.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    pub fail_contract_inserts: AtomicBool,
}

#[derive(Default)]
struct Inner {
    properties: HashMap<PropertyId, Property>,
    requests: HashMap<RequestId, ContractRequest>,
    contracts: HashMap<ContractId, Contract>,
    repayments: HashMap<RepaymentId, CommissionRepayment>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn check_contract_insert(&self, inner: &Inner, id: &ContractId) -> Result<(), CoreError> {
        if self.fail_contract_inserts.load(Ordering::Relaxed) {
            return Err(CoreError::dependency("simulated contract insert failure"));
        }
        if inner.contracts.contains_key(id) {
            return Err(CoreError::conflict(format!(
                "contract {} already exists",
                id.as_str()
            )));
        }
        Ok(())
    }
}

fn page_slice<T>(mut rows: Vec<T>, page: &Page) -> Vec<T> {
    let offset = page.offset().min(rows.len());
    let end = offset.saturating_add(page.limit).min(rows.len());
    rows.drain(..offset);
    rows.truncate(end - offset);
    rows
}

#[async_trait]
impl ContractStore for MemoryStore {
    async fn insert_property(&self, property: &Property) -> Result<(), CoreError> {
        let mut inner = self.inner.lock().await;
        if inner.properties.contains_key(&property.id) {
            return Err(CoreError::conflict(format!(
                "property {} already exists",
                property.id.as_str()
            )));
        }
        inner.properties.insert(property.id.clone(), property.clone());
        Ok(())
    }

    async fn get_property(&self, id: &PropertyId) -> Result<Option<Property>, CoreError> {
        Ok(self.inner.lock().await.properties.get(id).cloned())
    }

    async fn insert_pending_request(&self, request: &ContractRequest) -> Result<(), CoreError> {
        let mut inner = self.inner.lock().await;
        let duplicate = inner.requests.values().any(|r| {
            r.property_id == request.property_id
                && r.requester_id == request.requester_id
                && r.status == RequestStatus::Pending
        });
        if duplicate {
            return Err(CoreError::conflict(
                "a pending request already exists for this property and requester",
            ));
        }
        inner.requests.insert(request.id.clone(), request.clone());
        Ok(())
    }

    async fn get_request(&self, id: &RequestId) -> Result<Option<ContractRequest>, CoreError> {
        Ok(self.inner.lock().await.requests.get(id).cloned())
    }

    async fn list_requests(
        &self,
        filter: &RequestFilter,
        page: &Page,
    ) -> Result<Vec<ContractRequest>, CoreError> {
        let inner = self.inner.lock().await;
        let mut rows: Vec<ContractRequest> = inner
            .requests
            .values()
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .filter(|r| {
                filter
                    .property_id
                    .as_ref()
                    .map_or(true, |p| r.property_id == *p)
            })
            .filter(|r| {
                filter
                    .user_id
                    .as_ref()
                    .map_or(true, |u| r.requester_id == *u || r.owner_id == *u)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(page_slice(rows, page))
    }

    async fn reject_request(
        &self,
        id: &RequestId,
        decided_at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let mut inner = self.inner.lock().await;
        let request = inner
            .requests
            .get_mut(id)
            .ok_or_else(|| CoreError::not_found("contract request", id.as_str()))?;
        if request.status != RequestStatus::Pending {
            return Err(CoreError::invalid_state(format!(
                "request {} is not pending",
                id.as_str()
            )));
        }
        request.status = RequestStatus::Rejected;
        request.decided_at = Some(decided_at);
        Ok(())
    }

    async fn approve_request_and_insert_contract(
        &self,
        id: &RequestId,
        decided_at: DateTime<Utc>,
        contract: &Contract,
    ) -> Result<(), CoreError> {
        let mut inner = self.inner.lock().await;
        let status = inner
            .requests
            .get(id)
            .map(|r| r.status)
            .ok_or_else(|| CoreError::not_found("contract request", id.as_str()))?;
        if status != RequestStatus::Pending {
            return Err(CoreError::invalid_state(format!(
                "request {} is not pending",
                id.as_str()
            )));
        }
        // Contract write is validated before the request mutates, so a
        // failure here leaves the request pending.
        self.check_contract_insert(&inner, &contract.id)?;
        inner.contracts.insert(contract.id.clone(), contract.clone());
        let request = inner
            .requests
            .get_mut(id)
            .ok_or_else(|| CoreError::not_found("contract request", id.as_str()))?;
        request.status = RequestStatus::Approved;
        request.decided_at = Some(decided_at);
        Ok(())
    }

    async fn insert_contract(&self, contract: &Contract) -> Result<(), CoreError> {
        let mut inner = self.inner.lock().await;
        self.check_contract_insert(&inner, &contract.id)?;
        inner.contracts.insert(contract.id.clone(), contract.clone());
        Ok(())
    }

    async fn get_contract(&self, id: &ContractId) -> Result<Option<Contract>, CoreError> {
        Ok(self.inner.lock().await.contracts.get(id).cloned())
    }

    async fn list_contracts(
        &self,
        filter: &ContractFilter,
        page: &Page,
    ) -> Result<Vec<Contract>, CoreError> {
        let inner = self.inner.lock().await;
        let mut rows: Vec<Contract> = inner
            .contracts
            .values()
            .filter(|c| filter.status.map_or(true, |s| c.status == s))
            .filter(|c| {
                filter
                    .property_id
                    .as_ref()
                    .map_or(true, |p| c.property_id == *p)
            })
            .filter(|c| {
                filter.party.as_ref().map_or(true, |u| {
                    c.captador_id.as_ref() == Some(u) || c.partner_id == *u
                })
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(page_slice(rows, page))
    }

    async fn contract_stats(&self, scope: &ContractFilter) -> Result<ContractStats, CoreError> {
        let rows = self
            .list_contracts(
                scope,
                &Page {
                    page: 1,
                    limit: usize::MAX / 2,
                },
            )
            .await?;
        Ok(fold_stats(&rows))
    }

    async fn insert_repayment(&self, repayment: &CommissionRepayment) -> Result<(), CoreError> {
        let mut inner = self.inner.lock().await;
        if inner.repayments.contains_key(&repayment.id) {
            return Err(CoreError::conflict(format!(
                "repayment {} already exists",
                repayment.id.as_str()
            )));
        }
        inner
            .repayments
            .insert(repayment.id.clone(), repayment.clone());
        Ok(())
    }

    async fn list_repayments(
        &self,
        filter: &RepaymentFilter,
        page: &Page,
    ) -> Result<Vec<CommissionRepayment>, CoreError> {
        let inner = self.inner.lock().await;
        let mut rows: Vec<CommissionRepayment> = inner
            .repayments
            .values()
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .filter(|r| {
                filter
                    .captador_id
                    .as_ref()
                    .map_or(true, |c| r.captador_id.as_ref() == Some(c))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.id.cmp(&b.id)));
        Ok(page_slice(rows, page))
    }
}
