//! Collaborator interfaces the core depends on.
//!
//! Every implementation is injected per service instance; the core holds
//! no process-wide state and is testable against in-memory fakes.

use crate::error::CoreError;
use async_trait::async_trait;
use atria_model::{
    CommissionRepayment, Contract, ContractId, ContractRequest, ContractStatus, Money, Property,
    PropertyId, RepaymentStatus, RequestId, RequestStatus, UserId,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_PAGE_LIMIT: usize = 50;
pub const MAX_PAGE_LIMIT: usize = 200;

/// Offset pagination. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: usize,
    pub limit: usize,
}

impl Page {
    #[must_use]
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page - 1) * self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub property_id: Option<PropertyId>,
    /// Matches rows where this user is the requester or the owner.
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractFilter {
    pub status: Option<ContractStatus>,
    pub property_id: Option<PropertyId>,
    /// Matches rows where this user is the captador or the partner.
    pub party: Option<UserId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepaymentFilter {
    pub status: Option<RepaymentStatus>,
    pub captador_id: Option<UserId>,
}

/// Read-only aggregate over the contracts visible to a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContractStats {
    pub total: u64,
    pub pending: u64,
    pub signed: u64,
    pub active: u64,
    pub completed: u64,
    pub rejected: u64,
    pub total_commission: Money,
    pub average_property_value: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    RequestReceived,
    RequestApproved,
    RequestRejected,
}

impl NotificationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequestReceived => "request_received",
            Self::RequestApproved => "request_approved",
            Self::RequestRejected => "request_rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub data: Option<serde_json::Value>,
}

/// Best-effort notification sink. Callers log failures and never let them
/// roll back the triggering write.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn enqueue(&self, notification: &Notification) -> Result<(), CoreError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Persistence over the four contract-domain tables.
///
/// Implementations must make `insert_pending_request` atomic (a duplicate
/// pending pair surfaces as `Conflict`, never as a lost write) and must
/// run `approve_request_and_insert_contract` as one transaction: if the
/// contract insert fails the request stays `pending`.
#[async_trait]
pub trait ContractStore: Send + Sync + 'static {
    async fn insert_property(&self, property: &Property) -> Result<(), CoreError>;
    async fn get_property(&self, id: &PropertyId) -> Result<Option<Property>, CoreError>;

    async fn insert_pending_request(&self, request: &ContractRequest) -> Result<(), CoreError>;
    async fn get_request(&self, id: &RequestId) -> Result<Option<ContractRequest>, CoreError>;
    async fn list_requests(
        &self,
        filter: &RequestFilter,
        page: &Page,
    ) -> Result<Vec<ContractRequest>, CoreError>;
    async fn reject_request(
        &self,
        id: &RequestId,
        decided_at: DateTime<Utc>,
    ) -> Result<(), CoreError>;
    async fn approve_request_and_insert_contract(
        &self,
        id: &RequestId,
        decided_at: DateTime<Utc>,
        contract: &Contract,
    ) -> Result<(), CoreError>;

    async fn insert_contract(&self, contract: &Contract) -> Result<(), CoreError>;
    async fn get_contract(&self, id: &ContractId) -> Result<Option<Contract>, CoreError>;
    async fn list_contracts(
        &self,
        filter: &ContractFilter,
        page: &Page,
    ) -> Result<Vec<Contract>, CoreError>;
    async fn contract_stats(&self, scope: &ContractFilter) -> Result<ContractStats, CoreError>;

    async fn insert_repayment(&self, repayment: &CommissionRepayment) -> Result<(), CoreError>;
    async fn list_repayments(
        &self,
        filter: &RepaymentFilter,
        page: &Page,
    ) -> Result<Vec<CommissionRepayment>, CoreError>;
}
