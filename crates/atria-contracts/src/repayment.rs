// SPDX-License-Identifier: Apache-2.0

//! Repayment scheduling against signed contracts.

use atria_core::{Clock, ContractStore, CoreError, Page, RepaymentFilter};
use atria_model::{
    Actor, CommissionRepayment, ContractId, Money, PropertyId, RepaymentId, RepaymentStatus,
};
use atria_policies::{can_list_repayments, RepaymentScope};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRepayment {
    pub contract_id: ContractId,
    pub property_id: PropertyId,
    pub amount_due: Money,
    pub due_date: Option<DateTime<Utc>>,
}

pub struct RepaymentService {
    store: Arc<dyn ContractStore>,
    clock: Arc<dyn Clock>,
}

impl RepaymentService {
    #[must_use]
    pub fn new(store: Arc<dyn ContractStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Schedules an amount owed to the contract's captador.
    ///
    /// Platform contracts carry no captador, so nothing can be owed
    /// against them; such calls are rejected rather than creating an
    /// orphaned repayment.
    pub async fn create_repayment(
        &self,
        actor: &Actor,
        input: NewRepayment,
    ) -> Result<CommissionRepayment, CoreError> {
        if !actor.is_admin() {
            return Err(CoreError::forbidden("only admins may schedule repayments"));
        }
        let contract = self
            .store
            .get_contract(&input.contract_id)
            .await?
            .ok_or_else(|| CoreError::not_found("contract", input.contract_id.as_str()))?;
        if contract.property_id != input.property_id {
            return Err(CoreError::validation(
                "property does not match the contract",
            ));
        }
        let Some(captador_id) = contract.captador_id.clone() else {
            return Err(CoreError::validation(
                "platform contract has no captador to repay",
            ));
        };
        if !input.amount_due.is_positive() {
            return Err(CoreError::validation("repayment amount must be positive"));
        }

        let now = self.clock.now();
        let repayment = CommissionRepayment {
            id: RepaymentId::parse(&format!("rep-{}", Uuid::new_v4()))?,
            contract_id: contract.id.clone(),
            property_id: contract.property_id.clone(),
            captador_id: Some(captador_id),
            amount_due: input.amount_due,
            due_date: input.due_date.unwrap_or(now),
            status: RepaymentStatus::Outstanding,
            created_at: now,
        };
        repayment.validate()?;
        self.store.insert_repayment(&repayment).await?;
        info!(
            repayment = repayment.id.as_str(),
            contract = repayment.contract_id.as_str(),
            amount = %repayment.amount_due,
            "repayment scheduled"
        );
        Ok(repayment)
    }

    /// Captadors see only their own repayments; asking for another
    /// captador's is refused outright instead of silently narrowed.
    pub async fn list_repayments(
        &self,
        actor: &Actor,
        mut filter: RepaymentFilter,
        page: &Page,
    ) -> Result<Vec<CommissionRepayment>, CoreError> {
        match can_list_repayments(actor) {
            RepaymentScope::All => {}
            RepaymentScope::CaptadorOnly(own_id) => {
                if let Some(requested) = &filter.captador_id {
                    if *requested != own_id {
                        return Err(CoreError::forbidden(
                            "cannot list another captador's repayments",
                        ));
                    }
                }
                filter.captador_id = Some(own_id);
            }
        }
        self.store.list_repayments(&filter, page).await
    }
}
