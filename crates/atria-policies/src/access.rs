// SPDX-License-Identifier: Apache-2.0

//! Authorization predicates.
//!
//! These are boolean/descriptor functions, never throwing: callers
//! translate a `false` or a restrictive scope into `Forbidden` at the
//! point of use. Role checks are exhaustive over the closed `Role` enum.

use atria_model::{Actor, Contract, ContractRequest, Property, Role, UserId};

/// Contract columns a caller may ask to mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractField {
    TermsAndConditions,
    Status,
    CaptadorPercentage,
    PartnerPercentage,
    PlatformPercentage,
    TotalCommission,
    PropertyValue,
}

/// The only fields a non-admin contract party may touch.
pub const PARTY_MUTABLE_FIELDS: [ContractField; 2] =
    [ContractField::TermsAndConditions, ContractField::Status];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepaymentScope {
    All,
    CaptadorOnly(UserId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractScope {
    All,
    PartyOnly(UserId),
}

fn is_party(actor: &Actor, contract: &Contract) -> bool {
    contract.captador_id.as_ref() == Some(&actor.id) || contract.partner_id == actor.id
}

/// Only someone other than the listing owner may propose to sell it.
#[must_use]
pub fn can_request_contract(actor: &Actor, property: &Property) -> bool {
    actor.id != property.owner_id
}

#[must_use]
pub fn can_decide_request(actor: &Actor, property: &Property) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Partner | Role::Captador => actor.id == property.owner_id,
    }
}

#[must_use]
pub fn can_view_request(actor: &Actor, request: &ContractRequest) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Partner | Role::Captador => {
            actor.id == request.requester_id || actor.id == request.owner_id
        }
    }
}

#[must_use]
pub fn can_view_contract(actor: &Actor, contract: &Contract) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Partner | Role::Captador => is_party(actor, contract),
    }
}

/// Non-admin parties may only alter the terms text and the status; the
/// percentage and monetary columns are immutable to them.
#[must_use]
pub fn can_mutate_contract(actor: &Actor, contract: &Contract, fields: &[ContractField]) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Partner | Role::Captador => {
            is_party(actor, contract)
                && fields.iter().all(|f| PARTY_MUTABLE_FIELDS.contains(f))
        }
    }
}

#[must_use]
pub fn can_list_repayments(actor: &Actor) -> RepaymentScope {
    match actor.role {
        Role::Admin => RepaymentScope::All,
        Role::Partner | Role::Captador => RepaymentScope::CaptadorOnly(actor.id.clone()),
    }
}

#[must_use]
pub fn contract_list_scope(actor: &Actor) -> ContractScope {
    match actor.role {
        Role::Admin => ContractScope::All,
        Role::Partner | Role::Captador => ContractScope::PartyOnly(actor.id.clone()),
    }
}
