#![forbid(unsafe_code)]

pub const CRATE_NAME: &str = "atria-policies";

mod access;

pub use access::{
    can_decide_request, can_list_repayments, can_mutate_contract, can_request_contract,
    can_view_contract, can_view_request, contract_list_scope, ContractField, ContractScope,
    RepaymentScope, PARTY_MUTABLE_FIELDS,
};
