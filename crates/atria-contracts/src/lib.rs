#![forbid(unsafe_code)]

pub const CRATE_NAME: &str = "atria-contracts";

mod lifecycle;
mod notify;
mod repayment;

pub use lifecycle::{
    ContractService, Decision, DecisionOutcome, NewContract, NewContractRequest,
};
pub use repayment::{NewRepayment, RepaymentService};
