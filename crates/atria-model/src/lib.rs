#![forbid(unsafe_code)]

pub const CRATE_NAME: &str = "atria-model";

mod actor;
mod contract;
mod ids;
mod money;
mod property;
mod repayment;
mod request;

pub use actor::{Actor, Role};
pub use contract::{Contract, ContractStatus, ContractType, TOTAL_COMMISSION_BP};
pub use ids::{
    parse_contract_id, parse_property_id, parse_repayment_id, parse_request_id, parse_user_id,
    ContractId, PropertyId, RepaymentId, RequestId, UserId, ValidationError, ID_MAX_LEN,
    PLATFORM_IDENTITY,
};
pub use money::Money;
pub use property::{Property, PropertyOrigin};
pub use repayment::{CommissionRepayment, RepaymentStatus};
pub use request::{ContractRequest, RequestStatus};
