#![forbid(unsafe_code)]

pub const CRATE_NAME: &str = "atria-core";

pub const ENV_ATRIA_LOG_LEVEL: &str = "ATRIA_LOG_LEVEL";
pub const ENV_ATRIA_DB_PATH: &str = "ATRIA_DB_PATH";
pub const ENV_ATRIA_BIND_ADDR: &str = "ATRIA_BIND_ADDR";

pub mod commission;
pub mod error;
pub mod ports;

pub use commission::{
    CommissionSplit, ContractCommissionPolicy, DealCommissionPolicy, DealSplit,
    DEAL_CAPTOR_RATE_BP, DEAL_PLATFORM_RATE_BP,
};
pub use error::{CoreError, ErrorKind};
pub use ports::{
    Clock, ContractFilter, ContractStats, ContractStore, Notification, NotificationKind,
    NotificationSink, Page, RepaymentFilter, RequestFilter, SystemClock,
};
