#![forbid(unsafe_code)]

pub const CRATE_NAME: &str = "atria-api";

pub const API_VERSION: &str = "v1";

pub mod convert;
pub mod dto;
pub mod error_mapping;
pub mod params;
pub mod responses;

pub use error_mapping::status_for;
pub use responses::{failure, success};
