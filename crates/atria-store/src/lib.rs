#![forbid(unsafe_code)]

pub const CRATE_NAME: &str = "atria-store";

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
