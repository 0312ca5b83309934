pub mod filter;
pub mod paginator;

pub use filter::filter_records;
pub use paginator::{collect_all, collect_history, IdentityHistory};
