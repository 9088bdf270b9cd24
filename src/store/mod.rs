pub mod client;
pub mod error;
pub mod query;

pub use client::{PostgrestStore, TableStore};
pub use error::StoreError;
pub use query::{CountMode, SortDirection, StoreRequest, TableQuery};
