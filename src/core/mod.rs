//! Data access for the pages: the backend API and persisted browser state.

pub mod api;
pub mod error;
pub mod store;

pub use api::{ApiClient, FetchTransport, RequestOptions};
pub use error::{ApiError, StoreError};
pub use store::{LocalStorage, MemoryStorage, Store};
