// Application layer - use cases and orchestration over a ledger store.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
