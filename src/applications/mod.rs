//! Application records: owner-scoped CRUD plus aggregate statistics.

pub mod handlers;
pub mod service;

pub use service::ApplicationService;
