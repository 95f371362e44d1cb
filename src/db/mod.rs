//! Persistence layer: domain models, the store trait seam, and the
//! PostgreSQL and in-memory drivers behind it.

pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use models::{Application, ApplicationStatus, User, UserView};
pub use postgres::PgStore;
pub use store::{ApplicationStore, UserStore};
