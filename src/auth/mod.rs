//! Authentication flow: password hashing, token issuance and verification,
//! the register/login/profile service, and the per-request bearer gate.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod service;
pub mod token;

pub use extractor::AuthenticatedUser;
pub use service::AuthService;
pub use token::{Claims, TokenManager};
