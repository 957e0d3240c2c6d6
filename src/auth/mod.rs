// file: src/auth/mod.rs
// description: password sealing, login, registration and session persistence

pub mod password;
pub mod service;
pub mod session;

pub use service::{AuthService, Registration, UNKNOWN_DEPARTMENT};
pub use session::{Session, SessionStore};
